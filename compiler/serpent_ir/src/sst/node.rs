//! Node kinds.

use super::{
    BinOp, BoolOp, ConstId, Conversion, ExprContext, NameList, NodeId, NodeList, OpList, UnaryOp,
};
use crate::Name;

/// The kind of a syntax tree node and its kind-specific children.
///
/// Optional children are `Option<NodeId>`; optional entries inside child
/// lists use [`NodeId::NONE`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    // === Modules ===
    Module {
        body: NodeList,
        type_ignores: NodeList,
    },
    Interactive {
        body: NodeList,
    },
    Expression {
        body: NodeId,
    },

    // === Statements ===
    FunctionDef {
        name: Name,
        args: NodeId,
        body: NodeList,
        decorators: NodeList,
        returns: Option<NodeId>,
        type_comment: Option<Name>,
        is_async: bool,
    },
    ClassDef {
        name: Name,
        bases: NodeList,
        keywords: NodeList,
        body: NodeList,
        decorators: NodeList,
    },
    Return {
        value: Option<NodeId>,
    },
    Delete {
        targets: NodeList,
    },
    Assign {
        targets: NodeList,
        value: NodeId,
        type_comment: Option<Name>,
    },
    AugAssign {
        target: NodeId,
        op: BinOp,
        value: NodeId,
    },
    AnnAssign {
        target: NodeId,
        annotation: NodeId,
        value: Option<NodeId>,
        /// Target is a plain name, not parenthesized.
        simple: bool,
    },
    For {
        target: NodeId,
        iter: NodeId,
        body: NodeList,
        orelse: NodeList,
        type_comment: Option<Name>,
        is_async: bool,
    },
    While {
        test: NodeId,
        body: NodeList,
        orelse: NodeList,
    },
    If {
        test: NodeId,
        body: NodeList,
        orelse: NodeList,
    },
    With {
        items: NodeList,
        body: NodeList,
        type_comment: Option<Name>,
        is_async: bool,
    },
    Match {
        subject: NodeId,
        cases: NodeList,
    },
    Raise {
        exc: Option<NodeId>,
        cause: Option<NodeId>,
    },
    Try {
        body: NodeList,
        handlers: NodeList,
        orelse: NodeList,
        finalbody: NodeList,
    },
    Assert {
        test: NodeId,
        msg: Option<NodeId>,
    },
    Import {
        names: NodeList,
    },
    ImportFrom {
        module: Option<Name>,
        names: NodeList,
        level: u32,
    },
    Global {
        names: NameList,
    },
    Nonlocal {
        names: NameList,
    },
    ExprStmt {
        value: NodeId,
    },
    Pass,
    Break,
    Continue,

    // === Expressions ===
    BoolOp {
        op: BoolOp,
        values: NodeList,
    },
    NamedExpr {
        target: NodeId,
        value: NodeId,
    },
    BinOp {
        left: NodeId,
        op: BinOp,
        right: NodeId,
    },
    UnaryOp {
        op: UnaryOp,
        operand: NodeId,
    },
    Lambda {
        args: NodeId,
        body: NodeId,
    },
    IfExp {
        test: NodeId,
        body: NodeId,
        orelse: NodeId,
    },
    Dict {
        /// `NodeId::NONE` marks a `**mapping` entry.
        keys: NodeList,
        values: NodeList,
    },
    Set {
        elts: NodeList,
    },
    ListComp {
        elt: NodeId,
        generators: NodeList,
    },
    SetComp {
        elt: NodeId,
        generators: NodeList,
    },
    DictComp {
        key: NodeId,
        value: NodeId,
        generators: NodeList,
    },
    GeneratorExp {
        elt: NodeId,
        generators: NodeList,
    },
    Await {
        value: NodeId,
    },
    Yield {
        value: Option<NodeId>,
    },
    YieldFrom {
        value: NodeId,
    },
    Compare {
        left: NodeId,
        ops: OpList,
        comparators: NodeList,
    },
    Call {
        func: NodeId,
        args: NodeList,
        keywords: NodeList,
    },
    FormattedValue {
        value: NodeId,
        conversion: Option<Conversion>,
        format_spec: Option<NodeId>,
    },
    JoinedStr {
        values: NodeList,
    },
    Constant {
        value: ConstId,
        /// Written with a `u` prefix.
        unicode_prefix: bool,
    },
    Attribute {
        value: NodeId,
        attr: Name,
        ctx: ExprContext,
    },
    Subscript {
        value: NodeId,
        slice: NodeId,
        ctx: ExprContext,
    },
    Starred {
        value: NodeId,
        ctx: ExprContext,
    },
    Name {
        id: Name,
        ctx: ExprContext,
    },
    List {
        elts: NodeList,
        ctx: ExprContext,
    },
    Tuple {
        elts: NodeList,
        ctx: ExprContext,
    },
    Slice {
        lower: Option<NodeId>,
        upper: Option<NodeId>,
        step: Option<NodeId>,
    },

    // === Builders ===
    Comprehension {
        target: NodeId,
        iter: NodeId,
        ifs: NodeList,
        is_async: bool,
    },
    ExceptHandler {
        type_: Option<NodeId>,
        name: Option<Name>,
        body: NodeList,
    },
    Arguments {
        posonly: NodeList,
        args: NodeList,
        vararg: Option<NodeId>,
        kwonly: NodeList,
        /// One entry per keyword-only parameter, `NodeId::NONE` when absent.
        kw_defaults: NodeList,
        kwarg: Option<NodeId>,
        /// Defaults of the trailing positional parameters.
        defaults: NodeList,
    },
    Arg {
        arg: Name,
        annotation: Option<NodeId>,
        type_comment: Option<Name>,
    },
    Keyword {
        /// `None` for `**mapping`.
        arg: Option<Name>,
        value: NodeId,
    },
    Alias {
        name: Name,
        asname: Option<Name>,
    },
    WithItem {
        context_expr: NodeId,
        optional_vars: Option<NodeId>,
    },
    MatchCase {
        pattern: NodeId,
        guard: Option<NodeId>,
        body: NodeList,
    },
    TypeIgnore {
        lineno: u32,
        tag: Name,
    },

    // === Patterns ===
    MatchValue {
        value: NodeId,
    },
    MatchSingleton {
        value: ConstId,
    },
    MatchSequence {
        patterns: NodeList,
    },
    MatchMapping {
        keys: NodeList,
        patterns: NodeList,
        rest: Option<Name>,
    },
    MatchClass {
        cls: NodeId,
        patterns: NodeList,
        kwd_attrs: NameList,
        kwd_patterns: NodeList,
    },
    MatchStar {
        name: Option<Name>,
    },
    MatchAs {
        pattern: Option<NodeId>,
        name: Option<Name>,
    },
    MatchOr {
        patterns: NodeList,
    },
}

const _: () = assert!(std::mem::size_of::<NodeKind>() <= 64);

impl NodeKind {
    /// Variant name, used in diagnostics and span violation reports.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Module { .. } => "Module",
            NodeKind::Interactive { .. } => "Interactive",
            NodeKind::Expression { .. } => "Expression",
            NodeKind::FunctionDef { is_async: false, .. } => "FunctionDef",
            NodeKind::FunctionDef { is_async: true, .. } => "AsyncFunctionDef",
            NodeKind::ClassDef { .. } => "ClassDef",
            NodeKind::Return { .. } => "Return",
            NodeKind::Delete { .. } => "Delete",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::AugAssign { .. } => "AugAssign",
            NodeKind::AnnAssign { .. } => "AnnAssign",
            NodeKind::For { is_async: false, .. } => "For",
            NodeKind::For { is_async: true, .. } => "AsyncFor",
            NodeKind::While { .. } => "While",
            NodeKind::If { .. } => "If",
            NodeKind::With { is_async: false, .. } => "With",
            NodeKind::With { is_async: true, .. } => "AsyncWith",
            NodeKind::Match { .. } => "Match",
            NodeKind::Raise { .. } => "Raise",
            NodeKind::Try { .. } => "Try",
            NodeKind::Assert { .. } => "Assert",
            NodeKind::Import { .. } => "Import",
            NodeKind::ImportFrom { .. } => "ImportFrom",
            NodeKind::Global { .. } => "Global",
            NodeKind::Nonlocal { .. } => "Nonlocal",
            NodeKind::ExprStmt { .. } => "Expr",
            NodeKind::Pass => "Pass",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::BoolOp { .. } => "BoolOp",
            NodeKind::NamedExpr { .. } => "NamedExpr",
            NodeKind::BinOp { .. } => "BinOp",
            NodeKind::UnaryOp { .. } => "UnaryOp",
            NodeKind::Lambda { .. } => "Lambda",
            NodeKind::IfExp { .. } => "IfExp",
            NodeKind::Dict { .. } => "Dict",
            NodeKind::Set { .. } => "Set",
            NodeKind::ListComp { .. } => "ListComp",
            NodeKind::SetComp { .. } => "SetComp",
            NodeKind::DictComp { .. } => "DictComp",
            NodeKind::GeneratorExp { .. } => "GeneratorExp",
            NodeKind::Await { .. } => "Await",
            NodeKind::Yield { .. } => "Yield",
            NodeKind::YieldFrom { .. } => "YieldFrom",
            NodeKind::Compare { .. } => "Compare",
            NodeKind::Call { .. } => "Call",
            NodeKind::FormattedValue { .. } => "FormattedValue",
            NodeKind::JoinedStr { .. } => "JoinedStr",
            NodeKind::Constant { .. } => "Constant",
            NodeKind::Attribute { .. } => "Attribute",
            NodeKind::Subscript { .. } => "Subscript",
            NodeKind::Starred { .. } => "Starred",
            NodeKind::Name { .. } => "Name",
            NodeKind::List { .. } => "List",
            NodeKind::Tuple { .. } => "Tuple",
            NodeKind::Slice { .. } => "Slice",
            NodeKind::Comprehension { .. } => "comprehension",
            NodeKind::ExceptHandler { .. } => "ExceptHandler",
            NodeKind::Arguments { .. } => "arguments",
            NodeKind::Arg { .. } => "arg",
            NodeKind::Keyword { .. } => "keyword",
            NodeKind::Alias { .. } => "alias",
            NodeKind::WithItem { .. } => "withitem",
            NodeKind::MatchCase { .. } => "match_case",
            NodeKind::TypeIgnore { .. } => "TypeIgnore",
            NodeKind::MatchValue { .. } => "MatchValue",
            NodeKind::MatchSingleton { .. } => "MatchSingleton",
            NodeKind::MatchSequence { .. } => "MatchSequence",
            NodeKind::MatchMapping { .. } => "MatchMapping",
            NodeKind::MatchClass { .. } => "MatchClass",
            NodeKind::MatchStar { .. } => "MatchStar",
            NodeKind::MatchAs { .. } => "MatchAs",
            NodeKind::MatchOr { .. } => "MatchOr",
        }
    }

    /// Is this an expression node?
    pub const fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::BoolOp { .. }
                | NodeKind::NamedExpr { .. }
                | NodeKind::BinOp { .. }
                | NodeKind::UnaryOp { .. }
                | NodeKind::Lambda { .. }
                | NodeKind::IfExp { .. }
                | NodeKind::Dict { .. }
                | NodeKind::Set { .. }
                | NodeKind::ListComp { .. }
                | NodeKind::SetComp { .. }
                | NodeKind::DictComp { .. }
                | NodeKind::GeneratorExp { .. }
                | NodeKind::Await { .. }
                | NodeKind::Yield { .. }
                | NodeKind::YieldFrom { .. }
                | NodeKind::Compare { .. }
                | NodeKind::Call { .. }
                | NodeKind::FormattedValue { .. }
                | NodeKind::JoinedStr { .. }
                | NodeKind::Constant { .. }
                | NodeKind::Attribute { .. }
                | NodeKind::Subscript { .. }
                | NodeKind::Starred { .. }
                | NodeKind::Name { .. }
                | NodeKind::List { .. }
                | NodeKind::Tuple { .. }
                | NodeKind::Slice { .. }
        )
    }

    /// Is this a statement node?
    pub const fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDef { .. }
                | NodeKind::ClassDef { .. }
                | NodeKind::Return { .. }
                | NodeKind::Delete { .. }
                | NodeKind::Assign { .. }
                | NodeKind::AugAssign { .. }
                | NodeKind::AnnAssign { .. }
                | NodeKind::For { .. }
                | NodeKind::While { .. }
                | NodeKind::If { .. }
                | NodeKind::With { .. }
                | NodeKind::Match { .. }
                | NodeKind::Raise { .. }
                | NodeKind::Try { .. }
                | NodeKind::Assert { .. }
                | NodeKind::Import { .. }
                | NodeKind::ImportFrom { .. }
                | NodeKind::Global { .. }
                | NodeKind::Nonlocal { .. }
                | NodeKind::ExprStmt { .. }
                | NodeKind::Pass
                | NodeKind::Break
                | NodeKind::Continue
        )
    }

    /// Expression context of assignable expressions.
    pub const fn context(&self) -> Option<ExprContext> {
        match self {
            NodeKind::Attribute { ctx, .. }
            | NodeKind::Subscript { ctx, .. }
            | NodeKind::Starred { ctx, .. }
            | NodeKind::Name { ctx, .. }
            | NodeKind::List { ctx, .. }
            | NodeKind::Tuple { ctx, .. } => Some(*ctx),
            _ => None,
        }
    }
}
