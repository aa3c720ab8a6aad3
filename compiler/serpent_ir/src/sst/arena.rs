//! Struct-of-arrays node storage.

use super::{CmpOp, ConstId, ConstantValue, NameList, NodeId, NodeKind, NodeList, OpList};
use crate::{Name, SourceRange, StringInterner};

/// Storage for one syntax tree.
///
/// `kinds[i]` and `ranges[i]` describe node `i`. Child lists, identifier
/// lists and comparison operators live in flat pools addressed by
/// [`NodeList`], [`NameList`] and [`OpList`].
#[derive(Clone, Debug, Default)]
pub struct SstArena {
    kinds: Vec<NodeKind>,
    ranges: Vec<SourceRange>,
    lists: Vec<NodeId>,
    identifiers: Vec<Name>,
    cmp_ops: Vec<CmpOp>,
    constants: Vec<ConstantValue>,
    interner: StringInterner,
}

impl SstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena pre-sized for roughly `source_len` codepoints of input.
    pub fn with_capacity(source_len: usize) -> Self {
        let nodes = source_len / 4 + 8;
        SstArena {
            kinds: Vec::with_capacity(nodes),
            ranges: Vec::with_capacity(nodes),
            lists: Vec::with_capacity(nodes / 2),
            ..Self::default()
        }
    }

    // === Nodes ===

    /// Append a node and return its id.
    pub fn alloc(&mut self, kind: NodeKind, range: SourceRange) -> NodeId {
        let index = u32::try_from(self.kinds.len()).unwrap_or(u32::MAX - 1);
        self.kinds.push(kind);
        self.ranges.push(range);
        NodeId::new(index)
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn range(&self, id: NodeId) -> SourceRange {
        self.ranges[id.index()]
    }

    /// Replace the range of an already built node.
    #[inline]
    pub fn set_range(&mut self, id: NodeId, range: SourceRange) {
        self.ranges[id.index()] = range;
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Drop every node, list and constant. Interned names are kept.
    pub fn clear(&mut self) {
        self.kinds.clear();
        self.ranges.clear();
        self.lists.clear();
        self.identifiers.clear();
        self.cmp_ops.clear();
        self.constants.clear();
    }

    // === Pools ===

    pub fn alloc_list(&mut self, nodes: &[NodeId]) -> NodeList {
        let start = u32::try_from(self.lists.len()).unwrap_or(u32::MAX);
        self.lists.extend_from_slice(nodes);
        NodeList::new(start, u32::try_from(nodes.len()).unwrap_or(u32::MAX))
    }

    #[inline]
    pub fn list(&self, list: NodeList) -> &[NodeId] {
        &self.lists[list.to_range()]
    }

    pub fn alloc_names(&mut self, names: &[Name]) -> NameList {
        let start = u32::try_from(self.identifiers.len()).unwrap_or(u32::MAX);
        self.identifiers.extend_from_slice(names);
        NameList::new(start, u32::try_from(names.len()).unwrap_or(u32::MAX))
    }

    #[inline]
    pub fn names(&self, list: NameList) -> &[Name] {
        &self.identifiers[list.to_range()]
    }

    pub fn alloc_ops(&mut self, ops: &[CmpOp]) -> OpList {
        let start = u32::try_from(self.cmp_ops.len()).unwrap_or(u32::MAX);
        self.cmp_ops.extend_from_slice(ops);
        OpList::new(start, u32::try_from(ops.len()).unwrap_or(u32::MAX))
    }

    #[inline]
    pub fn ops(&self, list: OpList) -> &[CmpOp] {
        &self.cmp_ops[list.to_range()]
    }

    pub fn alloc_constant(&mut self, value: ConstantValue) -> ConstId {
        let id = ConstId::new(u32::try_from(self.constants.len()).unwrap_or(u32::MAX));
        self.constants.push(value);
        id
    }

    #[inline]
    pub fn constant(&self, id: ConstId) -> &ConstantValue {
        &self.constants[id.index()]
    }

    // === Names ===

    pub fn intern(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn name_str(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    // === Queries ===

    /// Short `Kind[range]` label used in reports.
    pub fn describe(&self, id: NodeId) -> String {
        format!("{}[{}]", self.kind(id).name(), self.range(id))
    }

    /// Description used by "cannot assign to ..." style diagnostics.
    pub fn expr_name(&self, id: NodeId) -> &'static str {
        match self.kind(id) {
            NodeKind::Attribute { .. } => "attribute",
            NodeKind::Subscript { .. } => "subscript",
            NodeKind::Starred { .. } => "starred",
            NodeKind::Name { .. } => "name",
            NodeKind::List { .. } => "list",
            NodeKind::Tuple { .. } => "tuple",
            NodeKind::Lambda { .. } => "lambda",
            NodeKind::Call { .. } => "function call",
            NodeKind::BoolOp { .. } | NodeKind::BinOp { .. } | NodeKind::UnaryOp { .. } => {
                "expression"
            }
            NodeKind::GeneratorExp { .. } => "generator expression",
            NodeKind::Yield { .. } | NodeKind::YieldFrom { .. } => "yield expression",
            NodeKind::Await { .. } => "await expression",
            NodeKind::ListComp { .. } => "list comprehension",
            NodeKind::SetComp { .. } => "set comprehension",
            NodeKind::DictComp { .. } => "dict comprehension",
            NodeKind::Dict { .. } => "dict literal",
            NodeKind::Set { .. } => "set display",
            NodeKind::JoinedStr { .. } | NodeKind::FormattedValue { .. } => "f-string expression",
            NodeKind::Constant { value, .. } => self.constant(*value).describe(),
            NodeKind::Compare { .. } => "comparison",
            NodeKind::IfExp { .. } => "conditional expression",
            NodeKind::NamedExpr { .. } => "named expression",
            _ => "expression",
        }
    }
}
