//! Source-ordered child enumeration.
//!
//! [`SstArena::child_runs`] is the single exhaustive description of which
//! nodes a node owns. Each run lists children that appear in the source in
//! that order, which is what the span checker relies on.

use super::{NodeId, NodeKind, NodeList, SstArena};
use smallvec::SmallVec;

/// Children of one node that appear in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildRun {
    /// What the run holds (`"statements"`, `"operands"`, ...).
    pub what: &'static str,
    /// Present children; `NodeId::NONE` placeholders are left out.
    pub nodes: SmallVec<[NodeId; 4]>,
}

impl ChildRun {
    fn new(what: &'static str) -> Self {
        ChildRun {
            what,
            nodes: SmallVec::new(),
        }
    }

    fn node(mut self, id: NodeId) -> Self {
        if !id.is_none() {
            self.nodes.push(id);
        }
        self
    }

    fn opt(self, id: Option<NodeId>) -> Self {
        match id {
            Some(id) => self.node(id),
            None => self,
        }
    }

    fn list(mut self, arena: &SstArena, list: NodeList) -> Self {
        self.nodes
            .extend(arena.list(list).iter().copied().filter(|id| !id.is_none()));
        self
    }

    /// Alternate entries of two parallel lists (`keys[0], values[0], ...`).
    fn zipped(mut self, arena: &SstArena, first: NodeList, second: NodeList) -> Self {
        let first = arena.list(first);
        let second = arena.list(second);
        for i in 0..first.len().max(second.len()) {
            for id in [first.get(i), second.get(i)].into_iter().flatten() {
                if !id.is_none() {
                    self.nodes.push(*id);
                }
            }
        }
        self
    }
}

impl SstArena {
    /// Children of `id`, grouped into source-ordered runs.
    ///
    /// `Module::type_ignores` is not included: type-ignore comments are
    /// metadata and may sit after the last statement.
    pub fn child_runs(&self, id: NodeId) -> SmallVec<[ChildRun; 4]> {
        let run = ChildRun::new;
        let mut runs = SmallVec::new();
        match *self.kind(id) {
            NodeKind::Module { body, .. } | NodeKind::Interactive { body } => {
                runs.push(run("statements").list(self, body));
            }
            NodeKind::Expression { body } => runs.push(run("body").node(body)),
            NodeKind::FunctionDef {
                args,
                body,
                decorators,
                returns,
                ..
            } => {
                runs.push(run("decorators").list(self, decorators));
                runs.push(run("signature").node(args).opt(returns));
                runs.push(run("statements").list(self, body));
            }
            NodeKind::ClassDef {
                bases,
                keywords,
                body,
                decorators,
                ..
            } => {
                runs.push(run("decorators").list(self, decorators));
                runs.push(run("bases").list(self, bases));
                runs.push(run("keywords").list(self, keywords));
                runs.push(run("statements").list(self, body));
            }
            NodeKind::Return { value } => runs.push(run("value").opt(value)),
            NodeKind::Delete { targets } => runs.push(run("targets").list(self, targets)),
            NodeKind::Assign { targets, value, .. } => {
                runs.push(run("assignment").list(self, targets).node(value));
            }
            NodeKind::AugAssign { target, value, .. } => {
                runs.push(run("operands").node(target).node(value));
            }
            NodeKind::AnnAssign {
                target,
                annotation,
                value,
                ..
            } => runs.push(run("assignment").node(target).node(annotation).opt(value)),
            NodeKind::For {
                target,
                iter,
                body,
                orelse,
                ..
            } => {
                runs.push(run("header").node(target).node(iter));
                runs.push(run("statements").list(self, body));
                runs.push(run("else statements").list(self, orelse));
            }
            NodeKind::While { test, body, orelse } | NodeKind::If { test, body, orelse } => {
                runs.push(run("test").node(test));
                runs.push(run("statements").list(self, body));
                runs.push(run("else statements").list(self, orelse));
            }
            NodeKind::With { items, body, .. } => {
                runs.push(run("items").list(self, items));
                runs.push(run("statements").list(self, body));
            }
            NodeKind::Match { subject, cases } => {
                runs.push(run("subject").node(subject));
                runs.push(run("cases").list(self, cases));
            }
            NodeKind::Raise { exc, cause } => runs.push(run("operands").opt(exc).opt(cause)),
            NodeKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                runs.push(run("statements").list(self, body));
                runs.push(run("exception handlers").list(self, handlers));
                runs.push(run("else statements").list(self, orelse));
                runs.push(run("finally statements").list(self, finalbody));
            }
            NodeKind::Assert { test, msg } => runs.push(run("operands").node(test).opt(msg)),
            NodeKind::Import { names } | NodeKind::ImportFrom { names, .. } => {
                runs.push(run("names").list(self, names));
            }
            NodeKind::ExprStmt { value } => runs.push(run("value").node(value)),
            NodeKind::Global { .. }
            | NodeKind::Nonlocal { .. }
            | NodeKind::Pass
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Constant { .. }
            | NodeKind::Name { .. }
            | NodeKind::Alias { .. }
            | NodeKind::TypeIgnore { .. }
            | NodeKind::MatchSingleton { .. }
            | NodeKind::MatchStar { .. } => {}
            NodeKind::BoolOp { values, .. } => runs.push(run("values").list(self, values)),
            NodeKind::NamedExpr { target, value } => {
                runs.push(run("operands").node(target).node(value));
            }
            NodeKind::BinOp { left, right, .. } => {
                runs.push(run("operands").node(left).node(right));
            }
            NodeKind::UnaryOp { operand, .. } => runs.push(run("operand").node(operand)),
            NodeKind::Lambda { args, body } => runs.push(run("lambda").node(args).node(body)),
            NodeKind::IfExp { test, body, orelse } => {
                runs.push(run("operands").node(body).node(test).node(orelse));
            }
            NodeKind::Dict { keys, values } => {
                runs.push(run("entries").zipped(self, keys, values));
            }
            NodeKind::Set { elts } => runs.push(run("elements").list(self, elts)),
            NodeKind::ListComp { elt, generators }
            | NodeKind::SetComp { elt, generators }
            | NodeKind::GeneratorExp { elt, generators } => {
                runs.push(run("comprehension").node(elt).list(self, generators));
            }
            NodeKind::DictComp {
                key,
                value,
                generators,
            } => runs.push(
                run("comprehension")
                    .node(key)
                    .node(value)
                    .list(self, generators),
            ),
            NodeKind::Await { value }
            | NodeKind::YieldFrom { value }
            | NodeKind::Starred { value, .. }
            | NodeKind::Attribute { value, .. }
            | NodeKind::Keyword { value, .. }
            | NodeKind::MatchValue { value } => runs.push(run("value").node(value)),
            NodeKind::Yield { value } => runs.push(run("value").opt(value)),
            NodeKind::Compare {
                left, comparators, ..
            } => runs.push(run("operands").node(left).list(self, comparators)),
            NodeKind::Call {
                func,
                args,
                keywords,
            } => {
                runs.push(run("callee").node(func));
                runs.push(run("arguments").list(self, args));
                runs.push(run("keyword arguments").list(self, keywords));
            }
            NodeKind::FormattedValue {
                value, format_spec, ..
            } => runs.push(run("replacement field").node(value).opt(format_spec)),
            NodeKind::JoinedStr { values } => runs.push(run("values").list(self, values)),
            NodeKind::Subscript { value, slice, .. } => {
                runs.push(run("operands").node(value).node(slice));
            }
            NodeKind::List { elts, .. } | NodeKind::Tuple { elts, .. } => {
                runs.push(run("elements").list(self, elts));
            }
            NodeKind::Slice { lower, upper, step } => {
                runs.push(run("bounds").opt(lower).opt(upper).opt(step));
            }
            NodeKind::Comprehension {
                target, iter, ifs, ..
            } => runs.push(run("clause").node(target).node(iter).list(self, ifs)),
            NodeKind::ExceptHandler { type_, body, .. } => {
                runs.push(run("type").opt(type_));
                runs.push(run("statements").list(self, body));
            }
            NodeKind::Arguments {
                posonly,
                args,
                vararg,
                kwonly,
                kw_defaults,
                kwarg,
                defaults,
            } => {
                runs.push(
                    run("parameters")
                        .list(self, posonly)
                        .list(self, args)
                        .opt(vararg)
                        .list(self, kwonly)
                        .opt(kwarg),
                );
                runs.push(run("parameter defaults").list(self, defaults));
                runs.push(run("keyword-only defaults").list(self, kw_defaults));
            }
            NodeKind::Arg { annotation, .. } => runs.push(run("annotation").opt(annotation)),
            NodeKind::WithItem {
                context_expr,
                optional_vars,
            } => runs.push(run("item").node(context_expr).opt(optional_vars)),
            NodeKind::MatchCase {
                pattern,
                guard,
                body,
            } => {
                runs.push(run("case").node(pattern).opt(guard));
                runs.push(run("statements").list(self, body));
            }
            NodeKind::MatchSequence { patterns } | NodeKind::MatchOr { patterns } => {
                runs.push(run("patterns").list(self, patterns));
            }
            NodeKind::MatchMapping { keys, patterns, .. } => {
                runs.push(run("entries").zipped(self, keys, patterns));
            }
            NodeKind::MatchClass {
                cls,
                patterns,
                kwd_patterns,
                ..
            } => runs.push(
                run("class pattern")
                    .node(cls)
                    .list(self, patterns)
                    .list(self, kwd_patterns),
            ),
            NodeKind::MatchAs { pattern, .. } => runs.push(run("pattern").opt(pattern)),
        }
        runs.retain(|r: &mut ChildRun| !r.nodes.is_empty());
        runs
    }

    /// All children of `id` in run order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.child_runs(id)
            .into_iter()
            .flat_map(|run| run.nodes)
            .collect()
    }
}
