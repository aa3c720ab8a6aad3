//! Packrat memoization.
//!
//! One row per token position, one slot per memoized rule. A slot records
//! whether the rule failed at that position or where it stopped and what it
//! built. The table belongs to one parse and is cleared between passes.

use serpent_ir::{NodeId, NodeList};

/// Rules whose results are memoized.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) enum Rule {
    Block,
    SimpleStmt,
    StarExpression,
    Expression,
    Disjunction,
    Conjunction,
    Inversion,
    BitwiseOr,
    Factor,
    AwaitPrimary,
    Primary,
    Strings,
    Arguments,
    StarTarget,
    TargetWithStarAtom,
    TPrimary,
    DelTarget,
    ClosedPattern,
}

impl Rule {
    pub(crate) const COUNT: usize = Rule::ClosedPattern as usize + 1;
}

/// What a rule produced.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Memo {
    Failed,
    Node(NodeId),
    Nodes(NodeList),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) struct Entry {
    /// Token position after the rule.
    pub end: u32,
    pub value: Memo,
}

#[derive(Default)]
pub(crate) struct MemoTable {
    rows: Vec<[Option<Entry>; Rule::COUNT]>,
}

impl MemoTable {
    pub(crate) fn get(&self, pos: usize, rule: Rule) -> Option<Entry> {
        self.rows.get(pos).and_then(|row| row[rule as usize])
    }

    pub(crate) fn insert(&mut self, pos: usize, rule: Rule, entry: Entry) {
        if pos >= self.rows.len() {
            self.rows.resize(pos + 1, [None; Rule::COUNT]);
        }
        self.rows[pos][rule as usize] = Some(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }
}
