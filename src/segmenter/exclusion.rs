use std::collections::{BTreeMap, BTreeSet};

/// Tokens forbidden at given token indexes of a partition.
///
/// Each branch of the full enumeration owns its own set; deriving a branch
/// clones the parent and adds one exclusion, so sets only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    by_index: BTreeMap<usize, BTreeSet<String>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of `self` that additionally forbids `token` as the token at `index`.
    pub fn with(&self, index: usize, token: &str) -> Self {
        let mut next = self.clone();
        next.by_index
            .entry(index)
            .or_default()
            .insert(token.to_string());
        next
    }

    pub fn forbids(&self, index: usize, token: &str) -> bool {
        self.by_index
            .get(&index)
            .is_some_and(|tokens| tokens.contains(token))
    }

    /// Highest token index carrying an exclusion.
    pub fn max_index(&self) -> Option<usize> {
        self.by_index.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Total number of excluded (index, token) pairs.
    pub fn len(&self) -> usize {
        self.by_index.values().map(BTreeSet::len).sum()
    }
}
