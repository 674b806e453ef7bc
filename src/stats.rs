use crate::segmenter::partition::Partition;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Tallies how often each token is used across partitions.
#[derive(Debug, Default)]
pub struct OccurrenceCounter {
    counts: HashMap<String, usize>,
}

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, partition: &Partition) {
        for token in partition.tokens() {
            *self.counts.entry(token.clone()).or_insert(0) += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Counts sorted by frequency, most common first; ties by token.
    pub fn most_common(&self) -> Vec<TokenCount> {
        let mut counts: Vec<TokenCount> = self
            .counts
            .iter()
            .map(|(token, &count)| TokenCount {
                token: token.clone(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
        counts
    }
}
