pub mod cli;
pub mod config;
pub mod parser;
pub mod pipeline;
pub mod segmenter;
pub mod stats;

pub use config::Config;
pub use pipeline::Pipeline;
pub use segmenter::alphabet::{AlphabetError, AlphabetIndex};
pub use segmenter::partition::Partition;
pub use segmenter::{SearchLimits, Segmentation, Segmenter};

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub words_seen: usize,
    pub words_matched: usize,
    pub partitions_found: usize,
    pub truncated_words: usize,
}

/// Segmentation outcome for one input word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordReport {
    pub word: String,
    pub normalized: String,
    pub line: usize,
    pub column: usize,
    pub partitions: Vec<Partition>,
    pub truncated: bool,
}

impl WordReport {
    pub fn is_match(&self) -> bool {
        !self.partitions.is_empty()
    }
}
