use crate::parser::normalize::strip_accents;
use crate::parser::WordSpan;
use crate::segmenter::alphabet::AlphabetIndex;
use crate::segmenter::{elements, SearchLimits, Segmenter};
use crate::stats::{OccurrenceCounter, TokenCount};
use crate::{Config, RunSummary, WordReport};
use anyhow::Result;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies a [`Config`] to batches of words: filtering, normalization and
/// segmentation, in parallel across words.
pub struct Pipeline {
    segmenter: Segmenter,
    ignore_patterns: Vec<Regex>,
    limits: SearchLimits,
    all_matches: bool,
    normalize_accents: bool,
    unique_words: bool,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self> {
        let alphabet = match &config.alphabet {
            Some(path) => {
                let index = AlphabetIndex::from_path(path)?;
                info!(path = %path.display(), tokens = index.len(), "loaded custom alphabet");
                Arc::new(index)
            }
            None => elements::periodic_table(),
        };

        let mut ignore_patterns = Vec::new();
        for pattern in &config.ignore_patterns {
            match Regex::new(pattern) {
                Ok(re) => ignore_patterns.push(re),
                Err(e) => warn!("Invalid regex pattern '{}': {}", pattern, e),
            }
        }

        Ok(Self {
            segmenter: Segmenter::new(alphabet),
            ignore_patterns,
            limits: config.search_limits(),
            all_matches: config.all_matches,
            normalize_accents: config.normalize_accents,
            unique_words: config.unique_words,
        })
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Segment every word span, preserving input order. `on_word` is called
    /// once per processed word, from worker threads.
    pub fn run<F>(&self, spans: Vec<WordSpan>, on_word: F) -> Vec<WordReport>
    where
        F: Fn(&WordReport) + Sync,
    {
        let spans = if self.unique_words {
            dedupe(spans)
        } else {
            spans
        };

        spans
            .into_par_iter()
            .filter(|span| !self.should_ignore(&span.text))
            .map(|span| {
                let report = self.segment(span);
                on_word(&report);
                report
            })
            .collect()
    }

    /// Segment a single word.
    pub fn segment(&self, span: WordSpan) -> WordReport {
        let normalized = if self.normalize_accents {
            strip_accents(&span.text)
        } else {
            span.text.clone()
        };

        let (partitions, truncated) = if self.all_matches {
            let result = self.segmenter.all_matches_within(&normalized, self.limits);
            if result.truncated {
                warn!(word = %span.text, found = result.partitions.len(), "search stopped by limit");
            }
            (result.partitions.into_iter().collect(), result.truncated)
        } else {
            (self.segmenter.first_match(&normalized).into_iter().collect(), false)
        };

        WordReport {
            word: span.text,
            normalized,
            line: span.line,
            column: span.column,
            partitions,
            truncated,
        }
    }

    /// Token usage over the first partition of every matched word.
    pub fn count_occurrences(&self, reports: &[WordReport]) -> Vec<TokenCount> {
        let mut counter = OccurrenceCounter::new();
        for report in reports.iter().filter(|r| r.is_match()) {
            if !self.all_matches {
                counter.record(&report.partitions[0]);
            } else if let Some(first) = self.segmenter.first_match(&report.normalized) {
                // Enumerated partitions are sorted, not in match order
                counter.record(&first);
            }
        }
        counter.most_common()
    }

    fn should_ignore(&self, word: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| pattern.is_match(word))
    }
}

/// Keep the first occurrence of each word, compared case-insensitively.
fn dedupe(spans: Vec<WordSpan>) -> Vec<WordSpan> {
    let mut seen = HashSet::new();
    let before = spans.len();
    let unique: Vec<WordSpan> = spans
        .into_iter()
        .filter(|span| seen.insert(span.text.to_lowercase()))
        .collect();
    debug!(before, after = unique.len(), "removed duplicate words");
    unique
}

/// Aggregate counts over a finished batch.
pub fn summarize(reports: &[WordReport]) -> RunSummary {
    RunSummary {
        words_seen: reports.len(),
        words_matched: reports.iter().filter(|r| r.is_match()).count(),
        partitions_found: reports.iter().map(|r| r.partitions.len()).sum(),
        truncated_words: reports.iter().filter(|r| r.truncated).count(),
    }
}
