pub mod alphabet;
pub mod elements;
pub mod exclusion;
pub mod partition;

use alphabet::AlphabetIndex;
use exclusion::ExclusionSet;
use partition::Partition;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Bounds applied to a full enumeration of one word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_partitions: Option<usize>,
    pub time_budget: Option<Duration>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Outcome of a bounded enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmentation {
    pub partitions: BTreeSet<Partition>,
    /// Set when a limit stopped the search while partitions were still left.
    pub truncated: bool,
}

/// Splits words into sequences of alphabet tokens.
///
/// Matching is case-insensitive and always covers the whole word. At each token
/// start the candidates are tried in the alphabet's declared order, with full
/// backtracking: a candidate that leads to a dead end is abandoned and the next
/// one is tried.
#[derive(Debug, Clone)]
pub struct Segmenter {
    alphabet: Arc<AlphabetIndex>,
}

/// Partitions that start with `prefix` (token ordinals) and avoid `exclusions`.
struct Branch {
    prefix: Vec<usize>,
    exclusions: ExclusionSet,
}

impl Segmenter {
    pub fn new(alphabet: Arc<AlphabetIndex>) -> Self {
        Self { alphabet }
    }

    /// Segmenter over the built-in element symbols.
    pub fn periodic() -> Self {
        Self::new(elements::periodic_table())
    }

    pub fn alphabet(&self) -> &AlphabetIndex {
        &self.alphabet
    }

    pub fn is_decomposable(&self, word: &str) -> bool {
        self.first_match(word).is_some()
    }

    pub fn first_match(&self, word: &str) -> Option<Partition> {
        let folded = word.to_lowercase();
        self.decompose(&folded, &[], &ExclusionSet::new())
            .map(|path| self.partition(&path))
    }

    /// Every distinct way of writing `word` with alphabet tokens.
    pub fn all_matches(&self, word: &str) -> BTreeSet<Partition> {
        self.all_matches_within(word, SearchLimits::unbounded())
            .partitions
    }

    /// Enumerate partitions by excluding, one token index at a time, the
    /// tokens of each partition already found.
    ///
    /// The branch that excludes token `i` keeps tokens `0..i` of the partition
    /// it came from. Branches therefore never overlap: every search either
    /// yields a new partition or fails, and the work done is bounded by the
    /// number of partitions times the word length.
    pub fn all_matches_within(&self, word: &str, limits: SearchLimits) -> Segmentation {
        let folded = word.to_lowercase();
        let started = Instant::now();
        let mut result = Segmentation::default();
        let mut pending = vec![Branch {
            prefix: Vec::new(),
            exclusions: ExclusionSet::new(),
        }];
        let mut searches = 0usize;

        while let Some(branch) = pending.pop() {
            if limits.time_budget.is_some_and(|budget| started.elapsed() >= budget) {
                result.truncated = true;
                break;
            }

            searches += 1;
            let Some(path) = self.decompose(&folded, &branch.prefix, &branch.exclusions) else {
                continue;
            };

            // Past the cap, remaining branches are only searched to learn
            // whether anything was left out
            if limits.max_partitions.is_some_and(|max| result.partitions.len() >= max) {
                result.truncated = true;
                break;
            }

            // Children are pushed in reverse so the lowest index is explored first
            for index in (branch.prefix.len()..path.len()).rev() {
                pending.push(Branch {
                    prefix: path[..index].to_vec(),
                    exclusions: branch
                        .exclusions
                        .with(index, self.alphabet.token(path[index])),
                });
            }
            result.partitions.insert(self.partition(&path));
        }

        debug!(
            word,
            partitions = result.partitions.len(),
            searches,
            truncated = result.truncated,
            "enumerated partitions"
        );

        result
    }

    /// Single backtracking search that keeps `prefix` and honours `exclusions`.
    /// Returns the token ordinals of the whole partition.
    fn decompose(
        &self,
        folded: &str,
        prefix: &[usize],
        exclusions: &ExclusionSet,
    ) -> Option<Vec<usize>> {
        if folded.is_empty() || self.alphabet.is_empty() {
            return None;
        }

        let start = prefix.iter().map(|&ordinal| self.alphabet.key_len(ordinal)).sum();
        let mut search = Search {
            alphabet: &self.alphabet,
            folded,
            exclusions,
            free_from: exclusions.max_index().map_or(0, |max| max + 1),
            dead: vec![false; folded.len() + 1],
            path: prefix.to_vec(),
        };

        if search.descend(start) {
            Some(search.path)
        } else {
            trace!(folded, excluded = exclusions.len(), "no decomposition");
            None
        }
    }

    fn partition(&self, path: &[usize]) -> Partition {
        Partition::new(
            path.iter()
                .map(|&ordinal| self.alphabet.token(ordinal).to_string())
                .collect(),
        )
    }
}

struct Search<'a> {
    alphabet: &'a AlphabetIndex,
    folded: &'a str,
    exclusions: &'a ExclusionSet,
    /// From this token index on no exclusion applies, so whether a byte
    /// position can be completed no longer depends on how it was reached.
    free_from: usize,
    dead: Vec<bool>,
    path: Vec<usize>,
}

impl Search<'_> {
    fn descend(&mut self, pos: usize) -> bool {
        if pos == self.folded.len() {
            return !self.path.is_empty();
        }

        let index = self.path.len();
        let memoizable = index >= self.free_from;
        if memoizable && self.dead[pos] {
            return false;
        }

        for ordinal in self.alphabet.candidates_at(self.folded, pos) {
            if self.exclusions.forbids(index, self.alphabet.token(ordinal)) {
                continue;
            }

            self.path.push(ordinal);
            if self.descend(pos + self.alphabet.key_len(ordinal)) {
                return true;
            }
            self.path.pop();
        }

        if memoizable {
            self.dead[pos] = true;
        }
        false
    }
}
