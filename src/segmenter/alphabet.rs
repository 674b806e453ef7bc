use anyhow::{Context, Result};
use fst::Map;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlphabetError {
    #[error("tokens '{first}' and '{second}' collide on lowercase form '{key}'")]
    Collision {
        key: String,
        first: String,
        second: String,
    },

    #[error("token #{position} is empty")]
    EmptyToken { position: usize },

    #[error("failed to build token index: {0}")]
    Index(#[from] fst::Error),
}

/// Case-insensitive token set that remembers the declared casing and order.
///
/// The declared order is significant: when several tokens can start at the same
/// position of a word, the one declared first is tried first.
pub struct AlphabetIndex {
    tokens: Vec<String>,
    keys: Vec<String>,
    descriptions: Vec<Option<String>>,
    lookup: Map<Vec<u8>>,
    max_token_chars: usize,
}

impl AlphabetIndex {
    /// Build an index from canonical tokens in preference order.
    pub fn build<I, S>(tokens: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_described(tokens.into_iter().map(|token| (token, None)))
    }

    /// Build an index where each token may carry a human-readable description.
    pub fn build_described<I, S>(entries: I) -> Result<Self, AlphabetError>
    where
        I: IntoIterator<Item = (S, Option<String>)>,
        S: AsRef<str>,
    {
        let mut tokens: Vec<String> = Vec::new();
        let mut keys = Vec::new();
        let mut descriptions = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (position, (token, description)) in entries.into_iter().enumerate() {
            let token = token.as_ref();
            if token.is_empty() {
                return Err(AlphabetError::EmptyToken { position });
            }

            let key = token.to_lowercase();
            if let Some(&existing) = seen.get(&key) {
                return Err(AlphabetError::Collision {
                    key,
                    first: tokens[existing].clone(),
                    second: token.to_string(),
                });
            }

            seen.insert(key.clone(), tokens.len());
            tokens.push(token.to_string());
            keys.push(key);
            descriptions.push(description);
        }

        // fst wants keys in lexicographic order
        let mut sorted: Vec<(&str, u64)> = keys
            .iter()
            .enumerate()
            .map(|(ordinal, key)| (key.as_str(), ordinal as u64))
            .collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let lookup = Map::from_iter(sorted)?;
        let max_token_chars = keys.iter().map(|k| k.chars().count()).max().unwrap_or(0);

        Ok(Self {
            tokens,
            keys,
            descriptions,
            lookup,
            max_token_chars,
        })
    }

    /// Load an alphabet file: one token per line, optionally followed by a tab
    /// and a description. Blank lines and `#` comments are skipped.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read alphabet: {}", path.display()))?;

        let entries: Vec<(String, Option<String>)> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.split_once('\t') {
                Some((token, description)) => (
                    token.trim().to_string(),
                    Some(description.trim().to_string()).filter(|d| !d.is_empty()),
                ),
                None => (line.to_string(), None),
            })
            .collect();

        Self::build_described(entries)
            .with_context(|| format!("Invalid alphabet: {}", path.display()))
    }

    /// Canonical form of `candidate`, compared case-insensitively.
    pub fn canonicalize(&self, candidate: &str) -> Option<&str> {
        self.ordinal(candidate).map(|ordinal| self.tokens[ordinal].as_str())
    }

    /// Declared position of the token matching `candidate`.
    pub fn ordinal(&self, candidate: &str) -> Option<usize> {
        self.lookup
            .get(candidate.to_lowercase())
            .map(|ordinal| ordinal as usize)
    }

    pub fn all_tokens(&self) -> Vec<&str> {
        self.tokens.iter().map(String::as_str).collect()
    }

    /// Tokens in declared order, minus the canonical tokens in `excluded`.
    pub fn tokens_excluding(&self, excluded: &BTreeSet<String>) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|token| !excluded.contains(*token))
            .map(String::as_str)
            .collect()
    }

    pub fn describe(&self, token: &str) -> Option<&str> {
        self.ordinal(token)
            .and_then(|ordinal| self.descriptions[ordinal].as_deref())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Length in characters of the longest token.
    pub fn max_token_chars(&self) -> usize {
        self.max_token_chars
    }

    pub(crate) fn token(&self, ordinal: usize) -> &str {
        &self.tokens[ordinal]
    }

    pub(crate) fn key_len(&self, ordinal: usize) -> usize {
        self.keys[ordinal].len()
    }

    /// Ordinals of every token whose key is a prefix of `folded[pos..]`,
    /// in declared order. `folded` must already be lowercase.
    pub(crate) fn candidates_at(&self, folded: &str, pos: usize) -> Vec<usize> {
        let rest = &folded[pos..];
        let mut found: Vec<usize> = rest
            .char_indices()
            .take(self.max_token_chars)
            .filter_map(|(offset, ch)| {
                let end = offset + ch.len_utf8();
                self.lookup.get(&rest[..end]).map(|ordinal| ordinal as usize)
            })
            .collect();
        found.sort_unstable();
        found
    }
}

impl fmt::Debug for AlphabetIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlphabetIndex")
            .field("tokens", &self.tokens)
            .field("max_token_chars", &self.max_token_chars)
            .finish()
    }
}
