use serde::Serialize;
use std::fmt;

/// An ordered sequence of canonical tokens covering a whole word.
///
/// Two partitions are equal when they hold the same tokens in the same order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Partition(Vec<String>);

impl Partition {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase concatenation of the tokens.
    pub fn folded(&self) -> String {
        self.0.iter().map(|token| token.to_lowercase()).collect()
    }

    /// Compact formula form: adjacent repeats collapse into a count, so
    /// `H+H+O` becomes `H2O` while `H+O+H` stays `HOH`.
    pub fn formula(&self) -> String {
        let mut formula = String::new();
        let mut tokens = self.0.iter().peekable();

        while let Some(token) = tokens.next() {
            let mut count = 1;
            while tokens.peek() == Some(&token) {
                tokens.next();
                count += 1;
            }
            formula.push_str(token);
            if count > 1 {
                formula.push_str(&count.to_string());
            }
        }

        formula
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("+"))
    }
}

impl From<Vec<&str>> for Partition {
    fn from(tokens: Vec<&str>) -> Self {
        Self(tokens.into_iter().map(str::to_string).collect())
    }
}
