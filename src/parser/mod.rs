pub mod normalize;
pub mod prose;
pub mod wordlist;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How input text is broken into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// One word per line; the last tab-separated field is the word.
    #[default]
    WordList,
    /// Running text split on Unicode word boundaries.
    Prose,
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wordlist" | "words" => Ok(InputMode::WordList),
            "prose" | "text" => Ok(InputMode::Prose),
            _ => Err(format!("Unknown input mode: {}", s)),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::WordList => write!(f, "wordlist"),
            InputMode::Prose => write!(f, "prose"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub text: String,
    pub line: usize,
    pub column: usize, // 1-indexed, in bytes
}

/// Extract the words to segment from `content`.
pub fn parse_input(content: &str, mode: InputMode) -> Vec<WordSpan> {
    match mode {
        InputMode::WordList => wordlist::parse(content),
        InputMode::Prose => prose::parse(content),
    }
}
