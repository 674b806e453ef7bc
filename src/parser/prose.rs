use crate::parser::WordSpan;
use unicode_segmentation::UnicodeSegmentation;

/// Parse running text and extract every word, in reading order.
pub fn parse(content: &str) -> Vec<WordSpan> {
    let mut spans = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        for (offset, word) in extract_words(line) {
            spans.push(WordSpan {
                text: word.to_string(),
                line: line_num + 1,
                column: offset + 1, // 1-indexed
            });
        }
    }

    spans
}

/// Word-boundary segments that contain at least one letter.
fn extract_words(text: &str) -> Vec<(usize, &str)> {
    text.split_word_bound_indices()
        .filter(|(_, segment)| segment.chars().any(char::is_alphabetic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_parsing() {
        let spans = parse("Hello world! This is a test.");

        assert_eq!(spans.len(), 6);
        assert_eq!(spans[0].text, "Hello");
        assert_eq!(spans[1].text, "world");
        assert_eq!(spans[1].column, 7);
        assert_eq!(spans[5].text, "test");
    }

    #[test]
    fn test_accented_words_stay_whole() {
        let spans = parse("A ação começou");

        let words: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(words, vec!["A", "ação", "começou"]);
    }

    #[test]
    fn test_multiline() {
        let spans = parse("First line\nSecond line\nThird line");

        assert!(spans.iter().any(|s| s.line == 1));
        assert!(spans.iter().any(|s| s.line == 2));
        assert!(spans.iter().any(|s| s.line == 3));
    }

    #[test]
    fn test_numbers_and_punctuation_are_skipped() {
        let spans = parse("42 -- 3.14, ok");

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "ok");
    }
}
