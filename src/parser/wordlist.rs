use crate::parser::WordSpan;

/// Parse a word list: one entry per line. Lines of a frequency list such as
/// `42\tcarbon` contribute their last tab-separated field.
pub fn parse(content: &str) -> Vec<WordSpan> {
    let mut spans = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let field_start = line.rfind('\t').map_or(0, |tab| tab + 1);
        let field = &line[field_start..];
        let word = field.trim();
        if word.is_empty() {
            continue;
        }

        let leading = field.len() - field.trim_start().len();
        spans.push(WordSpan {
            text: word.to_string(),
            line: line_num + 1,
            column: field_start + leading + 1,
        });
    }

    spans
}
