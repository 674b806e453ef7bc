use crate::segmenter::alphabet::AlphabetIndex;
use crate::segmenter::partition::Partition;
use crate::stats::TokenCount;
use crate::{RunSummary, WordReport};
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub colored: bool,
    pub formulas: bool,
}

#[derive(Debug, Serialize)]
struct JsonResult<'a> {
    word: &'a str,
    normalized: &'a str,
    line: usize,
    column: usize,
    partitions: &'a [Partition],
    formulas: Vec<String>,
    truncated: bool,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    words_checked: usize,
    words_matched: usize,
    results: Vec<JsonResult<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    occurrences: Option<&'a [TokenCount]>,
}

/// Write the batch results, and the occurrence table when `occurrences` is given.
pub fn write_reports(
    out: &mut dyn Write,
    reports: &[WordReport],
    occurrences: Option<&[TokenCount]>,
    options: RenderOptions,
) -> Result<()> {
    match options.format {
        OutputFormat::Text => {
            for report in reports.iter().filter(|r| r.is_match()) {
                writeln!(out, "{}", format_report(report, options))?;
            }
            if let Some(counts) = occurrences {
                write_occurrences(out, counts, options.colored)?;
            }
        }
        OutputFormat::Json => write_json(out, reports, occurrences)?,
    }
    out.flush().context("Failed to flush output")
}

/// `word: A+B | C` with one entry per partition.
pub fn format_report(report: &WordReport, options: RenderOptions) -> String {
    let rendered: Vec<String> = report
        .partitions
        .iter()
        .map(|partition| format_partition(partition, options))
        .collect();

    let separator = if options.colored {
        " | ".dimmed().to_string()
    } else {
        " | ".to_string()
    };

    let mut line = if options.colored {
        format!("{}: {}", report.word.bold(), rendered.join(&separator))
    } else {
        format!("{}: {}", report.word, rendered.join(&separator))
    };

    if report.truncated {
        if options.colored {
            line.push_str(&format!(" {}", "(truncated)".yellow()));
        } else {
            line.push_str(" (truncated)");
        }
    }

    line
}

fn format_partition(partition: &Partition, options: RenderOptions) -> String {
    let tokens = if options.colored {
        partition
            .tokens()
            .iter()
            .map(|t| t.cyan().to_string())
            .collect::<Vec<_>>()
            .join("+")
    } else {
        partition.to_string()
    };

    if options.formulas {
        let formula = partition.formula();
        if options.colored {
            format!("{} [{}]", tokens, formula.green())
        } else {
            format!("{} [{}]", tokens, formula)
        }
    } else {
        tokens
    }
}

fn write_json(
    out: &mut dyn Write,
    reports: &[WordReport],
    occurrences: Option<&[TokenCount]>,
) -> Result<()> {
    let results: Vec<JsonResult> = reports
        .iter()
        .map(|r| JsonResult {
            word: &r.word,
            normalized: &r.normalized,
            line: r.line,
            column: r.column,
            partitions: &r.partitions,
            formulas: r.partitions.iter().map(Partition::formula).collect(),
            truncated: r.truncated,
        })
        .collect();

    let output = JsonOutput {
        words_checked: reports.len(),
        words_matched: reports.iter().filter(|r| r.is_match()).count(),
        results,
        occurrences,
    };

    serde_json::to_writer_pretty(&mut *out, &output).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

/// Horizontal bar chart of token occurrences, most frequent first.
pub fn write_occurrences(out: &mut dyn Write, counts: &[TokenCount], colored: bool) -> Result<()> {
    writeln!(out)?;
    if counts.is_empty() {
        writeln!(out, "No token occurrences to report.")?;
        return Ok(());
    }

    let header = "Token occurrences:";
    if colored {
        writeln!(out, "{}", header.bold())?;
    } else {
        writeln!(out, "{}", header)?;
    }

    let max = counts.iter().map(|c| c.count).max().unwrap_or(1);
    let label_width = counts.iter().map(|c| c.token.chars().count()).max().unwrap_or(1);

    for entry in counts {
        let bar = "#".repeat(bar_length(entry.count, max));
        if colored {
            writeln!(
                out,
                "  {:>width$} {} {}",
                entry.token.cyan(),
                bar.blue(),
                entry.count,
                width = label_width
            )?;
        } else {
            writeln!(
                out,
                "  {:>width$} {} {}",
                entry.token,
                bar,
                entry.count,
                width = label_width
            )?;
        }
    }

    Ok(())
}

fn bar_length(count: usize, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    (count * BAR_WIDTH).div_ceil(max).max(1)
}

pub fn print_summary(summary: &RunSummary, colored: bool) {
    eprintln!();
    if summary.words_matched == 0 {
        if colored {
            eprintln!("{}", "✗ No word can be written with the alphabet".red().bold());
        } else {
            eprintln!("✗ No word can be written with the alphabet");
        }
        return;
    }

    let word_label = if summary.words_seen == 1 { "word" } else { "words" };
    if colored {
        eprintln!(
            "{} {} of {} {} matched ({} partitions)",
            "✓".green().bold(),
            summary.words_matched.to_string().green().bold(),
            summary.words_seen,
            word_label,
            summary.partitions_found
        );
    } else {
        eprintln!(
            "✓ {} of {} {} matched ({} partitions)",
            summary.words_matched, summary.words_seen, word_label, summary.partitions_found
        );
    }

    if summary.truncated_words > 0 {
        let message = format!(
            "{} word(s) hit a search limit; their partition lists are incomplete",
            summary.truncated_words
        );
        if colored {
            eprintln!("{}", message.yellow());
        } else {
            eprintln!("{}", message);
        }
    }
}

/// List every token of the alphabet, in declared order.
pub fn write_symbols(out: &mut dyn Write, alphabet: &AlphabetIndex, colored: bool) -> Result<()> {
    for (position, token) in alphabet.all_tokens().into_iter().enumerate() {
        let description = alphabet.describe(token).unwrap_or("");
        if colored {
            writeln!(
                out,
                "{:>4}  {:<3} {}",
                (position + 1).to_string().dimmed(),
                token.cyan().bold(),
                description
            )?;
        } else {
            writeln!(out, "{:>4}  {:<3} {}", position + 1, token, description)?;
        }
    }
    out.flush().context("Failed to flush output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::elements::periodic_table;

    fn report(word: &str, partitions: Vec<Vec<&str>>, truncated: bool) -> WordReport {
        WordReport {
            word: word.to_string(),
            normalized: word.to_string(),
            line: 1,
            column: 1,
            partitions: partitions.into_iter().map(Partition::from).collect(),
            truncated,
        }
    }

    fn plain(format: OutputFormat) -> RenderOptions {
        RenderOptions {
            format,
            colored: false,
            formulas: false,
        }
    }

    #[test]
    fn test_text_line_format() {
        let r = report("co", vec![vec!["C", "O"], vec!["Co"]], false);
        assert_eq!(format_report(&r, plain(OutputFormat::Text)), "co: C+O | Co");
    }

    #[test]
    fn test_text_line_with_formulas_and_truncation() {
        let r = report("hho", vec![vec!["H", "H", "O"]], true);
        let options = RenderOptions {
            formulas: true,
            ..plain(OutputFormat::Text)
        };
        assert_eq!(format_report(&r, options), "hho: H+H+O [H2O] (truncated)");
    }

    #[test]
    fn test_text_output_skips_misses() {
        let reports = vec![
            report("neon", vec![vec!["Ne", "O", "N"]], false),
            report("xyz", vec![], false),
        ];
        let mut buffer = Vec::new();
        write_reports(&mut buffer, &reports, None, plain(OutputFormat::Text)).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "neon: Ne+O+N\n");
    }

    #[test]
    fn test_json_output_lists_every_word() {
        let reports = vec![
            report("neon", vec![vec!["Ne", "O", "N"]], false),
            report("xyz", vec![], false),
        ];
        let counts = vec![TokenCount {
            token: "Ne".to_string(),
            count: 1,
        }];
        let mut buffer = Vec::new();
        write_reports(&mut buffer, &reports, Some(&counts), plain(OutputFormat::Json)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["words_checked"], 2);
        assert_eq!(value["words_matched"], 1);
        assert_eq!(value["results"][0]["partitions"][0][0], "Ne");
        assert_eq!(value["results"][0]["formulas"][0], "NeON");
        assert_eq!(value["results"][1]["partitions"].as_array().unwrap().len(), 0);
        assert_eq!(value["occurrences"][0]["count"], 1);
    }

    #[test]
    fn test_occurrence_chart() {
        let counts = vec![
            TokenCount {
                token: "O".to_string(),
                count: 4,
            },
            TokenCount {
                token: "Na".to_string(),
                count: 1,
            },
        ];
        let mut buffer = Vec::new();
        write_occurrences(&mut buffer, &counts, false).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Token occurrences:");
        assert_eq!(lines[2], format!("   O {} 4", "#".repeat(BAR_WIDTH)));
        assert_eq!(lines[3], format!("  Na {} 1", "#".repeat(BAR_WIDTH / 4)));
    }

    #[test]
    fn test_symbols_listing() {
        let mut buffer = Vec::new();
        write_symbols(&mut buffer, &periodic_table(), false).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 118);
        assert!(text.lines().next().unwrap().contains("H   Hydrogen"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
