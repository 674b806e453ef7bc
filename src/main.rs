use anyhow::{bail, Context, Result};
use chemsplit::cli::output::{self, OutputFormat, RenderOptions};
use chemsplit::cli::progress::ProgressReporter;
use chemsplit::config::Overrides;
use chemsplit::parser::{self, WordSpan};
use chemsplit::pipeline::summarize;
use chemsplit::{Config, Pipeline};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chemsplit")]
#[command(version, about = "Spell words with chemical element symbols", long_about = None)]
struct Cli {
    /// Word lists to read (stdin when omitted)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// List every partition of each word, not just the first
    #[arg(short, long)]
    all: bool,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Treat input as running text instead of one word per line
    #[arg(long)]
    prose: bool,

    /// Show the compact formula of each partition (H+H+O -> H2O)
    #[arg(long)]
    formula: bool,

    /// Report how often each token is used
    #[arg(long)]
    stats: bool,

    /// Process each distinct word only once
    #[arg(long)]
    unique: bool,

    /// Match words exactly as written, without stripping accents
    #[arg(long)]
    no_normalize: bool,

    /// Alphabet file (one token per line) replacing the element symbols
    #[arg(long, value_name = "FILE")]
    alphabet: Option<PathBuf>,

    /// Stop enumerating a word after this many partitions (0 = no limit)
    #[arg(long, value_name = "N")]
    max_partitions: Option<usize>,

    /// Per-word time budget for enumeration, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Skip words matching this regex
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Number of worker threads
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Exit with code 1 when some word has no partition
    #[arg(long)]
    fail_on_miss: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Hide progress and summary
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the tokens of the active alphabet
    Symbols,
    /// Show every partition of the given words
    Split {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "chemsplit", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(Overrides {
        alphabet: cli.alphabet.clone(),
        prose: cli.prose,
        all_matches: cli.all || matches!(cli.command, Some(Commands::Split { .. })),
        no_normalize: cli.no_normalize,
        unique_words: cli.unique,
        ignore_patterns: cli.ignore_pattern.clone(),
        max_partitions: cli.max_partitions,
        word_timeout_ms: cli.timeout_ms,
    })?;
    debug!(?config, "configuration loaded");

    if let Some(jobs) = cli.jobs {
        if jobs == 0 {
            bail!("--jobs must be at least 1");
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let pipeline = Pipeline::new(&config)?;
    let colored = !cli.no_color && cli.output.is_none() && io::stdout().is_terminal();
    let mut out = open_output(cli.output.as_ref())?;

    let spans: Vec<WordSpan> = match &cli.command {
        Some(Commands::Symbols) => {
            return output::write_symbols(&mut out, pipeline.segmenter().alphabet(), colored);
        }
        Some(Commands::Split { words }) => words
            .iter()
            .enumerate()
            .map(|(i, word)| WordSpan {
                text: word.clone(),
                line: i + 1,
                column: 1,
            })
            .collect(),
        None => read_spans(&cli.files, &config)?,
    };

    let progress = ProgressReporter::new(spans.len() as u64, cli.quiet);
    let reports = pipeline.run(spans, |_| progress.word_done());
    progress.finish();

    let occurrences = cli.stats.then(|| pipeline.count_occurrences(&reports));
    output::write_reports(
        &mut out,
        &reports,
        occurrences.as_deref(),
        RenderOptions {
            format: cli.format,
            colored,
            formulas: cli.formula,
        },
    )?;

    let summary = summarize(&reports);
    if !cli.quiet {
        output::print_summary(&summary, !cli.no_color && io::stderr().is_terminal());
    }

    if cli.fail_on_miss && summary.words_matched < summary.words_seen {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn read_spans(files: &[PathBuf], config: &Config) -> Result<Vec<WordSpan>> {
    if files.is_empty() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(parser::parse_input(&content, config.input_mode));
    }

    let mut spans = Vec::new();
    for file_path in files {
        if !file_path.exists() {
            eprintln!("Error: File not found: {}", file_path.display());
            continue;
        }

        let content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;
        spans.extend(parser::parse_input(&content, config.input_mode));
    }

    Ok(spans)
}
