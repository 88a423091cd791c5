//! hcsdiff command-line interface.
//!
//! This is the main entry point for the hcsdiff CLI tool. It uses clap for
//! argument parsing and wires the library together: load both documents,
//! resolve the diff tool by extension, compare, filter and print.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hcsdiff::{
    filter_diff, format_diff, load_document, logging, DiffLevel, DiffSettings, DiffToolRegistry,
    FilterConfig, ItemKind, OutputFormat, OutputOptions,
};
use std::path::PathBuf;
use std::process;
use tracing::debug;

/// hcsdiff - Position-exact text diff with move detection
///
/// Compares two text files at character, line and (for JSON) token level,
/// reporting added, deleted and moved regions with exact positions.
#[derive(Parser)]
#[command(name = "hcsdiff")]
#[command(version)]
#[command(about = "Position-exact text diff with move detection", long_about = None)]
struct Cli {
    /// Left (original) file
    #[arg(value_name = "LEFT")]
    left: PathBuf,

    /// Right (modified) file
    #[arg(value_name = "RIGHT")]
    right: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    output: OutputFormatArg,

    /// TOML file with diff settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only show items of this level (repeatable)
    #[arg(short, long, value_enum)]
    level: Vec<LevelArg>,

    /// Only show items of this kind (repeatable)
    #[arg(short, long, value_enum)]
    kind: Vec<KindArg>,

    /// Show only edits (hide similarities)
    #[arg(long)]
    compact: bool,

    /// Maximum length for displayed excerpts
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only show items, suppress summary)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON representation
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

/// Diff level argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LevelArg {
    Textual,
    Lexical,
}

impl From<LevelArg> for DiffLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Textual => DiffLevel::Textual,
            LevelArg::Lexical => DiffLevel::Lexical,
        }
    }
}

/// Item kind argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum KindArg {
    Add,
    Delete,
    Move,
    Similarity,
}

impl From<KindArg> for ItemKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Add => ItemKind::Add,
            KindArg::Delete => ItemKind::Delete,
            KindArg::Move => ItemKind::Move,
            KindArg::Similarity => ItemKind::Similarity,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    logging::init(cli.verbose);

    let settings = match &cli.config {
        Some(path) => DiffSettings::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DiffSettings::default(),
    };

    let left = load_document(&cli.left)
        .with_context(|| format!("Failed to load left file: {}", cli.left.display()))?;
    let right = load_document(&cli.right)
        .with_context(|| format!("Failed to load right file: {}", cli.right.display()))?;

    let tool = DiffToolRegistry::new().resolve(&cli.left, &cli.right, &settings);
    let diff = tool.compare(&left, &right);
    debug!(
        edits = diff.edits.len(),
        similarities = diff.similarities.len(),
        "compared documents"
    );

    let filter = cli
        .level
        .iter()
        .fold(FilterConfig::new(), |config, &level| config.level(level.into()));
    let filter = cli
        .kind
        .iter()
        .fold(filter, |config, &kind| config.kind(kind.into()));
    let diff = filter_diff(&diff, &filter);

    let output_options = OutputOptions {
        compact: cli.compact,
        max_value_length: cli.max_value_length,
    };

    let output_format: OutputFormat = cli.output.into();
    let output = format_diff(&diff, &output_format, &output_options)
        .context("Failed to format diff output")?;

    if !cli.quiet || output_format == OutputFormat::Json {
        println!("{}", output);
    } else {
        for line in output.lines() {
            if !line.starts_with("Summary:") && !line.trim().is_empty() {
                println!("{}", line);
            }
        }
    }

    Ok(0)
}
