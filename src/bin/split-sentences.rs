//! CLI binary for corpus-prep: split German text into sentences.
//!
//! Prints JSON on stdout so callers in other languages can parse it.

use anyhow::{Context, Result};
use clap::Parser;
use corpus_prep::{split_json, split_paragraph_sentences, Segmenter};
use serde::Serialize;
use std::io::{self, BufReader};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # One text → ["sentence", ...]
  split-sentences "Das ist ein Satz usw. der weiter geht. Noch einer."

  # Paragraphs separated by {r} → {"0": [...], "1": [...]}
  split-sentences --paragraphs "Erster Absatz.{r}Zweiter Absatz."

  # Batch from stdin: [{"id": 1, "text": "..."}] → {"1": [...]}
  echo '[{"Id": 1, "Text": "Eins. Zwei."}]' | split-sentences

  Batch items may carry other fields; only id/Id and text/Text are read.
"#;

/// Split German text into sentences and print them as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "split-sentences",
    version,
    about = "Split German text into sentences and print them as JSON",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Text to split. Without it a JSON array of {id, text} is read from stdin.
    text: Option<String>,

    /// Treat `{r}` as a paragraph separator and key sentences by paragraph.
    #[arg(long, requires = "text")]
    paragraphs: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CORPUS_PREP_VERBOSE")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // Built once, shared by every item.
    let segmenter = Segmenter::german();

    match cli.text {
        Some(ref text) if cli.paragraphs => {
            let out = split_paragraph_sentences(&segmenter, text);
            debug!("{} paragraphs", out.len());
            print_json(&out, cli.pretty)
        }
        Some(ref text) => print_json(&segmenter.split(text), cli.pretty),
        None => {
            let stdin = io::stdin();
            let out = split_json(&segmenter, BufReader::new(stdin.lock()))
                .context("Failed to read batch from stdin")?;
            debug!("{} items", out.len());
            print_json(&out, cli.pretty)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialise sentences")?;
    println!("{json}");
    Ok(())
}
