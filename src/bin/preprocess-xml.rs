//! CLI binary for corpus-prep: normalize a directory of XML editions.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PreprocessConfig` and prints the batch outcome.

use anyhow::{Context, Result};
use clap::Parser;
use corpus_prep::{preprocess_dir, BatchProgressCallback, BatchReport, PreprocessConfig, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Live progress bar with one log line per file. Files complete out of order
/// when `--concurrency` is above 1.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Source directory, to print full paths in error lines.
    source: PathBuf,
    start_times: Mutex<HashMap<String, Instant>>,
}

impl CliProgressCallback {
    fn new(source: &Path) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message(source.display().to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            source: source.to_path_buf(),
            start_times: Mutex::new(HashMap::new()),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>4}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Normalizing");
    }

    fn elapsed_secs(&self, file_name: &str) -> f64 {
        self.start_times
            .lock()
            .unwrap()
            .remove(file_name)
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Normalizing {total_files} files…"))
        ));
    }

    fn on_file_start(&self, file_name: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(file_name.to_string(), Instant::now());
        self.bar.set_message(file_name.to_string());
    }

    fn on_file_complete(&self, file_name: &str, output_bytes: usize) {
        let secs = self.elapsed_secs(file_name);
        self.bar.println(format!(
            "  {} {:<24}  {}  {}",
            green("✓"),
            file_name,
            dim(&format!("{output_bytes:>9} bytes")),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, file_name: &str, error: &str) {
        self.elapsed_secs(file_name);
        self.bar.println(format!(
            "  {} Error in {}: {}",
            red("✗"),
            self.source.join(file_name).display(),
            red(error)
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_files: usize, success_count: usize) {
        let failed = total_files.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} files normalized",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} files normalized  ({} failed)",
                if failed == total_files {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_files,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Normalize every *.xml file of raw/ into prepared/
  preprocess-xml raw/ prepared/

  # Sequential, plain log output
  preprocess-xml -c 1 --no-progress raw/ prepared/

  # Machine-readable report, non-zero exit if any file failed
  preprocess-xml --json --strict raw/ prepared/ > report.json

WHAT HAPPENS TO EACH FILE:
  1. Files 10.xml, 15.xml, 16.xml and 23.xml are read as ISO-8859-1,
     all others as UTF-8.
  2. In those four files encoding="ISO-8859-1" becomes encoding="UTF-8".
  3. Character references (&amp;, &#233;, &eacute;) and Greek letter
     names (&alpha;, &Omega;, &sigma2;, &theata;) become characters.
  4. The result is written as UTF-8 under the same name.

  A file that cannot be decoded is reported as "Error in <path>: ..."
  and skipped; the other files are still written.

ENVIRONMENT VARIABLES:
  CORPUS_PREP_CONCURRENCY   Files processed at once (default 4)
  RUST_LOG                  Override the log filter (e.g. corpus_prep=debug)
"#;

/// Normalize a directory of XML editions to UTF-8 with decoded entities.
#[derive(Parser, Debug)]
#[command(
    name = "preprocess-xml",
    version,
    about = "Normalize a directory of XML editions to UTF-8 with decoded entities",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the source *.xml files.
    read_path: PathBuf,

    /// Directory the normalized files are written to (created if missing).
    write_path: PathBuf,

    /// Number of files processed at once.
    #[arg(short, long, env = "CORPUS_PREP_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "CORPUS_PREP_JSON")]
    json: bool,

    /// Exit with a non-zero status if any file failed.
    #[arg(long, env = "CORPUS_PREP_STRICT")]
    strict: bool,

    /// Disable progress bar.
    #[arg(long, env = "CORPUS_PREP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CORPUS_PREP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "CORPUS_PREP_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new(&cli.read_path);
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = PreprocessConfig::builder().concurrency(cli.concurrency);
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run batch ────────────────────────────────────────────────────────
    let report = preprocess_dir(&cli.read_path, &cli.write_path, &config)
        .await
        .with_context(|| format!("Preprocessing {} failed", cli.read_path.display()))?;

    if !show_progress {
        // The progress callback already printed these.
        print_failures(&report);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        let stats = &report.stats;
        eprintln!(
            "Normalized {}/{} files in {}ms  →  {}",
            stats.processed_files,
            stats.total_files,
            stats.total_duration_ms,
            cli.write_path.display()
        );
        if stats.legacy_files > 0 {
            eprintln!(
                "  {} ISO-8859-1 files, {} declarations rewritten",
                stats.legacy_files, stats.rewritten_declarations
            );
        }
        if stats.failed_files > 0 {
            eprintln!("  {} files failed", stats.failed_files);
        }
    }

    if cli.strict {
        report.into_result().context("Strict mode")?;
    }

    Ok(())
}

/// One `Error in <path>: <message>` line per failed file.
fn print_failures(report: &BatchReport) {
    for failed in report.failures() {
        if let Some(ref error) = failed.error {
            eprintln!("Error in {}: {}", failed.source.display(), error);
        }
    }
}
