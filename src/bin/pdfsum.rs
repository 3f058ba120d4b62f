//! CLI binary for edgequake-pdfsum.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to `SummaryConfig`, runs the batch, and prints the report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use edgequake_pdfsum::{
    summarize_directory, summarize_file, BatchProgressCallback, BatchResult, Outcome,
    PdfSumError, ProgressCallback, SummaryConfig,
};
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

/// Terminal progress callback: one bar for the batch plus a log line per
/// document. Documents finish out of order, so start times are keyed by name.
struct CliProgressCallback {
    bar: ProgressBar,
    start_times: Mutex<HashMap<String, Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        bar.set_style(style);
        bar.set_prefix("Summarising");

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
        })
    }

    /// Stop drawing. Safe to call more than once.
    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn elapsed_secs(&self, identifier: &str) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(identifier))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_items: usize) {
        self.bar.set_length(total_items as u64);
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Summarising {total_items} PDF files…"))
        ));
    }

    fn on_item_start(&self, identifier: &str) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(identifier.to_string(), Instant::now());
        }
        self.bar.set_message(identifier.to_string());
    }

    fn on_item_complete(&self, identifier: &str, _output_path: &Path) {
        let secs = self.elapsed_secs(identifier);
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            identifier,
            dim(&format!("{secs:.1}s"))
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, identifier: &str, error: &str) {
        let secs = self.elapsed_secs(identifier);

        // Keep the live log to one line; the full message is in the report.
        let first_line = error.lines().next().unwrap_or_default();
        let msg: String = if first_line.chars().count() > 80 {
            first_line.chars().take(79).chain(['…']).collect()
        } else {
            first_line.to_string()
        };
        self.bar.println(format!(
            "  {} {}  {}  {}",
            red("✗"),
            identifier,
            red(&msg),
            dim(&format!("{secs:.1}s"))
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _total_items: usize, _success_count: usize) {
        self.finish();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarise every PDF in ./pdfs into ./output
  pdfsum

  # Other directories, 3 documents at a time
  pdfsum --input-dir ~/papers --output-dir ~/summaries -c 3

  # Summarise one file from the input directory
  pdfsum one report.pdf

  # Machine-readable report
  pdfsum --json > report.json

ENVIRONMENT VARIABLES (also read from a .env file):
  PDF_DIRECTORY            Input directory (default ./pdfs)
  OUTPUT_DIRECTORY         Output directory (default ./output)
  OPENAI_API_KEY           OpenAI API key
  ANTHROPIC_API_KEY        Anthropic API key
  GEMINI_API_KEY           Google Gemini API key
  OPENAI_MODEL             Model ID (default gpt-4-turbo-preview)
  EDGEQUAKE_PROVIDER       Provider (openai, anthropic, gemini, ollama, …)
  MAX_CONCURRENT_REQUESTS  Documents processed at once (default 5)
  PDFIUM_LIB_PATH          Path to an existing libpdfium
"#;

/// Summarise PDF files into Markdown using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarise a directory of PDF files into Markdown using LLMs",
    long_about = "Extract the text of every PDF in a directory, ask an LLM for a structured \
Markdown summary, and write one <name>_summary.md per document. Supports OpenAI, Anthropic, \
Google Gemini, Azure OpenAI, and any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory containing the PDF files.
    #[arg(long, env = "PDF_DIRECTORY", default_value = "./pdfs", global = true)]
    input_dir: PathBuf,

    /// Directory the summaries are written to (created if missing).
    #[arg(long, env = "OUTPUT_DIRECTORY", default_value = "./output", global = true)]
    output_dir: PathBuf,

    /// LLM model ID (e.g. gpt-4-turbo-preview, gpt-4.1-mini, claude-sonnet-4-20250514).
    #[arg(long, env = "OPENAI_MODEL", global = true)]
    model: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER", global = true)]
    provider: Option<String>,

    /// Number of documents processed concurrently.
    #[arg(short, long, env = "MAX_CONCURRENT_REQUESTS", default_value_t = 5,
          value_parser = clap::value_parser!(u64).range(1..), global = true)]
    concurrency: u64,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDFSUM_TEMPERATURE", default_value_t = 0.3, global = true)]
    temperature: f32,

    /// Input budget in estimated tokens (4 characters per token).
    #[arg(long, env = "PDFSUM_MAX_INPUT_TOKENS", default_value_t = 12_000, global = true)]
    max_input_tokens: usize,

    /// Max LLM output tokens per summary (provider default if unset).
    #[arg(long, env = "PDFSUM_MAX_TOKENS", global = true)]
    max_tokens: Option<usize>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "PDFSUM_SYSTEM_PROMPT", global = true)]
    system_prompt: Option<PathBuf>,

    /// Path to a text file containing the instructions placed before the document text.
    #[arg(long, env = "PDFSUM_PROMPT", global = true)]
    prompt: Option<PathBuf>,

    /// Clean up the model output (strip outer fences, normalise whitespace).
    #[arg(long, env = "PDFSUM_CLEAN", global = true)]
    clean: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFSUM_PASSWORD", global = true)]
    password: Option<String>,

    /// Print the report as JSON instead of text.
    #[arg(long, env = "PDFSUM_JSON", global = true)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFSUM_NO_PROGRESS", global = true)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSUM_VERBOSE", global = true)]
    verbose: bool,

    /// Suppress all output except the report and errors.
    #[arg(short, long, env = "PDFSUM_QUIET", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarise every PDF in the input directory (the default).
    All,
    /// Summarise a single PDF, given by name inside the input directory or by path.
    One {
        /// File name (resolved against --input-dir) or path of the PDF.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // While the progress bar is active it carries the per-document feedback,
    // so library INFO logs are suppressed unless --verbose is given.
    let single = matches!(cli.command, Some(Command::One { .. }));
    let show_progress = !single && !cli.quiet && !cli.no_progress && !cli.json;
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

    let progress = show_progress.then(CliProgressCallback::new);
    let result = run(&cli, progress.clone().map(|p| p as ProgressCallback)).await;

    // The batch never starts on an empty input dir or a setup error, so the
    // bar is cleared here as well before anything else is printed.
    if let Some(ref p) = progress {
        p.finish();
    }
    result
}

async fn run(cli: &Cli, progress: Option<ProgressCallback>) -> Result<()> {
    let config = build_config(cli, progress).await?;

    match cli.command {
        Some(Command::One { ref file }) => run_single(cli, file, &config).await,
        Some(Command::All) | None => run_batch(cli, &config).await,
    }
}

async fn run_batch(cli: &Cli, config: &SummaryConfig) -> Result<()> {
    if !cli.quiet && !cli.json {
        eprintln!("{} PDF directory:    {}", cyan("◆"), cli.input_dir.display());
        eprintln!("{} Output directory: {}", cyan("◆"), cli.output_dir.display());
    }

    let start = Instant::now();
    let result = summarize_directory(&cli.input_dir, &cli.output_dir, config)
        .await
        .context("Summarisation failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialise report")?
        );
        return Ok(());
    }

    if result.is_empty() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_batch_complete(0, 0);
        }
        println!("No PDF files found in {}", cli.input_dir.display());
        return Ok(());
    }

    print_report(&result, start.elapsed());
    Ok(())
}

async fn run_single(cli: &Cli, file: &Path, config: &SummaryConfig) -> Result<()> {
    let path = resolve_single_input(&cli.input_dir, file);
    if !cli.quiet && !cli.json {
        eprintln!("{} Testing summarisation of: {}", cyan("◆"), path.display());
    }

    let outcome = match summarize_file(&path, &cli.output_dir, config).await {
        Err(PdfSumError::FileNotFound { path }) => anyhow::bail!(
            "File {} not found. Please make sure the file exists in {}",
            path.display(),
            cli.input_dir.display()
        ),
        other => other.context("Summarisation failed")?,
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialise outcome")?
        );
        return Ok(());
    }

    match outcome {
        Outcome::Success { output_path, .. } => {
            println!("{} Summary successfully generated: {}", green("✔"), output_path.display());
        }
        Outcome::Failure { error, .. } => {
            println!("{} Failed to generate summary: {}", red("✘"), error);
        }
    }
    Ok(())
}

/// `report.pdf` means `<input_dir>/report.pdf`; an existing path is used as given.
fn resolve_single_input(input_dir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() || file.exists() {
        file.to_path_buf()
    } else {
        input_dir.join(file)
    }
}

fn print_report(result: &BatchResult, elapsed: Duration) {
    println!();
    println!("{}", bold("===== Summary Report ====="));
    println!(
        "Successfully processed: {}/{}  {}",
        result.success_count(),
        result.len(),
        dim(&format!("{:.1}s", elapsed.as_secs_f64()))
    );

    if result.success_count() > 0 {
        println!();
        println!("Successfully generated summaries:");
        for outcome in result.succeeded() {
            if let Some(path) = outcome.output_path() {
                println!("  {} {} => {}", green("✓"), outcome.identifier(), path.display());
            }
        }
    }

    if result.failure_count() > 0 {
        println!();
        println!("Failed to process:");
        for outcome in result.failed() {
            println!(
                "  {} {}: {}",
                red("✗"),
                outcome.identifier(),
                outcome.error().unwrap_or_default()
            );
        }
    }

    println!();
    println!("PDF summarisation process completed.");
}

/// Map CLI args to `SummaryConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SummaryConfig> {
    let concurrency =
        usize::try_from(cli.concurrency).context("Concurrency does not fit in usize")?;

    let mut builder = SummaryConfig::builder()
        .concurrency(concurrency)
        .temperature(cli.temperature)
        .max_input_tokens(cli.max_input_tokens)
        .clean_output(cli.clean);

    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref path) = cli.system_prompt {
        builder = builder.system_prompt(read_prompt(path).await?);
    }
    if let Some(ref path) = cli.prompt {
        builder = builder.summary_prompt(read_prompt(path).await?);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

async fn read_prompt(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read prompt from {:?}", path))
}
