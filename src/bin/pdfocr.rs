//! CLI binary for pdfocr.
//!
//! A thin shim over the library crate that maps CLI flags to `OcrConfig`,
//! drives a progress bar, and prints the JSON report.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfocr::{
    page_count, process_document, ErrorReport, OcrConfig, OcrProgress, ProgressHook,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a bar at the bottom plus a log line per page.
/// Pages are strictly sequential, so no out-of-order handling is needed.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_document_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl OcrProgress for CliProgress {
    fn on_document_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Processing");
    }

    fn on_page_start(&self, page: usize, _total: usize) {
        self.bar.set_message(format!("page {page}"));
    }

    fn on_page_retry(&self, page: usize, attempt: u32, max_attempts: u32) {
        self.bar.println(format!(
            "  {} Page {page}: retry {attempt}/{max_attempts}",
            dim("↻")
        ));
    }

    fn on_page_done(&self, page: usize, total: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page,
            total,
            dim(&format!("{chars:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_page_failed(&self, page: usize, error: &str) {
        let msg: String = error.chars().take(80).collect();
        self.bar
            .println(format!("  {} Page {page}  {}", red("✗"), red(&msg)));
        self.bar.abandon();
    }

    fn on_document_done(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages processed",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR a document to JSON on stdout
  pdfocr document.pdf

  # Write the report to a file
  pdfocr document.pdf -o report.json

  # OCR from a URL
  pdfocr https://example.com/scan.pdf -o scan.json

  # Count pages only (no credentials needed)
  pdfocr --count-only document.pdf

  # A different deployment and a longer retry budget
  pdfocr --model gpt-4o-mini --max-attempts 5 document.pdf

ENVIRONMENT VARIABLES:
  AZURE_API_KEY       Azure OpenAI API key
  AZURE_API_BASE      Azure resource base URL (https://<resource>.openai.azure.com)
  AZURE_API_VERSION   Azure API version (e.g. 2024-02-15-preview)
  PDFIUM_LIB_PATH     Path to an existing libpdfium

SETUP:
  1. Set credentials:  export AZURE_API_KEY=... AZURE_API_BASE=... AZURE_API_VERSION=...
  2. Run:              pdfocr document.pdf -o report.json

The report is JSON: {"pages": [{"page", "content", "contentLength"}, …],
"fileName", "inputTokens", "outputTokens", "completionTime"}. On failure the
output is {"error": "<message>"} and the exit code is 1.
"#;

/// OCR PDF files and URLs into a JSON report using a vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdfocr",
    version,
    about = "OCR PDF files and URLs into a JSON report using a vision LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the JSON report to this file instead of stdout.
    #[arg(short, long, env = "PDFOCR_OUTPUT")]
    output: Option<PathBuf>,

    /// Azure OpenAI API key.
    #[arg(long, env = "AZURE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Azure resource base URL.
    #[arg(long, env = "AZURE_API_BASE")]
    api_base: Option<String>,

    /// Azure API version.
    #[arg(long, env = "AZURE_API_VERSION")]
    api_version: Option<String>,

    /// Azure deployment (model) identifier.
    #[arg(long, env = "PDFOCR_MODEL", default_value = "gpt-4o")]
    model: String,

    /// Total OCR attempts per page (first try included).
    #[arg(long, env = "PDFOCR_MAX_ATTEMPTS", default_value_t = 3)]
    max_attempts: u32,

    /// Fixed delay between attempts, in seconds.
    #[arg(long, env = "PDFOCR_RETRY_DELAY", default_value_t = 2)]
    retry_delay: u64,

    /// Maximum rendered page dimension in pixels.
    #[arg(long, env = "PDFOCR_MAX_PIXELS", default_value_t = 2000)]
    max_pixels: u32,

    /// Max model output tokens per page.
    #[arg(long, env = "PDFOCR_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDFOCR_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "PDFOCR_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Print the page count only, no OCR (no credentials needed).
    #[arg(long)]
    count_only: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFOCR_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFOCR_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the report and errors.
    #[arg(short, long, env = "PDFOCR_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFOCR_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-page OCR request timeout in seconds.
    #[arg(long, env = "PDFOCR_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides the per-page feedback; keep library logs
    // quiet unless asked.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.count_only;
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

    // ── Count-only mode ──────────────────────────────────────────────────
    if cli.count_only {
        let count = page_count(&cli.input)
            .await
            .context("Failed to read page count")?;
        println!("{count}");
        return Ok(());
    }

    // ── Build config and run ─────────────────────────────────────────────
    let progress: Option<ProgressHook> = if show_progress {
        Some(CliProgress::new() as Arc<dyn OcrProgress>)
    } else {
        None
    };

    let config = build_config(&cli, progress).await?;
    let result = process_document(&cli.input, &config).await;

    let json = match &result {
        Ok(report) => to_json(report, cli.compact)?,
        Err(e) => to_json(&ErrorReport::from(e), cli.compact)?,
    };

    if let Some(ref output_path) = cli.output {
        pdfocr::process::write_json(output_path, &json)
            .await
            .context("Failed to write report")?;
        if !cli.quiet {
            eprintln!("Report written to {}", bold(&output_path.display().to_string()));
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(json.as_bytes()).context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    }

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("{} {}", red("✘"), e);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    if compact {
        serde_json::to_string(value).context("Failed to serialise report")
    } else {
        serde_json::to_string_pretty(value).context("Failed to serialise report")
    }
}

/// Map CLI args to `OcrConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressHook>) -> Result<OcrConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = OcrConfig::builder()
        .model(&cli.model)
        .max_attempts(cli.max_attempts)
        .retry_delay_secs(cli.retry_delay)
        .max_rendered_pixels(cli.max_pixels)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let (Some(key), Some(base), Some(version)) =
        (&cli.api_key, &cli.api_base, &cli.api_version)
    {
        builder = builder.credentials(key, base, version);
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if let Some(hook) = progress {
        builder = builder.progress(hook);
    }

    builder.build().context("Invalid configuration")
}
