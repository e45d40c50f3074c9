//! CLI binary for sketch2render.
//!
//! A thin shim over the library crate that maps CLI flags to `RenderConfig`,
//! drives a `Session`, and writes the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sketch2render::{
    default_output_path, load_sketch, DesignStyle, GenerationObserver, GenerationState,
    ObserverHandle, RenderClient, RenderConfig, Session, SketchInput, DEFAULT_MODEL,
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

// ── Spinner observer using indicatif ─────────────────────────────────────────

/// Shows a spinner while the request is in flight.
struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        Arc::new(Self { bar })
    }
}

impl GenerationObserver for SpinnerObserver {
    fn on_request_start(&self, style: DesignStyle) {
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.bar.set_prefix("Rendering");
        self.bar.set_message(format!("{style} style…"));
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_success(&self, payload_len: usize, elapsed_ms: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} Render ready  {}  {}",
            green("✔"),
            dim(&format!("{payload_len} chars base64")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        );
    }

    fn on_failure(&self, message: &str, elapsed_ms: u64) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}",
            red("✘"),
            red(message),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a sketch in the default (photorealistic) style
  sketch2render sketch.png

  # Pick a style and describe the product
  sketch2render lamp.jpg --style minimalist --details "desk lamp, matte white, oak base"

  # Choose the output file
  sketch2render sketch.webp -o kettle-render.png

  # Print the data URI instead of writing a file
  sketch2render sketch.png --data-uri > render.txt

  # List available styles
  sketch2render --list-styles

STYLES:
  photorealistic     Photorealistic (default)
  minimalist         Minimalist (Braun)
  cyberpunk          Cyberpunk
  marker-sketch      Marker Sketch
  wood-natural       Wood & Natural
  tech-transparent   Tech Transparent

ENVIRONMENT VARIABLES:
  API_KEY                  API key for the image model
  GEMINI_API_KEY           Used when API_KEY is not set
  SKETCH2RENDER_MODEL      Override model ID
  RUST_LOG                 Override log filter (e.g. sketch2render=debug)

LIMITS:
  Sketches must be PNG, JPEG or WebP and at most 5 MB.
"#;

/// Turn product sketches into photorealistic renders.
#[derive(Parser, Debug)]
#[command(
    name = "sketch2render",
    version,
    about = "Turn rough product sketches into photorealistic renders",
    long_about = "Upload a rough product sketch, pick a visual style and optional details, and \
receive a photorealistic rendering produced by a multimodal image model.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Sketch image (PNG, JPEG or WebP, ≤ 5 MB), or a data URI.
    #[arg(required_unless_present = "list_styles")]
    input: Option<String>,

    /// Write the PNG render here. Default: render-<timestamp>.png.
    #[arg(short, long, env = "SKETCH2RENDER_OUTPUT")]
    output: Option<PathBuf>,

    /// Render style.
    #[arg(short, long, env = "SKETCH2RENDER_STYLE", default_value = "photorealistic",
          value_parser = parse_style)]
    style: DesignStyle,

    /// Free-text details about the product (materials, colours, function).
    #[arg(short, long, env = "SKETCH2RENDER_DETAILS", default_value = "")]
    details: String,

    /// Image model ID.
    #[arg(long, env = "SKETCH2RENDER_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API key. Falls back to API_KEY, then GEMINI_API_KEY.
    #[arg(long, env = "SKETCH2RENDER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Endpoint root (for proxies and local gateways).
    #[arg(long, env = "SKETCH2RENDER_BASE_URL")]
    base_url: Option<String>,

    /// Path to a text file replacing the built-in instruction block.
    #[arg(long, env = "SKETCH2RENDER_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Transport timeout in seconds. Default: none.
    #[arg(long, env = "SKETCH2RENDER_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Print the data URI to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    data_uri: bool,

    /// Print a JSON summary to stdout.
    #[arg(long, env = "SKETCH2RENDER_JSON")]
    json: bool,

    /// List styles and exit.
    #[arg(long)]
    list_styles: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SKETCH2RENDER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SKETCH2RENDER_QUIET")]
    quiet: bool,
}

fn parse_style(s: &str) -> Result<DesignStyle, String> {
    s.parse::<DesignStyle>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; library INFO logs are
    // only shown when the spinner is off.
    let show_spinner = !cli.quiet && !cli.json && !cli.data_uri;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
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

    if cli.list_styles {
        list_styles(cli.json)?;
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("A sketch path is required")?;

    // ── Load sketch ──────────────────────────────────────────────────────
    let sketch = if input.trim_start().starts_with("data:") {
        SketchInput::from_data_uri(input).context("Failed to parse data URI")?
    } else {
        load_sketch(input)
            .await
            .with_context(|| format!("Failed to load sketch '{input}'"))?
    };

    // ── Build client and session ─────────────────────────────────────────
    let config = build_config(&cli).await?;
    let client = RenderClient::new(config).context("Failed to create client")?;

    let mut session = Session::new();
    if show_spinner {
        session = session.with_observer(SpinnerObserver::new() as ObserverHandle);
    }
    session.select_style(cli.style);
    session.set_details(cli.details.clone());
    session.load_sketch(&sketch).context("Sketch rejected")?;

    // ── Generate ─────────────────────────────────────────────────────────
    let uri = match session.generate(&client).await {
        GenerationState::Succeeded(uri) => uri.clone(),
        GenerationState::Failed(message) => anyhow::bail!("{message}"),
        other => anyhow::bail!("Unexpected session state after generation: {other:?}"),
    };

    // ── Output ───────────────────────────────────────────────────────────
    if cli.data_uri {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{uri}").context("Failed to write to stdout")?;
        return Ok(());
    }

    let output = cli.output.clone().unwrap_or_else(default_output_path);
    uri.save(&output)
        .await
        .context("Failed to save render")?;

    if cli.json {
        let summary = serde_json::json!({
            "success": true,
            "output": output.display().to_string(),
            "style": cli.style,
            "style_label": cli.style.label(),
            "model": cli.model,
            "payload_len": uri.payload().len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        eprintln!("   →  {}", bold(&output.display().to_string()));
    }

    Ok(())
}

/// Map CLI args to `RenderConfig`.
async fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let mut builder = RenderConfig::builder().model(&cli.model);

    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url);
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

fn list_styles(json_output: bool) -> Result<()> {
    if json_output {
        let styles: Vec<_> = DesignStyle::ALL
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.slug(),
                    "label": s.label(),
                    "prompt": s.prompt_fragment(),
                    "default": *s == DesignStyle::default(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&styles)?);
    } else {
        println!("Available styles:\n");
        for s in DesignStyle::ALL {
            let marker = if s == DesignStyle::default() { "*" } else { " " };
            println!("  {} {:<18} {}", marker, s.slug(), bold(s.label()));
            println!("    {}", dim(s.prompt_fragment()));
        }
    }
    Ok(())
}
