//! gifview CLI
//!
//! Plays an animated GIF full screen in the terminal.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use gifview::decode::read_gif_file;
use gifview::tui::App;
use gifview::{AnimationClip, GifView, GifViewConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// gifview - play an animated GIF in the terminal
#[derive(Parser, Debug)]
#[command(name = "gifview")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GIF file to play
    path: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Redraw interval in milliseconds (overrides the config file)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Colour for untagged frame text, e.g. "white" or "#c0c0c0"
    #[arg(long)]
    foreground: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable TUI and print a summary of the GIF instead
    #[arg(long)]
    no_tui: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    if cli.no_tui {
        init_logging(cli.verbose, None)?;
        run_plain_mode(&cli.path)
    } else {
        init_logging(cli.verbose, cli.log_file.as_deref())?;
        run_tui_mode(&cli.path, config).await
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<GifViewConfig> {
    let mut config = match &cli.config {
        Some(path) => GifViewConfig::from_file(path)?,
        None => GifViewConfig::default(),
    };
    if let Some(ms) = cli.tick_ms {
        config = config.with_tick_interval(Duration::from_millis(ms))?;
    }
    if let Some(name) = &cli.foreground {
        config = config.with_foreground_name(name)?;
    }
    Ok(config)
}

/// Plain mode logs to stderr; TUI mode only logs when given a file, so the
/// alternate screen stays clean.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn run_tui_mode(path: &Path, config: GifViewConfig) -> anyhow::Result<()> {
    // Load before taking over the terminal so errors print normally
    let view = GifView::with_config(&config);
    view.set_image_path(path)
        .map_err(|e| anyhow::anyhow!("Unable to load gif: {e}"))?;

    let mut app = App::new(view, config)?;
    app.run().await?;

    Ok(())
}

fn run_plain_mode(path: &Path) -> anyhow::Result<()> {
    info!("Reading {:?}", path);
    let gif = read_gif_file(path)?;
    let clip = AnimationClip::render(&gif.frames, &gif.delays_cs)?;

    println!("{}", summarize(&clip, gif.width, gif.height));
    Ok(())
}

fn summarize(clip: &AnimationClip, width: u32, height: u32) -> String {
    let (cols, rows) = clip.cell_size();
    let mut out = format!(
        "{width}x{height} px ({cols}x{rows} cells), {} frames, {} ms per loop",
        clip.len(),
        clip.total_duration().as_millis()
    );
    for (i, delay) in clip.delays().iter().enumerate() {
        out.push_str(&format!("\n  frame {i}: {} ms", delay.as_millis()));
    }
    out
}
