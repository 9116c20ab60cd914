use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod formatter;
mod interactive_app;
mod one_shot;
mod state;

use crate::interactive_app::InteractiveApp;
use crate::one_shot::OneShotRequest;

#[derive(Parser, Debug)]
#[command(name = "readaloud")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "ReadAloud - terminal text-to-speech reader")]
struct Args {
    /// Load settings from a specific file instead of ~/.readaloud/settings.toml
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Use a configured backend by name for this run
    #[arg(long, value_name = "NAME")]
    backend: Option<String>,

    /// One-shot mode: speak this text and exit
    #[arg(long)]
    text: Option<String>,

    /// One-shot mode: read text from a txt/md/pdf/docx file and exit
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Voice id for one-shot mode (default voice otherwise)
    #[arg(long, value_name = "ID")]
    voice: Option<String>,

    /// Rate offset for one-shot mode (-0.5 to 0.5)
    #[arg(long)]
    rate: Option<f64>,

    /// Pitch offset in Hz for one-shot mode (-50 to 50)
    #[arg(long)]
    pitch: Option<i32>,

    /// One-shot mode: save the audio instead of playing it
    #[arg(long)]
    download: bool,

    /// Directory for --download (defaults to the configured download dir)
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    setup_tracing()?;

    // The audio output holds a platform stream handle that is not Send, so
    // the whole session runs on a LocalSet over a current-thread runtime.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let local = tokio::task::LocalSet::new();
        local.run_until(async_main()).await
    })
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    info!(
        "CLI startup: settings={:?}, backend={:?}, one_shot={}",
        args.settings,
        args.backend,
        args.text.is_some() || args.file.is_some()
    );

    if args.text.is_some() && args.file.is_some() {
        return Err(anyhow::anyhow!("--text and --file are mutually exclusive"));
    }

    if args.text.is_some() || args.file.is_some() {
        let request = OneShotRequest {
            text: args.text,
            file: args.file,
            voice: args.voice,
            rate: args.rate,
            pitch: args.pitch,
            download: args.download,
            out: args.out,
            backend: args.backend,
        };
        return one_shot::run(args.settings, request).await;
    }

    let mut app = InteractiveApp::new(args.settings, args.backend).await?;
    app.run().await
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Create trace directory in user's home
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
    let trace_dir = home.join(".readaloud").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("readaloud.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    // Setup tracing subscriber with file output; stdout stays clean for
    // the conversation itself
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(EnvFilter::new("info"))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
