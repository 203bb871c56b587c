use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use catseek::config::{Config, DelayPolicy};
use catseek::display::{supports_ansi, FrameSink, Speaker, TerminalSink};
use catseek::error::CatSeekError;
use catseek::session::ChatSession;
use catseek::shell::Shell;

/// CatSeek: chat with a cat that has opinions but no knowledge
#[derive(Parser, Debug)]
#[command(name = "catseek")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short = 'a', long = "ask")]
    ask: Option<String>,

    /// Config file (TOML format)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// How the reply delay is spent
    #[arg(long = "delay-policy", value_enum)]
    delay_policy: Option<DelayPolicy>,

    /// Reply delay in milliseconds (default: 800)
    #[arg(long = "delay-ms")]
    delay_ms: Option<u64>,

    /// Seed for reproducible replies
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("catseek=debug,info")
    } else {
        EnvFilter::new("catseek=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, CatSeekError> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.merge_cli_args(cli.delay_policy, cli.delay_ms, cli.seed);

    // Fail fast on empty categories and bad timings
    config.validate()?;

    Ok(config)
}

async fn ask_once(config: &Config, sink: TerminalSink, question: &str) -> anyhow::Result<()> {
    let mut session = ChatSession::new(config, sink).context("failed to build chat session")?;
    session
        .sink_mut()
        .message(Speaker::Human, question)
        .context("failed to echo question")?;
    session
        .exchange(question)
        .await
        .context("failed to answer question")?;
    Ok(())
}

async fn serve(cli: &Cli, config: &Config, sink: TerminalSink) -> anyhow::Result<()> {
    match cli.ask {
        Some(ref question) => ask_once(config, sink, question).await,
        None => {
            let mut shell = Shell::new(tokio::io::stdin(), config, sink)?;
            shell.run().await.context("shell failed")
        }
    }
}

async fn run(
    cli: &Cli,
    config: Config,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let sink = TerminalSink::detect(config.timestamps);
    if !supports_ansi() {
        colored::control::set_override(false);
    }

    info!(
        "Delay policy: {:?} ({} ms)",
        config.delay.policy, config.delay.response_delay_ms
    );

    // Both modes stay interruptible while waiting out the reply delay
    tokio::select! {
        result = serve(cli, &config, sink) => result,
        _ = shutdown_rx.recv() => {
            warn!("Shutdown signal received");
            Err(CatSeekError::ShutdownRequested.into())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    // Setup shutdown signal handling
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down...");
        let _ = shutdown_tx_clone.send(());
    });

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    match run(&cli, config, shutdown_rx).await {
        Ok(()) => {}
        Err(e) => match e.downcast_ref::<CatSeekError>() {
            Some(CatSeekError::ShutdownRequested) => {
                println!("\n{} Shutdown requested", "INTERRUPTED:".yellow().bold());
                std::process::exit(130);
            }
            _ => {
                error!("{:#}", e);
                std::process::exit(1);
            }
        },
    }
}
