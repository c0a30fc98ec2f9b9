mod api;
mod controller;
mod terminal_output;
mod transcript;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{debug, info};

use chatwidget_config::{
    apply_all_defaults, config_dir, config_file_path, load_and_prepare, write_config,
    WidgetConfig,
};
use chatwidget_logging::{init_logger, LogSettings};
use chatwidget_markdown::{render_with, TransformOptions};
use chatwidget_reveal::{SurfaceDriver, Timing};

use api::HttpChatBackend;
use controller::{ConversationController, ExchangeOutcome};
use terminal_output::{
    note_error, note_info, note_success, stream_write, user_prompt_marker, TerminalSurface,
};

#[derive(Parser)]
#[command(name = "chatwidget")]
#[command(about = "Chat in the terminal with markdown replies typed out as they render")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.chatwidget/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat over stdin
    Chat {
        /// Save the conversation as HTML when the session ends
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Send one prompt and show the reply
    Ask { prompt: String },
    /// Render markdown from a file (or stdin) to widget markup
    Render {
        file: Option<PathBuf>,
        /// Type the markup out in the terminal instead of printing HTML
        #[arg(long)]
        animate: bool,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with every default filled in
    Init,
    /// Print the effective config
    Show,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    let config = load_and_prepare(&path).await?;
    init_logger(&LogSettings {
        level: config.log_level().to_string(),
        dir: config.log_dir(),
        json: config.log_json(),
    });

    match cli.command {
        Commands::Chat { transcript } => run_chat(&config, transcript.as_deref()).await,
        Commands::Ask { prompt } => run_ask(&config, &prompt).await,
        Commands::Render { file, animate } => run_render(&config, file.as_deref(), animate).await,
        Commands::Config { action } => run_config(&config, &path, action).await,
    }
}

fn timing(config: &WidgetConfig) -> Timing {
    Timing {
        reveal_tick: config.reveal_tick(),
        loader_tick: config.loader_tick(),
    }
}

fn transform_options(config: &WidgetConfig) -> TransformOptions {
    TransformOptions {
        escape_input: config.escape_input(),
    }
}

type TerminalController = ConversationController<TerminalSurface<std::io::Stdout>>;

fn build_controller(config: &WidgetConfig) -> Result<TerminalController> {
    let backend = HttpChatBackend::new(config.backend_url(), config.backend_timeout())?;
    info!(url = %backend.url(), "Using chat backend");
    let driver = SurfaceDriver::new(TerminalSurface::stdout(), timing(config));
    Ok(ConversationController::new(
        Arc::new(backend),
        driver,
        transform_options(config),
    ))
}

/// Runs one exchange and waits for the reply to be fully typed out.
async fn exchange(
    controller: &mut TerminalController,
    prompt: &str,
) -> bool {
    let exchange = controller.submit(prompt).await;
    let ok = match exchange.outcome {
        ExchangeOutcome::Revealing(handle) => {
            let outcome = handle.finished().await;
            debug!(message_id = %exchange.message_id, ?outcome, "Reply shown");
            true
        }
        ExchangeOutcome::Failed { detail } => {
            println!();
            note_error(&detail);
            false
        }
    };
    println!();
    ok
}

async fn run_chat(config: &WidgetConfig, transcript: Option<&Path>) -> Result<()> {
    let mut controller = build_controller(config)?;
    note_info("Type a message, /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let mut stdout = std::io::stdout();
        stream_write(&mut stdout, &user_prompt_marker())?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if prompt == "/quit" {
            break;
        }
        exchange(&mut controller, prompt).await;
    }

    if let Some(path) = transcript {
        controller.transcript().write_html(path).await?;
        note_success(&format!("Transcript saved to {}", path.display()));
    }
    Ok(())
}

async fn run_ask(config: &WidgetConfig, prompt: &str) -> Result<()> {
    let mut controller = build_controller(config)?;
    if !exchange(&mut controller, prompt).await {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_render(config: &WidgetConfig, file: Option<&Path>, animate: bool) -> Result<()> {
    let raw = match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
    };

    let markup = render_with(raw.trim(), transform_options(config));
    if !animate {
        println!("{markup}");
        return Ok(());
    }

    let mut driver = SurfaceDriver::new(TerminalSurface::stdout(), timing(config));
    driver.reveal(markup).finished().await;
    println!();
    Ok(())
}

async fn run_config(config: &WidgetConfig, path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            if path.exists() {
                note_info(&format!("Config already exists at {}", path.display()));
                return Ok(());
            }
            write_config(&apply_all_defaults(WidgetConfig::default()), path).await?;
            note_success(&format!("Wrote {}", path.display()));
        }
        ConfigAction::Show => {
            let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
            print!("{yaml}");
        }
    }
    Ok(())
}
