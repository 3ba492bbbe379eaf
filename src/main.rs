use std::fs::{self, OpenOptions};
use std::io::Read;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tone_convert::{Config, ConversionController, ReqwestClient, SystemClipboard, Target};

mod app;
mod console;
mod handler;
mod tui;
mod ui;

use app::App;
use console::ConsoleRenderer;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "tone")]
#[command(version, about = "Rephrase a message in the right tone for your boss, colleague or client")]
struct Cli {
    /// Base URL of the conversion service
    #[arg(long, global = true, env = "TONE_SERVER_URL")]
    server: Option<String>,

    /// Recipient: boss, colleague or client (상사, 동료, 고객)
    #[arg(short, long, global = true, value_parser = parse_target)]
    target: Option<Target>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a message once and print the result
    Convert {
        /// Text to convert; read from stdin when omitted
        text: Option<String>,
        /// Also copy the converted text to the clipboard
        #[arg(long)]
        copy: bool,
        /// Only print the converted text
        #[arg(short, long)]
        quiet: bool,
    },
    /// Check that the conversion service is reachable
    Health,
    /// List recipient identifiers
    Targets,
}

fn parse_target(s: &str) -> Result<Target, String> {
    Target::from_str(s).ok_or_else(|| {
        format!("unknown recipient '{}'; expected boss, colleague or client", s)
    })
}

struct Settings {
    server_url: String,
    timeout: Duration,
    target: Target,
}

impl Settings {
    fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            server_url: cli
                .server
                .clone()
                .unwrap_or_else(|| config.server_url().to_string()),
            timeout: cli
                .timeout
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.timeout()),
            target: cli.target.unwrap_or_else(|| config.target()),
        }
    }

    fn client(&self) -> Result<ReqwestClient> {
        ReqwestClient::new(&self.server_url, self.timeout).context("Failed to build HTTP client")
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.command.is_none())?;

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "ignoring unreadable config file");
        Config::new()
    });
    let settings = Settings::resolve(&cli, &config);

    match cli.command {
        None => {
            run_tui(settings.client()?, settings.target).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Convert { text, copy, quiet }) => {
            convert_once(settings.client()?, settings.target, text, copy, quiet).await
        }
        Some(Commands::Health) => check_health(settings.client()?).await,
        Some(Commands::Targets) => {
            for target in Target::all() {
                println!("{}\t{}", target.as_str(), target.display_name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The TUI owns the terminal, so its logs go to a file under the cache dir.
fn init_logging(tui_mode: bool) -> Result<()> {
    if tui_mode {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tone_convert=info,tone=info"));
        let log_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?
            .join("tone-convert");
        fs::create_dir_all(&log_dir)?;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("tone.log"))
            .context("Failed to open log file")?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .init();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

async fn run_tui(http: ReqwestClient, target: Target) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new(tui::TICK_RATE);
    let mut app = App::new(http, target);

    tracing::info!(server = %app.server_url(), recipient = target.as_str(), "tui started");

    let result = run_loop(&mut terminal, &mut events, &mut app).await;
    tui::restore()?;
    app.remember_target();
    result
}

async fn run_loop(terminal: &mut Tui, events: &mut EventHandler, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

async fn convert_once(
    http: ReqwestClient,
    target: Target,
    text: Option<String>,
    copy: bool,
    quiet: bool,
) -> Result<ExitCode> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read text from stdin")?;
            buf
        }
    };

    let mut controller = ConversionController::new(
        Arc::new(http),
        ConsoleRenderer::stdout(quiet),
        SystemClipboard::new(),
    );
    controller.input_changed(&text);

    // The console renderer has already reported any failure
    if controller.submit(&text, target).await.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    if copy && controller.copy_result().is_err() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

async fn check_health(http: ReqwestClient) -> Result<ExitCode> {
    match http.health().await {
        Ok(status) => {
            println!("{}: {}", http.base_url(), status);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}: unreachable ({})", http.base_url(), err);
            Ok(ExitCode::FAILURE)
        }
    }
}
