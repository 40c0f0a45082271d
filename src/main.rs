use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use prompt_inspector::app::App;
use prompt_inspector::config::Config;
use prompt_inspector::handler::handle_event;
use prompt_inspector::markdown::unescape_whitespace;
use prompt_inspector::tui::{self, EventHandler, Tui, TICK_RATE};
use prompt_inspector::{logging, ui, ChatClient, RequestPreview, ResponseView, Session, SessionStatus};

#[derive(Parser)]
#[command(name = "prompt-inspector", version)]
#[command(about = "See exactly what is sent to and received from a chat-completion endpoint")]
struct Cli {
    /// Base URL the chat endpoint path is appended to (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Response view shown first: json or content (overrides config)
    #[arg(long, value_enum)]
    view: Option<ResponseView>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one prompt and print request, raw response and assistant text
    Send {
        /// The prompt, sent verbatim
        prompt: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(view) = cli.view {
        config.default_view = view;
    }

    match cli.command {
        Some(Commands::Send { prompt }) => send_once(&config, &prompt).await,
        None => run_tui(&config).await,
    }
}

async fn run_tui(config: &Config) -> Result<()> {
    let _log_guard = logging::init_file(&Config::config_dir()?.join("logs"), &config.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), base_url = %config.base_url, "prompt-inspector starting");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(config);
    let mut events = EventHandler::new(TICK_RATE);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    info!("prompt-inspector exiting");
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

async fn send_once(config: &Config, prompt: &str) -> Result<()> {
    logging::init_stderr(&config.log_level)?;

    let client = ChatClient::new(&config.base_url);
    let mut session = Session::new();
    session.set_prompt(prompt);

    println!("=== Request ===");
    println!("{}", RequestPreview::new(client.endpoint(), session.request()));
    println!();

    if !session.send(&client) {
        bail!("prompt is blank, nothing sent");
    }
    session.wait().await;

    match session.status() {
        SessionStatus::Succeeded => {
            if let Some(response) = session.response() {
                println!("=== Response (JSON) ===");
                println!("{}", serde_json::to_string_pretty(response)?);
                println!();
            }
            println!("=== Assistant text ===");
            let text = unescape_whitespace(Some(session.assistant_text()));
            if text.is_empty() {
                println!("(no assistant text in a known response shape)");
            } else {
                println!("{}", text);
            }
            Ok(())
        }
        SessionStatus::Failed(message) => bail!("{}", message),
        SessionStatus::Idle | SessionStatus::Sending => bail!("request did not complete"),
    }
}
