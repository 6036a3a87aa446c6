use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;

use newsgen::app::App;
use newsgen::tui::{self, EventHandler, EventSender, Tui};
use newsgen::{handler, logging, oneshot, ui};
use newsgen::{Config, FormInput, GeneratorClient, Platform, Tone};

#[derive(Parser)]
#[command(name = "newsgen")]
#[command(version, about = "Generate social media content from daily news")]
struct Cli {
    /// Base URL of the generation service (overrides NEWSGEN_ENDPOINT and the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive form (default)
    Tui,
    /// Generate content once and print it
    Generate {
        /// What to write about
        prompt: String,
        /// humorous, formal or casual
        #[arg(short, long, value_parser = parse_tone)]
        tone: Option<Tone>,
        /// twitter, instagram or linkedin
        #[arg(short, long, value_parser = parse_platform)]
        platform: Option<Platform>,
    },
}

fn parse_tone(s: &str) -> Result<Tone, String> {
    Tone::from_str(s).ok_or_else(|| {
        let names: Vec<_> = Tone::all().iter().map(|t| t.as_str()).collect();
        format!("unknown tone '{}', expected one of: {}", s, names.join(", "))
    })
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::from_str(s).ok_or_else(|| {
        let names: Vec<_> = Platform::all().iter().map(|p| p.as_str()).collect();
        format!("unknown platform '{}', expected one of: {}", s, names.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            logging::init_file(&logging::default_log_path()?)?;
            let app = App::load(Config::get_config_path()?, cli.endpoint.as_deref())?;
            run_tui(app).await
        }
        Commands::Generate { prompt, tone, platform } => {
            logging::init_stderr()?;
            let config = Config::load()?;
            let endpoint = config.resolve_endpoint(cli.endpoint.as_deref());
            let input = FormInput::new(
                prompt,
                tone.unwrap_or_else(|| config.tone()),
                platform.unwrap_or_else(|| config.platform()),
            );
            generate_once(&endpoint, input).await
        }
    }
}

async fn run_tui(mut app: App) -> Result<()> {
    info!(endpoint = %app.client.base_url(), "starting interactive session");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    let sender = events.sender();

    let result = run_loop(&mut terminal, &mut app, &mut events, &sender).await;

    app.shutdown();
    tui::restore()?;
    result
}

async fn run_loop(
    terminal: &mut Tui,
    app: &mut App,
    events: &mut EventHandler,
    sender: &EventSender,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, sender)?,
            None => break,
        }
    }
    Ok(())
}

async fn generate_once(endpoint: &str, input: FormInput) -> Result<()> {
    if !input.is_submittable() {
        bail!("Prompt must not be empty");
    }
    let client = GeneratorClient::new(endpoint);

    println!(
        "🤖 Generating {} content for {}...\n",
        input.tone.as_str().bold().magenta(),
        input.platform.display_name().bold().cyan()
    );

    match oneshot::generate(&client, &input).await {
        Ok(content) => {
            print!("{}", oneshot::format_content(&content));
            Ok(())
        }
        Err(err) => {
            println!("{}", err.to_string().red());
            bail!("Make sure the generation service is running at {}", endpoint)
        }
    }
}
