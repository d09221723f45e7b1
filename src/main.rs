//! Terminal Hacker
//!
//! A hacker simulator that runs in your terminal: scan targets, crack their
//! passwords, buy better tools, and keep the detection meter down.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Arc;
use terminal_hacker::backend::build_backend;
use terminal_hacker::config::{BackendKind, Config};
use terminal_hacker::game::Dispatcher;
use terminal_hacker::logging::init_logging;
use terminal_hacker::tui::app::build_app;
use terminal_hacker::Catalog;
use tracing::{info, info_span};

#[derive(Parser, Debug)]
#[command(name = "terminal-hacker", version, about = "Hacker simulator for the terminal")]
struct Cli {
    /// Config file (defaults to $TERMINAL_HACKER_CONFIG or the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured scan backend
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Override the backend URL (http backend only)
    #[arg(long)]
    url: Option<String>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path).await?;
    if let Some(kind) = cli.backend {
        config.backend.kind = kind;
    }
    if let Some(url) = cli.url {
        config.backend.url = url;
    }
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let _guard = init_logging(config.log_dir(), &config.logging.level)?;

    let catalog = Arc::new(Catalog::standard());
    let backend = build_backend(&config.backend, catalog.clone())?;
    let dispatcher = Dispatcher::new(catalog.clone(), config.game.clone(), backend)
        .with_prompt(config.terminal.prompt.clone());
    let mut app = build_app(&catalog, dispatcher, config.terminal.max_transcript_entries);

    let span = info_span!("session", id = %app.session.id);
    let _enter = span.enter();
    info!(config = %config_path.display(), "Session started");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Main loop
    let result = (|| -> std::io::Result<()> {
        while app.running {
            terminal.draw(|frame| app.render(frame))?;
            app.update();
            if !app.handle_input()? {
                break;
            }
        }
        Ok(())
    })();

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let state = &app.session.state;
    info!(
        level = state.level,
        money = state.money,
        detection = state.detection_level,
        commands = app.session.history.lines().len(),
        "Session ended"
    );
    result?;

    println!("\nConnection closed. Level {} operator, ${} in the bank.", state.level, state.money);
    Ok(())
}
