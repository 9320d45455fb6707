// crates/dashboard-terminal/src/main.rs

mod app;
mod config;
mod ui;
mod components;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::File,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dashboard_core::{Session, Side};
use dashboard_gateway::{FixtureGateway, Gateway, HttpGateway};

use crate::app::{App, InputMode};
use crate::config::TerminalConfig;

#[derive(Parser)]
#[clap(name = "dashboard")]
#[clap(about = "Terminal dashboard for linking an exchange account, watching balances and placing orders")]
struct Cli {
    /// TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Gateway base URL
    #[clap(short, long)]
    gateway: Option<String>,

    /// User ID sent with every gateway call
    #[clap(short, long)]
    user_id: Option<String>,

    /// Starting symbol for the order form
    #[clap(short = 'y', long)]
    symbol: Option<String>,

    /// Use the built-in demo gateway instead of HTTP
    #[clap(long)]
    demo: bool,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Write logs here (the terminal itself is taken by the UI)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let mut config = TerminalConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    config.apply_overrides(cli.gateway.clone(), cli.user_id.clone(), cli.symbol.clone());

    let session = Session::new(config.user()?, config.session_config()?);
    let (gateway, label): (Arc<dyn Gateway>, String) = if cli.demo {
        (Arc::new(FixtureGateway::demo()), "demo".to_string())
    } else {
        let http = HttpGateway::new(config.gateway_config()?)
            .context("failed to build gateway client")?;
        let label = http.base_url().to_string();
        (Arc::new(http), label)
    };
    info!(gateway = %label, user = %session.user(), "starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(session, gateway, label);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let path = match (&cli.log_file, cli.debug) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("dashboard.log"),
        (None, false) => return Ok(()),
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.input_mode {
                        InputMode::Normal => match key.code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => {
                                app.should_quit = true;
                            }
                            KeyCode::Tab => {
                                app.next_panel();
                            }
                            KeyCode::BackTab => {
                                app.prev_panel();
                            }
                            KeyCode::F(1) => {
                                app.toggle_help();
                            }
                            KeyCode::Esc => {
                                app.show_help = false;
                                app.notice = None;
                            }

                            // Navigation
                            KeyCode::Up | KeyCode::Char('k') => {
                                app.move_selection_up();
                            }
                            KeyCode::Down | KeyCode::Char('j') => {
                                app.move_selection_down();
                            }
                            KeyCode::Enter => {
                                app.start_editing();
                            }

                            // Workflow
                            KeyCode::Char('c') | KeyCode::Char('C') => {
                                app.connect();
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                app.refresh_balances();
                            }
                            KeyCode::Char('t') | KeyCode::Char('T') => {
                                app.retry();
                            }

                            // Order entry
                            KeyCode::Char('b') | KeyCode::Char('B') => {
                                app.set_side(Side::Buy);
                            }
                            KeyCode::Char('s') | KeyCode::Char('S') => {
                                app.set_side(Side::Sell);
                            }
                            KeyCode::Char('m') | KeyCode::Char('M') => {
                                app.toggle_order_type();
                            }
                            KeyCode::Char('y') | KeyCode::Char('Y') => {
                                app.cycle_symbol();
                            }
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                app.place_order();
                            }

                            _ => {}
                        },

                        InputMode::Editing => match key.code {
                            KeyCode::Enter => {
                                app.submit_input();
                            }
                            KeyCode::Esc => {
                                app.cancel_input();
                            }
                            KeyCode::Backspace => {
                                app.delete_char();
                            }
                            KeyCode::Char(c) => {
                                app.enter_char(c);
                            }
                            _ => {}
                        },
                    }
                }
            }
        }

        app.poll_gateway();
        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    // Nothing may outlive the UI.
    app.shutdown();
    Ok(())
}
