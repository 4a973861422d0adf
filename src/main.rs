mod app;
mod cascade;
mod data;
mod error;
mod form;
mod logging;
mod settings;
mod submit;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use data::sharepoint::SharePointStore;
use data::store::ListStore;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "crm-change-request",
    about = "Submit CRM change requests against SharePoint client/project/task lists"
)]
struct Cli {
    /// SharePoint site URL hosting the lists
    #[arg(short, long)]
    site_url: Option<String>,

    /// Bearer token for the site
    #[arg(long, env = "CRM_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds (default: none)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = settings::Settings::load();

    // CLI args override config.
    let site_url = match cli.site_url.or(cfg.site_url) {
        Some(url) => url,
        None => {
            eprintln!("No site URL configured.");
            if let Some(path) = settings::config_path() {
                eprintln!(
                    "Create {} with:\n\n  site_url = \"https://<tenant>.sharepoint.com/sites/<site>\"\n",
                    path.display()
                );
            }
            eprintln!("Or use: crm-change-request --site-url <url>");
            std::process::exit(1);
        }
    };
    let token = cli.token.or(cfg.access_token);
    let timeout = cli.timeout.or(cfg.timeout_secs).map(Duration::from_secs);
    let log_dir = cli
        .log_dir
        .or(cfg.log_dir)
        .unwrap_or_else(settings::default_log_dir);

    let _log_guard = logging::init(&log_dir)?;
    info!(site = %site_url, log_dir = %log_dir.display(), "starting");

    let store: Arc<dyn ListStore> = Arc::new(SharePointStore::new(&site_url, token, timeout)?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, cfg.lists, site_url);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short poll timeout keeps background results flowing into the UI
        let timeout = Duration::from_millis(100);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
