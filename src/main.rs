mod auth;
mod config;
mod controller;
mod logging;
mod model;
mod route;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::Mutex;

use controller::AppController;
use model::{AppModel, PortalClient, SessionStore};
use route::Route;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== AstroSetu Portal Starting ===");

    let config = config::Config::load();
    let client = Arc::new(PortalClient::new(config.api_origin));
    let store = SessionStore::new();

    match auth::restore_or_login(&client, &store).await {
        Ok(Some(_)) => tracing::info!("Signed in"),
        Ok(None) => tracing::info!("Running in guest mode"),
        Err(e) => {
            tracing::error!(error = %e, "Sign-in failed, continuing as guest");
        }
    }

    // Optional launch argument reproducing a view, e.g. `panchang?tab=yoga`.
    let startup_route = std::env::args().nth(1).and_then(|arg| Route::parse(&arg));

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let model = Arc::new(Mutex::new(AppModel::new()));
    let controller = AppController::new(model.clone(), client, store);

    if let Some(route) = startup_route {
        controller.apply_route(route).await;
    }

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("AstroSetu Portal shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Get current state
        let (ui_state, content_state, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.should_quit().await,
            )
        };

        // Pull debounced lookup results into the picker while it is open.
        if ui_state.show_city_picker {
            controller.refresh_city_results().await;
        }

        let load_state = controller.loader_state().await;

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &ui_state, &content_state, &load_state);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
