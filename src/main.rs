//! GOMARKET - Terminal Storefront
//!
//! A terminal-based marketplace storefront, built in Rust. Browse the
//! product catalog, keep a shopping cart across sessions, and adjust
//! quantities from the cart screen. The cart is persisted to device
//! storage after every change.

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::env;
use std::io;

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::{App, AppMode, PersistMode};
use infrastructure::{ApiCatalog, FileStorage, MemoryStorage};
use presentation::{render_ui, InputHandler};

/// Entry point for the gomarket terminal storefront.
///
/// Loads the catalog from the marketplace API, provisions the cart store
/// from device storage, sets up the terminal interface, and runs the main
/// event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::default();

    if let Ok(url) = env::var("GOMARKET_API") {
        app.api_url = url;
    }
    let catalog = ApiCatalog::fetch(&app.api_url);
    app.set_catalog_result(catalog);

    let storage_path =
        env::var("GOMARKET_STORAGE").unwrap_or_else(|_| "gomarket-storage.json".to_string());
    match FileStorage::open(&storage_path) {
        Ok(storage) => {
            app.provider
                .provide(Box::new(storage), PersistMode::WriteThrough);
        }
        Err(err) => {
            // Keep the session usable; the cart just won't survive it
            app.provider
                .provide(Box::new(MemoryStorage::default()), PersistMode::WriteThrough);
            app.status_message = Some(format!(
                "Storage unavailable ({}), cart changes will not be saved",
                err
            ));
        }
    }
    app.drain_storage_error();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Final snapshot write for deferred persistence; a no-op when clean
    if let Ok(store) = app.provider.cart_mut() {
        store.flush();
    }

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Handles terminal rendering and keyboard input processing.
/// Continues running until the user presses 'q' on the catalog or cart
/// screen.
///
/// # Arguments
///
/// * `terminal` - Terminal interface for rendering
/// * `app` - Mutable reference to application state
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.update_viewport_size(size.height.saturating_sub(7).max(1) as usize);

        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q')
                        if matches!(app.mode, AppMode::Catalog | AppMode::CartView) =>
                    {
                        return Ok(());
                    }
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
