use crate::application::{App, AppMode};
use crate::domain::CsvCatalog;
use crate::infrastructure::ApiCatalog;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Catalog => Self::handle_catalog_mode(app, key, modifiers),
            AppMode::CartView => Self::handle_cart_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::Search => Self::handle_search_mode(app, key),
            AppMode::ImportCsv => Self::handle_dialog_input_mode(app, key, "csv_import"),
            AppMode::ExportCsv => Self::handle_dialog_input_mode(app, key, "csv_export"),
            AppMode::FetchApi => Self::handle_dialog_input_mode(app, key, "fetch_api"),
        }
    }

    fn handle_catalog_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('r') => {
                    app.start_api_fetch();
                    return;
                }
                KeyCode::Char('i') => {
                    app.start_csv_import();
                    return;
                }
                KeyCode::Char('l') => {
                    app.start_csv_import();
                    return;
                }
                KeyCode::Char('e') => {
                    app.start_csv_export();
                    return;
                }
                _ => {}
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.select_next();
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                app.add_selected_to_cart();
            }
            KeyCode::Char('c') | KeyCode::Tab => {
                app.open_cart_view();
            }
            KeyCode::Char('/') => {
                app.start_search();
            }
            KeyCode::Char('n') => {
                if !app.search_results.is_empty() {
                    app.next_search_result();
                }
            }
            KeyCode::Char('N') => {
                if !app.search_results.is_empty() {
                    app.previous_search_result();
                }
            }
            KeyCode::Char('y') => {
                Self::yank_selected(app);
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_cart_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.start_csv_export();
                return;
            }
        }

        app.status_message = None;

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.select_next();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                app.increment_selected();
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                app.decrement_selected();
            }
            KeyCode::Char('c') | KeyCode::Tab | KeyCode::Esc => {
                app.open_catalog();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Catalog;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_search_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.perform_search();
                app.finish_search();
            }
            KeyCode::Esc => {
                app.cancel_search();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.search_query.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                    app.perform_search();
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.search_query.len() {
                    app.search_query.remove(app.cursor_position);
                    app.perform_search();
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.search_query.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.search_query.len();
            }
            KeyCode::Down | KeyCode::Char('n') => {
                app.next_search_result();
            }
            KeyCode::Up | KeyCode::Char('p') => {
                app.previous_search_result();
            }
            KeyCode::Char(c) => {
                app.search_query.insert(app.cursor_position, c);
                app.cursor_position += 1;
                app.perform_search();
            }
            _ => {}
        }
    }

    fn handle_dialog_input_mode(app: &mut App, key: KeyCode, mode: &str) {
        match key {
            KeyCode::Enter => {
                match mode {
                    "csv_import" => {
                        let filename = app.get_csv_import_filename();
                        let result = CsvCatalog::import_from_csv(&filename);
                        app.set_csv_import_result(result);
                    }
                    "csv_export" => {
                        let filename = app.get_csv_export_filename();
                        let result = match app.provider.cart() {
                            Ok(store) => {
                                CsvCatalog::export_cart_to_csv(store.products(), &filename)
                            }
                            Err(err) => Err(err.to_string()),
                        };
                        app.set_csv_export_result(result);
                    }
                    "fetch_api" => {
                        let url = app.get_api_url();
                        app.api_url = url.clone();
                        let result = ApiCatalog::fetch(&url);
                        app.set_catalog_result(result);
                    }
                    _ => {}
                }
            }
            KeyCode::Esc => {
                app.cancel_dialog_input();
            }
            KeyCode::Backspace => {
                if app.cursor_position > 0 {
                    app.dialog_input.remove(app.cursor_position - 1);
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if app.cursor_position < app.dialog_input.len() {
                    app.dialog_input.remove(app.cursor_position);
                }
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.dialog_input.len() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.dialog_input.len();
            }
            KeyCode::Char(c) => {
                app.dialog_input.insert(app.cursor_position, c);
                app.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn yank_selected(app: &mut App) {
        let Some(product) = app.selected_product().cloned() else {
            return;
        };
        let text = format!("{} ({})", product.title, product.id);

        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.clone())) {
            Ok(()) => app.status_message = Some(format!("Copied {}", text)),
            Err(err) => app.status_message = Some(format!("Clipboard failed: {}", err)),
        }
    }
}
