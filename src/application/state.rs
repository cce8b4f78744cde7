//! Application state management for the terminal storefront.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface.

use crate::application::cart::CartProvider;
use crate::domain::Product;

/// Represents the current mode of the application.
///
/// The application can be in different modes that determine how user input
/// is interpreted and what UI elements are displayed.
#[derive(Debug)]
pub enum AppMode {
    /// Catalog screen - browsing the product list
    Catalog,
    /// Cart screen - reviewing and adjusting cart entries
    CartView,
    /// Help screen is displayed
    Help,
    /// Search mode - user is typing a catalog search query
    Search,
    /// Catalog CSV import dialog is open
    ImportCsv,
    /// Cart CSV export dialog is open
    ExportCsv,
    /// Marketplace API URL dialog is open
    FetchApi,
}

/// Main application state containing the catalog, the cart provider and
/// UI state.
///
/// # Examples
///
/// ```
/// use gomarket::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected, 0);
/// assert!(app.catalog.is_empty());
/// assert!(!app.provider.is_provisioned());
/// ```
#[derive(Debug)]
pub struct App {
    /// The session's cart provider; provisioned once at startup
    pub provider: CartProvider,
    /// Products currently offered by the marketplace
    pub catalog: Vec<Product>,
    /// Base URL of the marketplace API
    pub api_url: String,
    /// Current application mode
    pub mode: AppMode,
    /// Selected catalog row (zero-based)
    pub selected: usize,
    /// Top-most catalog row visible in the viewport
    pub scroll: usize,
    /// Selected cart row (zero-based)
    pub cart_selected: usize,
    /// Top-most cart row visible in the viewport
    pub cart_scroll: usize,
    /// Input buffer for filename/URL dialogs
    pub dialog_input: String,
    /// Cursor position within the active input buffer
    pub cursor_position: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Search query input buffer
    pub search_query: String,
    /// Search results as catalog indices
    pub search_results: Vec<usize>,
    /// Current search result index
    pub search_result_index: usize,
    /// Viewport height in rows (for scrolling calculations)
    pub viewport_rows: usize,
}

impl Default for App {
    fn default() -> Self {
        Self {
            provider: CartProvider::new(),
            catalog: Vec::new(),
            api_url: "http://localhost:3333".to_string(),
            mode: AppMode::Catalog,
            selected: 0,
            scroll: 0,
            cart_selected: 0,
            cart_scroll: 0,
            dialog_input: String::new(),
            cursor_position: 0,
            status_message: None,
            help_scroll: 0,
            search_query: String::new(),
            search_results: Vec::new(),
            search_result_index: 0,
            viewport_rows: 20,
        }
    }
}

impl App {
    /// The catalog product under the cursor, if any.
    pub fn selected_product(&self) -> Option<&Product> {
        self.catalog.get(self.selected)
    }

    /// Number of entries in the cart, 0 when the provider is not
    /// provisioned.
    pub fn cart_len(&self) -> usize {
        self.provider
            .cart()
            .map(|store| store.products().len())
            .unwrap_or(0)
    }

    /// Total quantity across cart entries, shown as the header badge.
    pub fn cart_badge(&self) -> u32 {
        self.provider
            .cart()
            .map(|store| store.total_quantity())
            .unwrap_or(0)
    }

    /// Adds the selected catalog product to the cart as a new entry.
    pub fn add_selected_to_cart(&mut self) {
        let Some(product) = self.selected_product().cloned() else {
            return;
        };

        match self.provider.cart_mut() {
            Ok(store) => {
                store.add_to_cart(product.clone());
                self.status_message = Some(format!("Added {} to cart", product.title));
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        }

        self.drain_storage_error();
    }

    /// Increments the selected cart entry's product id.
    pub fn increment_selected(&mut self) {
        let Some(id) = self.selected_cart_id() else {
            return;
        };

        match self.provider.cart_mut() {
            Ok(store) => store.increment(&id),
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        }

        self.drain_storage_error();
    }

    /// Decrements the selected cart entry's product id. The entry stays in
    /// the cart even at quantity 0.
    pub fn decrement_selected(&mut self) {
        let Some(id) = self.selected_cart_id() else {
            return;
        };

        match self.provider.cart_mut() {
            Ok(store) => store.decrement(&id),
            Err(err) => {
                self.status_message = Some(err.to_string());
                return;
            }
        }

        self.drain_storage_error();
    }

    /// Surfaces a recorded storage failure on the status line. Mutations
    /// keep the in-memory state regardless, so this is informational only.
    pub fn drain_storage_error(&mut self) {
        if let Ok(store) = self.provider.cart_mut() {
            if let Some(err) = store.take_storage_error() {
                self.status_message = Some(err.to_string());
            }
        }
    }

    fn selected_cart_id(&self) -> Option<String> {
        self.provider
            .cart()
            .ok()?
            .products()
            .get(self.cart_selected)
            .map(|item| item.id.clone())
    }

    /// Switches to the cart screen.
    pub fn open_cart_view(&mut self) {
        self.mode = AppMode::CartView;
        let len = self.cart_len();
        if len == 0 {
            self.cart_selected = 0;
        } else if self.cart_selected >= len {
            self.cart_selected = len - 1;
        }
        self.ensure_selected_visible();
    }

    /// Switches back to the catalog screen.
    pub fn open_catalog(&mut self) {
        self.mode = AppMode::Catalog;
        self.ensure_selected_visible();
    }

    /// Moves the active list selection up one row.
    pub fn select_previous(&mut self) {
        match self.mode {
            AppMode::CartView => {
                if self.cart_selected > 0 {
                    self.cart_selected -= 1;
                }
            }
            _ => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
        }
        self.ensure_selected_visible();
    }

    /// Moves the active list selection down one row.
    pub fn select_next(&mut self) {
        match self.mode {
            AppMode::CartView => {
                let len = self.cart_len();
                if len > 0 && self.cart_selected < len - 1 {
                    self.cart_selected += 1;
                }
            }
            _ => {
                if !self.catalog.is_empty() && self.selected < self.catalog.len() - 1 {
                    self.selected += 1;
                }
            }
        }
        self.ensure_selected_visible();
    }

    /// Ensures the active list selection is visible by adjusting the scroll
    /// position.
    pub fn ensure_selected_visible(&mut self) {
        match self.mode {
            AppMode::CartView => {
                Self::scroll_into_view(&mut self.cart_scroll, self.cart_selected, self.viewport_rows)
            }
            _ => Self::scroll_into_view(&mut self.scroll, self.selected, self.viewport_rows),
        }
    }

    fn scroll_into_view(scroll: &mut usize, selected: usize, viewport: usize) {
        if selected < *scroll {
            *scroll = selected;
        } else if viewport > 0 && selected >= *scroll + viewport {
            *scroll = selected + 1 - viewport;
        }
    }

    /// Updates the viewport size for proper scrolling calculations.
    pub fn update_viewport_size(&mut self, rows: usize) {
        self.viewport_rows = rows;
    }

    /// Starts search mode and initializes search state.
    pub fn start_search(&mut self) {
        self.mode = AppMode::Search;
        self.search_query.clear();
        self.search_results.clear();
        self.search_result_index = 0;
        self.cursor_position = 0;
        self.status_message = None;
    }

    /// Cancels search mode and returns to the catalog.
    pub fn cancel_search(&mut self) {
        self.mode = AppMode::Catalog;
        self.search_query.clear();
        self.search_results.clear();
        self.search_result_index = 0;
        self.cursor_position = 0;
    }

    /// Filters the catalog by the current query and updates search results.
    ///
    /// Matches case-insensitively against product titles and ids.
    pub fn perform_search(&mut self) {
        self.search_results.clear();
        self.search_result_index = 0;

        if self.search_query.is_empty() {
            return;
        }

        let query_lower = self.search_query.to_lowercase();

        for (index, product) in self.catalog.iter().enumerate() {
            let title_matches = product.title.to_lowercase().contains(&query_lower);
            let id_matches = product.id.to_lowercase().contains(&query_lower);

            if title_matches || id_matches {
                self.search_results.push(index);
            }
        }

        if !self.search_results.is_empty() {
            self.go_to_current_search_result();
        }
    }

    /// Moves to the next search result.
    pub fn next_search_result(&mut self) {
        if !self.search_results.is_empty() {
            self.search_result_index = (self.search_result_index + 1) % self.search_results.len();
            self.go_to_current_search_result();
        }
    }

    /// Moves to the previous search result.
    pub fn previous_search_result(&mut self) {
        if !self.search_results.is_empty() {
            if self.search_result_index == 0 {
                self.search_result_index = self.search_results.len() - 1;
            } else {
                self.search_result_index -= 1;
            }
            self.go_to_current_search_result();
        }
    }

    fn go_to_current_search_result(&mut self) {
        if let Some(&index) = self.search_results.get(self.search_result_index) {
            self.selected = index;
            Self::scroll_into_view(&mut self.scroll, self.selected, self.viewport_rows);
        }
    }

    /// Finishes search and returns to the catalog while keeping the current
    /// selection.
    pub fn finish_search(&mut self) {
        self.mode = AppMode::Catalog;

        let num_results = self.search_results.len();
        if num_results > 0 {
            self.status_message = Some(format!(
                "Search completed: {} result{} found for '{}'",
                num_results,
                if num_results == 1 { "" } else { "s" },
                self.search_query
            ));
        } else {
            self.status_message = Some(format!("No results found for '{}'", self.search_query));
        }

        self.search_query.clear();
        self.search_results.clear();
        self.search_result_index = 0;
        self.cursor_position = 0;
    }

    /// Switches to CSV import mode to prompt for a catalog filename.
    pub fn start_csv_import(&mut self) {
        self.mode = AppMode::ImportCsv;
        self.dialog_input = "catalog.csv".to_string();
        self.cursor_position = self.dialog_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for catalog CSV import.
    pub fn get_csv_import_filename(&self) -> String {
        if self.dialog_input.is_empty() {
            "catalog.csv".to_string()
        } else {
            self.dialog_input.clone()
        }
    }

    /// Processes the result of a catalog CSV import operation.
    ///
    /// Replaces the catalog and resets the view if successful. Sets an
    /// appropriate status message and returns to the catalog screen.
    pub fn set_csv_import_result(&mut self, result: Result<Vec<Product>, String>) {
        match result {
            Ok(products) => {
                self.status_message = Some(format!(
                    "Catalog imported: {} product{}",
                    products.len(),
                    if products.len() == 1 { "" } else { "s" }
                ));
                self.replace_catalog(products);
            }
            Err(error) => {
                self.status_message = Some(format!("Import failed: {}", error));
            }
        }

        self.mode = AppMode::Catalog;
        self.dialog_input.clear();
        self.cursor_position = 0;
    }

    /// Switches to CSV export mode to prompt for a cart export filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.dialog_input = "cart.csv".to_string();
        self.cursor_position = self.dialog_input.len();
        self.status_message = None;
    }

    /// Gets the filename to use for cart CSV export.
    pub fn get_csv_export_filename(&self) -> String {
        if self.dialog_input.is_empty() {
            "cart.csv".to_string()
        } else {
            self.dialog_input.clone()
        }
    }

    /// Processes the result of a cart CSV export operation.
    pub fn set_csv_export_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Cart exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.mode = AppMode::Catalog;
        self.dialog_input.clear();
        self.cursor_position = 0;
    }

    /// Switches to the API URL dialog to fetch the catalog.
    pub fn start_api_fetch(&mut self) {
        self.mode = AppMode::FetchApi;
        self.dialog_input = self.api_url.clone();
        self.cursor_position = self.dialog_input.len();
        self.status_message = None;
    }

    /// Gets the marketplace base URL to fetch from.
    pub fn get_api_url(&self) -> String {
        if self.dialog_input.is_empty() {
            self.api_url.clone()
        } else {
            self.dialog_input.clone()
        }
    }

    /// Processes the result of a catalog fetch.
    ///
    /// Replaces the catalog and resets the view if successful; on failure
    /// the current catalog is kept and the error lands on the status line.
    pub fn set_catalog_result(&mut self, result: Result<Vec<Product>, String>) {
        match result {
            Ok(products) => {
                self.status_message = Some(format!(
                    "Loaded {} product{} from {}",
                    products.len(),
                    if products.len() == 1 { "" } else { "s" },
                    self.api_url
                ));
                self.replace_catalog(products);
            }
            Err(error) => {
                self.status_message = Some(format!(
                    "Catalog load failed: {} (Ctrl+I imports a CSV catalog)",
                    error
                ));
            }
        }

        self.mode = AppMode::Catalog;
        self.dialog_input.clear();
        self.cursor_position = 0;
    }

    /// Cancels filename/URL input and returns to the catalog.
    pub fn cancel_dialog_input(&mut self) {
        self.mode = AppMode::Catalog;
        self.dialog_input.clear();
        self.cursor_position = 0;
    }

    fn replace_catalog(&mut self, products: Vec<Product>) {
        self.catalog = products;
        self.selected = 0;
        self.scroll = 0;
        self.search_results.clear();
        self.search_result_index = 0;
    }
}
