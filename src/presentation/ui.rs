use crate::application::{App, AppMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    match app.mode {
        AppMode::CartView => render_cart(f, app, chunks[1]),
        _ => render_catalog(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let badge = app.cart_badge();
    let header = Paragraph::new(format!(
        "gomarket - Terminal Storefront | Cart: {} item{}",
        badge,
        if badge == 1 { "" } else { "s" }
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_catalog(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = area.height.saturating_sub(3) as usize;

    let headers = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::Yellow)),
        Cell::from("Title").style(Style::default().fg(Color::Yellow)),
        Cell::from("Price").style(Style::default().fg(Color::Yellow)),
        Cell::from("In cart").style(Style::default().fg(Color::Yellow)),
    ])
    .height(1);

    let mut rows = vec![headers];

    let end = (app.scroll + visible_rows).min(app.catalog.len());
    for index in app.scroll..end {
        let product = &app.catalog[index];

        let style = if index == app.selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };

        let in_cart = app
            .provider
            .cart()
            .map(|store| store.quantity_of(&product.id))
            .unwrap_or(0);
        let in_cart_text = if in_cart > 0 {
            format!("x{}", in_cart)
        } else {
            String::new()
        };

        rows.push(
            Row::new(vec![
                Cell::from(format!("{}", index + 1)),
                Cell::from(product.title.clone()),
                Cell::from(format!("${:.2}", product.price)),
                Cell::from(in_cart_text),
            ])
            .style(style)
            .height(1),
        );
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Catalog ({} products)", app.catalog.len())),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_cart(f: &mut Frame, app: &App, area: Rect) {
    let visible_rows = area.height.saturating_sub(3) as usize;

    let headers = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::Yellow)),
        Cell::from("Title").style(Style::default().fg(Color::Yellow)),
        Cell::from("Price").style(Style::default().fg(Color::Yellow)),
        Cell::from("Qty").style(Style::default().fg(Color::Yellow)),
    ])
    .height(1);

    let mut rows = vec![headers];

    let items = app
        .provider
        .cart()
        .map(|store| store.products().to_vec())
        .unwrap_or_default();

    let end = (app.cart_scroll + visible_rows).min(items.len());
    for index in app.cart_scroll..end {
        let item = &items[index];

        // Zero-quantity entries stay in the cart; render them dimmed
        let style = if index == app.cart_selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else if item.quantity == 0 {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        rows.push(
            Row::new(vec![
                Cell::from(format!("{}", index + 1)),
                Cell::from(item.title.clone()),
                Cell::from(format!("${:.2}", item.price)),
                Cell::from(format!("{}", item.quantity)),
            ])
            .style(style)
            .height(1),
        );
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Cart ({} entries)", items.len())),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Catalog => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Enter/a: add to cart | c: cart | /: search | y: copy | Ctrl+R: fetch | Ctrl+I: import CSV | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::CartView => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "+/-: adjust quantity | Ctrl+E: export CSV | c/Esc: catalog | F1/?: help | q: quit".to_string()
            }
        }
        AppMode::Help => {
            "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string()
        }
        AppMode::Search => format!("Search: {} (Enter to finish, Esc to cancel)", app.search_query),
        AppMode::ImportCsv => format!(
            "Import catalog CSV from: {} (Enter to import, Esc to cancel)",
            app.dialog_input
        ),
        AppMode::ExportCsv => format!(
            "Export cart CSV as: {} (Enter to export, Esc to cancel)",
            app.dialog_input
        ),
        AppMode::FetchApi => format!(
            "Fetch catalog from: {} (Enter to fetch, Esc to cancel)",
            app.dialog_input
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Catalog => Style::default(),
            AppMode::CartView => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::Search => Style::default().fg(Color::Green),
            AppMode::ImportCsv => Style::default().fg(Color::Green),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::FetchApi => Style::default().fg(Color::Yellow),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(
                    "gomarket Help (Line {}/{})",
                    start_line + 1,
                    help_lines.len()
                ))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"GOMARKET - TERMINAL STOREFRONT

=== CATALOG SCREEN ===
Arrow keys      Navigate products (jk also work)
Enter or a      Add selected product to the cart
                Every add appends a new cart entry with quantity 1,
                even when the product is already in the cart
c or Tab        Open the cart screen
/               Search the catalog (live, title and id)
n / N           Jump to next / previous search result
y               Copy selected product title and id to the clipboard
q               Quit

=== CART SCREEN ===
Arrow keys      Navigate cart entries (jk also work)
+ or =          Increase quantity of the selected entry
- or _          Decrease quantity of the selected entry
                Quantity stops at 0; entries are never removed
c / Tab / Esc   Back to the catalog
q               Quit

=== CATALOG SOURCES ===
Ctrl+R          Fetch the catalog from the marketplace API
                (GET <base>/products, JSON array of products)
Ctrl+I / Ctrl+L Import a catalog from a CSV file
                (columns: id,title,image_url,price)
Ctrl+E          Export the cart to a CSV shopping list

=== PERSISTENCE ===
The cart is saved to device storage after every change and restored
on the next start. A missing or unreadable snapshot starts an empty
cart; storage failures appear on the status line and are otherwise
ignored.

Storage file:   gomarket-storage.json (override with GOMARKET_STORAGE)
Marketplace:    http://localhost:3333 (override with GOMARKET_API)

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
        .to_string()
}
