//! Inventory view: products with stock, margins and valuation at cost

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Row, Table},
    Frame,
};

use crate::display::format::truncate;
use crate::services::InventoryService;
use crate::tui::app::App;

use super::{header_row, render_error, scrolled, titled_block};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let valuation = match InventoryService::new(app.storage).valuation() {
        Ok(v) => v,
        Err(e) => return render_error(frame, area, "Inventory", &e),
    };

    let rows: Vec<Row> = valuation
        .products
        .iter()
        .map(|(product, value)| {
            let style = if product.is_low_stock() {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                truncate(&product.sku, 12),
                truncate(&product.name, 26),
                format!("{:>7} {}", product.stock, product.unit),
                format!("{:>7}", product.min_stock),
                format!("{:>11}", product.cost),
                format!("{:>11}", product.price),
                product
                    .margin_percent()
                    .map(|m| format!("{:>5.1}%", m))
                    .unwrap_or_else(|| "     -".into()),
                format!("{:>12}", value),
            ])
            .style(style)
        })
        .collect();

    let title = format!(
        "Inventory - {} products, {} units, valued at {}",
        valuation.products.len(),
        valuation.units,
        valuation.total
    );
    let widths = [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(7),
        Constraint::Length(12),
    ];
    let table = Table::new(scrolled(rows, app.scroll), widths)
        .header(header_row(&["SKU", "Name", "Stock", "Min", "Cost", "Price", "Margin", "Value"]))
        .block(titled_block(title))
        .column_spacing(1);
    frame.render_widget(table, area);
}
