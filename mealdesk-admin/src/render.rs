//! Plain-text rendering of the restaurant list for the terminal

use mealdesk_common::Food;
use std::fmt::Write;

use crate::controller::PageView;
use crate::interaction::{InteractionState, LayoutMode};

/// Render one page in the active layout
pub fn render_page(view: &PageView, state: &InteractionState) -> String {
    let mut out = String::new();

    if view.items.is_empty() {
        out.push_str("No foods found.\n");
        return out;
    }

    for food in &view.items {
        match state.layout() {
            LayoutMode::List => render_list_item(&mut out, food, state),
            LayoutMode::Grid => render_grid_item(&mut out, food, state),
        }
    }

    let _ = writeln!(
        out,
        "Page {} of {} ({} foods)",
        view.pagination.page,
        view.pagination.total_pages.max(1),
        view.total_results
    );
    out
}

fn render_list_item(out: &mut String, food: &Food, state: &InteractionState) {
    let _ = writeln!(
        out,
        "[{}] {}  {}  [{}:{}]  {}  ${}{}{}",
        food.id,
        food.name,
        stars(food.rating),
        food.severity(),
        food.restaurant_status,
        food.restaurant_name,
        format_price(food.price),
        if food.is_closed() { "  (ordering disabled)" } else { "" },
        if state.is_deleting(&food.id) { "  deleting..." } else { "" },
    );
}

fn render_grid_item(out: &mut String, food: &Food, state: &InteractionState) {
    let _ = writeln!(out, "+ {} [{}:{}]", food.restaurant_name, food.severity(), food.restaurant_status);
    let _ = writeln!(out, "| {} ({})", food.name, food.id);
    let _ = writeln!(out, "| {}  ${}", stars(food.rating), format_price(food.price));
    let _ = writeln!(out, "| image: {}", food.image);
    if state.is_expanded(&food.id) {
        let _ = writeln!(out, "| actions: add | edit | delete");
        if !food.restaurant_logo.is_empty() {
            let _ = writeln!(out, "| logo: {}", food.restaurant_logo);
        }
    }
    if state.is_deleting(&food.id) {
        let _ = writeln!(out, "| deleting...");
    }
    out.push_str("+\n");
}

/// Five-slot star bar for a rating (rounded, clamped to 0-5)
fn stars(rating: f64) -> String {
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "*".repeat(filled), ".".repeat(5 - filled))
}

fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}
