/// Terminal output helpers shared by the commands
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color as TableColor, ContentArrangement, Table};

pub fn section_header_with_line(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

pub fn subsection_header(title: &str) {
    println!("\n{} {}", "◆".cyan(), title.bold());
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

pub fn action(message: &str) {
    println!("{} {}", "▶".cyan(), message);
}

/// Warn when only the similarity cut was applied
pub fn quality_notice(quality_filtered: bool) {
    if !quality_filtered {
        warning("No quality filter applied: only the similarity threshold was used");
    }
}

/// One `├─ label: value` line; the last item of a group gets `└─`
pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    match value {
        Some(val) => println!("{} {}: {}", prefix.dimmed(), label, val),
        None => println!("{} {}", prefix.dimmed(), label),
    }
}

/// Print `items` as a tree, marking the final one
pub fn tree_items(items: &[(&str, String)]) {
    for (i, (label, value)) in items.iter().enumerate() {
        tree_item(i + 1 == items.len(), label, Some(value));
    }
}

pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

/// Right-aligned numeric cell
pub fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(comfy_table::CellAlignment::Right)
}

/// Format a number with thousands separator
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Mega base pairs with three decimals
pub fn format_mbp(mbp: f64) -> String {
    format!("{:.3} Mbp", mbp)
}

/// A fraction in `[0, 1]` shown as a percentage
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_sizes() {
        assert_eq!(format_mbp(119.667), "119.667 Mbp");
        assert_eq!(format_percent(0.0525), "5.25%");
        assert_eq!(format_percent(0.0), "0.00%");
    }
}
