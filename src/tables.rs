use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::core::{SampleStore, Timestamp};

#[must_use]
pub fn build_store_table(store: &SampleStore) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Property", "Value"]);

    table.add_row(vec![
        Cell::new("Samples"),
        Cell::new(store.len())
            .set_alignment(CellAlignment::Right)
            .fg(if store.len() < 2 { Color::Red } else { Color::Reset }),
    ]);

    if let Some((first, last)) = store.coverage() {
        table.add_row(vec![Cell::new("First"), Cell::new(format_timestamp(first))]);
        table.add_row(vec![Cell::new("Last"), Cell::new(format_timestamp(last))]);
        table.add_row(vec![
            Cell::new("Span"),
            Cell::new(last - first).set_alignment(CellAlignment::Right),
        ]);
    }

    if let Some((min, max)) =
        store.samples().iter().map(|sample| sample.power).minmax().into_option()
    {
        table.add_row(vec![
            Cell::new("Min power"),
            Cell::new(min).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new("Max power"),
            Cell::new(max).set_alignment(CellAlignment::Right),
        ]);
    }

    if let Some((first, last)) = store.coverage()
        && let Ok(total) = store.get_energy(first, last)
    {
        table.add_row(vec![
            Cell::new("Total energy").add_attribute(Attribute::Bold),
            Cell::new(total).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
        ]);
    }

    table
}

fn format_timestamp(timestamp: Timestamp) -> String {
    match timestamp.to_utc() {
        Some(time) => format!("{timestamp} ({})", time.format("%Y-%m-%d %H:%M:%S UTC")),
        None => timestamp.to_string(),
    }
}
