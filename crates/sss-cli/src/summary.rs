use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sss_cli::ConversionOutcome;

pub fn print_summary(outcome: &ConversionOutcome) {
    println!("Metadata: {}", outcome.metadata_file.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Left);
    }
    table.add_row(vec![
        Cell::new("Record format"),
        Cell::new(outcome.record_format),
    ]);
    table.add_row(vec![Cell::new("Variables"), Cell::new(outcome.variables)]);
    table.add_row(vec![
        Cell::new("Multiple-response sets"),
        Cell::new(outcome.multiple_sets),
    ]);
    table.add_row(vec![Cell::new("Statements"), Cell::new(outcome.statements)]);
    table.add_row(vec![Cell::new("Data file"), Cell::new(&outcome.data_file)]);
    table.add_row(vec![
        Cell::new("Syntax file"),
        match &outcome.syntax_file {
            Some(path) => Cell::new(path.display()).fg(Color::Green),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![
        Cell::new("Submitted"),
        if outcome.executed {
            Cell::new("yes").fg(Color::Green)
        } else {
            dim_cell("no")
        },
    ]);
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
