use std::path::PathBuf;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{ProfileResult, RunResult};

pub fn print_run_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    print_path("Processed", result.processed.as_ref());
    print_path("Curated", result.curated.as_ref());
    println!("Lineage: {}", result.lineage.display());
    for report in &result.reports {
        println!("Report: {}", report.display());
    }
    println!("Stages: {}", result.executed_stages.join(" -> "));

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rows in"), Cell::new(result.rows_in)]);
    table.add_row(vec![
        Cell::new("Rows normalized"),
        count_cell(result.rows_in, result.rows_normalized),
    ]);
    table.add_row(vec![
        Cell::new("Rows curated"),
        match result.rows_curated {
            Some(rows) => count_cell(result.rows_normalized, rows),
            None => dim_cell("-"),
        },
    ]);
    table.add_row(vec![
        Cell::new("Lineage entries"),
        Cell::new(result.lineage_entries),
    ]);
    table.add_row(vec![
        Cell::new("Quality before"),
        quality_cell(result.quality_before),
    ]);
    table.add_row(vec![
        Cell::new("Quality after"),
        quality_cell(result.quality_after),
    ]);
    println!("{table}");
}

pub fn print_profile_summary(result: &ProfileResult) {
    println!("Input: {}", result.input.display());
    println!("Report: {}", result.report.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Rows"), Cell::new(result.rows)]);
    table.add_row(vec![
        Cell::new("Quality score"),
        quality_cell(result.quality),
    ]);
    println!("{table}");
}

fn print_path(label: &str, path: Option<&PathBuf>) {
    if let Some(path) = path {
        println!("{label}: {}", path.display());
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(60);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Highlight a count that shrank relative to its predecessor.
fn count_cell(previous: usize, current: usize) -> Cell {
    if current < previous {
        Cell::new(current).fg(Color::Yellow)
    } else {
        Cell::new(current)
    }
}

fn quality_cell(score: Option<f64>) -> Cell {
    match score {
        Some(score) if score >= 0.9 => Cell::new(format!("{score:.4}"))
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(score) => Cell::new(format!("{score:.4}")).fg(Color::Yellow),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
