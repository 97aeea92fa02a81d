//! Human-readable run summary, printed after a successful pipeline run.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    let report = &outcome.report;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Written"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Raw input"),
        Cell::new(report.raw_rows),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        Cell::new("Grants"),
        Cell::new(report.grants),
        written_cell(outcome, "Grants"),
    ]);
    table.add_row(vec![
        Cell::new("Progress_Reports"),
        Cell::new(report.progress_reports),
        written_cell(outcome, "Progress_Reports"),
    ]);
    table.add_row(vec![
        Cell::new("Site_Visits"),
        Cell::new(report.site_visits),
        written_cell(outcome, "Site_Visits"),
    ]);
    println!("{table}");
    println!(
        "Redundancy: {:.1}% of raw rows repeated grant-level data",
        report.redundancy_percent
    );
    if outcome.dry_run {
        println!("Dry run: nothing was written");
    } else {
        println!("Destination: {}", outcome.destination);
    }

    print_warnings(outcome);
}

fn print_warnings(outcome: &RunOutcome) {
    let validation = &outcome.report.validation;
    if !validation.has_warnings() {
        println!("Validation: clean (no orphaned rows)");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Table"),
        header_cell("Grant_ID"),
        header_cell("Finding"),
    ]);
    apply_table_style(&mut table);
    for grant_id in &validation.orphaned_report_grants {
        table.add_row(vec![
            warning_cell(),
            Cell::new("Progress_Reports"),
            Cell::new(grant_id),
            Cell::new("references a grant missing from Grants"),
        ]);
    }
    for grant_id in &validation.orphaned_visit_grants {
        table.add_row(vec![
            warning_cell(),
            Cell::new("Site_Visits"),
            Cell::new(grant_id),
            Cell::new("references a grant missing from Grants"),
        ]);
    }
    println!("{table}");
    println!(
        "Derived with {} warning(s) - review before trusting the output",
        validation.warning_count()
    );
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}

fn warning_cell() -> Cell {
    Cell::new("WARNING").fg(Color::Yellow)
}

fn written_cell(outcome: &RunOutcome, table: &str) -> Cell {
    match outcome.written.iter().find(|w| w.table == table) {
        Some(write) => Cell::new(write.rows),
        None => dim_cell("-"),
    }
}
