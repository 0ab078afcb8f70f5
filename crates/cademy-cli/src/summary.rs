use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cademy_model::{CleanseReport, Stage};

use crate::types::CleanseRun;

pub fn print_summary(run: &CleanseRun) {
    println!("Input: {}", run.input.display());
    println!("Reference date: {}", run.report.reference_date);
    if run.dry_run {
        println!("Output: (dry run)");
    } else {
        println!("Output: {}", run.output_dir.display());
    }
    if let Some(path) = &run.outputs.report {
        println!("Report: {}", path.display());
    }
    println!("{}", outcome_table(run));
    println!("{}", stage_table(&run.report));
}

/// Record counts per output table.
pub fn outcome_table(run: &CleanseRun) -> Table {
    let report = &run.report;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Records"),
        header_cell("File"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("cleansed"),
        Cell::new(report.cleansed_records).fg(Color::Green),
        file_cell(run.outputs.cleansed.as_ref()),
    ]);
    table.add_row(vec![
        Cell::new("rejected"),
        count_cell(report.rejected_records, Color::Yellow),
        file_cell(run.outputs.rejected.as_ref()),
    ]);
    table.add_row(vec![
        Cell::new("quarantined"),
        count_cell(report.quarantined_records, Color::Red),
        file_cell(run.outputs.errors.as_ref()),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.input_records).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

/// Per-stage row counts and timings.
pub fn stage_table(report: &CleanseReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Input"),
        header_cell("Quarantined"),
        header_cell("Detail"),
        header_cell("ms"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for stage in &report.stages {
        table.add_row(vec![
            Cell::new(stage.stage.label()),
            Cell::new(stage.input_rows),
            count_cell(stage.quarantined, Color::Red),
            Cell::new(stage_detail(stage.stage, report)),
            dim_cell(stage.duration_ms),
        ]);
    }
    table
}

fn stage_detail(stage: Stage, report: &CleanseReport) -> String {
    match stage {
        Stage::AgeDeriver => String::new(),
        Stage::ContactFlattener => match report.contact_columns.len() {
            0 => "no contact keys".to_string(),
            n => format!("{n} columns: {}", report.contact_columns.join(", ")),
        },
        Stage::AddressSplitter => format!(
            "{} padded, {} truncated",
            report.padded_addresses, report.truncated_addresses
        ),
        Stage::TypeNormalizer => String::new(),
        Stage::MissingDataPartitioner => {
            let counts = &report.partition;
            format!(
                "{} no courses, {} no job; filled {} career paths, {} hours",
                counts.missing_num_course_taken,
                counts.missing_job_id,
                counts.filled_current_career_path_id,
                counts.filled_time_spent_hrs
            )
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn file_cell(path: Option<&PathBuf>) -> Cell {
    match path.and_then(|p| p.file_name()) {
        Some(name) => Cell::new(name.to_string_lossy()).fg(Color::Green),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
