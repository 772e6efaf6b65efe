use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use csvw_cli::check::ValidationReport;
use csvw_model::{Diagnostic, Severity};

pub fn print_summary(file: &str, report: &ValidationReport, limit: usize) {
    println!("File: {file}");
    println!("Rows: {}", report.rows);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Datatype"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Null"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut total_valid = 0usize;
    let mut total_invalid = 0usize;
    let mut total_null = 0usize;
    for summary in &report.columns {
        total_valid += summary.valid;
        total_invalid += summary.invalid;
        total_null += summary.null;
        table.add_row(vec![
            Cell::new(&summary.label)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.datatype.name()),
            count_cell(summary.valid, Color::Green),
            count_cell(summary.invalid, Color::Red),
            dim_cell(summary.null),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_valid).add_attribute(Attribute::Bold),
        count_cell(total_invalid, Color::Red).add_attribute(Attribute::Bold),
        dim_cell(total_null).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_issue_table(report, limit);
    println!(
        "Errors: {}  Warnings: {}",
        report.diagnostics.error_count(),
        report.diagnostics.warning_count()
    );
}

fn print_issue_table(report: &ValidationReport, limit: usize) {
    let mut issues: Vec<&Diagnostic> = report.diagnostics.iter().collect();
    if issues.is_empty() {
        return;
    }
    issues.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then(a.row.cmp(&b.row))
            .then(a.column.cmp(&b.column))
    });
    let hidden = issues.len().saturating_sub(limit);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Code"),
        header_cell("Content"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for issue in issues.into_iter().take(limit) {
        table.add_row(vec![
            severity_cell(issue.severity),
            optional_cell(issue.row),
            optional_cell(issue.column),
            Cell::new(issue.kind.code()),
            match &issue.content {
                Some(content) => Cell::new(content),
                None => dim_cell("-"),
            },
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
    if hidden > 0 {
        println!("... {hidden} more (raise --limit to list them)");
    }
}

/// Condensed style shared with the datatype listing.
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
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<usize>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
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
