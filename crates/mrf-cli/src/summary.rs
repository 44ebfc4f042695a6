use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use mrf_cli::pipeline::{GenerateRun, GeneratedFile};
use mrf_core::UploadSummary;
use mrf_model::{MrfDocument, ValidationErrorMap};

pub fn print_upload(input: &Path, summary: &UploadSummary) {
    println!("Input: {}", input.display());
    println!("{}", upload_table(summary));
}

pub fn print_generate(run: &GenerateRun) {
    println!("Input: {}", run.input.display());
    if let Some(path) = &run.output {
        println!("Output: {}", path.display());
    }
    println!("{}", upload_table(&run.summary));
    println!("{}", document_table(&run.document));
}

pub fn print_check(path: &Path, document: &MrfDocument) {
    println!("{}: valid MRF document", path.display());
    println!(
        "Reporting entity: {} ({})",
        document.reporting_entity_name, document.reporting_entity_type
    );
    println!(
        "Last updated: {}  Version: {}",
        document.last_updated_on, document.version
    );
    println!("{}", document_table(document));
}

pub fn print_errors(errors: &ValidationErrorMap) {
    if errors.is_empty() {
        return;
    }
    println!();
    println!("Rejected rows:");
    println!("{}", error_table(errors));
}

pub fn print_listing(files: &[GeneratedFile]) {
    if files.is_empty() {
        println!("No generated MRF files found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Size"),
        header_cell("Modified"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for file in files {
        let name = file
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified = match file.modified {
            Some(time) => Cell::new(time.format("%Y-%m-%d %H:%M:%S UTC")),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(name), Cell::new(file.size), modified]);
    }
    println!("{table}");
}

fn upload_table(summary: &UploadSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Valid"),
        header_cell("Rejected"),
    ]);
    apply_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total).add_attribute(Attribute::Bold),
        count_cell(summary.valid, Color::Green),
        count_cell(summary.invalid, Color::Red),
    ]);
    table
}

fn error_table(errors: &ValidationErrorMap) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Errors")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, messages) in errors {
        table.add_row(vec![
            Cell::new(index).fg(Color::Red),
            Cell::new(messages.join("\n")),
        ]);
    }
    table
}

fn document_table(document: &MrfDocument) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Type"),
        header_cell("Name"),
        header_cell("Service"),
        header_cell("Allowed"),
        header_cell("TINs"),
        header_cell("Providers"),
    ]);
    apply_document_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    let mut total_tins = 0usize;
    let mut total_providers = 0usize;
    for item in &document.out_of_network {
        let service = item
            .allowed_amounts
            .first()
            .and_then(|allowed| allowed.service_code.as_ref())
            .map(|codes| codes.join(", "));
        let allowed = item
            .allowed_amounts
            .first()
            .and_then(|allowed| allowed.payments.first())
            .map(|payment| payment.allowed_amount);
        let providers: usize = item
            .allowed_amounts
            .iter()
            .flat_map(|allowed| &allowed.payments)
            .map(|payment| payment.providers.len())
            .sum();
        total_tins += item.allowed_amounts.len();
        total_providers += providers;
        table.add_row(vec![
            Cell::new(&item.billing_code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(item.billing_code_type),
            Cell::new(&item.name),
            match service {
                Some(codes) => Cell::new(codes),
                None => dim_cell("-"),
            },
            match allowed {
                Some(amount) => Cell::new(format!("{amount:.2}")),
                None => dim_cell("-"),
            },
            Cell::new(item.allowed_amounts.len()),
            Cell::new(providers),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} items", document.out_of_network.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_tins).add_attribute(Attribute::Bold),
        Cell::new(total_providers).add_attribute(Attribute::Bold),
    ]);
    table
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_document_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
        ]);
    }
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
