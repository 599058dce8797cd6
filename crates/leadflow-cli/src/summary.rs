//! Human-readable output for run outcomes.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use leadflow_model::{IngestOutcome, MappingRequest, RunSummary};

pub fn print_outcome(outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Success(summary) => print_run_summary(summary),
        IngestOutcome::NeedsMapping(request) => print_mapping_request(request),
    }
}

fn print_run_summary(summary: &RunSummary) {
    println!("Processed {}", summary.source_file);
    println!("  rows:       {}", summary.total_rows);
    println!("  new leads:  {}", summary.new_leads);
    println!("  duplicates: {}", summary.duplicates);
    println!("  skipped:    {}", summary.skipped);
    println!("  success:    {:.1}%", summary.success_rate);
}

fn print_mapping_request(request: &MappingRequest) {
    println!("Unknown headers - run suspended awaiting mapping decisions.");
    println!();

    let mut table = Table::new();
    table.set_header(vec![header_cell("Header"), header_cell("Sample values")]);
    apply_table_style(&mut table);
    for header in &request.unknown_headers {
        let samples = request
            .samples
            .get(header)
            .map(|values| values.join(", "))
            .unwrap_or_default();
        let sample_cell = if samples.is_empty() {
            Cell::new("(no non-blank values)").fg(Color::DarkGrey)
        } else {
            Cell::new(samples)
        };
        table.add_row(vec![Cell::new(header), sample_cell]);
    }
    println!("{table}");

    println!();
    println!("Known columns: {}", request.known_columns.join(", "));
    println!();
    println!("Resume with:");
    println!(
        "  leadflow resolve {} --attach \"HEADER=COLUMN\" --create \"HEADER=NAME[:required]\"",
        request.resume_token
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
