use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Table};
use tracing::trace;

use leadflow_cli::logging::redact_value;
use leadflow_engine::LeadPipeline;
use leadflow_model::{IngestOutcome, LeadStatus, MappingDecision};
use leadflow_store::{LeadFilter, LeadStore};

use crate::cli::{ExportArgs, IngestArgs, LeadsArgs, ResolveArgs, StatusArg};
use crate::summary::{apply_table_style, header_cell};

pub fn run_ingest(args: &IngestArgs, db: &Path) -> Result<IngestOutcome> {
    let pipeline = LeadPipeline::open(db)?;
    pipeline.ingest(&args.file)
}

pub fn run_resolve(args: &ResolveArgs, db: &Path) -> Result<IngestOutcome> {
    let decisions = parse_decisions(&args.attach, &args.create)?;
    if decisions.is_empty() {
        bail!("no decisions given; pass --attach and/or --create");
    }
    let mut pipeline = LeadPipeline::open(db)?;
    pipeline.resolve(&args.token, &decisions)
}

pub fn run_schema(db: &Path) -> Result<()> {
    let pipeline = LeadPipeline::open(db)?;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Required"),
        header_cell("Aliases"),
    ]);
    apply_table_style(&mut table);
    for column in pipeline.schema_columns() {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(if column.required { "yes" } else { "no" }),
            Cell::new(column.aliases.join(", ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_leads(args: &LeadsArgs, db: &Path) -> Result<()> {
    let store = LeadStore::open(db)?;
    let filter = LeadFilter {
        status: status_from_arg(args.status),
        search: args.search.clone(),
        limit: args.limit,
        offset: args.offset,
    };
    let leads = store.list_leads(&filter)?;
    let total = store.count_leads(filter.status)?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Identity"),
        header_cell("Name"),
        header_cell("Company"),
        header_cell("Source"),
        header_cell("Added"),
    ]);
    apply_table_style(&mut table);
    for lead in &leads {
        table.add_row(vec![
            Cell::new(lead.identity.as_str()),
            Cell::new(lead.field("name")),
            Cell::new(lead.field("company_name")),
            Cell::new(&lead.source_file),
            Cell::new(lead.created_at.format("%Y-%m-%d").to_string()),
        ]);
    }
    println!("{table}");
    println!(
        "{} of {} {} lead(s)",
        leads.len(),
        total,
        filter.status.as_str()
    );
    Ok(())
}

pub fn run_stats(db: &Path) -> Result<()> {
    let store = LeadStore::open(db)?;
    let stats = store.stats()?;
    println!("Active leads:        {}", stats.active_leads);
    println!("Duplicate-flagged:   {}", stats.duplicate_leads);
    println!("Runs today:          {}", stats.runs_today);
    println!("7-day success rate:  {:.1}%", stats.avg_success_rate_7d);
    Ok(())
}

pub fn run_export(args: &ExportArgs, db: &Path) -> Result<()> {
    let pipeline = LeadPipeline::open(db)?;
    let leads = pipeline.store().export_active()?;
    let columns: Vec<String> = pipeline
        .schema_columns()
        .iter()
        .map(|c| c.name.clone())
        .collect();

    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("create export file {}", args.out.display()))?;
    let mut header = vec!["lead_id", "status", "source_file", "created_at"];
    header.extend(columns.iter().map(String::as_str));
    writer.write_record(&header)?;
    for lead in &leads {
        trace!(identity = redact_value(lead.identity.as_str()), "exporting lead");
        let mut record = vec![
            lead.identity.as_str().to_string(),
            lead.status.as_str().to_string(),
            lead.source_file.clone(),
            lead.created_at.to_rfc3339(),
        ];
        record.extend(columns.iter().map(|c| lead.field(c).to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    println!("Exported {} lead(s) to {}", leads.len(), args.out.display());
    Ok(())
}

fn status_from_arg(arg: StatusArg) -> LeadStatus {
    match arg {
        StatusArg::Active => LeadStatus::Active,
        StatusArg::Duplicate => LeadStatus::Duplicate,
    }
}

fn parse_decisions(attach: &[String], create: &[String]) -> Result<Vec<MappingDecision>> {
    let mut decisions = Vec::with_capacity(attach.len() + create.len());
    for spec in attach {
        decisions.push(parse_attach(spec)?);
    }
    for spec in create {
        decisions.push(parse_create(spec)?);
    }
    Ok(decisions)
}

fn parse_attach(spec: &str) -> Result<MappingDecision> {
    let Some((header, target)) = spec.split_once('=') else {
        bail!("--attach expects HEADER=COLUMN, got '{spec}'");
    };
    let (header, target) = (header.trim(), target.trim());
    if header.is_empty() || target.is_empty() {
        bail!("--attach expects HEADER=COLUMN, got '{spec}'");
    }
    Ok(MappingDecision::Attach {
        header: header.to_string(),
        target: target.to_string(),
    })
}

fn parse_create(spec: &str) -> Result<MappingDecision> {
    let Some((header, name)) = spec.split_once('=') else {
        bail!("--create expects HEADER=NAME[:required], got '{spec}'");
    };
    let header = header.trim();
    let (name, required) = match name.trim().strip_suffix(":required") {
        Some(name) => (name.trim(), true),
        None => (name.trim(), false),
    };
    if header.is_empty() || name.is_empty() {
        bail!("--create expects HEADER=NAME[:required], got '{spec}'");
    }
    Ok(MappingDecision::CreateColumn {
        header: header.to_string(),
        name: name.to_string(),
        required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attach_and_create_specs() {
        let decisions = parse_decisions(
            &["Zip=city".to_string()],
            &["Deal Size=deal_size:required".to_string()],
        )
        .expect("parse");
        assert_eq!(
            decisions,
            vec![
                MappingDecision::Attach {
                    header: "Zip".to_string(),
                    target: "city".to_string(),
                },
                MappingDecision::CreateColumn {
                    header: "Deal Size".to_string(),
                    name: "deal_size".to_string(),
                    required: true,
                },
            ]
        );
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(parse_attach("Zip").is_err());
        assert!(parse_attach("=city").is_err());
        assert!(parse_create("Zip=").is_err());
    }
}
