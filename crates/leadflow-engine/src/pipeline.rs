//! The ingestion pipeline state machine.
//!
//! One run moves `Parsed -> Reconciled -> {NeedsMapping | Inserting} ->
//! Logged`. A run that hits unknown headers is suspended, not failed: the
//! parsed rows are saved under a resume token and [`LeadPipeline::resolve`]
//! re-enters reconciliation once the caller has supplied mapping decisions.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use tracing::{debug, info, warn};

use leadflow_ingest::{LeadTable, column_samples, read_lead_table};
use leadflow_model::{
    CanonicalColumn, IngestOutcome, Lead, LeadStatus, MappingDecision, MappingRequest,
    PendingUpload, ProcessingRun, RunSummary,
};
use leadflow_schema::{
    AliasCollision, Reconciliation, SchemaRegistry, apply_decisions, default_columns, reconcile,
};
use leadflow_store::{InsertOutcome, LeadStore};

use crate::identity::derive_identity;
use crate::token::resume_token;

/// Non-blank values shown per unknown header when a run suspends.
const SAMPLE_LIMIT: usize = 3;

/// Orchestrates reconciliation, dedup, and persistence for lead files.
///
/// Owns the schema registry and the store handle; the registry is loaded
/// from the store when the pipeline is built and every mutation is persisted
/// back through it.
pub struct LeadPipeline {
    registry: SchemaRegistry,
    store: LeadStore,
}

impl LeadPipeline {
    /// Open the store at `db_path` and load (seeding if necessary) the
    /// canonical schema.
    pub fn open(db_path: &Path) -> anyhow::Result<Self> {
        let store = LeadStore::open(db_path)
            .with_context(|| format!("open lead store at {}", db_path.display()))?;
        Self::with_store(store)
    }

    /// Build a pipeline over an already-open store.
    pub fn with_store(mut store: LeadStore) -> anyhow::Result<Self> {
        let mut columns = store.load_columns().context("load schema config")?;
        if columns.is_empty() {
            columns = default_columns();
            store.save_columns(&columns).context("seed schema config")?;
            info!(columns = columns.len(), "seeded default lead schema");
        }
        let (registry, collisions) = SchemaRegistry::from_columns(columns);
        warn_collisions(&collisions);
        Ok(Self { registry, store })
    }

    /// Current canonical columns, for the schema listing contract.
    pub fn schema_columns(&self) -> &[CanonicalColumn] {
        self.registry.columns()
    }

    /// Read access to the underlying store for listings and counters.
    pub fn store(&self) -> &LeadStore {
        &self.store
    }

    /// Ingest one lead file.
    ///
    /// Parsing failures are fatal for the run and nothing is persisted.
    pub fn ingest(&self, path: &Path) -> anyhow::Result<IngestOutcome> {
        let table = read_lead_table(path)?;
        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!(
            source_file = %source_file,
            headers = table.headers.len(),
            rows = table.rows.len(),
            "ingesting lead file"
        );
        self.run(table, source_file)
    }

    /// Resume a suspended run with the caller's mapping decisions.
    ///
    /// The resolution batch is all-or-nothing: a decision naming an unknown
    /// target fails the whole batch, no column or alias mutation becomes
    /// visible, and the pending upload stays resumable.
    pub fn resolve(
        &mut self,
        token: &str,
        decisions: &[MappingDecision],
    ) -> anyhow::Result<IngestOutcome> {
        let pending = self.store.load_pending(token)?;
        let report = apply_decisions(&self.registry, decisions)?;
        warn_collisions(&report.collisions);

        self.store
            .apply_evolution(&report.columns, &report.log)
            .context("persist schema evolution batch")?;
        let (registry, _) = SchemaRegistry::from_columns(report.columns);
        self.registry = registry;
        self.store.delete_pending(token)?;
        info!(
            token = %token,
            decisions = decisions.len(),
            "applied mapping decisions; resuming upload"
        );

        let table = LeadTable {
            headers: pending.headers,
            rows: pending.rows,
        };
        self.run(table, pending.source_file)
    }

    /// Reconcile and either insert rows or suspend for mapping.
    ///
    /// Re-entry after `resolve` lands here too: reconciliation always runs
    /// over the full header row, so headers resolved in the batch are picked
    /// up uniformly with already-known ones.
    fn run(&self, table: LeadTable, source_file: String) -> anyhow::Result<IngestOutcome> {
        let recon = reconcile(&table.headers, self.registry.schema());
        if !recon.is_fully_resolved() {
            return self.suspend(table, source_file, recon);
        }

        let summary = self.insert_rows(&table, &recon, &source_file)?;
        self.store
            .append_run(&ProcessingRun::from_summary(&summary, Utc::now()))
            .context("append processing run")?;
        info!(
            source_file = %summary.source_file,
            total_rows = summary.total_rows,
            new_leads = summary.new_leads,
            duplicates = summary.duplicates,
            skipped = summary.skipped,
            "run complete"
        );
        Ok(IngestOutcome::Success(summary))
    }

    fn suspend(
        &self,
        table: LeadTable,
        source_file: String,
        recon: Reconciliation,
    ) -> anyhow::Result<IngestOutcome> {
        let created_at = Utc::now();
        let token = resume_token(&source_file, &table.headers, created_at);
        let samples: BTreeMap<String, Vec<String>> = recon
            .unknown_headers
            .iter()
            .map(|header| (header.clone(), column_samples(&table, header, SAMPLE_LIMIT)))
            .collect();

        self.store
            .save_pending(&PendingUpload {
                token: token.clone(),
                source_file,
                headers: table.headers,
                rows: table.rows,
                created_at,
            })
            .context("save pending upload")?;
        info!(
            token = %token,
            unknown = recon.unknown_headers.len(),
            "unknown headers; run suspended awaiting mapping decisions"
        );

        Ok(IngestOutcome::NeedsMapping(MappingRequest {
            resume_token: token,
            unknown_headers: recon.unknown_headers,
            samples,
            known_columns: self.registry.schema().column_names(),
        }))
    }

    fn insert_rows(
        &self,
        table: &LeadTable,
        recon: &Reconciliation,
        source_file: &str,
    ) -> anyhow::Result<RunSummary> {
        // Column index per mapped header, in header-map order so that two raw
        // headers sharing a canonical column materialize last-one-wins.
        let mapping: Vec<(usize, &str)> = recon
            .header_map
            .iter()
            .filter_map(|(raw, canonical)| {
                table.header_index(raw).map(|idx| (idx, canonical.as_str()))
            })
            .collect();

        let mut new_leads = 0;
        let mut duplicates = 0;
        let mut skipped = 0;

        for (row_idx, row) in table.rows.iter().enumerate() {
            let mut record: BTreeMap<String, String> = BTreeMap::new();
            for (idx, canonical) in &mapping {
                let value = row.get(*idx).cloned().unwrap_or_default();
                record.insert((*canonical).to_string(), value);
            }

            let Some(identity) = derive_identity(&record) else {
                skipped += 1;
                debug!(row = row_idx, "no identity; row skipped");
                continue;
            };

            // Pre-filter for reporting; the store's uniqueness constraint is
            // the authority and reclassifies races as duplicates.
            if self.store.lead_exists(&identity)? {
                duplicates += 1;
                continue;
            }

            let lead = Lead {
                identity,
                status: LeadStatus::Active,
                source_file: source_file.to_string(),
                created_at: Utc::now(),
                notes: None,
                fields: record,
            };
            match self.store.insert_lead(&lead)? {
                InsertOutcome::Inserted => new_leads += 1,
                InsertOutcome::DuplicateIdentity => duplicates += 1,
            }
        }

        Ok(RunSummary::new(
            source_file,
            table.rows.len(),
            new_leads,
            duplicates,
            skipped,
        ))
    }
}

fn warn_collisions(collisions: &[AliasCollision]) {
    for collision in collisions {
        warn!(
            alias = %collision.alias,
            kept = %collision.kept,
            rejected = %collision.rejected,
            "alias collision; first-registered column keeps the key"
        );
    }
}
