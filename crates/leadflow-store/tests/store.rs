use std::collections::BTreeMap;

use chrono::Utc;
use leadflow_model::{
    CanonicalColumn, DecisionAction, Lead, LeadIdentity, LeadStatus, MappingDecisionRecord,
    PendingUpload, ProcessingRun, RunSummary,
};
use leadflow_store::{InsertOutcome, LeadFilter, LeadStore, StoreError};

fn lead(identity: &str, email: &str) -> Lead {
    let mut fields = BTreeMap::new();
    fields.insert("email".to_string(), email.to_string());
    Lead {
        identity: LeadIdentity::new(identity),
        status: LeadStatus::Active,
        source_file: "leads.csv".to_string(),
        created_at: Utc::now(),
        notes: None,
        fields,
    }
}

#[test]
fn duplicate_insert_is_reclassified_not_an_error() {
    let store = LeadStore::open_in_memory().expect("open store");
    let first = lead("jane@x.com", "jane@x.com");
    assert_eq!(
        store.insert_lead(&first).expect("insert"),
        InsertOutcome::Inserted
    );
    assert_eq!(
        store.insert_lead(&first).expect("insert again"),
        InsertOutcome::DuplicateIdentity
    );
    assert!(store.lead_exists(&first.identity).expect("exists"));
    assert_eq!(store.count_leads(LeadStatus::Active).expect("count"), 1);
}

#[test]
fn listing_filters_by_status_and_search() {
    let store = LeadStore::open_in_memory().expect("open store");
    store.insert_lead(&lead("jane@x.com", "jane@x.com")).unwrap();
    store.insert_lead(&lead("bob@y.com", "bob@y.com")).unwrap();

    let all = store.list_leads(&LeadFilter::default()).expect("list");
    assert_eq!(all.len(), 2);
    // Newest first.
    assert_eq!(all[0].identity.as_str(), "bob@y.com");

    let filter = LeadFilter {
        search: Some("jane".to_string()),
        ..LeadFilter::default()
    };
    let found = store.list_leads(&filter).expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].field("email"), "jane@x.com");
}

#[test]
fn status_update_moves_leads_between_listings() {
    let store = LeadStore::open_in_memory().expect("open store");
    let jane = lead("jane@x.com", "jane@x.com");
    store.insert_lead(&jane).unwrap();

    assert!(
        store
            .update_status(&jane.identity, LeadStatus::Duplicate)
            .expect("update")
    );
    assert_eq!(store.count_leads(LeadStatus::Active).unwrap(), 0);
    assert_eq!(store.count_leads(LeadStatus::Duplicate).unwrap(), 1);
    assert!(
        !store
            .update_status(&LeadIdentity::new("nobody@x.com"), LeadStatus::Active)
            .expect("missing lead")
    );
}

#[test]
fn schema_columns_round_trip() {
    let mut store = LeadStore::open_in_memory().expect("open store");
    assert!(store.load_columns().expect("empty").is_empty());

    let columns = vec![
        CanonicalColumn::new("email", vec!["work email".to_string()], true),
        CanonicalColumn::new("city", vec!["town, area".to_string()], false),
    ];
    store.save_columns(&columns).expect("save");
    let loaded = store.load_columns().expect("load");
    assert_eq!(loaded, columns);
}

#[test]
fn evolution_batch_persists_columns_and_log_together() {
    let mut store = LeadStore::open_in_memory().expect("open store");
    let columns = vec![CanonicalColumn::new(
        "zip_code",
        vec!["Zip".to_string()],
        false,
    )];
    let log = vec![MappingDecisionRecord {
        original_header: "Zip".to_string(),
        action: DecisionAction::CreateColumn,
        target_column: "zip_code".to_string(),
        decided_at: Utc::now(),
    }];

    store.apply_evolution(&columns, &log).expect("apply");
    assert_eq!(store.load_columns().expect("load"), columns);
    let history = store.decision_history(10).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, DecisionAction::CreateColumn);
    assert_eq!(history[0].target_column, "zip_code");
}

#[test]
fn pending_uploads_round_trip_and_unknown_tokens_fail() {
    let store = LeadStore::open_in_memory().expect("open store");
    let upload = PendingUpload {
        token: "abc123".to_string(),
        source_file: "leads.csv".to_string(),
        headers: vec!["Email".to_string(), "Zip".to_string()],
        rows: vec![vec!["jane@x.com".to_string(), "02134".to_string()]],
        created_at: Utc::now(),
    };

    store.save_pending(&upload).expect("save");
    let loaded = store.load_pending("abc123").expect("load");
    assert_eq!(loaded.headers, upload.headers);
    assert_eq!(loaded.rows, upload.rows);

    store.delete_pending("abc123").expect("delete");
    assert!(matches!(
        store.load_pending("abc123"),
        Err(StoreError::UnknownResumeToken { .. })
    ));
}

#[test]
fn stats_cover_runs_and_lead_counts() {
    let store = LeadStore::open_in_memory().expect("open store");
    store.insert_lead(&lead("jane@x.com", "jane@x.com")).unwrap();

    let summary = RunSummary::new("leads.csv", 2, 1, 1, 0);
    store
        .append_run(&ProcessingRun::from_summary(&summary, Utc::now()))
        .expect("append run");

    let stats = store.stats().expect("stats");
    assert_eq!(stats.active_leads, 1);
    assert_eq!(stats.duplicate_leads, 0);
    assert_eq!(stats.runs_today, 1);
    assert!((stats.avg_success_rate_7d - 50.0).abs() < 1e-9);

    let runs = store.recent_runs(5).expect("runs");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].new_leads, 1);
}
