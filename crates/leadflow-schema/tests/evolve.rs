use leadflow_model::{DecisionAction, MappingDecision};
use leadflow_schema::{
    SchemaError, SchemaRegistry, apply_decisions, default_columns, reconcile,
};

fn seeded() -> SchemaRegistry {
    SchemaRegistry::from_columns(default_columns()).0
}

fn attach(header: &str, target: &str) -> MappingDecision {
    MappingDecision::Attach {
        header: header.to_string(),
        target: target.to_string(),
    }
}

fn create(header: &str, name: &str) -> MappingDecision {
    MappingDecision::CreateColumn {
        header: header.to_string(),
        name: name.to_string(),
        required: false,
    }
}

#[test]
fn attach_extends_alias_set() {
    let registry = seeded();
    let report = apply_decisions(&registry, &[attach("Zip", "city")]).expect("valid batch");

    let (evolved, _) = SchemaRegistry::from_columns(report.columns);
    assert_eq!(evolved.schema().resolve("Zip"), Some("city"));
    assert_eq!(report.log.len(), 1);
    assert_eq!(report.log[0].action, DecisionAction::Attach);
    assert_eq!(report.log[0].target_column, "city");
}

#[test]
fn create_column_resolves_header_afterwards() {
    let registry = seeded();
    let report =
        apply_decisions(&registry, &[create("Zip Code", "zip_code")]).expect("valid batch");

    let (evolved, _) = SchemaRegistry::from_columns(report.columns);
    let headers = vec!["Zip Code".to_string(), "zip_code".to_string()];
    let recon = reconcile(&headers, evolved.schema());
    assert!(recon.is_fully_resolved());
    assert_eq!(recon.canonical_for("Zip Code"), Some("zip_code"));
}

#[test]
fn unknown_target_fails_whole_batch() {
    let registry = seeded();
    let decisions = vec![attach("Zip", "city"), attach("Region Code", "not_a_column")];

    let err = apply_decisions(&registry, &decisions).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownTarget {
            target: "not_a_column".to_string()
        }
    );
    // The input registry is untouched; the valid first decision left no trace.
    assert_eq!(registry.schema().resolve("Zip"), None);
}

#[test]
fn column_created_earlier_in_batch_is_valid_attach_target() {
    let registry = seeded();
    let decisions = vec![
        create("Zip Code", "zip_code"),
        attach("Postal Code", "zip_code"),
    ];

    let report = apply_decisions(&registry, &decisions).expect("valid batch");
    let (evolved, _) = SchemaRegistry::from_columns(report.columns);
    assert_eq!(evolved.schema().resolve("Postal Code"), Some("zip_code"));
    assert_eq!(report.log.len(), 2);
}

#[test]
fn creating_existing_column_is_a_noop_that_still_attaches_the_header() {
    let registry = seeded();
    let report = apply_decisions(&registry, &[create("Company Web Site", "website")])
        .expect("idempotent create");

    let (evolved, _) = SchemaRegistry::from_columns(report.columns);
    assert_eq!(evolved.columns().len(), registry.columns().len());
    assert_eq!(
        evolved.schema().resolve("Company Web Site"),
        Some("website")
    );
    assert_eq!(report.log[0].action, DecisionAction::CreateColumn);
}

#[test]
fn alias_collision_is_reported_and_first_writer_kept() {
    let registry = seeded();
    let report =
        apply_decisions(&registry, &[attach("Email Address", "website")]).expect("valid batch");

    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].kept, "email");
    assert_eq!(report.collisions[0].rejected, "website");
    let (evolved, _) = SchemaRegistry::from_columns(report.columns);
    assert_eq!(evolved.schema().resolve("Email Address"), Some("email"));
}
