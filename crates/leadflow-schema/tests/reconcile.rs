use leadflow_model::CanonicalColumn;
use leadflow_schema::{SchemaRegistry, default_columns, normalize_header, reconcile};
use proptest::prelude::*;

fn seeded() -> SchemaRegistry {
    SchemaRegistry::from_columns(default_columns()).0
}

#[test]
fn maps_known_headers_and_collects_unknown_in_order() {
    let registry = seeded();
    let headers: Vec<String> = ["Full Name", "Zip", "Work Email", "Favorite Color", "Phone"]
        .iter()
        .map(|h| h.to_string())
        .collect();

    let recon = reconcile(&headers, registry.schema());

    assert_eq!(
        recon.header_map,
        vec![
            ("Full Name".to_string(), "name".to_string()),
            ("Work Email".to_string(), "email".to_string()),
            ("Phone".to_string(), "company_phone".to_string()),
        ]
    );
    assert_eq!(
        recon.unknown_headers,
        vec!["Zip".to_string(), "Favorite Color".to_string()]
    );
    assert!(!recon.is_fully_resolved());
}

#[test]
fn two_raw_headers_may_share_a_canonical_column() {
    let registry = seeded();
    let headers = vec!["Email".to_string(), "E-Mail".to_string()];

    let recon = reconcile(&headers, registry.schema());

    assert!(recon.is_fully_resolved());
    assert_eq!(recon.canonical_for("Email"), Some("email"));
    assert_eq!(recon.canonical_for("E-Mail"), Some("email"));
    assert_eq!(recon.header_map.len(), 2);
}

#[test]
fn blank_headers_are_unknown() {
    let registry = seeded();
    let headers = vec!["".to_string(), "  ".to_string()];
    let recon = reconcile(&headers, registry.schema());
    assert_eq!(recon.unknown_headers.len(), 2);
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in "\\PC{0,40}") {
        let once = normalize_header(&raw);
        prop_assert_eq!(normalize_header(&once), once.clone());
    }

    // Headers that normalize identically must reconcile identically.
    #[test]
    fn equal_keys_resolve_equally(base in "[a-z]{1,12}", decoration in "[-_ .]{0,3}") {
        let column = CanonicalColumn::new(base.clone(), vec![], false);
        let (registry, _) = SchemaRegistry::from_columns(vec![column]);
        let decorated = format!("{decoration}{}{decoration}", base.to_uppercase());
        prop_assert_eq!(normalize_header(&decorated), normalize_header(&base));
        prop_assert_eq!(
            registry.schema().resolve(&decorated),
            registry.schema().resolve(&base)
        );
    }
}
