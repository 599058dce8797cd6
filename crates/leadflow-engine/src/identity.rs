//! Identity derivation: the dedup key of an incoming record.

use std::collections::BTreeMap;

use leadflow_model::LeadIdentity;

/// Canonical field consulted first for identity.
pub const EMAIL_FIELD: &str = "email";
/// Phone-like fields consulted in order when the email is blank.
pub const PHONE_FIELDS: [&str; 2] = ["mobile_phone", "company_phone"];
/// Prefix distinguishing phone-derived identities from emails.
pub const PHONE_IDENTITY_PREFIX: &str = "PHONE_";

/// Derive the stable identity of a record.
///
/// A non-blank email (after trimming) wins and is lowercased; otherwise the
/// first non-blank phone-like field contributes its digit characters only.
/// Returns `None` when neither yields a value: the record is unidentifiable
/// and must be skipped, counted as neither new nor duplicate.
pub fn derive_identity(record: &BTreeMap<String, String>) -> Option<LeadIdentity> {
    let email = field(record, EMAIL_FIELD);
    if !email.is_empty() {
        return Some(LeadIdentity::new(email.to_lowercase()));
    }

    for name in PHONE_FIELDS {
        let phone = field(record, name);
        if !phone.is_empty() {
            let digits: String = phone.chars().filter(|ch| ch.is_ascii_digit()).collect();
            return Some(LeadIdentity::new(format!("{PHONE_IDENTITY_PREFIX}{digits}")));
        }
    }

    None
}

fn field<'a>(record: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    record.get(name).map(|v| v.trim()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn email_wins_over_phone() {
        let identity = derive_identity(&record(&[
            ("email", "  Jane@X.com "),
            ("mobile_phone", "555-1212"),
        ]))
        .expect("identified");
        assert_eq!(identity.as_str(), "jane@x.com");
    }

    #[test]
    fn phone_fallback_keeps_digits_only() {
        let identity = derive_identity(&record(&[
            ("email", "   "),
            ("mobile_phone", "(555) 121-2000"),
        ]))
        .expect("identified");
        assert_eq!(identity.as_str(), "PHONE_5551212000");
    }

    #[test]
    fn blank_mobile_falls_through_to_company_phone() {
        let identity = derive_identity(&record(&[
            ("mobile_phone", "  "),
            ("company_phone", "555-0000"),
        ]))
        .expect("identified");
        assert_eq!(identity.as_str(), "PHONE_5550000");
    }

    #[test]
    fn all_blank_is_unidentifiable() {
        assert!(derive_identity(&record(&[])).is_none());
        assert!(
            derive_identity(&record(&[
                ("email", " "),
                ("mobile_phone", ""),
                ("company_phone", "\t"),
                ("name", "Jane Doe"),
            ]))
            .is_none()
        );
    }
}
