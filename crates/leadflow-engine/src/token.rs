//! Resume tokens for suspended uploads.

use chrono::{DateTime, Utc};
use sha2::Digest;

/// Derive the resume token for a run suspended in NeedsMapping.
///
/// Hashes the source name, the header row, and the suspension time, so two
/// suspensions of the same file get distinct tokens.
pub fn resume_token(source_file: &str, headers: &[String], created_at: DateTime<Utc>) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(source_file.as_bytes());
    for header in headers {
        hasher.update([0u8]);
        hasher.update(header.as_bytes());
    }
    hasher.update(
        created_at
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_stable_and_input_sensitive() {
        let headers = vec!["Email".to_string(), "Zip".to_string()];
        let at = Utc::now();
        let token = resume_token("leads.csv", &headers, at);
        assert_eq!(token.len(), 16);
        assert_eq!(token, resume_token("leads.csv", &headers, at));
        assert_ne!(token, resume_token("other.csv", &headers, at));
    }
}
