//! Header normalization.
//!
//! This is the sole equality notion used for header matching: two raw
//! headers refer to the same column exactly when their normalized keys are
//! equal. "Email Address", "email-address", and "EMAILADDRESS" all
//! normalize identically.

/// Reduce a raw header to its canonical comparison key.
///
/// Lowercases the input and strips every character that is not
/// alphanumeric. Empty input normalizes to the empty string.
pub fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::normalize_header;

    #[test]
    fn strips_case_whitespace_and_punctuation() {
        assert_eq!(normalize_header("Email Address"), "emailaddress");
        assert_eq!(normalize_header("email-address"), "emailaddress");
        assert_eq!(normalize_header("EMAILADDRESS"), "emailaddress");
        assert_eq!(normalize_header("# of Employees"), "ofemployees");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(normalize_header(""), "");
        assert_eq!(normalize_header("  "), "");
        assert_eq!(normalize_header("---"), "");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize_header("Phone 2"), "phone2");
    }
}
