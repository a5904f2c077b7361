use lazy_static::lazy_static;
use regex::Regex;

/// Lower-case only the domain portion of an email address. The local part is
/// case-sensitive per RFC 5321, so `Franky@EXAMPLE.COM` becomes
/// `Franky@example.com`. Strings without an `@` pass through unchanged.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_domain_only() {
        assert_eq!(normalize_email("test1@EXAMPLE.com"), "test1@example.com");
        assert_eq!(normalize_email("Test2@Example.com"), "Test2@example.com");
        assert_eq!(normalize_email("TEST3@EXAMPLE.COM"), "TEST3@example.com");
        assert_eq!(normalize_email("test4@example.COM"), "test4@example.com");
    }

    #[test]
    fn normalize_preserves_local_part_case() {
        assert_eq!(normalize_email("Franky@EXAMPLE.COM"), "Franky@example.com");
    }

    #[test]
    fn normalize_splits_on_last_at_sign() {
        assert_eq!(normalize_email("a@b@EXAMPLE.COM"), "a@b@example.com");
    }

    #[test]
    fn normalize_passes_through_without_at_sign() {
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
        assert_eq!(normalize_email(""), "");
    }

    #[test]
    fn validity_check() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }
}
