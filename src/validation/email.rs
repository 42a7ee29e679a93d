use lazy_static::lazy_static;
use regex::Regex;

/// Syntactic email check on the trimmed input. No DNS or mailbox lookups.
pub fn is_valid(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid("a.b+c@sub.example.com"));
        assert!(is_valid("  user_1%x@mail-host.io  "));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid("not-an-email"));
        assert!(!is_valid("a@b"));
        assert!(!is_valid("a@b.c"));
        assert!(!is_valid("a b@example.com"));
        assert!(!is_valid("@example.com"));
        assert!(!is_valid("a@example.c0m"));
    }
}
