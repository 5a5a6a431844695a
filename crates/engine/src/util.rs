//! Internal helpers for input normalization and validation.
//!
//! These utilities are **not** part of the public API. They centralize the
//! name handling so referential checks (contact deletion, credit party
//! matching) compare the same canonical form everywhere.

use unicode_normalization::UnicodeNormalization;

use crate::{LedgerError, ResultEngine};

/// Canonical form of a party/customer/vendor name: NFC-normalized, trimmed.
///
/// An empty result means "no name" (walk-in customer).
pub(crate) fn normalize_name(value: &str) -> String {
    value.trim().nfc().collect()
}

/// Normalize a name and require it to be non-blank.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let normalized = normalize_name(value);
    if normalized.is_empty() {
        return Err(LedgerError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(normalized)
}

/// Case-insensitive comparison of two already-normalized names.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_composes() {
        assert_eq!(normalize_name("  Amit "), "Amit");
        // decomposed e + combining acute composes to é
        assert_eq!(normalize_name("Re\u{0301}nu"), "Rénu");
    }

    #[test]
    fn required_name_rejects_blank() {
        assert!(normalize_required_name("   ", "customer").is_err());
        assert_eq!(normalize_required_name(" Amit ", "customer").unwrap(), "Amit");
    }

    #[test]
    fn same_name_ignores_case_but_not_blank() {
        assert!(same_name("Amit", "amit"));
        assert!(!same_name("", ""));
    }
}
