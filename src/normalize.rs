//! Identifier normalization.
//!
//! Raw column values are canonicalized into comparison keys. A key that normalizes to
//! the empty string is treated as absent: it never enters a lookup table and never
//! establishes group membership.

use crate::matching_type::MatchingType;

/// Trim surrounding whitespace and lowercase. No syntax validation is performed.
///
/// ```
/// use user_matcher::normalize_email;
///
/// assert_eq!(normalize_email("  John@Example.COM "), "john@example.com");
/// ```
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Keep only the ASCII digits of `raw`.
///
/// Country codes are not interpreted: `1-123-456-7890` becomes `11234567890`.
/// See [`PhoneOptions::strip_leading_country_code`] for the opt-in alternative.
///
/// ```
/// use user_matcher::normalize_phone;
///
/// assert_eq!(normalize_phone("(123) 456-7890"), "1234567890");
/// ```
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Options controlling phone normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhoneOptions {
    /// Treat an 11-digit number with a leading `1` as its 10-digit form.
    pub strip_leading_country_code: bool,
}

impl PhoneOptions {
    fn apply(self, mut digits: String) -> String {
        if self.strip_leading_country_code && digits.len() == 11 && digits.starts_with('1') {
            digits.remove(0);
        }
        digits
    }
}

/// Dispatches raw values to the normalizer of their matching type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    phone: PhoneOptions,
}

impl Normalizer {
    #[must_use]
    pub fn new(phone: PhoneOptions) -> Self {
        Self { phone }
    }

    #[must_use]
    pub fn phone_options(&self) -> PhoneOptions {
        self.phone
    }

    /// Normalize `raw` for `matching_type`, returning `None` when the key is empty.
    #[must_use]
    pub fn normalize(&self, matching_type: MatchingType, raw: &str) -> Option<String> {
        let key = match matching_type {
            MatchingType::Email => normalize_email(raw),
            MatchingType::Phone => self.phone.apply(normalize_phone(raw)),
        };
        (!key.is_empty()).then_some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("\tJohn@Example.com  "), "john@example.com");
        assert_eq!(normalize_email("not-an-email"), "not-an-email");
    }

    #[test]
    fn phone_keeps_digits_only() {
        assert_eq!(normalize_phone("123-456-7890"), "1234567890");
        assert_eq!(normalize_phone("+1 (123) 456.7890 ext"), "11234567890");
        assert_eq!(normalize_phone("n/a"), "");
    }

    #[test]
    fn phone_ignores_non_ascii_digits() {
        assert_eq!(normalize_phone("١٢٣"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["  A@B.com ", "MiXeD@Case.ORG", "", "   "] {
            let once = normalize_email(raw);
            assert_eq!(normalize_email(&once), once);
        }
        for raw in ["1-123-456-7890", "(123) 456-7890", "abc", ""] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once);
        }
    }

    #[test]
    fn country_code_kept_by_default() {
        let n = Normalizer::default();
        assert_eq!(
            n.normalize(MatchingType::Phone, "1-123-456-7890").as_deref(),
            Some("11234567890")
        );
    }

    #[test]
    fn country_code_stripped_when_enabled() {
        let n = Normalizer::new(PhoneOptions {
            strip_leading_country_code: true,
        });
        assert_eq!(
            n.normalize(MatchingType::Phone, "1-123-456-7890").as_deref(),
            Some("1234567890")
        );
        // only an 11-digit number with a leading 1 is affected
        assert_eq!(
            n.normalize(MatchingType::Phone, "2-123-456-7890").as_deref(),
            Some("21234567890")
        );
        assert_eq!(
            n.normalize(MatchingType::Phone, "1234567890").as_deref(),
            Some("1234567890")
        );
    }

    #[test]
    fn blank_values_are_absent() {
        let n = Normalizer::default();
        assert_eq!(n.normalize(MatchingType::Email, "   "), None);
        assert_eq!(n.normalize(MatchingType::Phone, ""), None);
        assert_eq!(n.normalize(MatchingType::Phone, "unknown"), None);
    }
}
