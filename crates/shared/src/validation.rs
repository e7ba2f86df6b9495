//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Local mobile numbers: 10 digits starting with 0, or +84 followed by 9 digits.
    static ref PHONE_RE: Regex = Regex::new(r"^(0\d{9}|\+84\d{9})$").unwrap();
}

/// Validates a member phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must be 10 digits starting with 0, or +84 format".into());
        Err(err)
    }
}

/// Validates that a string is non-blank after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone_local_format() {
        assert!(validate_phone("0911111111").is_ok());
        assert!(validate_phone("0922222222").is_ok());
    }

    #[test]
    fn test_validate_phone_international_format() {
        assert!(validate_phone("+84911111111").is_ok());
    }

    #[test]
    fn test_validate_phone_rejects_short() {
        assert!(validate_phone("09111").is_err());
    }

    #[test]
    fn test_validate_phone_rejects_letters() {
        assert!(validate_phone("09xx111111").is_err());
    }

    #[test]
    fn test_validate_phone_rejects_missing_leading_zero() {
        assert!(validate_phone("9111111111").is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("reason").is_ok());
        assert!(validate_not_blank("  x  ").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }
}
