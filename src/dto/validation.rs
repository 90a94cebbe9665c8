//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a label is non-empty after trimming whitespace.
///
/// Length bounds are enforced separately with `length` attributes; this
/// catches strings made entirely of spaces, which would otherwise pass.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must contain at least one non-whitespace character".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_blank_accepts_text() {
        assert!(validate_not_blank("Kowalscy").is_ok());
        assert!(validate_not_blank(" x ").is_ok());
    }

    #[test]
    fn test_validate_not_blank_rejects_whitespace() {
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
    }
}
