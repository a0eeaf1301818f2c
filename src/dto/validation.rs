//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name, counted in characters after trimming.
pub const MAX_PLAYER_NAME_CHARS: usize = 64;

/// Validates that a player name is non-blank once trimmed and not overly long.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Ala")     // Ok
/// validate_player_name("   ")     // Err - blank
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_required");
        err.message = Some("player name is required".into());
        return Err(err);
    }

    let length = trimmed.chars().count();
    if length > MAX_PLAYER_NAME_CHARS {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("player name must be at most {MAX_PLAYER_NAME_CHARS} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Ala").is_ok());
        assert!(validate_player_name("  Jan Kowalski ").is_ok());
        assert!(validate_player_name(&"ż".repeat(MAX_PLAYER_NAME_CHARS)).is_ok());
    }

    #[test]
    fn test_validate_player_name_blank() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_player_name_too_long() {
        let err = validate_player_name(&"a".repeat(MAX_PLAYER_NAME_CHARS + 1)).unwrap_err();
        assert_eq!(err.code, "player_name_length");
    }
}
