//! Common validation rules shared across request payloads.

use validator::ValidationError;

const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

/// Validates a priority tag.
///
/// Requirements:
/// - One of `low`, `medium`, `high`
pub fn validate_priority(priority: &str) -> Result<(), ValidationError> {
    if !PRIORITIES.contains(&priority) {
        return Err(ValidationError::new("priority_unknown"));
    }
    Ok(())
}

/// Validates a display color token.
///
/// Requirements:
/// - 1-50 characters
/// - Only alphanumeric characters, `-` and `#` (CSS color names or hex codes)
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if color.is_empty() || color.len() > 50 {
        return Err(ValidationError::new("color_invalid_length"));
    }
    if !color
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '#')
    {
        return Err(ValidationError::new("color_invalid_characters"));
    }
    Ok(())
}
