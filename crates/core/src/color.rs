//! Hex color value validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// `#` followed by exactly six hex digits, either case.
static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid")
});

/// Validate a color value such as `"#FF0000"`.
pub fn validate_hex_color(value: &str) -> Result<(), CoreError> {
    if HEX_COLOR.is_match(value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid hex color value '{value}'. Expected #RRGGBB"
        )))
    }
}

/// Validate that a display name is not blank.
pub fn validate_name(value: &str, field: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
