use std::borrow::Cow;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Display color for zones, `#RRGGBB`
    pub static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

/// Required free text: present and not only whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("This field is required")));
    }
    Ok(())
}

/// Latitude as a textual decimal in [-90, 90]
pub fn validate_latitude(value: &str) -> Result<(), ValidationError> {
    validate_coordinate(value, 90, "latitude", "Latitude must be a decimal between -90 and 90")
}

/// Longitude as a textual decimal in [-180, 180]
pub fn validate_longitude(value: &str) -> Result<(), ValidationError> {
    validate_coordinate(
        value,
        180,
        "longitude",
        "Longitude must be a decimal between -180 and 180",
    )
}

fn validate_coordinate(
    value: &str,
    bound: i64,
    code: &'static str,
    message: &'static str,
) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new(code).with_message(Cow::Borrowed(message));

    let parsed = Decimal::from_str(value.trim()).map_err(|_| invalid())?;
    let bound = Decimal::from(bound);
    if parsed < -bound || parsed > bound {
        return Err(invalid());
    }
    Ok(())
}

/// Flatten `ValidationErrors` into `field: message` strings, nested fields dotted.
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect_messages(errors, "", &mut out);
    out.sort();
    out
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(format!("{}: {}", path, message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_messages(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
