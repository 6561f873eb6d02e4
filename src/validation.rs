//! Boundary validation helpers. Each helper validates one field,
//! recording at most one message per field into a shared map that is
//! surfaced as a 422 with `field_errors`.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;

use crate::error::ApiError;

pub type FieldErrors = HashMap<String, String>;

/// First error per field wins
pub fn add_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_insert_with(|| message.into());
}

/// Convert accumulated errors into the 422 response, or pass
pub fn bail(errors: FieldErrors) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("The given data was invalid", errors))
    }
}

/// required|string|max:N
pub fn required_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => {
            if v.chars().count() > max {
                add_error(
                    errors,
                    field,
                    format!("The {field} may not be greater than {max} characters"),
                );
                None
            } else {
                Some(v.to_string())
            }
        }
        _ => {
            add_error(errors, field, format!("The {field} field is required"));
            None
        }
    }
}

/// sometimes|required|string|max:N — absent is fine, present must be valid
pub fn sometimes_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    value?;
    required_string(errors, field, value, max)
}

/// nullable|string|max:N
pub fn optional_string(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let v = value.map(str::trim)?;
    if v.is_empty() {
        return None;
    }
    if v.chars().count() > max {
        add_error(
            errors,
            field,
            format!("The {field} may not be greater than {max} characters"),
        );
        return None;
    }
    Some(v.to_string())
}

/// required|date (YYYY-MM-DD)
pub fn required_date(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        add_error(errors, field, format!("The {field} field is required"));
        return None;
    };
    match NaiveDate::parse_from_str(v, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            add_error(errors, field, format!("The {field} is not a valid date"));
            None
        }
    }
}

/// required|date_format:H:i
pub fn required_time(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<NaiveTime> {
    let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        add_error(errors, field, format!("The {field} field is required"));
        return None;
    };
    match NaiveTime::parse_from_str(v, "%H:%M") {
        Ok(time) => Some(time),
        Err(_) => {
            add_error(errors, field, format!("The {field} does not match the format HH:MM"));
            None
        }
    }
}

/// required|email|max:N
pub fn required_email(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let v = required_string(errors, field, value, max)?;
    if !looks_like_email(&v) {
        add_error(errors, field, format!("The {field} must be a valid email address"));
        return None;
    }
    Some(v)
}

/// nullable|url|max:N
pub fn optional_url(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let v = optional_string(errors, field, value, max)?;
    match url::Url::parse(&v) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(v),
        _ => {
            add_error(errors, field, format!("The {field} format is invalid"));
            None
        }
    }
}

/// nullable|integer|min:0
pub fn optional_position(errors: &mut FieldErrors, field: &str, value: Option<i32>) -> Option<i32> {
    match value {
        Some(v) if v < 0 => {
            add_error(errors, field, format!("The {field} must be at least 0"));
            None
        }
        other => other,
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !value.contains(char::is_whitespace)
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
