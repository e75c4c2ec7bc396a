use crate::utils::error::{CalcError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Rejects negative and non-finite numbers. Zero is accepted: it means
/// "not filled in yet" and is handled by the readiness check.
pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_value(
            field_name,
            value,
            "Value must be a finite number",
        ));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_value(
            field_name,
            value,
            "Value cannot be negative",
        ));
    }
    Ok(())
}

pub fn validate_optional_non_negative(field_name: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) => validate_non_negative(field_name, v),
        None => Ok(()),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CalcError::invalid_value(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(CalcError::invalid_value(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CalcError::invalid_value(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CalcError::invalid_value(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("params", 7.0).is_ok());
        assert!(validate_non_negative("params", 0.0).is_ok());
        assert!(validate_non_negative("params", -1.0).is_err());
        assert!(validate_non_negative("params", f64::NAN).is_err());
        assert!(validate_non_negative("params", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("zoom", 1.0, 0.5, 10.0).is_ok());
        assert!(validate_range("zoom", 0.25, 0.5, 10.0).is_err());
        assert!(validate_range("zoom", 11.0, 0.5, 10.0).is_err());
    }

    #[test]
    fn test_validate_path_and_string() {
        assert!(validate_path("output_path", "./out").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_non_empty_string("name", "  ").is_err());
    }
}
