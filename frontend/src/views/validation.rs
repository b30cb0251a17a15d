use chrono::NaiveDate;
use thiserror::Error;

use crate::services::date_utils::parse_date_string;

/// Form input rejected before anything is sent to the server
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be at least {min}")]
    TooSmall { field: &'static str, min: String },

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: String },

    #[error("{field} must be a date in YYYY-MM-DD format, got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date must not be after end date")]
    DateRangeReversed,

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: value.to_string(),
    })
}

/// Blank means "no filter"
pub fn optional_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, ValidationError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date_string(value)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("Name", "  Ada "), Ok("Ada".to_string()));
        assert_eq!(required("Name", "   "), Err(ValidationError::Required("Name")));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>("Priority", " 3 "), Ok(3));
        assert!(matches!(
            parse_number::<u32>("Priority", "three"),
            Err(ValidationError::NotANumber { field: "Priority", .. })
        ));
        assert_eq!(
            parse_number::<f64>("Amount", ""),
            Err(ValidationError::Required("Amount"))
        );
    }

    #[test]
    fn test_optional_date() {
        assert_eq!(optional_date("Start date", ""), Ok(None));
        assert_eq!(
            optional_date("Start date", "2025-01-31"),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 31))
        );
        assert!(optional_date("Start date", "31/01/2025").is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::TooSmall { field: "Amount", min: "0.01".to_string() }.to_string(),
            "Amount must be at least 0.01"
        );
        assert_eq!(
            ValidationError::UnsupportedCurrency("XYZ".to_string()).to_string(),
            "Unsupported currency: XYZ"
        );
    }
}
