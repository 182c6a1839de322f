use crate::utils::error::{KantineError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(KantineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(KantineError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(KantineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u32, min_value: u32) -> Result<()> {
    if value < min_value {
        return Err(KantineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KantineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// A weekday list must name Monday..Friday: five distinct, non-empty names.
pub fn validate_weekdays(field_name: &str, names: &[String]) -> Result<()> {
    if names.len() != 5 {
        return Err(KantineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: names.join(", "),
            reason: format!("Expected 5 weekday names, got {}", names.len()),
        });
    }

    let mut seen = HashSet::new();
    for name in names {
        validate_non_empty_string(field_name, name)?;
        if !seen.insert(name.to_lowercase()) {
            return Err(KantineError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.clone(),
                reason: "Duplicate weekday name".to_string(),
            });
        }
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
        return Err(KantineError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("kua.url", "https://example.com").is_ok());
        assert!(validate_url("kua.url", "http://example.com").is_ok());
        assert!(validate_url("kua.url", "").is_err());
        assert!(validate_url("kua.url", "invalid-url").is_err());
        assert!(validate_url("kua.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("itu.coordinates.width", 5, 1).is_ok());
        assert!(validate_positive_number("itu.coordinates.width", 0, 1).is_err());
    }

    #[test]
    fn test_validate_weekdays() {
        let ok = names(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);
        assert!(validate_weekdays("itu.weekdays", &ok).is_ok());

        let short = names(&["Monday", "Tuesday"]);
        assert!(validate_weekdays("itu.weekdays", &short).is_err());

        let duplicate = names(&["Monday", "monday", "Wednesday", "Thursday", "Friday"]);
        assert!(validate_weekdays("itu.weekdays", &duplicate).is_err());

        let blank = names(&["Monday", " ", "Wednesday", "Thursday", "Friday"]);
        assert!(validate_weekdays("itu.weekdays", &blank).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("query.day", 2, 0, 4).is_ok());
        assert!(validate_range("query.day", 5, 0, 4).is_err());
    }
}
