//! Input validation utilities

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format: {}", date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_email() {
        assert!(validate_email("alice@company.com").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(validate_email("").is_err());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("alice@nodot").is_err());
    }

    #[test]
    fn enforces_password_length() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date("2024-01-10"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
        assert!(parse_date("10/01/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("tomorrow").is_err());
    }
}
