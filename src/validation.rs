use chrono::NaiveDate;

use crate::error::ApiError;

pub fn parse_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("date must be formatted as YYYY-MM-DD".into()))
}

pub fn validate_studio_id(value: &str) -> Result<&str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::BadRequest("studio must not be empty".into()))
    } else {
        Ok(trimmed)
    }
}
