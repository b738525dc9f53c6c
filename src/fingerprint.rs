//! Stable event identity.
//!
//! Two reports of the same quake collapse to one record when they agree on
//! magnitude, location and year-month. Day of month is not part of the
//! identity, so follow-up coverage dated later in the month still matches.

use thiserror::Error;

/// Length of `YYYY-MM`.
const YEAR_MONTH_LEN: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("date '{0}' is too short to contain a year and month")]
    DateTooShort(String),
}

/// Derive the record id for an event.
///
/// The id is the MD5 of `"{magnitude}-{location}-{YYYY-MM}"`, hex encoded
/// (32 lowercase characters). `date` is expected in `YYYY-MM-DD` form; callers
/// validate it before fingerprinting.
pub fn fingerprint(magnitude: f64, location: &str, date: &str) -> Result<String, FingerprintError> {
    let year_month = date
        .char_indices()
        .nth(YEAR_MONTH_LEN)
        .map(|(idx, _)| &date[..idx])
        .unwrap_or(date);
    if year_month.chars().count() < YEAR_MONTH_LEN {
        return Err(FingerprintError::DateTooShort(date.to_string()));
    }

    let canonical = format!("{}-{}-{}", magnitude, location, year_month);
    Ok(format!("{:x}", md5::compute(canonical.as_bytes())))
}
