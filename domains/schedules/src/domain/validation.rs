//! Validation helpers for schedule requests

use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    /// IANA-style zone names: `UTC`, `Europe/London`, `America/Argentina/Buenos_Aires`, `Etc/GMT+5`
    pub static ref TIME_ZONE_REGEX: Regex =
        Regex::new(r"^(UTC|GMT|[A-Z][A-Za-z_]+(/[A-Za-z0-9_+\-]+){1,2})$").unwrap();
}

/// Top-level areas of the IANA tz database
const TIME_ZONE_AREAS: &[&str] = &[
    "Africa",
    "America",
    "Antarctica",
    "Arctic",
    "Asia",
    "Atlantic",
    "Australia",
    "Etc",
    "Europe",
    "Indian",
    "Pacific",
];

/// Check a time zone name
///
/// The area must be a real tz database area. The location is only checked
/// for shape, so `Europe/Atlantis` is accepted while `Mars/Olympus` is not.
pub fn is_valid_time_zone(time_zone: &str) -> bool {
    if !TIME_ZONE_REGEX.is_match(time_zone) {
        return false;
    }
    match time_zone.split_once('/') {
        Some((area, _)) => TIME_ZONE_AREAS.contains(&area),
        None => true,
    }
}

/// `validator` hook for time zone fields
pub fn validate_time_zone(time_zone: &str) -> Result<(), ValidationError> {
    if is_valid_time_zone(time_zone) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_time_zone"))
    }
}
