//! Resolves IANA timezone names so dates can be bucketed in local time.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|timezone| timezone.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get today's date in the timezone `canonical_timezone` (e.g. "Europe/Madrid").
///
/// # Errors
/// Returns an error if `canonical_timezone` is not a valid IANA timezone name.
pub fn current_local_date(canonical_timezone: &str) -> Result<Date, Error> {
    let local_offset = get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })?;

    Ok(OffsetDateTime::now_utc().to_offset(local_offset).date())
}

#[cfg(test)]
mod timezone_tests {
    use crate::Error;

    use super::{current_local_date, get_local_offset};

    #[test]
    fn valid_timezone_returns_offset() {
        assert!(get_local_offset("Europe/Madrid").is_some());
        assert!(get_local_offset("UTC").is_some());
    }

    #[test]
    fn invalid_timezone_returns_none() {
        assert!(get_local_offset("Narnia/Lantern_Waste").is_none());
    }

    #[test]
    fn invalid_timezone_returns_error() {
        let result = current_local_date("Narnia/Lantern_Waste");

        assert_eq!(
            result,
            Err(Error::InvalidTimezoneError(
                "Narnia/Lantern_Waste".to_owned()
            ))
        );
    }
}
