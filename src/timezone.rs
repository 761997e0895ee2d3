use time::OffsetDateTime;
use time_tz::{OffsetDateTimeExt, Tz, timezones};

/// Look up a timezone by its canonical name, e.g. "Asia/Jakarta".
pub fn get_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    timezones::get_by_name(canonical_timezone)
}

/// The current date and time in `timezone`.
pub fn local_now(timezone: &Tz) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_timezone(timezone)
}
