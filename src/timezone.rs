use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::transaction::Transaction;

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Format the creation time of `transaction` in the `local_offset` timezone,
/// e.g. "2023-11-14 22:13:20".
///
/// Timestamps outside the range [OffsetDateTime] supports are shown as raw
/// milliseconds.
pub fn format_timestamp(transaction: &Transaction, local_offset: UtcOffset) -> String {
    match timestamp_to_date_time(transaction.timestamp) {
        Some(date_time) => {
            let local = date_time.to_offset(local_offset);
            format!(
                "{} {:02}:{:02}:{:02}",
                local.date(),
                local.hour(),
                local.minute(),
                local.second()
            )
        }
        None => format!("{} ms", transaction.timestamp),
    }
}

/// Convert milliseconds since the Unix epoch to a UTC date time.
///
/// Returns `None` if `timestamp` is outside the range [OffsetDateTime] supports.
pub fn timestamp_to_date_time(timestamp: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp) * 1_000_000).ok()
}
