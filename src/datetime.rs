//! Calendar timestamps and dates, carried on the wire as ZigZag-varint epoch
//! offsets (§3, §4.3 tags 6 and 22).

use time::{Date as TimeDate, OffsetDateTime};

use crate::error::Result;
use crate::varint::{decode_zigzag_varint, encode_zigzag_varint};

const MILLIS_PER_SEC: i64 = 1_000;

/// A calendar timestamp with millisecond precision (wire tag 6).
///
/// Stored internally as a signed Unix-epoch millisecond count, which is the
/// only representation the wire format actually carries; conversions to and
/// from [`OffsetDateTime`] are provided for callers that want a calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    epoch_millis: i64,
}

impl DateTime {
    /// Builds a `DateTime` from a signed Unix-epoch millisecond count.
    pub fn from_epoch_millis(epoch_millis: i64) -> Self {
        DateTime { epoch_millis }
    }

    /// The signed Unix-epoch millisecond count.
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// Converts from a calendar timestamp.
    pub fn from_offset_date_time(dt: OffsetDateTime) -> Self {
        let seconds = dt.unix_timestamp();
        let millis_part = dt.millisecond() as i64;
        DateTime {
            epoch_millis: seconds * MILLIS_PER_SEC + millis_part,
        }
    }

    /// Converts to a calendar timestamp in UTC.
    ///
    /// # Panics
    ///
    /// Panics if the stored millisecond count falls outside the calendar
    /// range `time` can represent (roughly +/-262,000 years from the epoch).
    pub fn to_offset_date_time(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp_nanos(self.epoch_millis as i128 * 1_000_000)
            .expect("epoch millisecond count fits in the supported calendar range")
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        encode_zigzag_varint(self.epoch_millis, out);
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<(DateTime, &[u8])> {
        let (millis, rest) = decode_zigzag_varint(bytes)?;
        Ok((DateTime::from_epoch_millis(millis), rest))
    }
}

/// A calendar date with no time-of-day component (wire tag 22).
///
/// Distinct from [`DateTime`] at the type and wire-tag level even though some
/// revisions of the system this format originates from conflate the two; see
/// the open-question resolution in the design notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    epoch_days: i64,
}

impl Date {
    /// Builds a `Date` from a signed Unix-epoch day count.
    pub fn from_epoch_days(epoch_days: i64) -> Self {
        Date { epoch_days }
    }

    /// The signed Unix-epoch day count.
    pub fn epoch_days(&self) -> i64 {
        self.epoch_days
    }

    /// Converts from a calendar date.
    pub fn from_time_date(date: TimeDate) -> Self {
        const UNIX_EPOCH_JULIAN: i64 = 2_440_588;
        Date {
            epoch_days: date.to_julian_day() as i64 - UNIX_EPOCH_JULIAN,
        }
    }

    /// Converts to a calendar date, assuming the proleptic Gregorian calendar.
    pub fn to_time_date(&self) -> TimeDate {
        const UNIX_EPOCH_JULIAN: i64 = 2_440_588;
        TimeDate::from_julian_day((self.epoch_days + UNIX_EPOCH_JULIAN) as i32)
            .expect("epoch day count fits in the supported calendar range")
    }

    pub(crate) fn encode(&self, out: &mut Vec<u8>) {
        encode_zigzag_varint(self.epoch_days, out);
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<(Date, &[u8])> {
        let (days, rest) = decode_zigzag_varint(bytes)?;
        Ok((Date::from_epoch_days(days), rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn datetime_round_trip() {
        for millis in [0i64, 1, -1, 1_700_000_000_123, -1_700_000_000_123] {
            let dt = DateTime::from_epoch_millis(millis);
            let mut buf = Vec::new();
            dt.encode(&mut buf);
            let (decoded, rest) = DateTime::decode(&buf).unwrap();
            assert_eq!(decoded, dt);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn datetime_from_calendar_round_trips_millis() {
        let cal = datetime!(2023-11-14 22:13:20 UTC);
        let dt = DateTime::from_offset_date_time(cal);
        assert_eq!(dt.epoch_millis(), cal.unix_timestamp() * 1000);
        assert_eq!(dt.to_offset_date_time(), cal);
    }

    #[test]
    fn date_round_trip() {
        for days in [0i64, 1, -1, 19_675, -19_675] {
            let d = Date::from_epoch_days(days);
            let mut buf = Vec::new();
            d.encode(&mut buf);
            let (decoded, rest) = Date::decode(&buf).unwrap();
            assert_eq!(decoded, d);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn date_from_calendar_round_trips_days() {
        let cal = time::macros::date!(2023 - 11 - 14);
        let d = Date::from_time_date(cal);
        assert_eq!(d.to_time_date(), cal);
    }
}
