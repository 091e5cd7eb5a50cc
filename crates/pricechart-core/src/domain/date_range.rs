use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;

use crate::RangeError;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(input: &str) -> Result<Date, RangeError> {
    Date::parse(input.trim(), ISO_DATE).map_err(|_| RangeError::InvalidDate {
        value: input.to_owned(),
    })
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_iso_date(date: Date) -> String {
    // Four-digit years always fit the description; the fallback covers extended years.
    date.format(ISO_DATE)
        .unwrap_or_else(|_| format!("{}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}

/// Inclusive calendar range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    #[serde(with = "iso_date")]
    start: Date,
    #[serde(with = "iso_date")]
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::StartAfterEnd {
                start: format_iso_date(start),
                end: format_iso_date(end),
            });
        }
        Ok(Self { start, end })
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}..={}",
            format_iso_date(self.start),
            format_iso_date(self.end)
        )
    }
}

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(with = "iso_date")]
    start: Date,
    #[serde(with = "iso_date")]
    end: Date,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RangeError;

    fn try_from(value: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn rejects_inverted_range() {
        let err = DateRange::new(date!(2024 - 03 - 10), date!(2024 - 03 - 01)).expect_err("must fail");
        assert_eq!(
            err,
            RangeError::StartAfterEnd {
                start: String::from("2024-03-10"),
                end: String::from("2024-03-01"),
            }
        );
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::new(date!(2024 - 01 - 02), date!(2024 - 01 - 02)).expect("valid");
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_iso_date("2024-02-29"), Ok(date!(2024 - 02 - 29)));
        assert!(matches!(
            parse_iso_date("2023-02-29"),
            Err(RangeError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_iso_date("03/01/2024"),
            Err(RangeError::InvalidDate { .. })
        ));
    }

    #[test]
    fn deserialization_enforces_ordering() {
        let ok: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-31"}"#).expect("valid");
        assert_eq!(ok.to_string(), "2024-01-01..=2024-01-31");

        let inverted = serde_json::from_str::<DateRange>(r#"{"start":"2024-02-01","end":"2024-01-31"}"#);
        assert!(inverted.is_err());
    }
}
