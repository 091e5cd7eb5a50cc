use std::fmt::{Display, Formatter};

use serde::de::{Error as DeError, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use super::date_range::{format_iso_date, parse_iso_date};
use crate::ValidationError;

const NAIVE_T: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
const NAIVE_SPACE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]");

/// Instant a backend observation refers to, normalized to UTC.
///
/// Backends report either a bare trading date or a full timestamp. The
/// original form is remembered so a date comes back out as a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationTime {
    at: OffsetDateTime,
    date_only: bool,
}

impl ObservationTime {
    pub fn from_date(date: Date) -> Self {
        Self {
            at: PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc(),
            date_only: true,
        }
    }

    pub fn from_datetime(value: OffsetDateTime) -> Self {
        Self {
            at: value.to_offset(UtcOffset::UTC),
            date_only: false,
        }
    }

    pub fn from_unix_millis(millis: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map(Self::from_datetime)
            .map_err(|_| ValidationError::InvalidObservationTime {
                value: millis.to_string(),
            })
    }

    /// Accepts `YYYY-MM-DD`, RFC3339, or a naive ISO date-time read as UTC.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if let Ok(date) = parse_iso_date(trimmed) {
            return Ok(Self::from_date(date));
        }
        if let Ok(value) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self::from_datetime(value));
        }
        for format in [NAIVE_T, NAIVE_SPACE] {
            if let Ok(value) = PrimitiveDateTime::parse(trimmed, format) {
                return Ok(Self::from_datetime(value.assume_utc()));
            }
        }

        Err(ValidationError::InvalidObservationTime {
            value: input.to_owned(),
        })
    }

    pub const fn as_datetime(&self) -> OffsetDateTime {
        self.at
    }

    pub const fn is_date_only(&self) -> bool {
        self.date_only
    }

    pub fn unix_millis(&self) -> i64 {
        (self.at.unix_timestamp_nanos() / 1_000_000) as i64
    }
}

impl Display for ObservationTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.date_only {
            return f.write_str(&format_iso_date(self.at.date()));
        }
        match self.at.format(&Rfc3339) {
            Ok(formatted) => f.write_str(&formatted),
            Err(_) => write!(f, "{}", self.unix_millis()),
        }
    }
}

impl Serialize for ObservationTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObservationTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ObservationTimeVisitor)
    }
}

struct ObservationTimeVisitor;

impl<'de> Visitor<'de> for ObservationTimeVisitor {
    type Value = ObservationTime;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("an ISO date, RFC3339 timestamp or epoch milliseconds")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        ObservationTime::parse(value).map_err(E::custom)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        ObservationTime::from_unix_millis(value).map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        let millis = i64::try_from(value)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))?;
        self.visit_i64(millis)
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(E::invalid_value(Unexpected::Float(value), &self));
        }
        self.visit_i64(value as i64)
    }
}
