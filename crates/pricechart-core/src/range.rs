//! Period code to concrete date range resolution.
//!
//! Resolution is pure: given the same "today" and inputs it always produces
//! the same range. [`resolve`] reads today from the UTC clock, [`resolve_at`]
//! takes it explicitly.

use time::{Date, Duration, Month, OffsetDateTime};

use crate::{DateRange, PeriodCode, RangeError};

/// Resolve `period` relative to today's UTC date.
pub fn resolve(
    period: PeriodCode,
    explicit_start: Option<Date>,
    explicit_end: Option<Date>,
) -> Result<DateRange, RangeError> {
    resolve_at(
        OffsetDateTime::now_utc().date(),
        period,
        explicit_start,
        explicit_end,
    )
}

/// Resolve `period` relative to `today`.
///
/// Explicit dates are only read for [`PeriodCode::Custom`].
pub fn resolve_at(
    today: Date,
    period: PeriodCode,
    explicit_start: Option<Date>,
    explicit_end: Option<Date>,
) -> Result<DateRange, RangeError> {
    let start = match period {
        PeriodCode::OneDay => sub_days(today, 1)?,
        PeriodCode::OneWeek => sub_days(today, 7)?,
        PeriodCode::OneMonth => sub_months(today, 1)?,
        PeriodCode::ThreeMonths => sub_months(today, 3)?,
        PeriodCode::OneYear => sub_months(today, 12)?,
        PeriodCode::YearToDate => Date::from_calendar_date(today.year(), Month::January, 1)
            .map_err(|_| RangeError::OutOfCalendar)?,
        PeriodCode::MonthToDate => today.replace_day(1).map_err(|_| RangeError::OutOfCalendar)?,
        PeriodCode::Custom => {
            let start = explicit_start.ok_or(RangeError::MissingStart)?;
            let end = explicit_end.ok_or(RangeError::MissingEnd)?;
            return DateRange::new(start, end);
        }
    };

    DateRange::new(start, today)
}

fn sub_days(date: Date, days: i64) -> Result<Date, RangeError> {
    date.checked_sub(Duration::days(days))
        .ok_or(RangeError::OutOfCalendar)
}

/// Step back whole months, clamping the day to the target month's length.
fn sub_months(date: Date, months: u32) -> Result<Date, RangeError> {
    let total = date.year() * 12 + i32::from(u8::from(date.month())) - 1 - months as i32;
    let year = total.div_euclid(12);
    let month_number = (total.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).map_err(|_| RangeError::OutOfCalendar)?;
    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .ok_or(RangeError::OutOfCalendar)
}
