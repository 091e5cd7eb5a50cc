//! # Domain Models
//!
//! Validated value types shared by the resolver, the gateway and the
//! normalizer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TickerSymbol`] | Trimmed, uppercased instrument ticker |
//! | [`PeriodCode`] | Selectable chart window (`1D` .. `CUSTOM`) |
//! | [`DateRange`] | Inclusive calendar range with `start <= end` |
//! | [`ObservationTime`] | UTC instant of one backend observation |
//!
//! All constructors validate their invariants, so a value that exists is a
//! value that can be sent to the backend.

mod date_range;
mod observation;
mod period;
mod ticker;

pub use date_range::{format_iso_date, parse_iso_date, DateRange};
pub use observation::ObservationTime;
pub use period::PeriodCode;
pub use ticker::TickerSymbol;
