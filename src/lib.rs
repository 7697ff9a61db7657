//! The `chronology_rs` crate implements calendar-aware date and time
//! resolution in Rust.
//!
//! ```rust
//! use chronology_rs::{Chronology, DateTimeBuilder, fields::ChronoField, options::ResolverStyle};
//!
//! // Resolve 2024-02-29 from a field bag against the ISO calendar.
//! let mut builder = DateTimeBuilder::new(Chronology::Iso).with_style(ResolverStyle::Strict);
//! builder.add_field(ChronoField::Year, 2024).unwrap();
//! builder.add_field(ChronoField::MonthOfYear, 2).unwrap();
//! builder.add_field(ChronoField::DayOfMonth, 29).unwrap();
//! let resolved = builder.resolve().unwrap();
//! let date = resolved.date.unwrap();
//! assert_eq!(date.to_epoch_days(), 19_782);
//!
//! // The same point on the timeline reads through other calendar systems.
//! let thai = Chronology::ThaiBuddhist.date_from_epoch_days(19_782).unwrap();
//! assert_eq!(thai.get(ChronoField::Year).unwrap(), 2567);
//! ```
//!
//! A *chronology* is a calendar system: it decides how a point on the
//! shared epoch-day timeline splits into era, year, month and day, and
//! how a bag of parsed field values combines back into a date. Five
//! chronologies are provided: proleptic ISO, Japanese (bounded eras),
//! Hijrah (umalqura arithmetic with deviation support), Minguo, and
//! Thai Buddhist.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::option_if_let_else,

    // It may be worth to look if we can fix the issues highlighted by these lints.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
)]

extern crate alloc;
extern crate core;

#[cfg(feature = "std")]
extern crate std;

pub mod builder;
pub mod chronology;
pub mod error;
pub mod fields;
pub mod iso;
pub mod options;

pub(crate) mod resolver;
#[doc(hidden)]
pub(crate) mod utils;

/// Re-export of `TinyAsciiStr` from `tinystr`.
pub use tinystr::TinyAsciiStr;

#[doc(inline)]
pub use error::ChronoError;

/// The `chronology_rs` result type
pub type ChronoResult<T> = Result<T, ChronoError>;

pub use crate::{
    builder::{DateTimeBuilder, FieldResolver, Resolved, UtcOffset},
    chronology::{ChronoDate, Chronology, Era},
    fields::{ChronoField, FieldMap, ValueRange},
    iso::{IsoDate, IsoTime},
    options::ResolverStyle,
};

/// A library specific trait for unwrapping assertions.
pub(crate) trait ChronoUnwrap {
    type Output;

    /// Assertion-style unwrapping. Panics in debug builds, errors at
    /// runtime.
    fn chrono_unwrap(self) -> ChronoResult<Self::Output>;
}

impl<T> ChronoUnwrap for Option<T> {
    type Output = T;

    fn chrono_unwrap(self) -> ChronoResult<Self::Output> {
        debug_assert!(self.is_some());
        self.ok_or(ChronoError::assert())
    }
}

// Relevant numeric constants
/// Nanoseconds per day constant: 8.64e+13
pub const NS_PER_DAY: i64 = SECS_PER_DAY * 1_000_000_000;
/// Seconds per day constant: 86,400
pub const SECS_PER_DAY: i64 = 24 * 60 * 60;
