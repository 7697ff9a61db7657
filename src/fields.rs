//! Temporal fields, their valid ranges, and the field-value bag used
//! during resolution.

use core::{fmt, str::FromStr};

use crate::{ChronoError, ChronoResult};

/// The year bound shared by every chronology's underlying ISO date.
pub(crate) const MAX_YEAR: i64 = 999_999_999;
/// Epoch-day value of `-999999999-01-01`.
pub(crate) const MIN_EPOCH_DAY: i64 = -365_243_219_162;
/// Epoch-day value of `+999999999-12-31`.
pub(crate) const MAX_EPOCH_DAY: i64 = 365_241_780_471;

const FIELD_COUNT: usize = 30;

/// A parsing error for [`ChronoField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseChronoFieldError;

impl fmt::Display for ParseChronoFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid ChronoField")
    }
}

/// A standard field of a date, time, or instant.
///
/// Declaration order runs from the smallest time unit up through the
/// date fields to the era; the bag iterates fields in this order.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChronoField {
    NanoOfSecond,
    NanoOfDay,
    MicroOfSecond,
    MicroOfDay,
    MilliOfSecond,
    MilliOfDay,
    SecondOfMinute,
    SecondOfDay,
    MinuteOfHour,
    MinuteOfDay,
    HourOfAmpm,
    ClockHourOfAmpm,
    HourOfDay,
    ClockHourOfDay,
    AmpmOfDay,
    DayOfWeek,
    AlignedDayOfWeekInMonth,
    AlignedDayOfWeekInYear,
    DayOfMonth,
    DayOfYear,
    EpochDay,
    AlignedWeekOfMonth,
    AlignedWeekOfYear,
    MonthOfYear,
    ProlepticMonth,
    YearOfEra,
    Year,
    Era,
    InstantSeconds,
    OffsetSeconds,
}

impl ChronoField {
    /// Every field, in declaration order.
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::NanoOfSecond,
        Self::NanoOfDay,
        Self::MicroOfSecond,
        Self::MicroOfDay,
        Self::MilliOfSecond,
        Self::MilliOfDay,
        Self::SecondOfMinute,
        Self::SecondOfDay,
        Self::MinuteOfHour,
        Self::MinuteOfDay,
        Self::HourOfAmpm,
        Self::ClockHourOfAmpm,
        Self::HourOfDay,
        Self::ClockHourOfDay,
        Self::AmpmOfDay,
        Self::DayOfWeek,
        Self::AlignedDayOfWeekInMonth,
        Self::AlignedDayOfWeekInYear,
        Self::DayOfMonth,
        Self::DayOfYear,
        Self::EpochDay,
        Self::AlignedWeekOfMonth,
        Self::AlignedWeekOfYear,
        Self::MonthOfYear,
        Self::ProlepticMonth,
        Self::YearOfEra,
        Self::Year,
        Self::Era,
        Self::InstantSeconds,
        Self::OffsetSeconds,
    ];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Returns whether this field is a component of a date.
    #[inline]
    #[must_use]
    pub const fn is_date_based(self) -> bool {
        matches!(
            self,
            Self::DayOfWeek
                | Self::AlignedDayOfWeekInMonth
                | Self::AlignedDayOfWeekInYear
                | Self::DayOfMonth
                | Self::DayOfYear
                | Self::EpochDay
                | Self::AlignedWeekOfMonth
                | Self::AlignedWeekOfYear
                | Self::MonthOfYear
                | Self::ProlepticMonth
                | Self::YearOfEra
                | Self::Year
                | Self::Era
        )
    }

    /// Returns whether this field is a component of a time of day.
    #[inline]
    #[must_use]
    pub const fn is_time_based(self) -> bool {
        (self as u8) <= (Self::AmpmOfDay as u8)
    }

    /// The range of valid values for this field, independent of any
    /// calendar system.
    #[must_use]
    pub const fn range(self) -> ValueRange {
        match self {
            Self::NanoOfSecond => ValueRange::of(0, 999_999_999),
            Self::NanoOfDay => ValueRange::of(0, 86_400 * 1_000_000_000 - 1),
            Self::MicroOfSecond => ValueRange::of(0, 999_999),
            Self::MicroOfDay => ValueRange::of(0, 86_400 * 1_000_000 - 1),
            Self::MilliOfSecond => ValueRange::of(0, 999),
            Self::MilliOfDay => ValueRange::of(0, 86_400 * 1_000 - 1),
            Self::SecondOfMinute | Self::MinuteOfHour => ValueRange::of(0, 59),
            Self::SecondOfDay => ValueRange::of(0, 86_399),
            Self::MinuteOfDay => ValueRange::of(0, 1_439),
            Self::HourOfAmpm => ValueRange::of(0, 11),
            Self::ClockHourOfAmpm => ValueRange::of(1, 12),
            Self::HourOfDay => ValueRange::of(0, 23),
            Self::ClockHourOfDay => ValueRange::of(1, 24),
            Self::AmpmOfDay => ValueRange::of(0, 1),
            Self::DayOfWeek
            | Self::AlignedDayOfWeekInMonth
            | Self::AlignedDayOfWeekInYear => ValueRange::of(1, 7),
            Self::DayOfMonth => ValueRange::of_varied(1, 28, 31),
            Self::DayOfYear => ValueRange::of_varied(1, 365, 366),
            Self::EpochDay => ValueRange::of(MIN_EPOCH_DAY, MAX_EPOCH_DAY),
            Self::AlignedWeekOfMonth => ValueRange::of_varied(1, 4, 5),
            Self::AlignedWeekOfYear => ValueRange::of(1, 53),
            Self::MonthOfYear => ValueRange::of(1, 12),
            Self::ProlepticMonth => ValueRange::of(-MAX_YEAR * 12, MAX_YEAR * 12 + 11),
            Self::YearOfEra => ValueRange::of_varied(1, MAX_YEAR, MAX_YEAR + 1),
            Self::Year => ValueRange::of(-MAX_YEAR, MAX_YEAR),
            Self::Era => ValueRange::of(0, 1),
            Self::InstantSeconds => ValueRange::of(i64::MIN, i64::MAX),
            Self::OffsetSeconds => ValueRange::of(-18 * 3_600, 18 * 3_600),
        }
    }

    /// Validates `value` against this field's calendar-independent
    /// range.
    #[inline]
    pub fn check_valid_value(self, value: i64) -> ChronoResult<i64> {
        self.range().check_valid_value(value, self)
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::NanoOfSecond => "nano-of-second",
            Self::NanoOfDay => "nano-of-day",
            Self::MicroOfSecond => "micro-of-second",
            Self::MicroOfDay => "micro-of-day",
            Self::MilliOfSecond => "milli-of-second",
            Self::MilliOfDay => "milli-of-day",
            Self::SecondOfMinute => "second-of-minute",
            Self::SecondOfDay => "second-of-day",
            Self::MinuteOfHour => "minute-of-hour",
            Self::MinuteOfDay => "minute-of-day",
            Self::HourOfAmpm => "hour-of-ampm",
            Self::ClockHourOfAmpm => "clock-hour-of-ampm",
            Self::HourOfDay => "hour-of-day",
            Self::ClockHourOfDay => "clock-hour-of-day",
            Self::AmpmOfDay => "ampm-of-day",
            Self::DayOfWeek => "day-of-week",
            Self::AlignedDayOfWeekInMonth => "aligned-day-of-week-in-month",
            Self::AlignedDayOfWeekInYear => "aligned-day-of-week-in-year",
            Self::DayOfMonth => "day-of-month",
            Self::DayOfYear => "day-of-year",
            Self::EpochDay => "epoch-day",
            Self::AlignedWeekOfMonth => "aligned-week-of-month",
            Self::AlignedWeekOfYear => "aligned-week-of-year",
            Self::MonthOfYear => "month-of-year",
            Self::ProlepticMonth => "proleptic-month",
            Self::YearOfEra => "year-of-era",
            Self::Year => "year",
            Self::Era => "era",
            Self::InstantSeconds => "instant-seconds",
            Self::OffsetSeconds => "offset-seconds",
        }
    }
}

impl FromStr for ChronoField {
    type Err = ParseChronoFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for field in Self::ALL {
            if field.name() == s {
                return Ok(field);
            }
        }
        Err(ParseChronoFieldError)
    }
}

impl fmt::Display for ChronoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ==== ValueRange ====

/// The range of valid values for a field.
///
/// Both ends of the range may vary by date: February's day-of-month
/// maximum is smaller than July's. `max_smallest` is the largest value
/// guaranteed valid everywhere; `max_largest` the largest value valid
/// anywhere. The `min` pair mirrors this for the lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    min_smallest: i64,
    min_largest: i64,
    max_smallest: i64,
    max_largest: i64,
}

impl ValueRange {
    /// A fixed range.
    #[inline]
    #[must_use]
    pub const fn of(min: i64, max: i64) -> Self {
        Self {
            min_smallest: min,
            min_largest: min,
            max_smallest: max,
            max_largest: max,
        }
    }

    /// A range with a fixed minimum and a varying maximum.
    #[inline]
    #[must_use]
    pub const fn of_varied(min: i64, max_smallest: i64, max_largest: i64) -> Self {
        Self {
            min_smallest: min,
            min_largest: min,
            max_smallest,
            max_largest,
        }
    }

    /// A range where both ends vary.
    #[inline]
    #[must_use]
    pub const fn of_fully_varied(
        min_smallest: i64,
        min_largest: i64,
        max_smallest: i64,
        max_largest: i64,
    ) -> Self {
        Self {
            min_smallest,
            min_largest,
            max_smallest,
            max_largest,
        }
    }

    /// The smallest valid value anywhere in the field's domain.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> i64 {
        self.min_smallest
    }

    /// The largest minimum this range ever takes.
    #[inline]
    #[must_use]
    pub const fn largest_min(&self) -> i64 {
        self.min_largest
    }

    /// The smallest maximum this range ever takes.
    #[inline]
    #[must_use]
    pub const fn smallest_max(&self) -> i64 {
        self.max_smallest
    }

    /// The largest valid value anywhere in the field's domain.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> i64 {
        self.max_largest
    }

    /// Whether `value` falls within the outer bounds of this range.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self, value: i64) -> bool {
        self.min_smallest <= value && value <= self.max_largest
    }

    /// Whether every value of this range fits in an `i32`.
    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        self.min_smallest >= i32::MIN as i64 && self.max_largest <= i32::MAX as i64
    }

    /// Validates `value` against this range.
    pub fn check_valid_value(&self, value: i64, field: ChronoField) -> ChronoResult<i64> {
        if !self.is_valid(value) {
            return Err(ChronoError::range().with_message(alloc::format!(
                "invalid value for {field} (valid values {self}): {value}"
            )));
        }
        Ok(value)
    }

    /// Validates `value` against this range, additionally requiring
    /// the whole range to fit in an `i32`.
    pub fn check_valid_int_value(&self, value: i64, field: ChronoField) -> ChronoResult<i32> {
        if !self.is_int() {
            return Err(ChronoError::range()
                .with_message(alloc::format!("range of {field} does not fit in an i32")));
        }
        Ok(self.check_valid_value(value, field)? as i32)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.min_smallest)?;
        if self.min_smallest != self.min_largest {
            write!(f, "/{}", self.min_largest)?;
        }
        write!(f, " - {}", self.max_smallest)?;
        if self.max_smallest != self.max_largest {
            write!(f, "/{}", self.max_largest)?;
        }
        Ok(())
    }
}

// ==== FieldMap: the field-value bag ====

/// A bag of field values collected during parsing, keyed by
/// [`ChronoField`].
///
/// The bag is a dense array indexed by field ordinal, so iteration is
/// deterministic and follows field declaration order. Inserting a
/// value for a field that already holds a *different* value is a
/// conflict error; re-inserting the same value is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMap {
    values: [i64; FIELD_COUNT],
    present: u32,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldMap {
    /// Creates an empty bag.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: [0; FIELD_COUNT],
            present: 0,
        }
    }

    /// Inserts `value` for `field`, erroring if the bag already holds
    /// a different value for it.
    pub fn insert(&mut self, field: ChronoField, value: i64) -> ChronoResult<()> {
        if let Some(old) = self.get(field) {
            if old != value {
                return Err(ChronoError::conflict().with_message(alloc::format!(
                    "conflict found: {field} {old} differs from {field} {value}"
                )));
            }
            return Ok(());
        }
        self.set(field, value);
        Ok(())
    }

    /// Sets `value` for `field` unconditionally.
    #[inline]
    pub fn set(&mut self, field: ChronoField, value: i64) {
        self.values[field.index()] = value;
        self.present |= 1 << field.index();
    }

    /// Returns the value held for `field`, if any.
    #[inline]
    #[must_use]
    pub const fn get(&self, field: ChronoField) -> Option<i64> {
        if self.present & (1 << field.index()) != 0 {
            Some(self.values[field.index()])
        } else {
            None
        }
    }

    /// Removes and returns the value held for `field`.
    #[inline]
    pub fn remove(&mut self, field: ChronoField) -> Option<i64> {
        let value = self.get(field)?;
        self.present &= !(1 << field.index());
        Some(value)
    }

    /// Whether the bag holds a value for `field`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, field: ChronoField) -> bool {
        self.present & (1 << field.index()) != 0
    }

    /// The number of fields held.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.present.count_ones() as usize
    }

    /// Whether the bag is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.present == 0
    }

    /// Iterates `(field, value)` pairs in field declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ChronoField, i64)> + '_ {
        ChronoField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Iterates held fields in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = ChronoField> + '_ {
        ChronoField::ALL
            .into_iter()
            .filter(|field| self.contains(*field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn insert_conflicts_on_differing_value() {
        let mut bag = FieldMap::new();
        bag.insert(ChronoField::Year, 2012).unwrap();
        // Same value is a no-op.
        bag.insert(ChronoField::Year, 2012).unwrap();
        let err = bag.insert(ChronoField::Year, 2013).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(bag.get(ChronoField::Year), Some(2012));
    }

    #[test]
    fn remove_consumes_the_field() {
        let mut bag = FieldMap::new();
        bag.insert(ChronoField::EpochDay, 15_000).unwrap();
        assert_eq!(bag.remove(ChronoField::EpochDay), Some(15_000));
        assert_eq!(bag.remove(ChronoField::EpochDay), None);
        assert!(bag.is_empty());
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let mut bag = FieldMap::new();
        bag.insert(ChronoField::Year, 1999).unwrap();
        bag.insert(ChronoField::HourOfDay, 7).unwrap();
        bag.insert(ChronoField::DayOfMonth, 3).unwrap();
        let keys: alloc::vec::Vec<_> = bag.keys().collect();
        assert_eq!(
            keys,
            [
                ChronoField::HourOfDay,
                ChronoField::DayOfMonth,
                ChronoField::Year
            ]
        );
    }

    #[test]
    fn value_range_validation() {
        let range = ValueRange::of_varied(1, 28, 31);
        assert!(range.is_valid(31));
        assert!(!range.is_valid(0));
        assert!(range
            .check_valid_value(32, ChronoField::DayOfMonth)
            .is_err());
        assert_eq!(
            range
                .check_valid_int_value(15, ChronoField::DayOfMonth)
                .unwrap(),
            15
        );
        assert!(!ChronoField::InstantSeconds.range().is_int());
    }

    #[test]
    fn field_names_round_trip() {
        use core::str::FromStr;
        for field in ChronoField::ALL {
            let parsed = ChronoField::from_str(field.name()).unwrap();
            assert_eq!(parsed, field);
        }
    }

    #[test]
    fn date_and_time_predicates_partition_fields() {
        assert!(ChronoField::NanoOfDay.is_time_based());
        assert!(!ChronoField::NanoOfDay.is_date_based());
        assert!(ChronoField::Era.is_date_based());
        assert!(!ChronoField::InstantSeconds.is_date_based());
        assert!(!ChronoField::OffsetSeconds.is_time_based());
    }
}
