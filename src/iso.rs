//! The ISO-8601 calendar records.
//!
//! `IsoDate` and `IsoTime` are the internal representation shared by
//! every chronology: a calendar-specific date is an `IsoDate` plus the
//! rules for reading it through that calendar's fields.

use crate::{
    fields::{ChronoField, MAX_EPOCH_DAY, MAX_YEAR, MIN_EPOCH_DAY},
    utils, ChronoError, ChronoResult, NS_PER_DAY,
};

/// Cumulative days at the start of each month in a common year.
const CUMULATIVE_DAYS: [i16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

// ==== IsoDate ====

/// A proleptic Gregorian date record.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl IsoDate {
    /// Creates a new `IsoDate` without validating any of the fields.
    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Creates a new `IsoDate`, validating the fields against the
    /// calendar rules and supported year range.
    pub fn new(year: i32, month: u8, day: u8) -> ChronoResult<Self> {
        if !(-(MAX_YEAR as i32)..=MAX_YEAR as i32).contains(&year) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("year {year} is outside the supported range")));
        }
        if !(1..=12).contains(&month) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("invalid month value: {month}")));
        }
        if !(1..=days_in_month(year, month)).contains(&day) {
            return Err(ChronoError::range().with_message(alloc::format!(
                "invalid day of month: {year:04}-{month:02}-{day:02}"
            )));
        }
        Ok(Self::new_unchecked(year, month, day))
    }

    /// Creates an `IsoDate` from a day count since 1970-01-01.
    pub fn from_epoch_days(epoch_days: i64) -> ChronoResult<Self> {
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_days) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("epoch day out of range: {epoch_days}")));
        }
        // Gregorian computational calendar: years run March..February so
        // the leap day lands at the end of the computational year.
        let shifted = epoch_days + 719_468;
        let cycle = shifted.div_euclid(146_097);
        let day_of_cycle = shifted.rem_euclid(146_097);
        let year_of_cycle =
            (day_of_cycle - day_of_cycle / 1_460 + day_of_cycle / 36_524 - day_of_cycle / 146_096)
                / 365;
        let day_of_year =
            day_of_cycle - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);
        let march_month = (5 * day_of_year + 2) / 153;
        let day = day_of_year - (153 * march_month + 2) / 5 + 1;
        let month = if march_month < 10 {
            march_month + 3
        } else {
            march_month - 9
        };
        let mut year = year_of_cycle + cycle * 400;
        if month <= 2 {
            year += 1;
        }
        Ok(Self::new_unchecked(year as i32, month as u8, day as u8))
    }

    /// Returns the day count since 1970-01-01 for this date.
    #[must_use]
    pub fn to_epoch_days(self) -> i64 {
        let year = i64::from(self.year) - i64::from(self.month <= 2);
        let cycle = year.div_euclid(400);
        let year_of_cycle = year.rem_euclid(400);
        let march_month = i64::from(if self.month > 2 {
            self.month - 3
        } else {
            self.month + 9
        });
        let day_of_year = (153 * march_month + 2) / 5 + i64::from(self.day) - 1;
        let day_of_cycle = year_of_cycle * 365 + year_of_cycle / 4 - year_of_cycle / 100 + day_of_year;
        cycle * 146_097 + day_of_cycle - 719_468
    }

    /// Creates an `IsoDate` from a year and a day of that year.
    pub fn from_year_day(year: i32, day_of_year: i64) -> ChronoResult<Self> {
        let first = Self::new(year, 1, 1)?;
        if day_of_year < 1 || day_of_year > i64::from(first.days_in_year()) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("invalid day-of-year: {day_of_year}")));
        }
        first.plus_days(day_of_year - 1)
    }

    /// Returns the day of the year, January 1st being 1.
    #[must_use]
    pub fn day_of_year(self) -> u16 {
        let leap = u16::from(self.month > 2 && is_leap_year(self.year));
        CUMULATIVE_DAYS[usize::from(self.month - 1)] as u16 + u16::from(self.day) + leap
    }

    /// Returns the ISO day of the week, Monday being 1.
    #[must_use]
    pub fn day_of_week(self) -> u8 {
        (utils::floor_mod(self.to_epoch_days() + 3, 7) + 1) as u8
    }

    /// The number of days in this date's month.
    #[inline]
    #[must_use]
    pub fn days_in_month(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// The number of days in this date's year.
    #[inline]
    #[must_use]
    pub fn days_in_year(self) -> u16 {
        if is_leap_year(self.year) {
            366
        } else {
            365
        }
    }

    /// Adds a number of days, erroring past the supported range.
    pub fn plus_days(self, days: i64) -> ChronoResult<Self> {
        if days == 0 {
            return Ok(self);
        }
        Self::from_epoch_days(utils::checked_add(self.to_epoch_days(), days)?)
    }

    /// Adds a number of months, constraining the day of month into the
    /// target month.
    pub fn plus_months(self, months: i64) -> ChronoResult<Self> {
        if months == 0 {
            return Ok(self);
        }
        let total = utils::checked_add(
            i64::from(self.year) * 12 + i64::from(self.month) - 1,
            months,
        )?;
        let year = utils::floor_div(total, 12);
        if !(-MAX_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("year {year} is outside the supported range")));
        }
        let year = year as i32;
        let month = (utils::floor_mod(total, 12) + 1) as u8;
        let day = self.day.min(days_in_month(year, month));
        Ok(Self::new_unchecked(year, month, day))
    }
}

// ==== IsoTime ====

/// An ISO time-of-day record.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub microsecond: u16,
    pub nanosecond: u16,
}

impl IsoTime {
    /// Creates a new `IsoTime` without validating any of the fields.
    #[inline]
    #[must_use]
    pub(crate) const fn new_unchecked(
        hour: u8,
        minute: u8,
        second: u8,
        millisecond: u16,
        microsecond: u16,
        nanosecond: u16,
    ) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            microsecond,
            nanosecond,
        }
    }

    /// Creates a validated `IsoTime` from hour, minute, second and
    /// nanosecond-of-second components.
    pub fn new(hour: u8, minute: u8, second: u8, nano_of_second: u32) -> ChronoResult<Self> {
        if hour > 23 || minute > 59 || second > 59 || nano_of_second > 999_999_999 {
            return Err(ChronoError::range().with_message(alloc::format!(
                "invalid time: {hour:02}:{minute:02}:{second:02}.{nano_of_second:09}"
            )));
        }
        let millisecond = (nano_of_second / 1_000_000) as u16;
        let rem = nano_of_second % 1_000_000;
        Ok(Self::new_unchecked(
            hour,
            minute,
            second,
            millisecond,
            (rem / 1_000) as u16,
            (rem % 1_000) as u16,
        ))
    }

    /// Creates an `IsoTime` from a nanosecond-of-day value.
    pub fn from_nano_of_day(nano_of_day: i64) -> ChronoResult<Self> {
        if !(0..NS_PER_DAY).contains(&nano_of_day) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("nano-of-day out of range: {nano_of_day}")));
        }
        let (seconds, subsec) = utils::div_mod(nano_of_day, 1_000_000_000);
        Self::new(
            (seconds / 3_600) as u8,
            (seconds / 60 % 60) as u8,
            (seconds % 60) as u8,
            subsec as u32,
        )
    }

    /// The sub-second component as nanoseconds of second.
    #[inline]
    #[must_use]
    pub fn nano_of_second(self) -> u32 {
        u32::from(self.millisecond) * 1_000_000
            + u32::from(self.microsecond) * 1_000
            + u32::from(self.nanosecond)
    }

    /// The second of the day.
    #[inline]
    #[must_use]
    pub fn second_of_day(self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }

    /// The nanosecond of the day.
    #[inline]
    #[must_use]
    pub fn nanosecond_of_day(self) -> i64 {
        self.second_of_day() * 1_000_000_000 + i64::from(self.nano_of_second())
    }

    /// Reads a time-based field off this record, or `None` for date
    /// and instant fields.
    #[must_use]
    pub fn get(self, field: ChronoField) -> Option<i64> {
        let value = match field {
            ChronoField::NanoOfSecond => i64::from(self.nano_of_second()),
            ChronoField::NanoOfDay => self.nanosecond_of_day(),
            ChronoField::MicroOfSecond => i64::from(self.nano_of_second() / 1_000),
            ChronoField::MicroOfDay => self.nanosecond_of_day() / 1_000,
            ChronoField::MilliOfSecond => i64::from(self.millisecond),
            ChronoField::MilliOfDay => self.nanosecond_of_day() / 1_000_000,
            ChronoField::SecondOfMinute => i64::from(self.second),
            ChronoField::SecondOfDay => self.second_of_day(),
            ChronoField::MinuteOfHour => i64::from(self.minute),
            ChronoField::MinuteOfDay => i64::from(self.hour) * 60 + i64::from(self.minute),
            ChronoField::HourOfAmpm => i64::from(self.hour % 12),
            ChronoField::ClockHourOfAmpm => {
                let h = self.hour % 12;
                i64::from(if h == 0 { 12 } else { h })
            }
            ChronoField::HourOfDay => i64::from(self.hour),
            ChronoField::ClockHourOfDay => i64::from(if self.hour == 0 { 24 } else { self.hour }),
            ChronoField::AmpmOfDay => i64::from(self.hour / 12),
            _ => return None,
        };
        Some(value)
    }
}

// ==== Gregorian calendar helpers ====

/// Whether `year` is a Gregorian leap year.
#[inline]
#[must_use]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// The number of days in `month` of `year`.
#[must_use]
pub(crate) fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_reference_points() {
        assert_eq!(IsoDate::new_unchecked(1970, 1, 1).to_epoch_days(), 0);
        assert_eq!(IsoDate::new_unchecked(1969, 12, 31).to_epoch_days(), -1);
        assert_eq!(IsoDate::new_unchecked(2000, 3, 1).to_epoch_days(), 11_017);
        assert_eq!(IsoDate::new_unchecked(622, 7, 19).to_epoch_days(), -492_148);
        assert_eq!(
            IsoDate::from_epoch_days(11_017).unwrap(),
            IsoDate::new_unchecked(2000, 3, 1)
        );
    }

    #[test]
    fn epoch_day_round_trip_wide_range() {
        for days in (-800_000..800_000).step_by(4_001) {
            let date = IsoDate::from_epoch_days(days).unwrap();
            assert_eq!(date.to_epoch_days(), days, "failed for {date:?}");
        }
    }

    #[test]
    fn validation_rejects_bad_dates() {
        assert!(IsoDate::new(2023, 2, 29).is_err());
        assert!(IsoDate::new(2024, 2, 29).is_ok());
        assert!(IsoDate::new(2024, 13, 1).is_err());
        assert!(IsoDate::new(1_000_000_000, 1, 1).is_err());
    }

    #[test]
    fn day_of_week_and_year() {
        // 1970-01-01 was a Thursday.
        assert_eq!(IsoDate::new_unchecked(1970, 1, 1).day_of_week(), 4);
        // 2023-08-21 was a Monday.
        assert_eq!(IsoDate::new_unchecked(2023, 8, 21).day_of_week(), 1);
        assert_eq!(IsoDate::new_unchecked(2024, 3, 1).day_of_year(), 61);
        assert_eq!(IsoDate::new_unchecked(2023, 3, 1).day_of_year(), 60);
        assert_eq!(IsoDate::new_unchecked(2023, 12, 31).day_of_year(), 365);
    }

    #[test]
    fn plus_months_constrains_day() {
        let date = IsoDate::new_unchecked(2023, 1, 31);
        assert_eq!(
            date.plus_months(1).unwrap(),
            IsoDate::new_unchecked(2023, 2, 28)
        );
        assert_eq!(
            date.plus_months(13).unwrap(),
            IsoDate::new_unchecked(2024, 2, 29)
        );
        assert_eq!(
            date.plus_months(-2).unwrap(),
            IsoDate::new_unchecked(2022, 11, 30)
        );
    }

    #[test]
    fn time_record_fields() {
        let time = IsoTime::new(13, 45, 30, 123_456_789).unwrap();
        assert_eq!(time.get(ChronoField::MilliOfSecond), Some(123));
        assert_eq!(time.get(ChronoField::MicroOfSecond), Some(123_456));
        assert_eq!(time.get(ChronoField::NanoOfSecond), Some(123_456_789));
        assert_eq!(time.get(ChronoField::SecondOfDay), Some(49_530));
        assert_eq!(time.get(ChronoField::AmpmOfDay), Some(1));
        assert_eq!(time.get(ChronoField::HourOfAmpm), Some(1));
        assert_eq!(time.get(ChronoField::ClockHourOfAmpm), Some(1));
        assert_eq!(time.get(ChronoField::Year), None);

        let midnight = IsoTime::new(0, 0, 0, 0).unwrap();
        assert_eq!(midnight.get(ChronoField::ClockHourOfDay), Some(24));
        assert_eq!(midnight.get(ChronoField::ClockHourOfAmpm), Some(12));
    }

    #[test]
    fn nano_of_day_round_trip() {
        let time = IsoTime::new(23, 59, 59, 999_999_999).unwrap();
        let nod = time.nanosecond_of_day();
        assert_eq!(IsoTime::from_nano_of_day(nod).unwrap(), time);
        assert!(IsoTime::from_nano_of_day(NS_PER_DAY).is_err());
        assert!(IsoTime::from_nano_of_day(-1).is_err());
    }
}
