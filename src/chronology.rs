//! Calendar systems and calendar-aware dates.
//!
//! A [`Chronology`] maps between the shared epoch-day timeline and a
//! calendar's own era, year, month and day fields. Every calendar
//! stores dates as an [`IsoDate`] internally; the chronology decides
//! how the fields read off it.

use alloc::vec::Vec;
use core::{fmt, str::FromStr};

use tinystr::{tinystr, TinyAsciiStr};

use crate::{
    fields::{ChronoField, FieldMap, ValueRange, MAX_YEAR},
    iso::{self, IsoDate},
    options::ResolverStyle,
    resolver, utils, ChronoError, ChronoResult,
};

mod hijrah;
mod japanese;

pub use hijrah::register_deviations as register_hijrah_deviations;
pub use japanese::register_era as register_japanese_era;

/// Years between the Minguo calendar and ISO; Minguo year 1 is 1912.
const MINGUO_DIFF: i64 = 1911;
/// Years between the Thai Buddhist calendar and ISO; BE year 544 is
/// ISO year 1.
const THAI_DIFF: i64 = 543;

// ==== Era ====

/// An era of a calendar system, a numeric value paired with a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
    value: i32,
    name: TinyAsciiStr<16>,
}

impl Era {
    pub(crate) const fn new(value: i32, name: TinyAsciiStr<16>) -> Self {
        Self { value, name }
    }

    /// The numeric era value used with the `Era` field.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.value
    }

    /// The era name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

// ==== Chronology ====

/// The supported calendar systems.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Chronology {
    /// The proleptic ISO-8601 calendar.
    #[default]
    Iso,
    /// The Japanese Imperial calendar.
    Japanese,
    /// The Hijrah (Islamic) calendar, umalqura arithmetic.
    Hijrah,
    /// The Minguo (Republic of China) calendar.
    Minguo,
    /// The Thai Buddhist calendar.
    ThaiBuddhist,
}

impl Chronology {
    /// The calendar's identifier.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::Japanese => "Japanese",
            Self::Hijrah => "Hijrah-umalqura",
            Self::Minguo => "Minguo",
            Self::ThaiBuddhist => "ThaiBuddhist",
        }
    }

    /// Offset added to this calendar's proleptic year to reach the ISO
    /// year, for the fixed-offset calendars.
    const fn year_offset(self) -> i64 {
        match self {
            Self::Iso | Self::Japanese => 0,
            Self::Minguo => MINGUO_DIFF,
            Self::ThaiBuddhist => -THAI_DIFF,
            // Hijrah years never map by a fixed offset.
            Self::Hijrah => 0,
        }
    }

    fn iso_year(self, proleptic_year: i64) -> ChronoResult<i32> {
        let year = utils::checked_add(proleptic_year, self.year_offset())?;
        i32::try_from(year).map_err(|_| {
            ChronoError::range()
                .with_message(alloc::format!("year out of range: {proleptic_year}"))
        })
    }

    /// Creates a date from a proleptic year, month, and day of this
    /// calendar.
    pub fn date(self, proleptic_year: i64, month: u8, day: u8) -> ChronoResult<ChronoDate> {
        let iso = match self {
            Self::Hijrah => hijrah::date(proleptic_year, month, day)?,
            Self::Japanese => {
                japanese::validate(IsoDate::new(self.iso_year(proleptic_year)?, month, day)?)?
            }
            _ => IsoDate::new(self.iso_year(proleptic_year)?, month, day)?,
        };
        Ok(ChronoDate {
            chronology: self,
            iso,
        })
    }

    /// Creates a date from a proleptic year and day-of-year of this
    /// calendar.
    pub fn date_year_day(self, proleptic_year: i64, day_of_year: i64) -> ChronoResult<ChronoDate> {
        let iso = match self {
            Self::Hijrah => hijrah::date_year_day(proleptic_year, day_of_year)?,
            Self::Japanese => japanese::validate(IsoDate::from_year_day(
                self.iso_year(proleptic_year)?,
                day_of_year,
            )?)?,
            _ => IsoDate::from_year_day(self.iso_year(proleptic_year)?, day_of_year)?,
        };
        Ok(ChronoDate {
            chronology: self,
            iso,
        })
    }

    /// Creates a date from an era, year-of-era, month, and day.
    pub fn date_era(
        self,
        era: i64,
        year_of_era: i64,
        month: u8,
        day: u8,
    ) -> ChronoResult<ChronoDate> {
        if self == Self::Japanese {
            let era = japanese::era_of(era)?;
            let iso = japanese::date_era(era, year_of_era, month, day)?;
            return Ok(ChronoDate {
                chronology: self,
                iso,
            });
        }
        self.date(self.proleptic_year(era, year_of_era)?, month, day)
    }

    /// Creates a date from an era, year-of-era, and day-of-year.
    pub fn date_era_year_day(
        self,
        era: i64,
        year_of_era: i64,
        day_of_year: i64,
    ) -> ChronoResult<ChronoDate> {
        if self == Self::Japanese {
            let era = japanese::era_of(era)?;
            let iso = japanese::date_era_year_day(era, year_of_era, day_of_year)?;
            return Ok(ChronoDate {
                chronology: self,
                iso,
            });
        }
        self.date_year_day(self.proleptic_year(era, year_of_era)?, day_of_year)
    }

    /// Creates a date from a day count since 1970-01-01.
    pub fn date_from_epoch_days(self, epoch_days: i64) -> ChronoResult<ChronoDate> {
        let iso = IsoDate::from_epoch_days(epoch_days)?;
        match self {
            Self::Japanese => {
                japanese::validate(iso)?;
            }
            Self::Hijrah => {
                // Errors outside the supported Hijrah year span.
                hijrah::date_info(epoch_days)?;
            }
            _ => {}
        }
        Ok(ChronoDate {
            chronology: self,
            iso,
        })
    }

    /// Computes the proleptic year from an era and year-of-era.
    pub fn proleptic_year(self, era: i64, year_of_era: i64) -> ChronoResult<i64> {
        if self == Self::Japanese {
            return japanese::proleptic_year(era, year_of_era);
        }
        match era {
            1 => Ok(year_of_era),
            0 => utils::checked_sub(1, year_of_era),
            _ => Err(ChronoError::range()
                .with_message(alloc::format!("invalid era for {self}: {era}"))),
        }
    }

    /// The eras of this calendar, oldest first.
    #[must_use]
    pub fn eras(self) -> Vec<Era> {
        match self {
            Self::Iso => alloc::vec![
                Era::new(0, tinystr!(16, "BCE")),
                Era::new(1, tinystr!(16, "CE")),
            ],
            Self::Japanese => japanese::eras()
                .into_iter()
                .map(|era| Era::new(era.value, era.name))
                .collect(),
            Self::Hijrah => alloc::vec![
                Era::new(0, tinystr!(16, "BEFORE_AH")),
                Era::new(1, tinystr!(16, "AH")),
            ],
            Self::Minguo => alloc::vec![
                Era::new(0, tinystr!(16, "BEFORE_ROC")),
                Era::new(1, tinystr!(16, "ROC")),
            ],
            Self::ThaiBuddhist => alloc::vec![
                Era::new(0, tinystr!(16, "BEFORE_BE")),
                Era::new(1, tinystr!(16, "BE")),
            ],
        }
    }

    /// Looks up an era of this calendar by value.
    pub fn era_of(self, value: i64) -> ChronoResult<Era> {
        self.eras()
            .into_iter()
            .find(|era| i64::from(era.value) == value)
            .ok_or_else(|| {
                ChronoError::range()
                    .with_message(alloc::format!("invalid era for {self}: {value}"))
            })
    }

    /// The range of valid values for `field` in this calendar.
    pub fn range(self, field: ChronoField) -> ChronoResult<ValueRange> {
        match self {
            Self::Iso => Ok(field.range()),
            Self::Japanese => japanese::range(field),
            Self::Hijrah => Ok(hijrah::range(field)),
            Self::Minguo => Ok(match field {
                ChronoField::Year => {
                    ValueRange::of(-MAX_YEAR - MINGUO_DIFF, MAX_YEAR - MINGUO_DIFF)
                }
                ChronoField::YearOfEra => ValueRange::of_varied(
                    1,
                    MAX_YEAR - MINGUO_DIFF,
                    MAX_YEAR + 1 + MINGUO_DIFF,
                ),
                ChronoField::ProlepticMonth => ValueRange::of(
                    (-MAX_YEAR - MINGUO_DIFF) * 12,
                    (MAX_YEAR - MINGUO_DIFF) * 12 + 11,
                ),
                _ => field.range(),
            }),
            Self::ThaiBuddhist => Ok(match field {
                ChronoField::Year => {
                    ValueRange::of(-MAX_YEAR + THAI_DIFF, MAX_YEAR + THAI_DIFF)
                }
                ChronoField::YearOfEra => ValueRange::of_varied(
                    1,
                    MAX_YEAR - THAI_DIFF + 1,
                    MAX_YEAR + THAI_DIFF,
                ),
                ChronoField::ProlepticMonth => ValueRange::of(
                    (-MAX_YEAR + THAI_DIFF) * 12,
                    (MAX_YEAR + THAI_DIFF) * 12 + 11,
                ),
                _ => field.range(),
            }),
        }
    }

    /// Whether the given proleptic year of this calendar is a leap
    /// year.
    #[must_use]
    pub fn is_leap_year(self, proleptic_year: i64) -> bool {
        match self {
            Self::Hijrah => hijrah::is_leap_year(proleptic_year),
            _ => match self.iso_year(proleptic_year) {
                Ok(year) => iso::is_leap_year(year),
                Err(_) => false,
            },
        }
    }

    /// The number of days in the given month of this calendar.
    pub(crate) fn month_length(self, proleptic_year: i64, month: u8) -> ChronoResult<i64> {
        if !(1..=12).contains(&month) {
            return Err(ChronoError::range()
                .with_message(alloc::format!("invalid month value: {month}")));
        }
        match self {
            Self::Hijrah => Ok(hijrah::month_length(proleptic_year, month)),
            _ => Ok(i64::from(iso::days_in_month(
                self.iso_year(proleptic_year)?,
                month,
            ))),
        }
    }

    /// Resolves the date fields held in `fields` into a date,
    /// consuming the fields used.
    ///
    /// Returns `Ok(None)` when the bag lacks enough fields to form a
    /// complete date; partial combinations are left in the bag.
    pub fn resolve_date(
        self,
        fields: &mut FieldMap,
        style: ResolverStyle,
    ) -> ChronoResult<Option<ChronoDate>> {
        resolver::resolve_date(self, fields, style)
    }

    /// The era-first pre-pass used by Japanese resolution.
    pub(crate) fn resolve_japanese_era_pass(
        self,
        fields: &mut FieldMap,
        style: ResolverStyle,
    ) -> ChronoResult<Option<IsoDate>> {
        debug_assert!(self == Self::Japanese);
        japanese::resolve_era_pass(fields, style)
    }
}

impl FromStr for Chronology {
    type Err = ChronoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for chronology in [
            Self::Iso,
            Self::Japanese,
            Self::Hijrah,
            Self::Minguo,
            Self::ThaiBuddhist,
        ] {
            if s.eq_ignore_ascii_case(chronology.identifier()) {
                return Ok(chronology);
            }
        }
        if s.eq_ignore_ascii_case("hijrah") {
            return Ok(Self::Hijrah);
        }
        Err(ChronoError::range().with_message(alloc::format!("unknown chronology: {s}")))
    }
}

impl fmt::Display for Chronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

// ==== ChronoDate ====

/// A date in a specific calendar system.
///
/// The date is stored as its ISO equivalent; field access reads it
/// through the calendar's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChronoDate {
    chronology: Chronology,
    iso: IsoDate,
}

impl ChronoDate {
    /// Wraps an ISO date already validated for `chronology`.
    pub(crate) const fn from_iso_unchecked(chronology: Chronology, iso: IsoDate) -> Self {
        Self { chronology, iso }
    }

    /// The calendar system of this date.
    #[inline]
    #[must_use]
    pub const fn chronology(&self) -> Chronology {
        self.chronology
    }

    /// The ISO equivalent of this date.
    #[inline]
    #[must_use]
    pub const fn iso(&self) -> IsoDate {
        self.iso
    }

    /// The day count since 1970-01-01.
    #[inline]
    #[must_use]
    pub fn to_epoch_days(&self) -> i64 {
        self.iso.to_epoch_days()
    }

    /// This calendar's proleptic year.
    pub fn proleptic_year(&self) -> ChronoResult<i64> {
        match self.chronology {
            Chronology::Hijrah => {
                Ok(hijrah::date_info(self.to_epoch_days())?.proleptic_year())
            }
            _ => Ok(i64::from(self.iso.year) - self.chronology.year_offset()),
        }
    }

    /// Reads a date field off this date through its calendar's rules.
    pub fn get(&self, field: ChronoField) -> ChronoResult<i64> {
        let unsupported = || {
            Err(ChronoError::unsupported().with_message(alloc::format!(
                "field not supported by the {} calendar: {field}",
                self.chronology
            )))
        };
        // Shared fields first.
        match field {
            ChronoField::EpochDay => return Ok(self.to_epoch_days()),
            ChronoField::DayOfWeek => return Ok(i64::from(self.iso.day_of_week())),
            _ => {}
        }
        if self.chronology == Chronology::Japanese {
            return match field {
                ChronoField::AlignedDayOfWeekInMonth
                | ChronoField::AlignedDayOfWeekInYear
                | ChronoField::AlignedWeekOfMonth
                | ChronoField::AlignedWeekOfYear => unsupported(),
                ChronoField::DayOfMonth => Ok(i64::from(self.iso.day)),
                ChronoField::MonthOfYear => Ok(i64::from(self.iso.month)),
                ChronoField::DayOfYear => japanese::day_of_year(self.iso),
                ChronoField::ProlepticMonth => Ok(i64::from(self.iso.year) * 12
                    + i64::from(self.iso.month)
                    - 1),
                ChronoField::YearOfEra => japanese::year_of_era(self.iso),
                ChronoField::Year => Ok(i64::from(self.iso.year)),
                ChronoField::Era => Ok(i64::from(japanese::era_from(self.iso)?.value)),
                _ => unsupported(),
            };
        }
        if self.chronology == Chronology::Hijrah {
            let info = hijrah::date_info(self.to_epoch_days())?;
            return match field {
                ChronoField::DayOfMonth => Ok(i64::from(info.day)),
                ChronoField::DayOfYear => Ok(i64::from(info.day_of_year)),
                ChronoField::MonthOfYear => Ok(i64::from(info.month)),
                ChronoField::ProlepticMonth => {
                    Ok(info.proleptic_year() * 12 + i64::from(info.month) - 1)
                }
                ChronoField::YearOfEra => Ok(i64::from(info.year_of_era)),
                ChronoField::Year => Ok(info.proleptic_year()),
                ChronoField::Era => Ok(i64::from(info.era)),
                ChronoField::AlignedDayOfWeekInMonth => {
                    Ok((i64::from(info.day) - 1) % 7 + 1)
                }
                ChronoField::AlignedDayOfWeekInYear => {
                    Ok((i64::from(info.day_of_year) - 1) % 7 + 1)
                }
                ChronoField::AlignedWeekOfMonth => Ok((i64::from(info.day) - 1) / 7 + 1),
                ChronoField::AlignedWeekOfYear => {
                    Ok((i64::from(info.day_of_year) - 1) / 7 + 1)
                }
                _ => unsupported(),
            };
        }
        // The fixed-offset calendars share ISO's month structure.
        let proleptic_year = i64::from(self.iso.year) - self.chronology.year_offset();
        match field {
            ChronoField::DayOfMonth => Ok(i64::from(self.iso.day)),
            ChronoField::DayOfYear => Ok(i64::from(self.iso.day_of_year())),
            ChronoField::MonthOfYear => Ok(i64::from(self.iso.month)),
            ChronoField::ProlepticMonth => {
                Ok(proleptic_year * 12 + i64::from(self.iso.month) - 1)
            }
            ChronoField::YearOfEra => Ok(if proleptic_year >= 1 {
                proleptic_year
            } else {
                1 - proleptic_year
            }),
            ChronoField::Year => Ok(proleptic_year),
            ChronoField::Era => Ok(i64::from(proleptic_year >= 1)),
            ChronoField::AlignedDayOfWeekInMonth => Ok((i64::from(self.iso.day) - 1) % 7 + 1),
            ChronoField::AlignedDayOfWeekInYear => {
                Ok((i64::from(self.iso.day_of_year()) - 1) % 7 + 1)
            }
            ChronoField::AlignedWeekOfMonth => Ok((i64::from(self.iso.day) - 1) / 7 + 1),
            ChronoField::AlignedWeekOfYear => {
                Ok((i64::from(self.iso.day_of_year()) - 1) / 7 + 1)
            }
            _ => unsupported(),
        }
    }

    /// Adds a number of days.
    pub fn plus_days(&self, days: i64) -> ChronoResult<Self> {
        self.chronology
            .date_from_epoch_days(utils::checked_add(self.to_epoch_days(), days)?)
    }

    /// Adds a number of weeks.
    pub fn plus_weeks(&self, weeks: i64) -> ChronoResult<Self> {
        self.plus_days(utils::checked_mul(weeks, 7)?)
    }

    /// Adds a number of this calendar's months, constraining the day
    /// of month into the target month.
    pub fn plus_months(&self, months: i64) -> ChronoResult<Self> {
        if months == 0 {
            return Ok(*self);
        }
        if self.chronology == Chronology::Hijrah {
            let info = hijrah::date_info(self.to_epoch_days())?;
            let total = utils::checked_add(
                info.proleptic_year() * 12 + i64::from(info.month) - 1,
                months,
            )?;
            let year = utils::floor_div(total, 12);
            let month = (utils::floor_mod(total, 12) + 1) as u8;
            let day = i64::from(info.day).min(hijrah::month_length(year, month)) as u8;
            return self.chronology.date(year, month, day);
        }
        let iso = self.iso.plus_months(months)?;
        if self.chronology == Chronology::Japanese {
            japanese::validate(iso)?;
        }
        Ok(Self {
            chronology: self.chronology,
            iso,
        })
    }
}

impl fmt::Display for ChronoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:04}-{:02}-{:02}",
            self.chronology, self.iso.year, self.iso.month, self.iso.day
        )
    }
}
