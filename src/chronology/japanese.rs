//! The Japanese Imperial calendar system.
//!
//! Shares its year, month and day structure with ISO, but counts years
//! within date-bounded eras. Four eras are built in (Meiji through
//! Heisei) and one additional era may be registered at runtime. The
//! earliest supported date is 1873-01-01 (Meiji 6).

use alloc::{boxed::Box, vec::Vec};
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use tinystr::{tinystr, TinyAsciiStr};

use crate::{
    chronology::Era,
    fields::{ChronoField, ValueRange, MAX_YEAR},
    iso::IsoDate,
    options::ResolverStyle,
    ChronoError, ChronoResult,
};

/// The minimum supported date, January 1st Meiji 6.
pub(crate) const MIN_DATE: IsoDate = IsoDate::new_unchecked(1873, 1, 1);

const MAX_DATE: IsoDate = IsoDate::new_unchecked(MAX_YEAR as i32, 12, 31);

/// The era value assigned to a runtime-registered era.
const ADDITIONAL_ERA_VALUE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JapaneseEraData {
    pub(crate) value: i32,
    pub(crate) name: TinyAsciiStr<16>,
    pub(crate) start: IsoDate,
}

static BUILTIN_ERAS: [JapaneseEraData; 4] = [
    JapaneseEraData {
        value: -1,
        name: tinystr!(16, "meiji"),
        start: IsoDate::new_unchecked(1868, 9, 8),
    },
    JapaneseEraData {
        value: 0,
        name: tinystr!(16, "taisho"),
        start: IsoDate::new_unchecked(1912, 7, 30),
    },
    JapaneseEraData {
        value: 1,
        name: tinystr!(16, "showa"),
        start: IsoDate::new_unchecked(1926, 12, 25),
    },
    JapaneseEraData {
        value: 2,
        name: tinystr!(16, "heisei"),
        start: IsoDate::new_unchecked(1989, 1, 8),
    },
];

/// At most one era may be registered at runtime, stored as a leaked
/// allocation behind a compare-exchange so registration is lock-free
/// and readable without `std`.
static ADDITIONAL_ERA: AtomicPtr<JapaneseEraData> = AtomicPtr::new(ptr::null_mut());

fn additional_era() -> Option<&'static JapaneseEraData> {
    let ptr = ADDITIONAL_ERA.load(Ordering::Acquire);
    if ptr.is_null() {
        None
    } else {
        // Registered pointers are leaked and never freed.
        Some(unsafe { &*ptr })
    }
}

/// Registers an additional era beginning at `since`.
///
/// The start date must fall after the start of Heisei. Only a single
/// additional era may ever be registered; a second attempt errors and
/// leaves the first registration in place.
pub fn register_era(name: &str, since: IsoDate) -> ChronoResult<Era> {
    let name = TinyAsciiStr::<16>::try_from_str(name).map_err(|_| {
        ChronoError::range().with_message("era name must be 1 to 16 ASCII characters")
    })?;
    let heisei_start = BUILTIN_ERAS[3].start;
    if since.to_epoch_days() <= heisei_start.to_epoch_days() {
        return Err(ChronoError::range()
            .with_message("additional era must start after the latest built-in era"));
    }
    let data = Box::into_raw(Box::new(JapaneseEraData {
        value: ADDITIONAL_ERA_VALUE,
        name,
        start: since,
    }));
    match ADDITIONAL_ERA.compare_exchange(
        ptr::null_mut(),
        data,
        Ordering::AcqRel,
        Ordering::Acquire,
    ) {
        Ok(_) => {
            #[cfg(feature = "log")]
            log::info!("registered additional Japanese era {name} starting {since:?}");
            Ok(Era::new(ADDITIONAL_ERA_VALUE, name))
        }
        Err(_) => {
            // Lost the race or already registered; reclaim our copy.
            drop(unsafe { Box::from_raw(data) });
            Err(ChronoError::registration()
                .with_message("an additional Japanese era has already been registered"))
        }
    }
}

pub(crate) fn eras() -> Vec<&'static JapaneseEraData> {
    let mut all: Vec<&'static JapaneseEraData> = BUILTIN_ERAS.iter().collect();
    if let Some(extra) = additional_era() {
        all.push(extra);
    }
    all
}

pub(crate) fn era_of(value: i64) -> ChronoResult<&'static JapaneseEraData> {
    eras()
        .into_iter()
        .find(|era| i64::from(era.value) == value)
        .ok_or_else(|| {
            ChronoError::range().with_message(alloc::format!("invalid Japanese era: {value}"))
        })
}

/// Finds the era containing `date`, the newest era whose start is not
/// after it.
pub(crate) fn era_from(date: IsoDate) -> ChronoResult<&'static JapaneseEraData> {
    eras()
        .into_iter()
        .rev()
        .find(|era| era.start <= date)
        .ok_or_else(|| {
            ChronoError::range().with_message("date is before the earliest Japanese era")
        })
}

/// The last date of `era`: the day before the next era starts, or the
/// supported maximum for the newest era.
pub(crate) fn era_end(era: &JapaneseEraData) -> IsoDate {
    let all = eras();
    let next = all.iter().find(|e| e.value == era.value + 1);
    match next {
        // Era starts are always well inside the epoch-day range.
        Some(next) => IsoDate::from_epoch_days(next.start.to_epoch_days() - 1)
            .unwrap_or(MAX_DATE),
        None => MAX_DATE,
    }
}

fn era_length_years(era: &JapaneseEraData) -> i64 {
    i64::from(era_end(era).year) - i64::from(era.start.year) + 1
}

pub(crate) fn proleptic_year(era_value: i64, year_of_era: i64) -> ChronoResult<i64> {
    let era = era_of(era_value)?;
    ValueRange::of(1, era_length_years(era))
        .check_valid_value(year_of_era, ChronoField::YearOfEra)?;
    Ok(i64::from(era.start.year) + year_of_era - 1)
}

pub(crate) fn validate(date: IsoDate) -> ChronoResult<IsoDate> {
    if date < MIN_DATE {
        return Err(
            ChronoError::range().with_message("minimum supported date is January 1st Meiji 6")
        );
    }
    Ok(date)
}

/// The era-relative day-of-year: within an era's first calendar year,
/// days count from the era start.
pub(crate) fn day_of_year(date: IsoDate) -> ChronoResult<i64> {
    let era = era_from(date)?;
    if era.start.year == date.year {
        Ok(i64::from(date.day_of_year()) - i64::from(era.start.day_of_year()) + 1)
    } else {
        Ok(i64::from(date.day_of_year()))
    }
}

pub(crate) fn year_of_era(date: IsoDate) -> ChronoResult<i64> {
    let era = era_from(date)?;
    Ok(i64::from(date.year) - i64::from(era.start.year) + 1)
}

/// Constructs a date from era, year-of-era, month, and day, bounded to
/// the era.
pub(crate) fn date_era(
    era: &JapaneseEraData,
    year_of_era: i64,
    month: u8,
    day: u8,
) -> ChronoResult<IsoDate> {
    if year_of_era < 1 {
        return Err(ChronoError::range()
            .with_message(alloc::format!("invalid year-of-era: {year_of_era}")));
    }
    let iso_year = i64::from(era.start.year) + year_of_era - 1;
    let date = IsoDate::new(int_year(iso_year)?, month, day)?;
    if date < era.start || date > era_end(era) {
        return Err(ChronoError::range().with_message(alloc::format!(
            "requested date is outside bounds of era {}",
            era.name
        )));
    }
    validate(date)
}

/// Constructs a date from era, year-of-era, and day-of-year. Within
/// the era's first year the day-of-year counts from the era start.
pub(crate) fn date_era_year_day(
    era: &JapaneseEraData,
    year_of_era: i64,
    day_of_year: i64,
) -> ChronoResult<IsoDate> {
    if year_of_era < 1 {
        return Err(ChronoError::range()
            .with_message(alloc::format!("invalid year-of-era: {year_of_era}")));
    }
    let mut doy = day_of_year;
    if year_of_era == 1 {
        doy += i64::from(era.start.day_of_year()) - 1;
        if doy > i64::from(era.start.days_in_year()) {
            return Err(ChronoError::range().with_message(alloc::format!(
                "day-of-year exceeds maximum allowed in the first year of era {}",
                era.name
            )));
        }
    }
    let iso_year = int_year(i64::from(era.start.year) + year_of_era - 1)?;
    let date = IsoDate::from_year_day(iso_year, doy)?;
    if date < era.start || date > era_end(era) {
        return Err(ChronoError::range().with_message(alloc::format!(
            "requested date is outside bounds of era {}",
            era.name
        )));
    }
    validate(date)
}

fn int_year(year: i64) -> ChronoResult<i32> {
    i32::try_from(year).map_err(|_| {
        ChronoError::range().with_message(alloc::format!("year out of range: {year}"))
    })
}

pub(crate) fn range(field: ChronoField) -> ChronoResult<ValueRange> {
    match field {
        ChronoField::AlignedDayOfWeekInMonth
        | ChronoField::AlignedDayOfWeekInYear
        | ChronoField::AlignedWeekOfMonth
        | ChronoField::AlignedWeekOfYear => Err(ChronoError::unsupported().with_message(
            alloc::format!("field not supported by the Japanese calendar: {field}"),
        )),
        ChronoField::Era => {
            let all = eras();
            Ok(ValueRange::of(
                i64::from(all[0].value),
                i64::from(all[all.len() - 1].value),
            ))
        }
        ChronoField::Year => {
            let all = eras();
            Ok(ValueRange::of(
                i64::from(MIN_DATE.year),
                i64::from(era_end(all[all.len() - 1]).year),
            ))
        }
        ChronoField::YearOfEra => {
            let all = eras();
            let last = all[all.len() - 1];
            let max = era_length_years(last);
            let smallest_max = all
                .iter()
                .map(|era| era_length_years(era))
                .min()
                .unwrap_or(max);
            Ok(ValueRange::of_fully_varied(1, 6, smallest_max, max))
        }
        ChronoField::DayOfYear => {
            let smallest_max = eras()
                .iter()
                .map(|era| {
                    i64::from(era.start.days_in_year()) - i64::from(era.start.day_of_year()) + 1
                })
                .min()
                .unwrap_or(366);
            Ok(ValueRange::of_varied(1, smallest_max, 366))
        }
        _ => Ok(field.range()),
    }
}

// ==== Era-first resolution ====

/// The era-aware pre-pass of Japanese date resolution. When era and
/// year-of-era pair with month/day or day-of-year, resolution is
/// era-first and short-circuits; otherwise the fields stay in the bag
/// for the caller's year-based branches.
pub(crate) fn resolve_era_pass(
    fields: &mut crate::fields::FieldMap,
    style: ResolverStyle,
) -> ChronoResult<Option<IsoDate>> {
    let mut era = match fields.get(ChronoField::Era) {
        Some(value) => {
            range(ChronoField::Era)?.check_valid_value(value, ChronoField::Era)?;
            Some(era_of(value)?)
        }
        None => None,
    };
    let Some(yoe_value) = fields.get(ChronoField::YearOfEra) else {
        return Ok(None);
    };
    let yoe = range(ChronoField::YearOfEra)?
        .check_valid_int_value(yoe_value, ChronoField::YearOfEra)?;
    if era.is_none() && !style.is_strict() && !fields.contains(ChronoField::Year) {
        let all = eras();
        era = Some(all[all.len() - 1]);
    }
    let Some(era) = era else {
        return Ok(None);
    };
    if fields.contains(ChronoField::MonthOfYear) && fields.contains(ChronoField::DayOfMonth) {
        fields.remove(ChronoField::Era);
        fields.remove(ChronoField::YearOfEra);
        return resolve_eymd(fields, style, era, yoe).map(Some);
    }
    if fields.contains(ChronoField::DayOfYear) {
        fields.remove(ChronoField::Era);
        fields.remove(ChronoField::YearOfEra);
        return resolve_eyd(fields, style, era, yoe).map(Some);
    }
    Ok(None)
}

fn resolve_eymd(
    fields: &mut crate::fields::FieldMap,
    style: ResolverStyle,
    era: &'static JapaneseEraData,
    yoe: i32,
) -> ChronoResult<IsoDate> {
    use crate::utils::checked_sub;
    use crate::ChronoUnwrap;

    if style.is_lenient() {
        let year = int_year(i64::from(era.start.year) + i64::from(yoe) - 1)?;
        let months = checked_sub(fields.remove(ChronoField::MonthOfYear).chrono_unwrap()?, 1)?;
        let days = checked_sub(fields.remove(ChronoField::DayOfMonth).chrono_unwrap()?, 1)?;
        let date = validate(IsoDate::new(year, 1, 1)?)?;
        return validate(date.plus_months(months)?.plus_days(days)?);
    }
    let moy = range(ChronoField::MonthOfYear)?.check_valid_int_value(
        fields.remove(ChronoField::MonthOfYear).chrono_unwrap()?,
        ChronoField::MonthOfYear,
    )?;
    let mut dom = range(ChronoField::DayOfMonth)?.check_valid_int_value(
        fields.remove(ChronoField::DayOfMonth).chrono_unwrap()?,
        ChronoField::DayOfMonth,
    )?;
    if style == ResolverStyle::Smart {
        if yoe < 1 {
            return Err(
                ChronoError::range().with_message(alloc::format!("invalid year-of-era: {yoe}"))
            );
        }
        let year = int_year(i64::from(era.start.year) + i64::from(yoe) - 1)?;
        if dom > 28 {
            dom = dom.min(i32::from(crate::iso::days_in_month(year, moy as u8)));
        }
        let date = validate(IsoDate::new(year, moy as u8, dom as u8)?)?;
        let actual_era = era_from(date)?;
        if actual_era.value != era.value {
            // Tolerated only within a year of the era transition.
            if (actual_era.value - era.value).abs() > 1 {
                return Err(ChronoError::range().with_message(alloc::format!(
                    "invalid era/year-of-era: {} {yoe}",
                    era.name
                )));
            }
            if year_of_era(date)? != 1 && yoe != 1 {
                return Err(ChronoError::range().with_message(alloc::format!(
                    "invalid era/year-of-era: {} {yoe}",
                    era.name
                )));
            }
        }
        return Ok(date);
    }
    date_era(era, i64::from(yoe), moy as u8, dom as u8)
}

fn resolve_eyd(
    fields: &mut crate::fields::FieldMap,
    style: ResolverStyle,
    era: &'static JapaneseEraData,
    yoe: i32,
) -> ChronoResult<IsoDate> {
    use crate::utils::checked_sub;
    use crate::ChronoUnwrap;

    if style.is_lenient() {
        let year = int_year(i64::from(era.start.year) + i64::from(yoe) - 1)?;
        let days = checked_sub(fields.remove(ChronoField::DayOfYear).chrono_unwrap()?, 1)?;
        let date = validate(IsoDate::from_year_day(year, 1)?)?;
        return validate(date.plus_days(days)?);
    }
    let doy = range(ChronoField::DayOfYear)?.check_valid_int_value(
        fields.remove(ChronoField::DayOfYear).chrono_unwrap()?,
        ChronoField::DayOfYear,
    )?;
    // Smart is the same as strict here.
    date_era_year_day(era, i64::from(yoe), i64::from(doy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_lookup_by_date() {
        let showa = era_from(IsoDate::new_unchecked(1989, 1, 7)).unwrap();
        assert_eq!(showa.name, tinystr!(16, "showa"));
        let heisei = era_from(IsoDate::new_unchecked(1989, 1, 8)).unwrap();
        assert_eq!(heisei.name, tinystr!(16, "heisei"));
        assert!(era_from(IsoDate::new_unchecked(1868, 9, 7)).is_err());
    }

    #[test]
    fn era_bounded_construction() {
        let heisei = era_of(2).unwrap();
        let date = date_era(heisei, 1, 1, 8).unwrap();
        assert_eq!(date, IsoDate::new_unchecked(1989, 1, 8));
        // Heisei 1 January 7th predates the era start.
        assert!(date_era(heisei, 1, 1, 7).is_err());

        let showa = era_of(1).unwrap();
        // Showa 64 ended January 7th.
        assert!(date_era(showa, 64, 1, 7).is_ok());
        assert!(date_era(showa, 64, 1, 8).is_err());
    }

    #[test]
    fn first_year_day_of_year_counts_from_era_start() {
        let heisei = era_of(2).unwrap();
        // 1989-01-08 is Heisei 1, day-of-year 1.
        let date = date_era_year_day(heisei, 1, 1).unwrap();
        assert_eq!(date, IsoDate::new_unchecked(1989, 1, 8));
        assert_eq!(day_of_year(date).unwrap(), 1);
        // 1989 has 365 days and Heisei starts on day 8, so its first
        // year holds 358 days.
        assert!(date_era_year_day(heisei, 1, 358).is_ok());
        assert!(date_era_year_day(heisei, 1, 359).is_err());
        // The second year is a plain calendar year again.
        let second = date_era_year_day(heisei, 2, 60).unwrap();
        assert_eq!(second, IsoDate::new_unchecked(1990, 3, 1));
    }

    #[test]
    fn proleptic_year_validates_era_span() {
        // Taisho ran 1912..1926, 15 partial calendar years.
        assert_eq!(proleptic_year(0, 15).unwrap(), 1926);
        assert!(proleptic_year(0, 16).is_err());
        assert_eq!(proleptic_year(2, 31).unwrap(), 2019);
    }

    #[test]
    fn minimum_supported_date() {
        assert!(validate(IsoDate::new_unchecked(1872, 12, 31)).is_err());
        assert!(validate(MIN_DATE).is_ok());
        let meiji = era_of(-1).unwrap();
        assert!(date_era(meiji, 5, 1, 1).is_err());
        assert!(date_era(meiji, 6, 1, 1).is_ok());
    }

    #[test]
    fn aligned_fields_are_unsupported() {
        let err = range(ChronoField::AlignedWeekOfMonth).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Unsupported);
        assert!(range(ChronoField::DayOfMonth).is_ok());
    }

    #[test]
    fn day_of_year_range_reflects_truncated_first_years() {
        let range = range(ChronoField::DayOfYear).unwrap();
        assert_eq!(range.min(), 1);
        assert_eq!(range.max(), 366);
        // Showa started December 25th 1926, leaving only 7 days in its
        // first year; no era starts deeper into a calendar year.
        assert_eq!(range.smallest_max(), 7);
    }
}
