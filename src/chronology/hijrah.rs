//! The Hijrah (Islamic) calendar system.
//!
//! Arithmetic variant built on a 30-year cycle of 10,631 days with
//! eleven leap years per cycle. Because the observed calendar drifts
//! from the arithmetic one, a deviation table can be registered that
//! shifts individual month boundaries by whole days; all conversions
//! read the registered snapshot, falling back to the arithmetic
//! defaults.

use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::{
    fields::{ChronoField, ValueRange},
    iso::IsoDate,
    ChronoError, ChronoResult,
};

/// The minimum valid year-of-era.
pub(crate) const MIN_YEAR_OF_ERA: i64 = 1;
/// The maximum valid year-of-era.
pub(crate) const MAX_YEAR_OF_ERA: i64 = 9999;

/// Epoch day of Hijrah year 1, month 1, day 1 (0622-07-19 ISO).
const EPOCH_OFFSET: i64 = -492_148;

/// Days in one 30-year cycle.
const CYCLE_DAYS: i64 = 10_631;

/// Cycles covered by the adjustable cycle-start table, enough for year
/// 9999.
const MAX_CYCLE: usize = 334;

/// Day-of-year at the start of each month in a common year, 0-based.
const NUM_DAYS: [i32; 12] = [0, 30, 59, 89, 118, 148, 177, 207, 236, 266, 295, 325];
/// Day-of-year at the start of each month in a leap year, 0-based.
/// Identical to the common-year table; leap years only lengthen the
/// final month.
const LEAP_NUM_DAYS: [i32; 12] = NUM_DAYS;
/// Month lengths in a common year.
const MONTH_LENGTH: [i32; 12] = [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29];
/// Month lengths in a leap year.
const LEAP_MONTH_LENGTH: [i32; 12] = [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 30];

/// Day-of-cycle at the start of each year of the 30-year cycle.
const CYCLE_YEAR_START: [i32; 30] = [
    0, 354, 709, 1063, 1417, 1772, 2126, 2481, 2835, 3189, 3544, 3898, 4252, 4607, 4961, 5315,
    5670, 6024, 6379, 6733, 7087, 7442, 7796, 8150, 8505, 8859, 9214, 9568, 9922, 10277,
];

/// Whether the given proleptic (or era) year is a Hijrah leap year.
#[inline]
pub(crate) fn is_leap_year(year: i64) -> bool {
    (14 + 11 * year.abs()) % 30 < 11
}

// ==== Deviation tables ====

/// The adjusted tables produced by a registered deviation config.
#[derive(Debug, Clone)]
struct DeviationTables {
    /// Per deviating year, day-of-year at each month start.
    month_days: BTreeMap<i32, [i32; 12]>,
    /// Per deviating year, the length of each month.
    month_lengths: BTreeMap<i32, [i32; 12]>,
    /// Per deviating cycle, day-of-cycle at each year start.
    cycle_years: BTreeMap<i32, [i32; 30]>,
    /// Day at the start of each 30-year cycle.
    cycles: Vec<i64>,
    least_max_day_of_month: i32,
    max_day_of_month: i32,
    least_max_day_of_year: i32,
    max_day_of_year: i32,
}

impl Default for DeviationTables {
    fn default() -> Self {
        Self {
            month_days: BTreeMap::new(),
            month_lengths: BTreeMap::new(),
            cycle_years: BTreeMap::new(),
            cycles: (0..MAX_CYCLE as i64).map(|i| i * CYCLE_DAYS).collect(),
            least_max_day_of_month: 29,
            max_day_of_month: 30,
            least_max_day_of_year: 354,
            max_day_of_year: 355,
        }
    }
}

static TABLES: AtomicPtr<DeviationTables> = AtomicPtr::new(ptr::null_mut());

fn tables() -> Option<&'static DeviationTables> {
    let ptr = TABLES.load(Ordering::Acquire);
    if ptr.is_null() {
        None
    } else {
        // Registered pointers are leaked and never freed.
        Some(unsafe { &*ptr })
    }
}

fn default_month_days(leap: bool) -> [i32; 12] {
    if leap {
        LEAP_NUM_DAYS
    } else {
        NUM_DAYS
    }
}

fn default_month_lengths(leap: bool) -> [i32; 12] {
    if leap {
        LEAP_MONTH_LENGTH
    } else {
        MONTH_LENGTH
    }
}

fn month_days_of(year: i64) -> [i32; 12] {
    if let Some(t) = tables() {
        if let Ok(key) = i32::try_from(year) {
            if let Some(days) = t.month_days.get(&key) {
                return *days;
            }
        }
    }
    default_month_days(is_leap_year(year))
}

fn month_lengths_of(year: i64) -> [i32; 12] {
    if let Some(t) = tables() {
        if let Ok(key) = i32::try_from(year) {
            if let Some(lengths) = t.month_lengths.get(&key) {
                return *lengths;
            }
        }
    }
    default_month_lengths(is_leap_year(year))
}

fn cycle_years_of(cycle: i64) -> [i32; 30] {
    if let Some(t) = tables() {
        if let Ok(key) = i32::try_from(cycle) {
            if let Some(years) = t.cycle_years.get(&key) {
                return *years;
            }
        }
    }
    CYCLE_YEAR_START
}

fn cycle_start(cycle: i64) -> i64 {
    if let Some(t) = tables() {
        if (0..t.cycles.len() as i64).contains(&cycle) {
            return t.cycles[cycle as usize];
        }
    }
    cycle * CYCLE_DAYS
}

fn max_day_of_month() -> i64 {
    i64::from(tables().map_or(30, |t| t.max_day_of_month))
}

fn least_max_day_of_month() -> i64 {
    i64::from(tables().map_or(29, |t| t.least_max_day_of_month))
}

fn max_day_of_year() -> i64 {
    i64::from(tables().map_or(355, |t| t.max_day_of_year))
}

fn least_max_day_of_year() -> i64 {
    i64::from(tables().map_or(354, |t| t.least_max_day_of_year))
}

// ==== Field conversion ====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HijrahFields {
    pub(crate) era: i32,
    pub(crate) year_of_era: i32,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) day_of_year: u16,
}

impl HijrahFields {
    pub(crate) fn proleptic_year(&self) -> i64 {
        if self.era == 1 {
            i64::from(self.year_of_era)
        } else {
            1 - i64::from(self.year_of_era)
        }
    }
}

/// Days at the start of the given proleptic year, offset so that
/// adding a 1-based day-of-year yields the epoch day.
fn year_start_epoch_days(proleptic_year: i64) -> i64 {
    // Truncating division mirrors the cycle layout around year zero.
    let cycle = (proleptic_year - 1) / 30;
    let year_in_cycle = (proleptic_year - 1) % 30;
    let mut day_in_cycle = i64::from(cycle_years_of(cycle)[year_in_cycle.unsigned_abs() as usize]);
    if year_in_cycle < 0 {
        day_in_cycle = -day_in_cycle;
    }
    cycle_start(cycle) + day_in_cycle + EPOCH_OFFSET - 1
}

/// Epoch day of the given Hijrah proleptic year, month, and day.
pub(crate) fn to_epoch_days(proleptic_year: i64, month: u8, day: u8) -> i64 {
    year_start_epoch_days(proleptic_year)
        + i64::from(month_days_of(proleptic_year)[usize::from(month - 1)])
        + i64::from(day)
}

fn cycle_number(days_since_epoch: i64) -> i64 {
    if let Some(t) = tables() {
        for (i, start) in t.cycles.iter().enumerate() {
            if days_since_epoch < *start {
                return i as i64 - 1;
            }
        }
    } else {
        for i in 0..MAX_CYCLE as i64 {
            if days_since_epoch < i * CYCLE_DAYS {
                return i - 1;
            }
        }
    }
    days_since_epoch / CYCLE_DAYS
}

fn year_in_cycle(cycle: i64, day_of_cycle: i64) -> usize {
    let starts = cycle_years_of(cycle);
    if day_of_cycle == 0 {
        return 0;
    }
    if day_of_cycle > 0 {
        for (i, start) in starts.iter().enumerate() {
            if day_of_cycle < i64::from(*start) {
                return i - 1;
            }
        }
    } else {
        let day = -day_of_cycle;
        for (i, start) in starts.iter().enumerate() {
            if day <= i64::from(*start) {
                return i - 1;
            }
        }
    }
    29
}

/// Splits an epoch day into Hijrah era, year, month, day, and
/// day-of-year.
pub(crate) fn date_info(epoch_days: i64) -> ChronoResult<HijrahFields> {
    let days = epoch_days - EPOCH_OFFSET;

    let (era, year, day_of_year_0) = if days >= 0 {
        let cycle = cycle_number(days);
        let day_of_cycle = days - cycle_start(cycle);
        let yic = year_in_cycle(cycle, day_of_cycle);
        let doy = day_of_cycle - i64::from(cycle_years_of(cycle)[yic]);
        (1, cycle * 30 + yic as i64 + 1, doy)
    } else {
        let mut cycle = days / CYCLE_DAYS;
        let mut day_of_cycle = days % CYCLE_DAYS;
        if day_of_cycle == 0 {
            day_of_cycle = -CYCLE_DAYS;
            cycle += 1;
        }
        let yic = year_in_cycle(cycle, day_of_cycle);
        let doy = i64::from(cycle_years_of(cycle)[yic]) + day_of_cycle;
        let year = 1 - (cycle * 30 - yic as i64);
        let doy = doy + if is_leap_year(year) { 355 } else { 354 };
        (0, year, doy)
    };

    let month_starts = month_days_of(if era == 1 { year } else { 1 - year });
    let month_0 = month_starts
        .iter()
        .position(|start| day_of_year_0 < i64::from(*start))
        .map_or(11, |i| i - 1);
    let day_0 = if month_0 > 0 {
        day_of_year_0 - i64::from(month_starts[month_0])
    } else {
        day_of_year_0
    };

    if !(MIN_YEAR_OF_ERA..=MAX_YEAR_OF_ERA).contains(&year) {
        return Err(ChronoError::range().with_message("invalid year of Hijrah era"));
    }
    let day = day_0 + 1;
    let day_of_year = day_of_year_0 + 1;
    if day < 1 || day > max_day_of_month() {
        return Err(ChronoError::range().with_message("invalid day of month of Hijrah date"));
    }
    if day_of_year < 1 || day_of_year > max_day_of_year() {
        return Err(ChronoError::range().with_message("invalid day of year of Hijrah date"));
    }

    Ok(HijrahFields {
        era,
        year_of_era: year as i32,
        month: month_0 as u8 + 1,
        day: day as u8,
        day_of_year: day_of_year as u16,
    })
}

fn check_year_of_era(proleptic_year: i64) -> ChronoResult<()> {
    let year_of_era = if proleptic_year >= 1 {
        proleptic_year
    } else {
        1 - proleptic_year
    };
    if !(MIN_YEAR_OF_ERA..=MAX_YEAR_OF_ERA).contains(&year_of_era) {
        return Err(ChronoError::range().with_message("invalid year of Hijrah era"));
    }
    Ok(())
}

/// Constructs a Hijrah date, validating that the fields name a real
/// day of the calendar.
pub(crate) fn date(proleptic_year: i64, month: u8, day: u8) -> ChronoResult<IsoDate> {
    check_year_of_era(proleptic_year)?;
    if !(1..=12).contains(&month) {
        return Err(ChronoError::range().with_message("invalid month of Hijrah date"));
    }
    if i64::from(day) < 1 || i64::from(day) > max_day_of_month() {
        return Err(ChronoError::range().with_message(alloc::format!(
            "invalid day of month of Hijrah date, day {day} greater than {} or less than 1",
            max_day_of_month()
        )));
    }
    let epoch_days = to_epoch_days(proleptic_year, month, day);
    let info = date_info(epoch_days)?;
    if info.proleptic_year() != proleptic_year || info.month != month || info.day != day {
        return Err(ChronoError::range().with_message(alloc::format!(
            "invalid Hijrah date: {proleptic_year:04}-{month:02}-{day:02}"
        )));
    }
    IsoDate::from_epoch_days(epoch_days)
}

/// Constructs a Hijrah date from a proleptic year and day-of-year.
pub(crate) fn date_year_day(proleptic_year: i64, day_of_year: i64) -> ChronoResult<IsoDate> {
    check_year_of_era(proleptic_year)?;
    if day_of_year < 1 || day_of_year > year_length(proleptic_year) {
        return Err(ChronoError::range().with_message("invalid day of year of Hijrah date"));
    }
    IsoDate::from_epoch_days(year_start_epoch_days(proleptic_year) + day_of_year)
}

/// The number of days in the given month.
pub(crate) fn month_length(proleptic_year: i64, month: u8) -> i64 {
    i64::from(month_lengths_of(proleptic_year)[usize::from(month - 1)])
}

/// The number of days in the given year, the distance between
/// consecutive year starts so adjusted tables are honored.
pub(crate) fn year_length(proleptic_year: i64) -> i64 {
    year_start_epoch_days(proleptic_year + 1) - year_start_epoch_days(proleptic_year)
}

pub(crate) fn range(field: ChronoField) -> ValueRange {
    match field {
        ChronoField::DayOfMonth => {
            ValueRange::of_varied(1, least_max_day_of_month(), max_day_of_month())
        }
        ChronoField::DayOfYear => {
            ValueRange::of_varied(1, least_max_day_of_year(), max_day_of_year())
        }
        ChronoField::YearOfEra => ValueRange::of(MIN_YEAR_OF_ERA, MAX_YEAR_OF_ERA),
        ChronoField::Year => ValueRange::of(1 - MAX_YEAR_OF_ERA, MAX_YEAR_OF_ERA),
        ChronoField::ProlepticMonth => {
            ValueRange::of((1 - MAX_YEAR_OF_ERA) * 12, MAX_YEAR_OF_ERA * 12 + 11)
        }
        _ => field.range(),
    }
}

// ==== Deviation registration ====

/// Registers a deviation configuration adjusting the arithmetic
/// calendar.
///
/// Each entry has the form `startYear/startMonth-endYear/endMonth:offset`
/// with 0-based months; entries are separated by `;` or line breaks.
/// The boundary between `endMonth` and its successor moves by `offset`
/// days, with all dependent tables shifted to match. Registration is
/// accepted once for the process; a second call errors.
pub fn register_deviations(config: &str) -> ChronoResult<()> {
    let mut built = DeviationTables::default();
    for (idx, line) in config.lines().enumerate() {
        let num = idx + 1;
        for entry in line.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (sy, sm, ey, em, offset) = parse_entry(entry, num)?;
            apply_deviation(&mut built, sy, sm, ey, em, offset, num)?;
        }
    }
    let data = Box::into_raw(Box::new(built));
    match TABLES.compare_exchange(ptr::null_mut(), data, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => {
            #[cfg(feature = "log")]
            log::info!("registered Hijrah deviation tables");
            Ok(())
        }
        Err(_) => {
            drop(unsafe { Box::from_raw(data) });
            Err(ChronoError::registration()
                .with_message("Hijrah deviation tables have already been registered"))
        }
    }
}

fn parse_entry(entry: &str, num: usize) -> ChronoResult<(i32, usize, i32, usize, i32)> {
    let syntax = |msg: alloc::string::String| ChronoError::syntax().with_message(msg);
    let Some((range_part, offset_part)) = entry.split_once(':') else {
        return Err(syntax(alloc::format!(
            "offset has incorrect format at line {num}: {entry}"
        )));
    };
    let offset: i32 = offset_part.trim().parse().map_err(|_| {
        syntax(alloc::format!("offset is not properly set at line {num}"))
    })?;
    let Some((start_part, end_part)) = range_part.split_once('-') else {
        return Err(syntax(alloc::format!(
            "start and end year/month has incorrect format at line {num}: {entry}"
        )));
    };
    let parse_year_month = |part: &str, which: &str| -> ChronoResult<(i32, usize)> {
        let Some((year_str, month_str)) = part.split_once('/') else {
            return Err(syntax(alloc::format!(
                "{which} year/month has incorrect format at line {num}"
            )));
        };
        let year = year_str.trim().parse().map_err(|_| {
            syntax(alloc::format!("{which} year is not properly set at line {num}"))
        })?;
        let month = month_str.trim().parse().map_err(|_| {
            syntax(alloc::format!("{which} month is not properly set at line {num}"))
        })?;
        Ok((year, month))
    };
    let (start_year, start_month) = parse_year_month(start_part, "start")?;
    let (end_year, end_month) = parse_year_month(end_part, "end")?;
    Ok((start_year, start_month, end_year, end_month, offset))
}

fn apply_deviation(
    t: &mut DeviationTables,
    start_year: i32,
    start_month: usize,
    end_year: i32,
    end_month: usize,
    offset: i32,
    num: usize,
) -> ChronoResult<()> {
    let bad = |msg: &str| {
        Err(ChronoError::syntax()
            .with_message(alloc::format!("invalid deviation at line {num}: {msg}")))
    };
    if start_year < 1 || end_year < 1 {
        return bad("year before 1");
    }
    if start_month > 11 || end_month > 11 {
        return bad("month outside 0..=11");
    }
    if end_year > MAX_YEAR_OF_ERA as i32 {
        return bad("end year after 9999");
    }
    if end_year < start_year || (end_year == start_year && end_month < start_month) {
        return bad("range end before range start");
    }

    // Start year: months after the boundary begin `offset` days
    // earlier, the boundary month itself shrinks.
    let mut start_days = *t
        .month_days
        .get(&start_year)
        .unwrap_or(&default_month_days(is_leap_year(i64::from(start_year))));
    for days in start_days.iter_mut().skip(start_month + 1) {
        *days -= offset;
    }
    t.month_days.insert(start_year, start_days);

    let mut start_lengths = *t
        .month_lengths
        .get(&start_year)
        .unwrap_or(&default_month_lengths(is_leap_year(i64::from(start_year))));
    start_lengths[start_month] -= offset;
    t.month_lengths.insert(start_year, start_lengths);

    if start_year != end_year {
        // Later years of the start cycle begin earlier.
        let s_cycle = (start_year - 1) / 30;
        let s_yic = ((start_year - 1) % 30) as usize;
        let mut starts = t
            .cycle_years
            .get(&s_cycle)
            .copied()
            .unwrap_or(CYCLE_YEAR_START);
        for start in starts.iter_mut().skip(s_yic + 1) {
            *start -= offset;
        }
        t.cycle_years.insert(s_cycle, starts);

        let e_cycle = (end_year - 1) / 30;
        if s_cycle != e_cycle {
            for cycle in t.cycles.iter_mut().skip(s_cycle as usize + 1) {
                *cycle -= i64::from(offset);
            }
            for cycle in t.cycles.iter_mut().skip(e_cycle as usize + 1) {
                *cycle += i64::from(offset);
            }
        }

        // Later years of the end cycle shift back.
        let e_yic = ((end_year - 1) % 30) as usize;
        let mut ends = t
            .cycle_years
            .get(&e_cycle)
            .copied()
            .unwrap_or(CYCLE_YEAR_START);
        for start in ends.iter_mut().skip(e_yic + 1) {
            *start += offset;
        }
        t.cycle_years.insert(e_cycle, ends);
    }

    // End year: months after the boundary begin `offset` days later,
    // the boundary month grows back.
    let mut end_days = *t
        .month_days
        .get(&end_year)
        .unwrap_or(&default_month_days(is_leap_year(i64::from(end_year))));
    for days in end_days.iter_mut().skip(end_month + 1) {
        *days += offset;
    }
    t.month_days.insert(end_year, end_days);

    let mut end_lengths = *t
        .month_lengths
        .get(&end_year)
        .unwrap_or(&default_month_lengths(is_leap_year(i64::from(end_year))));
    end_lengths[end_month] += offset;
    t.month_lengths.insert(end_year, end_lengths);

    // Refresh the aggregate bounds.
    let start_lengths = t.month_lengths[&start_year];
    let end_lengths = t.month_lengths[&end_year];
    let start_days = t.month_days[&start_year];
    let end_days = t.month_days[&end_year];
    let start_month_length = start_lengths[start_month];
    let end_month_length = end_lengths[end_month];
    let start_year_days = start_days[11] + start_lengths[11];
    let end_year_days = end_days[11] + end_lengths[11];

    t.max_day_of_month = t
        .max_day_of_month
        .max(start_month_length)
        .max(end_month_length);
    t.least_max_day_of_month = t
        .least_max_day_of_month
        .min(start_month_length)
        .min(end_month_length);
    t.max_day_of_year = t.max_day_of_year.max(start_year_days).max(end_year_days);
    t.least_max_day_of_year = t
        .least_max_day_of_year
        .min(start_year_days)
        .min(end_year_days);
    Ok(())
}
