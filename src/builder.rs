//! Coordinates parsed field values into dates, times, and instants.
//!
//! `DateTimeBuilder` owns the field bag and runs the full resolution
//! pipeline: instant fields split into a local epoch day and second of
//! day, the chronology resolves the date fields, the time fields merge
//! down to hour/minute/second/nano, custom hooks run to a fixed point,
//! and whatever remains is cross-checked against the result.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::{
    chronology::{ChronoDate, Chronology},
    fields::{ChronoField, FieldMap},
    iso::IsoTime,
    options::ResolverStyle,
    utils, ChronoError, ChronoResult, ChronoUnwrap, NS_PER_DAY, SECS_PER_DAY,
};

/// How many fixed-point iterations the hook loop may take before
/// resolution is declared non-converging.
const RESOLVE_LOOP_CAP: u32 = 100;

// ==== UtcOffset ====

/// A fixed offset from UTC in seconds, within ±18 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// UTC itself.
    pub const UTC: Self = Self(0);

    /// Creates an offset from a second count, validating ±18h.
    pub fn from_seconds(seconds: i32) -> ChronoResult<Self> {
        ChronoField::OffsetSeconds.check_valid_value(i64::from(seconds))?;
        Ok(Self(seconds))
    }

    /// The offset in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> i32 {
        self.0
    }
}

// ==== FieldResolver ====

/// A resolution hook for fields the built-in pipeline does not know.
///
/// Hooks run after date and time resolution, inside a fixed-point
/// loop: each returns whether it changed the state, and the loop
/// repeats while any hook reports a change. A hook that never settles
/// exhausts the iteration cap and fails resolution.
pub trait FieldResolver {
    /// Inspects and rewrites the resolution state. Returns `true` if
    /// anything changed.
    fn resolve(
        &self,
        fields: &mut FieldMap,
        date: &mut Option<ChronoDate>,
        time: &mut Option<IsoTime>,
        style: ResolverStyle,
    ) -> ChronoResult<bool>;
}

// ==== Resolved ====

/// The outcome of [`DateTimeBuilder::resolve`].
#[derive(Debug)]
#[non_exhaustive]
pub struct Resolved {
    /// The resolved date, if the fields determined one.
    pub date: Option<ChronoDate>,
    /// The resolved time of day, if the fields determined one.
    pub time: Option<IsoTime>,
    /// Whole days carried out of the time fields that could not be
    /// folded into a date.
    pub excess_days: i64,
    /// Fields the pipeline could neither use nor cross-check.
    pub leftover: FieldMap,
    /// The instant, when date, time, and an offset were all known.
    pub instant_seconds: Option<i64>,
}

impl Resolved {
    /// The resolved date, erroring when the fields did not form one.
    pub fn into_date(self) -> ChronoResult<ChronoDate> {
        self.date.ok_or_else(|| {
            ChronoError::range().with_message("unable to resolve a date from the given fields")
        })
    }

    /// The resolved date and time pair.
    pub fn into_datetime(self) -> ChronoResult<(ChronoDate, IsoTime)> {
        let time = self.time.ok_or_else(|| {
            ChronoError::range().with_message("unable to resolve a time from the given fields")
        })?;
        Ok((self.into_date()?, time))
    }
}

// ==== DateTimeBuilder ====

/// Collects field values and resolves them against a calendar.
pub struct DateTimeBuilder {
    chronology: Chronology,
    style: ResolverStyle,
    fields: FieldMap,
    offset: Option<UtcOffset>,
    resolvers: Vec<Box<dyn FieldResolver>>,
}

impl fmt::Debug for DateTimeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeBuilder")
            .field("chronology", &self.chronology)
            .field("style", &self.style)
            .field("fields", &self.fields)
            .field("offset", &self.offset)
            .field("resolvers", &self.resolvers.len())
            .finish()
    }
}

impl DateTimeBuilder {
    /// Creates a builder resolving against `chronology` with the
    /// default smart style.
    #[must_use]
    pub fn new(chronology: Chronology) -> Self {
        Self {
            chronology,
            style: ResolverStyle::default(),
            fields: FieldMap::new(),
            offset: None,
            resolvers: Vec::new(),
        }
    }

    /// Sets the resolver style.
    #[must_use]
    pub fn with_style(mut self, style: ResolverStyle) -> Self {
        self.style = style;
        self
    }

    /// Supplies a UTC offset for instant resolution.
    #[must_use]
    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Registers a custom resolution hook.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn FieldResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Adds a field value, erroring when it conflicts with a value
    /// already held.
    pub fn add_field(&mut self, field: ChronoField, value: i64) -> ChronoResult<()> {
        self.fields.insert(field, value)
    }

    /// Adds every entry of `parsed`, conflict-checked.
    pub fn add_parsed(&mut self, parsed: &FieldMap) -> ChronoResult<()> {
        for (field, value) in parsed.iter() {
            self.fields.insert(field, value)?;
        }
        Ok(())
    }

    /// The fields collected so far.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Runs the resolution pipeline over the collected fields.
    pub fn resolve(&mut self) -> ChronoResult<Resolved> {
        let mut fields = self.fields;
        if let Some(offset) = self.offset {
            fields.insert(ChronoField::OffsetSeconds, i64::from(offset.seconds()))?;
        }

        merge_instant(&mut fields)?;
        let mut date = self.chronology.resolve_date(&mut fields, self.style)?;
        merge_time(&mut fields, self.style)?;
        let mut time = None;
        let mut excess_days = 0;

        // Custom hooks run to a fixed point; a hook that keeps
        // reporting changes exhausts the cap.
        let mut iterations = 0u32;
        loop {
            let mut changed = false;
            for resolver in &self.resolvers {
                if resolver.resolve(&mut fields, &mut date, &mut time, self.style)? {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
            iterations += 1;
            if iterations >= RESOLVE_LOOP_CAP {
                return Err(ChronoError::general().with_message(
                    "badly written field: resolving did not converge within 100 iterations",
                ));
            }
            if date.is_none() {
                date = self.chronology.resolve_date(&mut fields, self.style)?;
            }
            merge_time(&mut fields, self.style)?;
        }

        if time.is_none() {
            if let Some((resolved, excess)) = resolve_time_inferred(&mut fields, self.style)? {
                time = Some(resolved);
                excess_days = excess;
            }
        }

        cross_check(&mut fields, date.as_ref(), time)?;

        if excess_days != 0 {
            if let (Some(resolved), Some(_)) = (date, time) {
                date = Some(resolved.plus_days(excess_days)?);
                excess_days = 0;
            }
        }

        let mut instant_seconds = None;
        if let (Some(resolved_date), Some(resolved_time)) = (date, time) {
            if let Some(offset) = fields.get(ChronoField::OffsetSeconds) {
                let offset = ChronoField::OffsetSeconds.check_valid_value(offset)?;
                let local = utils::checked_add(
                    utils::checked_mul(resolved_date.to_epoch_days(), SECS_PER_DAY)?,
                    resolved_time.second_of_day(),
                )?;
                instant_seconds = Some(utils::checked_sub(local, offset)?);
            }
        }

        Ok(Resolved {
            date,
            time,
            excess_days,
            leftover: fields,
            instant_seconds,
        })
    }
}

/// Splits an instant plus offset into a local epoch day and second of
/// day.
fn merge_instant(fields: &mut FieldMap) -> ChronoResult<()> {
    if !fields.contains(ChronoField::InstantSeconds) {
        return Ok(());
    }
    let Some(offset) = fields.get(ChronoField::OffsetSeconds) else {
        return Ok(());
    };
    let offset = ChronoField::OffsetSeconds.check_valid_value(offset)?;
    let instant = fields.remove(ChronoField::InstantSeconds).chrono_unwrap()?;
    let local = utils::checked_add(instant, offset)?;
    fields.insert(ChronoField::EpochDay, utils::floor_div(local, SECS_PER_DAY))?;
    fields.insert(
        ChronoField::SecondOfDay,
        utils::floor_mod(local, SECS_PER_DAY),
    )?;
    Ok(())
}

/// Merges the composite time fields down to hour-of-day,
/// minute-of-hour, second-of-minute, and nano-of-second.
fn merge_time(fields: &mut FieldMap, style: ResolverStyle) -> ChronoResult<()> {
    if let Some(ch) = fields.remove(ChronoField::ClockHourOfDay) {
        if !style.is_lenient() && !(style == ResolverStyle::Smart && ch == 0) {
            ChronoField::ClockHourOfDay.check_valid_value(ch)?;
        }
        fields.insert(ChronoField::HourOfDay, if ch == 24 { 0 } else { ch })?;
    }
    if let Some(ch) = fields.remove(ChronoField::ClockHourOfAmpm) {
        if !style.is_lenient() && !(style == ResolverStyle::Smart && ch == 0) {
            ChronoField::ClockHourOfAmpm.check_valid_value(ch)?;
        }
        fields.insert(ChronoField::HourOfAmpm, if ch == 12 { 0 } else { ch })?;
    }
    if !style.is_lenient() {
        if let Some(ampm) = fields.get(ChronoField::AmpmOfDay) {
            ChronoField::AmpmOfDay.check_valid_value(ampm)?;
        }
        if let Some(hap) = fields.get(ChronoField::HourOfAmpm) {
            ChronoField::HourOfAmpm.check_valid_value(hap)?;
        }
    }
    if fields.contains(ChronoField::AmpmOfDay) && fields.contains(ChronoField::HourOfAmpm) {
        let ampm = fields.remove(ChronoField::AmpmOfDay).chrono_unwrap()?;
        let hap = fields.remove(ChronoField::HourOfAmpm).chrono_unwrap()?;
        fields.insert(
            ChronoField::HourOfDay,
            utils::checked_add(utils::checked_mul(ampm, 12)?, hap)?,
        )?;
    }
    if let Some(nod) = fields.remove(ChronoField::NanoOfDay) {
        if !style.is_lenient() {
            ChronoField::NanoOfDay.check_valid_value(nod)?;
        }
        fields.insert(ChronoField::SecondOfDay, utils::floor_div(nod, 1_000_000_000))?;
        fields.insert(ChronoField::NanoOfSecond, utils::floor_mod(nod, 1_000_000_000))?;
    }
    if let Some(cod) = fields.remove(ChronoField::MicroOfDay) {
        if !style.is_lenient() {
            ChronoField::MicroOfDay.check_valid_value(cod)?;
        }
        fields.insert(ChronoField::SecondOfDay, utils::floor_div(cod, 1_000_000))?;
        fields.insert(ChronoField::MicroOfSecond, utils::floor_mod(cod, 1_000_000))?;
    }
    if let Some(lod) = fields.remove(ChronoField::MilliOfDay) {
        if !style.is_lenient() {
            ChronoField::MilliOfDay.check_valid_value(lod)?;
        }
        fields.insert(ChronoField::SecondOfDay, utils::floor_div(lod, 1_000))?;
        fields.insert(ChronoField::MilliOfSecond, utils::floor_mod(lod, 1_000))?;
    }
    if let Some(sod) = fields.remove(ChronoField::SecondOfDay) {
        if !style.is_lenient() {
            ChronoField::SecondOfDay.check_valid_value(sod)?;
        }
        fields.insert(ChronoField::HourOfDay, utils::floor_div(sod, 3_600))?;
        fields.insert(ChronoField::MinuteOfHour, utils::floor_mod(sod, 3_600) / 60)?;
        fields.insert(ChronoField::SecondOfMinute, utils::floor_mod(sod, 60))?;
    }
    if let Some(mod_) = fields.remove(ChronoField::MinuteOfDay) {
        if !style.is_lenient() {
            ChronoField::MinuteOfDay.check_valid_value(mod_)?;
        }
        fields.insert(ChronoField::HourOfDay, utils::floor_div(mod_, 60))?;
        fields.insert(ChronoField::MinuteOfHour, utils::floor_mod(mod_, 60))?;
    }
    reconcile_sub_second(fields, style)
}

/// Milli and micro of second must agree with nano of second; when
/// nano is absent the most precise of the lower-precision fields
/// stands in for it.
fn reconcile_sub_second(fields: &mut FieldMap, style: ResolverStyle) -> ChronoResult<()> {
    let check = |field: ChronoField, value: i64| -> ChronoResult<i64> {
        if style.is_lenient() {
            Ok(value)
        } else {
            field.check_valid_value(value)
        }
    };
    if let Some(nos) = fields.get(ChronoField::NanoOfSecond) {
        let nos = check(ChronoField::NanoOfSecond, nos)?;
        if let Some(cos) = fields.remove(ChronoField::MicroOfSecond) {
            let cos = check(ChronoField::MicroOfSecond, cos)?;
            if cos != nos / 1_000 {
                return Err(ChronoError::conflict().with_message(alloc::format!(
                    "conflict found: micro-of-second {cos} differs from nano-of-second {nos}"
                )));
            }
        }
        if let Some(los) = fields.remove(ChronoField::MilliOfSecond) {
            let los = check(ChronoField::MilliOfSecond, los)?;
            if los != nos / 1_000_000 {
                return Err(ChronoError::conflict().with_message(alloc::format!(
                    "conflict found: milli-of-second {los} differs from nano-of-second {nos}"
                )));
            }
        }
        return Ok(());
    }
    if let Some(cos) = fields.remove(ChronoField::MicroOfSecond) {
        let cos = check(ChronoField::MicroOfSecond, cos)?;
        let nos = utils::checked_mul(cos, 1_000)?;
        if let Some(los) = fields.remove(ChronoField::MilliOfSecond) {
            let los = check(ChronoField::MilliOfSecond, los)?;
            if los != cos / 1_000 {
                return Err(ChronoError::conflict().with_message(alloc::format!(
                    "conflict found: milli-of-second {los} differs from micro-of-second {cos}"
                )));
            }
        }
        fields.insert(ChronoField::NanoOfSecond, nos)?;
        return Ok(());
    }
    if let Some(los) = fields.remove(ChronoField::MilliOfSecond) {
        let los = check(ChronoField::MilliOfSecond, los)?;
        fields.insert(ChronoField::NanoOfSecond, utils::checked_mul(los, 1_000_000)?)?;
    }
    Ok(())
}

/// Completes a time of day once hour-of-day is known, inferring zero
/// for trailing components. Gaps in the middle (an hour and seconds
/// but no minutes) leave the fields untouched.
fn resolve_time_inferred(
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<Option<(IsoTime, i64)>> {
    let Some(hod) = fields.get(ChronoField::HourOfDay) else {
        return Ok(None);
    };
    let moh = fields.get(ChronoField::MinuteOfHour);
    let som = fields.get(ChronoField::SecondOfMinute);
    let nos = fields.get(ChronoField::NanoOfSecond);
    if moh.is_none() && (som.is_some() || nos.is_some()) {
        return Ok(None);
    }
    if moh.is_some() && som.is_none() && nos.is_some() {
        return Ok(None);
    }

    let result = if style.is_lenient() {
        let mut total = utils::checked_mul(hod, 3_600_000_000_000)?;
        total = utils::checked_add(total, utils::checked_mul(moh.unwrap_or(0), 60_000_000_000)?)?;
        total = utils::checked_add(total, utils::checked_mul(som.unwrap_or(0), 1_000_000_000)?)?;
        total = utils::checked_add(total, nos.unwrap_or(0))?;
        let excess = utils::floor_div(total, NS_PER_DAY);
        let time = IsoTime::from_nano_of_day(utils::floor_mod(total, NS_PER_DAY))?;
        (time, excess)
    } else {
        let mut hod = hod;
        let mut excess = 0;
        if style == ResolverStyle::Smart
            && hod == 24
            && moh.unwrap_or(0) == 0
            && som.unwrap_or(0) == 0
            && nos.unwrap_or(0) == 0
        {
            hod = 0;
            excess = 1;
        }
        let hod = ChronoField::HourOfDay.check_valid_value(hod)?;
        let moh = moh.map_or(Ok(0), |v| ChronoField::MinuteOfHour.check_valid_value(v))?;
        let som = som.map_or(Ok(0), |v| ChronoField::SecondOfMinute.check_valid_value(v))?;
        let nos = nos.map_or(Ok(0), |v| ChronoField::NanoOfSecond.check_valid_value(v))?;
        (
            IsoTime::new(hod as u8, moh as u8, som as u8, nos as u32)?,
            excess,
        )
    };
    fields.remove(ChronoField::HourOfDay);
    fields.remove(ChronoField::MinuteOfHour);
    fields.remove(ChronoField::SecondOfMinute);
    fields.remove(ChronoField::NanoOfSecond);
    Ok(Some(result))
}

/// Every leftover field the resolved date or time supports must agree
/// with it; agreeing fields are consumed, unsupported ones stay.
fn cross_check(
    fields: &mut FieldMap,
    date: Option<&ChronoDate>,
    time: Option<IsoTime>,
) -> ChronoResult<()> {
    let keys: Vec<ChronoField> = fields.keys().collect();
    for field in keys {
        let value = fields.get(field).chrono_unwrap()?;
        if let Some(date) = date {
            if field.is_date_based() {
                match date.get(field) {
                    Ok(actual) => {
                        if actual != value {
                            return Err(ChronoError::conflict().with_message(alloc::format!(
                                "conflict found: {field} {actual} differs from {field} {value} derived from {date}"
                            )));
                        }
                        fields.remove(field);
                        continue;
                    }
                    Err(err) if err.kind() == crate::error::ErrorKind::Unsupported => {}
                    Err(err) => return Err(err),
                }
            }
        }
        if let Some(time) = time {
            if field.is_time_based() {
                if let Some(actual) = time.get(field) {
                    if actual != value {
                        return Err(ChronoError::conflict().with_message(alloc::format!(
                            "conflict found: {field} {actual} differs from {field} {value} derived from the resolved time"
                        )));
                    }
                    fields.remove(field);
                }
            }
        }
    }
    Ok(())
}
