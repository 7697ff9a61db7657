//! Combines a bag of parsed field values into a date.
//!
//! Resolution consumes fields from the bag as it uses them; fields it
//! cannot combine stay behind for the caller to cross-check. The
//! branches run in a fixed priority order: an epoch-day always wins, a
//! proleptic-month splits into year and month, era and year-of-era
//! collapse into a proleptic year, and the remaining combinations all
//! hang off the year.

use crate::{
    chronology::{ChronoDate, Chronology},
    fields::{ChronoField, FieldMap},
    options::ResolverStyle,
    utils, ChronoResult, ChronoUnwrap,
};

pub(crate) fn resolve_date(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<Option<ChronoDate>> {
    if let Some(epoch_day) = fields.remove(ChronoField::EpochDay) {
        if !style.is_lenient() {
            ChronoField::EpochDay.check_valid_value(epoch_day)?;
        }
        return chronology.date_from_epoch_days(epoch_day).map(Some);
    }

    if let Some(months) = fields.remove(ChronoField::ProlepticMonth) {
        if !style.is_lenient() {
            chronology
                .range(ChronoField::ProlepticMonth)?
                .check_valid_value(months, ChronoField::ProlepticMonth)?;
        }
        fields.insert(ChronoField::MonthOfYear, utils::floor_mod(months, 12) + 1)?;
        fields.insert(ChronoField::Year, utils::floor_div(months, 12))?;
    }

    if chronology == Chronology::Japanese {
        if let Some(date) = chronology.resolve_japanese_era_pass(fields, style)? {
            return Ok(Some(ChronoDate::from_iso_unchecked(chronology, date)));
        }
    } else {
        resolve_year_of_era(chronology, fields, style)?;
    }

    if !fields.contains(ChronoField::Year) {
        return Ok(None);
    }
    if fields.contains(ChronoField::MonthOfYear) {
        if fields.contains(ChronoField::DayOfMonth) {
            return resolve_ymd(chronology, fields, style).map(Some);
        }
        if fields.contains(ChronoField::AlignedWeekOfMonth) {
            if fields.contains(ChronoField::AlignedDayOfWeekInMonth) {
                return resolve_ymaa(chronology, fields, style).map(Some);
            }
            if fields.contains(ChronoField::DayOfWeek) {
                return resolve_ymad(chronology, fields, style).map(Some);
            }
        }
    }
    if fields.contains(ChronoField::DayOfYear) {
        return resolve_yd(chronology, fields, style).map(Some);
    }
    if fields.contains(ChronoField::AlignedWeekOfYear) {
        if fields.contains(ChronoField::AlignedDayOfWeekInYear) {
            return resolve_yaa(chronology, fields, style).map(Some);
        }
        if fields.contains(ChronoField::DayOfWeek) {
            return resolve_yad(chronology, fields, style).map(Some);
        }
    }
    Ok(None)
}

/// Collapses era and year-of-era into a proleptic year. The era value
/// is validated in every style, the year-of-era only outside lenient.
fn resolve_year_of_era(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<()> {
    let Some(yoe) = fields.remove(ChronoField::YearOfEra) else {
        if let Some(era) = fields.get(ChronoField::Era) {
            chronology
                .range(ChronoField::Era)?
                .check_valid_value(era, ChronoField::Era)?;
        }
        return Ok(());
    };
    let yoe = if style.is_lenient() {
        yoe
    } else {
        chronology
            .range(ChronoField::YearOfEra)?
            .check_valid_value(yoe, ChronoField::YearOfEra)?
    };

    if let Some(era) = fields.remove(ChronoField::Era) {
        let era = chronology.era_of(era)?;
        let year = chronology.proleptic_year(i64::from(era.value()), yoe)?;
        fields.insert(ChronoField::Year, year)?;
    } else if let Some(year) = fields.get(ChronoField::Year) {
        // Derive the era from the year already in the bag; a mismatch
        // between the two year fields surfaces as a conflict.
        let year = chronology
            .range(ChronoField::Year)?
            .check_valid_value(year, ChronoField::Year)?;
        let era = chronology.date_year_day(year, 1)?.get(ChronoField::Era)?;
        fields.insert(ChronoField::Year, chronology.proleptic_year(era, yoe)?)?;
    } else if style.is_strict() {
        // Strict resolution never invents an era; the year-of-era
        // stays in the bag.
        fields.set(ChronoField::YearOfEra, yoe);
    } else {
        let eras = chronology.eras();
        let last = i64::from(eras[eras.len() - 1].value());
        fields.insert(ChronoField::Year, chronology.proleptic_year(last, yoe)?)?;
    }
    Ok(())
}

fn remove_year(chronology: Chronology, fields: &mut FieldMap) -> ChronoResult<i64> {
    let year = fields.remove(ChronoField::Year).chrono_unwrap()?;
    chronology
        .range(ChronoField::Year)?
        .check_valid_value(year, ChronoField::Year)
}

fn remove_checked(
    chronology: Chronology,
    fields: &mut FieldMap,
    field: ChronoField,
) -> ChronoResult<i64> {
    let value = fields.remove(field).chrono_unwrap()?;
    chronology.range(field)?.check_valid_value(value, field)
}

fn resolve_ymd(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<ChronoDate> {
    let year = remove_year(chronology, fields)?;
    if style.is_lenient() {
        let months = utils::checked_sub(
            fields.remove(ChronoField::MonthOfYear).chrono_unwrap()?,
            1,
        )?;
        let days = utils::checked_sub(
            fields.remove(ChronoField::DayOfMonth).chrono_unwrap()?,
            1,
        )?;
        return chronology
            .date(year, 1, 1)?
            .plus_months(months)?
            .plus_days(days);
    }
    let month = remove_checked(chronology, fields, ChronoField::MonthOfYear)?;
    let mut day = remove_checked(chronology, fields, ChronoField::DayOfMonth)?;
    if style == ResolverStyle::Smart && day > 28 {
        day = day.min(chronology.month_length(year, month as u8)?);
    }
    chronology.date(year, month as u8, day as u8)
}

fn resolve_yd(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<ChronoDate> {
    let year = remove_year(chronology, fields)?;
    if style.is_lenient() {
        let days = utils::checked_sub(
            fields.remove(ChronoField::DayOfYear).chrono_unwrap()?,
            1,
        )?;
        return chronology.date_year_day(year, 1)?.plus_days(days);
    }
    let day_of_year = remove_checked(chronology, fields, ChronoField::DayOfYear)?;
    chronology.date_year_day(year, day_of_year)
}

fn resolve_ymaa(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<ChronoDate> {
    let year = remove_year(chronology, fields)?;
    if style.is_lenient() {
        let months = utils::checked_sub(
            fields.remove(ChronoField::MonthOfYear).chrono_unwrap()?,
            1,
        )?;
        let weeks = utils::checked_sub(
            fields.remove(ChronoField::AlignedWeekOfMonth).chrono_unwrap()?,
            1,
        )?;
        let days = utils::checked_sub(
            fields
                .remove(ChronoField::AlignedDayOfWeekInMonth)
                .chrono_unwrap()?,
            1,
        )?;
        return chronology
            .date(year, 1, 1)?
            .plus_months(months)?
            .plus_weeks(weeks)?
            .plus_days(days);
    }
    let month = remove_checked(chronology, fields, ChronoField::MonthOfYear)?;
    let week = remove_checked(chronology, fields, ChronoField::AlignedWeekOfMonth)?;
    let day = remove_checked(chronology, fields, ChronoField::AlignedDayOfWeekInMonth)?;
    let date = chronology
        .date(year, month as u8, 1)?
        .plus_days((week - 1) * 7 + (day - 1))?;
    if style.is_strict() && date.get(ChronoField::MonthOfYear)? != month {
        return Err(crate::ChronoError::range()
            .with_message("strict mode rejected resolved date as it is in a different month"));
    }
    Ok(date)
}

fn resolve_ymad(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<ChronoDate> {
    let year = remove_year(chronology, fields)?;
    if style.is_lenient() {
        let months = utils::checked_sub(
            fields.remove(ChronoField::MonthOfYear).chrono_unwrap()?,
            1,
        )?;
        let weeks = utils::checked_sub(
            fields.remove(ChronoField::AlignedWeekOfMonth).chrono_unwrap()?,
            1,
        )?;
        let dow = fields.remove(ChronoField::DayOfWeek).chrono_unwrap()?;
        return resolve_aligned(chronology.date(year, 1, 1)?, months, weeks, dow);
    }
    let month = remove_checked(chronology, fields, ChronoField::MonthOfYear)?;
    let week = remove_checked(chronology, fields, ChronoField::AlignedWeekOfMonth)?;
    let dow = remove_checked(chronology, fields, ChronoField::DayOfWeek)?;
    let date = next_or_same(
        chronology
            .date(year, month as u8, 1)?
            .plus_days((week - 1) * 7)?,
        dow as u8,
    )?;
    if style.is_strict() && date.get(ChronoField::MonthOfYear)? != month {
        return Err(crate::ChronoError::range()
            .with_message("strict mode rejected resolved date as it is in a different month"));
    }
    Ok(date)
}

fn resolve_yaa(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<ChronoDate> {
    let year = remove_year(chronology, fields)?;
    if style.is_lenient() {
        let weeks = utils::checked_sub(
            fields.remove(ChronoField::AlignedWeekOfYear).chrono_unwrap()?,
            1,
        )?;
        let days = utils::checked_sub(
            fields
                .remove(ChronoField::AlignedDayOfWeekInYear)
                .chrono_unwrap()?,
            1,
        )?;
        return chronology
            .date_year_day(year, 1)?
            .plus_weeks(weeks)?
            .plus_days(days);
    }
    let week = remove_checked(chronology, fields, ChronoField::AlignedWeekOfYear)?;
    let day = remove_checked(chronology, fields, ChronoField::AlignedDayOfWeekInYear)?;
    let date = chronology
        .date_year_day(year, 1)?
        .plus_days((week - 1) * 7 + (day - 1))?;
    if style.is_strict() && date.get(ChronoField::Year)? != year {
        return Err(crate::ChronoError::range()
            .with_message("strict mode rejected resolved date as it is in a different year"));
    }
    Ok(date)
}

fn resolve_yad(
    chronology: Chronology,
    fields: &mut FieldMap,
    style: ResolverStyle,
) -> ChronoResult<ChronoDate> {
    let year = remove_year(chronology, fields)?;
    if style.is_lenient() {
        let weeks = utils::checked_sub(
            fields.remove(ChronoField::AlignedWeekOfYear).chrono_unwrap()?,
            1,
        )?;
        let dow = fields.remove(ChronoField::DayOfWeek).chrono_unwrap()?;
        return resolve_aligned(chronology.date_year_day(year, 1)?, 0, weeks, dow);
    }
    let week = remove_checked(chronology, fields, ChronoField::AlignedWeekOfYear)?;
    let dow = remove_checked(chronology, fields, ChronoField::DayOfWeek)?;
    let date = next_or_same(
        chronology.date_year_day(year, 1)?.plus_days((week - 1) * 7)?,
        dow as u8,
    )?;
    if style.is_strict() && date.get(ChronoField::Year)? != year {
        return Err(crate::ChronoError::range()
            .with_message("strict mode rejected resolved date as it is in a different year"));
    }
    Ok(date)
}

/// Lenient aligned-week arithmetic. An out-of-range day-of-week
/// normalizes by floor division so that every seven steps moves one
/// whole week, then the date advances to the next-or-same weekday.
fn resolve_aligned(
    base: ChronoDate,
    months: i64,
    weeks: i64,
    day_of_week: i64,
) -> ChronoResult<ChronoDate> {
    let date = base.plus_months(months)?.plus_weeks(weeks)?;
    let carry = utils::floor_div(day_of_week - 1, 7);
    let day_of_week = utils::floor_mod(day_of_week - 1, 7) + 1;
    next_or_same(date.plus_weeks(carry)?, day_of_week as u8)
}

/// Advances to the next date falling on `day_of_week`, staying put if
/// the date already does.
fn next_or_same(date: ChronoDate, day_of_week: u8) -> ChronoResult<ChronoDate> {
    let current = date.iso().day_of_week();
    let diff = (i64::from(day_of_week) - i64::from(current)).rem_euclid(7);
    date.plus_days(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::iso::IsoDate;

    fn bag(entries: &[(ChronoField, i64)]) -> FieldMap {
        let mut fields = FieldMap::new();
        for (field, value) in entries {
            fields.insert(*field, *value).unwrap();
        }
        fields
    }

    fn resolve_iso(
        entries: &[(ChronoField, i64)],
        style: ResolverStyle,
    ) -> ChronoResult<Option<ChronoDate>> {
        resolve_date(Chronology::Iso, &mut bag(entries), style)
    }

    #[test]
    fn strict_rejects_invalid_dates_smart_clamps() {
        let ymd = |y, m, d| {
            [
                (ChronoField::Year, y),
                (ChronoField::MonthOfYear, m),
                (ChronoField::DayOfMonth, d),
            ]
        };
        let date = resolve_iso(&ymd(2024, 2, 29), ResolverStyle::Strict)
            .unwrap()
            .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));
        assert!(resolve_iso(&ymd(2023, 2, 29), ResolverStyle::Strict).is_err());

        let clamped = resolve_iso(&ymd(2023, 2, 30), ResolverStyle::Smart)
            .unwrap()
            .unwrap();
        assert_eq!(clamped.iso(), IsoDate::new_unchecked(2023, 2, 28));
        let clamped = resolve_iso(&ymd(2023, 4, 31), ResolverStyle::Smart)
            .unwrap()
            .unwrap();
        assert_eq!(clamped.iso(), IsoDate::new_unchecked(2023, 4, 30));
        // Smart still rejects values outside the field range.
        assert!(resolve_iso(&ymd(2023, 2, 32), ResolverStyle::Smart).is_err());
        assert!(resolve_iso(&ymd(2023, 13, 1), ResolverStyle::Smart).is_err());
    }

    #[test]
    fn lenient_rolls_overflowing_fields() {
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2023),
                (ChronoField::MonthOfYear, 14),
                (ChronoField::DayOfMonth, 1),
            ],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 1));

        let date = resolve_iso(
            &[
                (ChronoField::Year, 2023),
                (ChronoField::MonthOfYear, 1),
                (ChronoField::DayOfMonth, 32),
            ],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2023, 2, 1));

        let date = resolve_iso(
            &[
                (ChronoField::Year, 2023),
                (ChronoField::MonthOfYear, 0),
                (ChronoField::DayOfMonth, 0),
            ],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2022, 11, 30));

        // Month and day overflow combine: 13 months then 31 extra days.
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2012),
                (ChronoField::MonthOfYear, 13),
                (ChronoField::DayOfMonth, 32),
            ],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2013, 2, 1));
    }

    #[test]
    fn epoch_day_resolves_identically_in_every_style() {
        for style in [
            ResolverStyle::Strict,
            ResolverStyle::Smart,
            ResolverStyle::Lenient,
        ] {
            let date = resolve_iso(&[(ChronoField::EpochDay, 19_782)], style)
                .unwrap()
                .unwrap();
            assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));
        }
    }

    #[test]
    fn epoch_day_takes_priority() {
        let mut fields = bag(&[
            (ChronoField::EpochDay, 19_782),
            (ChronoField::Year, 1999),
        ]);
        let date = resolve_date(Chronology::Iso, &mut fields, ResolverStyle::Strict)
            .unwrap()
            .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));
        // The unused year stays behind for cross-checking.
        assert_eq!(fields.get(ChronoField::Year), Some(1999));
    }

    #[test]
    fn proleptic_month_splits_into_year_and_month() {
        let date = resolve_iso(
            &[
                (ChronoField::ProlepticMonth, 2024 * 12 + 1),
                (ChronoField::DayOfMonth, 29),
            ],
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));

        // A conflicting explicit month errors.
        let err = resolve_iso(
            &[
                (ChronoField::ProlepticMonth, 2024 * 12 + 1),
                (ChronoField::MonthOfYear, 3),
                (ChronoField::DayOfMonth, 1),
            ],
            ResolverStyle::Strict,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn year_of_era_resolution() {
        // Era plus year-of-era collapse into the year.
        let date = resolve_iso(
            &[
                (ChronoField::Era, 0),
                (ChronoField::YearOfEra, 5),
                (ChronoField::MonthOfYear, 1),
                (ChronoField::DayOfMonth, 1),
            ],
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso().year, -4);

        // Strict keeps an era-less year-of-era in the bag.
        let mut fields = bag(&[(ChronoField::YearOfEra, 2012)]);
        let resolved =
            resolve_date(Chronology::Iso, &mut fields, ResolverStyle::Strict).unwrap();
        assert!(resolved.is_none());
        assert_eq!(fields.get(ChronoField::YearOfEra), Some(2012));

        // Smart assumes the current era.
        let date = resolve_iso(
            &[
                (ChronoField::YearOfEra, 2012),
                (ChronoField::MonthOfYear, 6),
                (ChronoField::DayOfMonth, 30),
            ],
            ResolverStyle::Smart,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2012, 6, 30));

        // A year in the bag determines the era instead; disagreement
        // is a conflict.
        let err = resolve_iso(
            &[
                (ChronoField::Year, 2012),
                (ChronoField::YearOfEra, 2013),
            ],
            ResolverStyle::Smart,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn day_of_year_branch() {
        let date = resolve_iso(
            &[(ChronoField::Year, 2024), (ChronoField::DayOfYear, 60)],
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));
        assert!(resolve_iso(
            &[(ChronoField::Year, 2023), (ChronoField::DayOfYear, 366)],
            ResolverStyle::Strict,
        )
        .is_err());
        let date = resolve_iso(
            &[(ChronoField::Year, 2023), (ChronoField::DayOfYear, 366)],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 1, 1));
    }

    #[test]
    fn aligned_week_of_month_branch() {
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2024),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::AlignedWeekOfMonth, 5),
                (ChronoField::AlignedDayOfWeekInMonth, 1),
            ],
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));

        // Week 5 day 2 falls into March; strict rejects, smart keeps.
        let overflowing = [
            (ChronoField::Year, 2024),
            (ChronoField::MonthOfYear, 2),
            (ChronoField::AlignedWeekOfMonth, 5),
            (ChronoField::AlignedDayOfWeekInMonth, 2),
        ];
        assert!(resolve_iso(&overflowing, ResolverStyle::Strict).is_err());
        let date = resolve_iso(&overflowing, ResolverStyle::Smart)
            .unwrap()
            .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 3, 1));
    }

    #[test]
    fn aligned_week_with_day_of_week_uses_next_or_same() {
        // 2012-02-15 is the Wednesday starting aligned week 3; the
        // following Tuesday is the 21st.
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2012),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::AlignedWeekOfMonth, 3),
                (ChronoField::DayOfWeek, 2),
            ],
            ResolverStyle::Smart,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2012, 2, 21));
    }

    #[test]
    fn lenient_day_of_week_normalizes_by_whole_weeks() {
        // Day-of-week 9 is the Tuesday one week on.
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2024),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::AlignedWeekOfMonth, 1),
                (ChronoField::DayOfWeek, 9),
            ],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 13));

        // Day-of-week -5 is the Tuesday one week back.
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2024),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::AlignedWeekOfMonth, 1),
                (ChronoField::DayOfWeek, -5),
            ],
            ResolverStyle::Lenient,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 1, 30));
    }

    #[test]
    fn aligned_week_of_year_branches() {
        let date = resolve_iso(
            &[
                (ChronoField::Year, 2024),
                (ChronoField::AlignedWeekOfYear, 9),
                (ChronoField::AlignedDayOfWeekInYear, 4),
            ],
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));

        // Week 53 day 2 of 2023 lands in 2024.
        let overflowing = [
            (ChronoField::Year, 2023),
            (ChronoField::AlignedWeekOfYear, 53),
            (ChronoField::AlignedDayOfWeekInYear, 2),
        ];
        assert!(resolve_iso(&overflowing, ResolverStyle::Strict).is_err());
        let date = resolve_iso(&overflowing, ResolverStyle::Smart)
            .unwrap()
            .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 1, 1));
    }

    #[test]
    fn resolution_works_across_calendars() {
        // Thai Buddhist 2567-02-29 is ISO 2024-02-29.
        let date = resolve_date(
            Chronology::ThaiBuddhist,
            &mut bag(&[
                (ChronoField::YearOfEra, 2567),
                (ChronoField::Era, 1),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::DayOfMonth, 29),
            ]),
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(2024, 2, 29));

        // Hijrah smart clamps to the 29-day month.
        let date = resolve_date(
            Chronology::Hijrah,
            &mut bag(&[
                (ChronoField::Year, 1445),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::DayOfMonth, 30),
            ]),
            ResolverStyle::Smart,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.get(ChronoField::DayOfMonth).unwrap(), 29);

        // Japanese era-first resolution short-circuits.
        let date = resolve_date(
            Chronology::Japanese,
            &mut bag(&[
                (ChronoField::Era, 2),
                (ChronoField::YearOfEra, 2),
                (ChronoField::MonthOfYear, 3),
                (ChronoField::DayOfMonth, 1),
            ]),
            ResolverStyle::Strict,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(1990, 3, 1));
    }

    #[test]
    fn japanese_era_transition_tolerance() {
        // Showa 64 ran only through January 7th 1989; smart accepts
        // Showa 64 February as early Heisei.
        let date = resolve_date(
            Chronology::Japanese,
            &mut bag(&[
                (ChronoField::Era, 1),
                (ChronoField::YearOfEra, 64),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::DayOfMonth, 1),
            ]),
            ResolverStyle::Smart,
        )
        .unwrap()
        .unwrap();
        assert_eq!(date.iso(), IsoDate::new_unchecked(1989, 2, 1));

        // Strict rejects the same fields.
        assert!(resolve_date(
            Chronology::Japanese,
            &mut bag(&[
                (ChronoField::Era, 1),
                (ChronoField::YearOfEra, 64),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::DayOfMonth, 1),
            ]),
            ResolverStyle::Strict,
        )
        .is_err());

        // Deep into the wrong era stays an error even for smart.
        assert!(resolve_date(
            Chronology::Japanese,
            &mut bag(&[
                (ChronoField::Era, 1),
                (ChronoField::YearOfEra, 66),
                (ChronoField::MonthOfYear, 2),
                (ChronoField::DayOfMonth, 1),
            ]),
            ResolverStyle::Smart,
        )
        .is_err());
    }

    #[test]
    fn partial_bags_resolve_to_none() {
        let mut fields = bag(&[(ChronoField::Year, 2024)]);
        assert!(resolve_date(Chronology::Iso, &mut fields, ResolverStyle::Smart)
            .unwrap()
            .is_none());
        assert_eq!(fields.get(ChronoField::Year), Some(2024));

        let mut fields = bag(&[
            (ChronoField::MonthOfYear, 2),
            (ChronoField::DayOfMonth, 29),
        ]);
        assert!(resolve_date(Chronology::Iso, &mut fields, ResolverStyle::Smart)
            .unwrap()
            .is_none());
    }
}
