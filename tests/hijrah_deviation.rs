//! Hijrah deviation registration.
//!
//! The deviation table is process-global, so every assertion that
//! depends on it lives in this one test binary.

use chronology_rs::{chronology::register_hijrah_deviations, ChronoField, Chronology};

#[test]
fn registered_deviations_shift_month_boundaries() {
    // Baseline before registration: the arithmetic calendar.
    let before = Chronology::Hijrah.date(1429, 1, 29).unwrap();
    assert!(Chronology::Hijrah.date(1429, 1, 31).is_err());

    // Malformed configs never register.
    assert!(register_hijrah_deviations("1429/0-1429/1").is_err());
    assert!(register_hijrah_deviations("x/0-1429/1:1").is_err());

    // Lengthen 1429 month 1 by a day, giving it back in month 12.
    register_hijrah_deviations("1429/0-1429/11:-1").unwrap();

    // A second registration is rejected.
    let err = register_hijrah_deviations("1430/0-1430/11:-1").unwrap_err();
    assert_eq!(err.kind(), chronology_rs::error::ErrorKind::Registration);

    // Month 1 of 1429 now has 31 days and month 12 has 28.
    let extended = Chronology::Hijrah.date(1429, 1, 31).unwrap();
    assert_eq!(extended.get(ChronoField::DayOfMonth).unwrap(), 31);
    assert!(Chronology::Hijrah.date(1429, 12, 29).is_err());
    assert!(Chronology::Hijrah.date(1429, 12, 28).is_ok());

    // Later months start one day later on the shared timeline.
    let second_month = Chronology::Hijrah.date(1429, 2, 1).unwrap();
    assert_eq!(
        second_month.to_epoch_days(),
        extended.to_epoch_days() + 1
    );

    // The shift cancels within the year, so 1430 is untouched.
    assert_eq!(
        Chronology::Hijrah.date(1429, 1, 1).unwrap().to_epoch_days(),
        before.to_epoch_days() - 28
    );
    let next_year = Chronology::Hijrah.date(1430, 1, 1).unwrap();
    assert_eq!(next_year.get(ChronoField::DayOfYear).unwrap(), 1);

    // The day-of-month range widened at both ends.
    let range = Chronology::Hijrah.range(ChronoField::DayOfMonth).unwrap();
    assert_eq!(range.max(), 31);
    assert_eq!(range.smallest_max(), 28);

    // Round-trips still hold through the adjusted tables.
    for day in 1..=31 {
        let date = Chronology::Hijrah.date(1429, 1, day).unwrap();
        assert_eq!(date.get(ChronoField::DayOfMonth).unwrap(), i64::from(day));
        assert_eq!(date.get(ChronoField::MonthOfYear).unwrap(), 1);
        assert_eq!(date.get(ChronoField::Year).unwrap(), 1429);
    }
}
