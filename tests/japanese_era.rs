//! Japanese era registration.
//!
//! Registration is process-global, so everything that depends on the
//! registered era lives in this one test binary.

use chronology_rs::{
    chronology::register_japanese_era, Chronology, DateTimeBuilder, ChronoField, IsoDate,
    ResolverStyle,
};

#[test]
fn registered_era_participates_in_resolution() {
    let since = IsoDate::new(2019, 5, 1).unwrap();

    // Registration must start after the latest built-in era.
    assert!(register_japanese_era("reiwa", IsoDate::new(1989, 1, 8).unwrap()).is_err());

    let era = register_japanese_era("reiwa", since).unwrap();
    assert_eq!(era.value(), 3);
    assert_eq!(era.name(), "reiwa");

    // Only one additional era is ever accepted.
    let err = register_japanese_era("another", IsoDate::new(2100, 1, 1).unwrap()).unwrap_err();
    assert_eq!(err.kind(), chronology_rs::error::ErrorKind::Registration);

    // The era list now ends with the registered era.
    let eras = Chronology::Japanese.eras();
    assert_eq!(eras.last().unwrap().value(), 3);

    // Era-bounded construction sees the new era and the new end of
    // the previous one.
    let date = Chronology::Japanese.date_era(3, 1, 5, 1).unwrap();
    assert_eq!(date.iso(), IsoDate::new(2019, 5, 1).unwrap());
    assert!(Chronology::Japanese.date_era(3, 1, 4, 30).is_err());
    assert!(Chronology::Japanese.date_era(2, 31, 4, 30).is_ok());
    assert!(Chronology::Japanese.date_era(2, 31, 5, 1).is_err());

    // Resolution uses it, including the smart default to the most
    // recent era.
    let mut builder =
        DateTimeBuilder::new(Chronology::Japanese).with_style(ResolverStyle::Strict);
    builder.add_field(ChronoField::Era, 3).unwrap();
    builder.add_field(ChronoField::YearOfEra, 2).unwrap();
    builder.add_field(ChronoField::MonthOfYear, 1).unwrap();
    builder.add_field(ChronoField::DayOfMonth, 15).unwrap();
    let date = builder.resolve().unwrap().into_date().unwrap();
    assert_eq!(date.iso(), IsoDate::new(2020, 1, 15).unwrap());

    let mut builder =
        DateTimeBuilder::new(Chronology::Japanese).with_style(ResolverStyle::Smart);
    builder.add_field(ChronoField::YearOfEra, 2).unwrap();
    builder.add_field(ChronoField::MonthOfYear, 1).unwrap();
    builder.add_field(ChronoField::DayOfMonth, 15).unwrap();
    let date = builder.resolve().unwrap().into_date().unwrap();
    assert_eq!(date.iso(), IsoDate::new(2020, 1, 15).unwrap());

    // Day-of-year in the registered era's first year counts from its
    // start.
    let date = Chronology::Japanese.date_era_year_day(3, 1, 1).unwrap();
    assert_eq!(date.iso(), IsoDate::new(2019, 5, 1).unwrap());
    assert_eq!(date.get(ChronoField::DayOfYear).unwrap(), 1);
}
