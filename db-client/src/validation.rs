//! Pre-insert checks for 15-minute interval batches.
//!
//! Mirrors what the upload flow enforces before data reaches the database:
//! the batch is non-empty, quantities are non-negative, every reading falls
//! in the same calendar month, timestamps sit on the 15-minute grid with no
//! gaps per unit, keys are unique, and every location resolves in the unit
//! directory.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use time::{Date, Duration, PrimitiveDateTime, Time};

use crate::domain::{month_key, IntervalReading};
use crate::units::UnitDirectory;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("batch contains no records")]
    Empty,
    #[error("record {index}: negative {field} ({value})")]
    NegativeValue {
        index: usize,
        field: &'static str,
        value: Decimal,
    },
    #[error("batch spans multiple months: {first} and {second}")]
    MultipleMonths { first: String, second: String },
    #[error("record {index}: {date} {time} is not on a 15-minute boundary")]
    Misaligned { index: usize, date: Date, time: Time },
    #[error("unit {unit}: {gap_minutes}-minute gap between {previous} and {next}, expected 15")]
    IrregularSpacing {
        unit: String,
        previous: PrimitiveDateTime,
        next: PrimitiveDateTime,
        gap_minutes: i64,
    },
    #[error("record {index}: duplicate key ({date} {time}, unit {unit})")]
    DuplicateKey {
        index: usize,
        date: Date,
        time: Time,
        unit: String,
    },
    #[error("record {index}: unknown location {location:?}")]
    UnknownLocation { index: usize, location: String },
}

pub fn require_non_empty(readings: &[IntervalReading]) -> Result<(), ValidationError> {
    if readings.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(())
}

pub fn require_non_negative(readings: &[IntervalReading]) -> Result<(), ValidationError> {
    for (index, reading) in readings.iter().enumerate() {
        if reading.consumption < Decimal::ZERO {
            return Err(ValidationError::NegativeValue {
                index,
                field: "consumption",
                value: reading.consumption,
            });
        }
        if reading.supplied_generation < Decimal::ZERO {
            return Err(ValidationError::NegativeValue {
                index,
                field: "supplied_generation",
                value: reading.supplied_generation,
            });
        }
    }
    Ok(())
}

/// Check that every reading falls in one calendar month and return its
/// `YYYY-MM` key.
pub fn require_single_month(readings: &[IntervalReading]) -> Result<String, ValidationError> {
    let mut months = readings.iter().map(|r| month_key(r.reading_date));
    let Some(first) = months.next() else {
        return Err(ValidationError::Empty);
    };
    for month in months {
        if month != first {
            return Err(ValidationError::MultipleMonths { first, second: month });
        }
    }
    Ok(first)
}

/// Every timestamp must sit on a :00/:15/:30/:45 boundary with zero seconds,
/// and consecutive readings of the same unit must be exactly 15 minutes
/// apart.
pub fn require_15min_alignment(readings: &[IntervalReading]) -> Result<(), ValidationError> {
    for (index, reading) in readings.iter().enumerate() {
        let t = reading.reading_time;
        if t.minute() % 15 != 0 || t.second() != 0 || t.nanosecond() != 0 {
            return Err(ValidationError::Misaligned {
                index,
                date: reading.reading_date,
                time: t,
            });
        }
    }

    let mut by_unit: BTreeMap<&str, Vec<PrimitiveDateTime>> = BTreeMap::new();
    for reading in readings {
        by_unit
            .entry(reading.unit.as_str())
            .or_default()
            .push(PrimitiveDateTime::new(reading.reading_date, reading.reading_time));
    }
    for (unit, mut stamps) in by_unit {
        stamps.sort_unstable();
        for pair in stamps.windows(2) {
            let gap = pair[1] - pair[0];
            if gap != Duration::minutes(15) {
                return Err(ValidationError::IrregularSpacing {
                    unit: unit.to_string(),
                    previous: pair[0],
                    next: pair[1],
                    gap_minutes: gap.whole_minutes(),
                });
            }
        }
    }
    Ok(())
}

pub fn require_unique_keys(readings: &[IntervalReading]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (index, reading) in readings.iter().enumerate() {
        if !seen.insert((reading.reading_date, reading.reading_time, reading.unit.as_str())) {
            return Err(ValidationError::DuplicateKey {
                index,
                date: reading.reading_date,
                time: reading.reading_time,
                unit: reading.unit.clone(),
            });
        }
    }
    Ok(())
}

pub fn require_known_locations(
    readings: &[IntervalReading],
    directory: &UnitDirectory,
) -> Result<(), ValidationError> {
    for (index, reading) in readings.iter().enumerate() {
        if directory.unit_code(&reading.location).is_none() {
            return Err(ValidationError::UnknownLocation {
                index,
                location: reading.location.clone(),
            });
        }
    }
    Ok(())
}

/// Run the full pre-insert suite in the order the upload flow applies it and
/// return the batch's month key.
pub fn validate_batch(
    readings: &[IntervalReading],
    directory: &UnitDirectory,
) -> Result<String, ValidationError> {
    require_non_empty(readings)?;
    require_non_negative(readings)?;
    require_15min_alignment(readings)?;
    require_unique_keys(readings)?;
    require_known_locations(readings, directory)?;
    require_single_month(readings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::{date, time};

    fn reading(date: Date, time: Time, unit: &str) -> IntervalReading {
        IntervalReading {
            reading_date: date,
            reading_time: time,
            location: "Bellandur".to_string(),
            unit: unit.to_string(),
            tod_slot: "Normal".to_string(),
            consumption: dec!(10.25),
            supplied_generation: dec!(4.5),
        }
    }

    fn directory() -> UnitDirectory {
        UnitDirectory::from_json(r#"[{"location": "Bellandur", "unit_id": "S11HT-124"}]"#)
            .unwrap()
    }

    #[test]
    fn clean_batch_passes_and_reports_its_month() {
        let readings = vec![
            reading(date!(2025 - 08 - 01), time!(00:00), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:15), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:30), "S11HT-124"),
        ];

        let month = validate_batch(&readings, &directory()).unwrap();
        assert_eq!(month, "2025-08");
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert!(matches!(
            validate_batch(&[], &directory()),
            Err(ValidationError::Empty)
        ));
    }

    #[test]
    fn negative_consumption_names_the_record() {
        let mut readings = vec![
            reading(date!(2025 - 08 - 01), time!(00:00), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:15), "S11HT-124"),
        ];
        readings[1].consumption = dec!(-0.01);

        let err = require_non_negative(&readings).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NegativeValue { index: 1, field: "consumption", .. }
        ));
    }

    #[test]
    fn month_mixing_is_rejected() {
        let readings = vec![
            reading(date!(2025 - 08 - 31), time!(23:45), "S11HT-124"),
            reading(date!(2025 - 09 - 01), time!(00:00), "S11HT-124"),
        ];

        let err = require_single_month(&readings).unwrap_err();
        assert!(matches!(err, ValidationError::MultipleMonths { .. }));
    }

    #[test]
    fn off_grid_timestamp_is_rejected() {
        let readings = vec![reading(date!(2025 - 08 - 01), time!(00:07), "S11HT-124")];

        let err = require_15min_alignment(&readings).unwrap_err();
        assert!(matches!(err, ValidationError::Misaligned { index: 0, .. }));
    }

    #[test]
    fn gap_between_readings_of_one_unit_is_rejected() {
        // 00:30 is missing for this unit
        let readings = vec![
            reading(date!(2025 - 08 - 01), time!(00:15), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:45), "S11HT-124"),
        ];

        let err = require_15min_alignment(&readings).unwrap_err();
        match err {
            ValidationError::IrregularSpacing { gap_minutes, .. } => assert_eq!(gap_minutes, 30),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn gaps_are_checked_per_unit_not_across_units() {
        // Interleaved units share timestamps; each unit's own series is
        // regular, so this must pass.
        let readings = vec![
            reading(date!(2025 - 08 - 01), time!(00:00), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:00), "C8HT-111"),
            reading(date!(2025 - 08 - 01), time!(00:15), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:15), "C8HT-111"),
        ];

        assert!(require_15min_alignment(&readings).is_ok());
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let readings = vec![
            reading(date!(2025 - 08 - 01), time!(00:00), "S11HT-124"),
            reading(date!(2025 - 08 - 01), time!(00:00), "S11HT-124"),
        ];

        let err = require_unique_keys(&readings).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateKey { index: 1, .. }));
    }

    #[test]
    fn unknown_location_is_rejected() {
        let mut readings = vec![reading(date!(2025 - 08 - 01), time!(00:00), "S11HT-124")];
        readings[0].location = "Whitefield".to_string();

        let err = require_known_locations(&readings, &directory()).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownLocation { index: 0, .. }));
    }
}
