//! Input validation for the two forms the client submits.
//!
//! This is the only place raw form text is turned into numbers. Both validators are pure: they
//! never touch the network or the store and they report the first violated rule as a value.
//!
//! Vitals are checked in a fixed order and stop at the first failure:
//!
//! 1. blood pressure text matches `<2-3 digits>/<2-3 digits>`
//! 2. heart rate is an integer in `[30, 300]`
//! 3. temperature is a number in `[90, 110]`
//! 4. oxygen saturation is a number in `[70, 100]`

use crate::constants::{AGE_RANGE, HEART_RATE_RANGE, OXYGEN_SATURATION_RANGE, TEMPERATURE_RANGE_F};
use crate::error::ValidationError;
use crate::model::{NewPatient, ReadingInput};
use std::ops::RangeInclusive;
use vitals_types::{BloodPressure, NonEmptyText};

/// Validates and normalises a vitals form.
///
/// On success the blood pressure text is returned unchanged and the three numeric fields are
/// typed. Surrounding whitespace is tolerated on the numeric fields only.
pub fn validate_vitals(
    blood_pressure: &str,
    heart_rate: &str,
    temperature: &str,
    oxygen_saturation: &str,
) -> Result<ReadingInput, ValidationError> {
    let blood_pressure =
        BloodPressure::parse(blood_pressure).map_err(|_| ValidationError::BloodPressureFormat)?;

    let heart_rate = heart_rate
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|hr| u16::try_from(hr).ok())
        .filter(|hr| HEART_RATE_RANGE.contains(hr))
        .ok_or(ValidationError::HeartRateRange)?;

    let temperature = parse_in_range(temperature, &TEMPERATURE_RANGE_F)
        .ok_or(ValidationError::TemperatureRange)?;

    let oxygen_saturation = parse_in_range(oxygen_saturation, &OXYGEN_SATURATION_RANGE)
        .ok_or(ValidationError::OxygenSaturationRange)?;

    Ok(ReadingInput {
        blood_pressure,
        heart_rate,
        temperature,
        oxygen_saturation,
    })
}

fn parse_in_range(raw: &str, range: &RangeInclusive<f64>) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && range.contains(v))
}

/// Validates a new-patient form.
///
/// Medical record number uniqueness is left to the store, which reports a collision as
/// [`crate::MonitorError::DuplicateRecord`].
pub fn validate_new_patient(
    name: &str,
    age: &str,
    medical_record_number: &str,
) -> Result<NewPatient, ValidationError> {
    let name = NonEmptyText::new(name).map_err(|_| ValidationError::NameRequired)?;

    let age = age
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|a| u8::try_from(a).ok())
        .filter(|a| AGE_RANGE.contains(a))
        .ok_or(ValidationError::AgeRange)?;

    let medical_record_number = NonEmptyText::new(medical_record_number)
        .map_err(|_| ValidationError::MedicalRecordNumberRequired)?;

    Ok(NewPatient {
        name,
        age,
        medical_record_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_vitals_are_normalised() {
        let input = validate_vitals("120/80", "72", "98.6", "98").unwrap();
        assert_eq!(input.blood_pressure.as_str(), "120/80");
        assert_eq!(input.heart_rate, 72);
        assert_eq!(input.temperature, 98.6);
        assert_eq!(input.oxygen_saturation, 98.0);
    }

    #[test]
    fn test_rules_are_checked_in_order() {
        assert_eq!(
            validate_vitals("12/8", "0", "0", "0"),
            Err(ValidationError::BloodPressureFormat)
        );
        assert_eq!(
            validate_vitals("120/80", "29", "0", "0"),
            Err(ValidationError::HeartRateRange)
        );
        assert_eq!(
            validate_vitals("120/80", "80", "89.9", "0"),
            Err(ValidationError::TemperatureRange)
        );
        assert_eq!(
            validate_vitals("120/80", "80", "99", "100.1"),
            Err(ValidationError::OxygenSaturationRange)
        );
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(validate_vitals("90/60", "30", "90", "70").is_ok());
        assert!(validate_vitals("180/110", "300", "110", "100").is_ok());
    }

    #[test]
    fn test_non_numeric_and_non_integer_input_is_rejected() {
        assert_eq!(
            validate_vitals("120/80", "seventy", "98.6", "98"),
            Err(ValidationError::HeartRateRange)
        );
        assert_eq!(
            validate_vitals("120/80", "72.5", "98.6", "98"),
            Err(ValidationError::HeartRateRange)
        );
        assert_eq!(
            validate_vitals("120/80", "72", "NaN", "98"),
            Err(ValidationError::TemperatureRange)
        );
        assert_eq!(
            validate_vitals("120/80", "72", "98.6", ""),
            Err(ValidationError::OxygenSaturationRange)
        );
    }

    #[test]
    fn test_new_patient_validation() {
        let patient = validate_new_patient("  Ada  ", "36", " MRN-1 ").unwrap();
        assert_eq!(patient.name.as_str(), "Ada");
        assert_eq!(patient.age, 36);
        assert_eq!(patient.medical_record_number.as_str(), "MRN-1");

        assert_eq!(
            validate_new_patient(" ", "36", "MRN-1"),
            Err(ValidationError::NameRequired)
        );
        assert_eq!(
            validate_new_patient("Ada", "151", "MRN-1"),
            Err(ValidationError::AgeRange)
        );
        assert_eq!(
            validate_new_patient("Ada", "-1", "MRN-1"),
            Err(ValidationError::AgeRange)
        );
        assert_eq!(
            validate_new_patient("Ada", "0", "  "),
            Err(ValidationError::MedicalRecordNumberRequired)
        );
        assert!(validate_new_patient("Ada", "150", "MRN-1").is_ok());
    }

    fn is_bp_shaped(s: &str) -> bool {
        match s.split_once('/') {
            Some((a, b)) => [a, b]
                .iter()
                .all(|p| (2..=3).contains(&p.len()) && p.bytes().all(|c| c.is_ascii_digit())),
            None => false,
        }
    }

    proptest! {
        #[test]
        fn prop_malformed_blood_pressure_always_fails_first(
            bp in "\\PC{0,8}",
            hr in "\\PC{0,4}",
            temp in "\\PC{0,5}",
            spo2 in "\\PC{0,5}",
        ) {
            prop_assume!(!is_bp_shaped(&bp));
            prop_assert_eq!(
                validate_vitals(&bp, &hr, &temp, &spo2),
                Err(ValidationError::BloodPressureFormat)
            );
        }

        #[test]
        fn prop_well_formed_blood_pressure_passes_its_rule(
            sys in 10u16..1000,
            dia in 10u16..1000,
        ) {
            let bp = format!("{sys}/{dia}");
            let input = validate_vitals(&bp, "72", "98.6", "98").unwrap();
            prop_assert_eq!(input.blood_pressure.as_str(), bp.as_str());
        }

        #[test]
        fn prop_heart_rate_closed_interval(hr in -1000i64..1000) {
            let result = validate_vitals("120/80", &hr.to_string(), "98.6", "98");
            if (30..=300).contains(&hr) {
                prop_assert_eq!(result.map(|r| i64::from(r.heart_rate)), Ok(hr));
            } else {
                prop_assert_eq!(result, Err(ValidationError::HeartRateRange));
            }
        }
    }
}
