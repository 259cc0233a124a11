//! Vital signs measured at triage.
//!
//! This module provides the `VitalSigns` struct, which can only be built
//! through a validating constructor, and the `ValidRange` bounds it checks.

use crate::ValidationError;

/// Inclusive range of physiologically plausible values for a measurement.
///
/// # Examples
///
/// ```
/// use triage_types::VitalSigns;
///
/// assert!(VitalSigns::SYSTOLIC_RANGE.contains(120.0));
/// assert!(!VitalSigns::SYSTOLIC_RANGE.contains(251.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl ValidRange {
    /// Creates a new range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within the range (bounds included).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Checks `value` for the named field.
    ///
    /// # Errors
    /// Returns `NotFinite` for NaN/infinite input and `OutOfRange` otherwise.
    pub fn check(&self, field: &'static str, value: f64) -> Result<f64, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if !self.contains(value) {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }
}

/// Vital signs of a patient.
///
/// Fields are private: the only way to obtain a value is [`VitalSigns::new`]
/// (or deserialization, which runs the same checks), so every instance is
/// within its valid ranges.
///
/// Diastolic pressure is expected not to exceed systolic pressure, but this is
/// deliberately not enforced here.
///
/// # Examples
///
/// ```
/// use triage_types::VitalSigns;
///
/// let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
/// assert_eq!(vitals.systolic(), 120.0);
///
/// assert!(VitalSigns::new(300.0, 80.0, 72.0, 98.0, 36.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "VitalSignsFields")
)]
pub struct VitalSigns {
    systolic: f64,
    diastolic: f64,
    heart_rate: f64,
    oxygen_saturation: f64,
    temperature: f64,
}

impl VitalSigns {
    /// Accepted systolic pressure, mmHg.
    pub const SYSTOLIC_RANGE: ValidRange = ValidRange::new(50.0, 250.0);
    /// Accepted diastolic pressure, mmHg.
    pub const DIASTOLIC_RANGE: ValidRange = ValidRange::new(30.0, 150.0);
    /// Accepted heart rate, beats per minute.
    pub const HEART_RATE_RANGE: ValidRange = ValidRange::new(30.0, 200.0);
    /// Accepted peripheral oxygen saturation, percent.
    pub const SATURATION_RANGE: ValidRange = ValidRange::new(50.0, 100.0);
    /// Accepted body temperature, degrees Celsius.
    pub const TEMPERATURE_RANGE: ValidRange = ValidRange::new(30.0, 45.0);

    /// Creates validated vital signs.
    ///
    /// # Errors
    /// Returns the first [`ValidationError`] encountered, checking fields in
    /// argument order.
    pub fn new(
        systolic: f64,
        diastolic: f64,
        heart_rate: f64,
        oxygen_saturation: f64,
        temperature: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            systolic: Self::SYSTOLIC_RANGE.check("systolic", systolic)?,
            diastolic: Self::DIASTOLIC_RANGE.check("diastolic", diastolic)?,
            heart_rate: Self::HEART_RATE_RANGE.check("heart_rate", heart_rate)?,
            oxygen_saturation: Self::SATURATION_RANGE
                .check("oxygen_saturation", oxygen_saturation)?,
            temperature: Self::TEMPERATURE_RANGE.check("temperature", temperature)?,
        })
    }

    /// Systolic blood pressure (mmHg).
    pub fn systolic(&self) -> f64 {
        self.systolic
    }

    /// Diastolic blood pressure (mmHg).
    pub fn diastolic(&self) -> f64 {
        self.diastolic
    }

    /// Heart rate (bpm).
    pub fn heart_rate(&self) -> f64 {
        self.heart_rate
    }

    /// Oxygen saturation (%).
    pub fn oxygen_saturation(&self) -> f64 {
        self.oxygen_saturation
    }

    /// Body temperature (°C).
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Returns true if diastolic pressure does not exceed systolic pressure.
    pub fn pressures_consistent(&self) -> bool {
        self.diastolic <= self.systolic
    }
}

/// Unvalidated wire form of [`VitalSigns`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VitalSignsFields {
    systolic: f64,
    diastolic: f64,
    heart_rate: f64,
    oxygen_saturation: f64,
    temperature: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<VitalSignsFields> for VitalSigns {
    type Error = ValidationError;

    fn try_from(raw: VitalSignsFields) -> Result<Self, Self::Error> {
        Self::new(
            raw.systolic,
            raw.diastolic,
            raw.heart_rate,
            raw.oxygen_saturation,
            raw.temperature,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bounds() {
        assert!(VitalSigns::new(50.0, 30.0, 30.0, 50.0, 30.0).is_ok());
        assert!(VitalSigns::new(250.0, 150.0, 200.0, 100.0, 45.0).is_ok());
    }

    #[test]
    fn test_rejects_each_field() {
        let err = VitalSigns::new(49.9, 80.0, 72.0, 98.0, 36.5).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "systolic",
                ..
            }
        ));

        let err = VitalSigns::new(120.0, 151.0, 72.0, 98.0, 36.5).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "diastolic",
                ..
            }
        ));

        let err = VitalSigns::new(120.0, 80.0, 201.0, 98.0, 36.5).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "heart_rate",
                ..
            }
        ));

        let err = VitalSigns::new(120.0, 80.0, 72.0, 100.5, 36.5).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "oxygen_saturation",
                ..
            }
        ));

        let err = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 29.0).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange {
                field: "temperature",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let err = VitalSigns::new(f64::NAN, 80.0, 72.0, 98.0, 36.5).unwrap_err();
        assert_eq!(err, ValidationError::NotFinite { field: "systolic" });
    }

    #[test]
    fn test_inverted_pressures_are_accepted() {
        // Not a constructor check; callers can detect it if they care.
        let vitals = VitalSigns::new(90.0, 100.0, 72.0, 98.0, 36.5).unwrap();
        assert!(!vitals.pressures_consistent());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"systolic":400.0,"diastolic":80.0,"heart_rate":72.0,"oxygen_saturation":98.0,"temperature":36.5}"#;
        assert!(serde_json::from_str::<VitalSigns>(json).is_err());
    }
}
