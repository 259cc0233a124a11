//! Patient record consumed by the triage core.

use crate::{MedicalHistory, Symptoms, ValidationError, VitalSigns};

/// Sex of the patient.
///
/// # Examples
///
/// ```
/// use triage_types::Sex;
///
/// assert_eq!(Sex::from_code("f").unwrap(), Sex::Female);
/// assert_eq!(Sex::Male.code(), "M");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    /// Male.
    #[default]
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

impl Sex {
    /// Parses a one-letter code (`M`, `F`, `O`) or a full word, ignoring case.
    ///
    /// # Errors
    /// Returns `ValidationError::UnknownCode` for anything else.
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            "o" | "other" => Ok(Self::Other),
            _ => Err(ValidationError::UnknownCode {
                field: "sex",
                code: code.to_string(),
            }),
        }
    }

    /// Returns the one-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }

    /// Binary indicator used as a model feature: 1 for male, 0 otherwise.
    pub fn male_indicator(self) -> f64 {
        if self == Self::Male {
            1.0
        } else {
            0.0
        }
    }
}

/// Immutable patient record: vitals, demographics, symptoms and history.
///
/// # Examples
///
/// ```
/// use triage_types::{PatientRecord, Sex, Symptoms, VitalSigns};
///
/// let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
/// let record = PatientRecord::new(vitals, 35, Sex::Male, Symptoms::default()).unwrap();
/// assert_eq!(record.age(), 35);
///
/// assert!(PatientRecord::new(vitals, 121, Sex::Male, Symptoms::default()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "PatientRecordFields")
)]
pub struct PatientRecord {
    vitals: VitalSigns,
    age: u8,
    sex: Sex,
    symptoms: Symptoms,
    history: MedicalHistory,
}

impl PatientRecord {
    /// Oldest accepted age, in years.
    pub const MAX_AGE: u8 = 120;

    /// Creates a record with an empty medical history.
    ///
    /// # Errors
    /// Returns `ValidationError::OutOfRange` if `age` exceeds [`Self::MAX_AGE`].
    pub fn new(
        vitals: VitalSigns,
        age: u8,
        sex: Sex,
        symptoms: Symptoms,
    ) -> Result<Self, ValidationError> {
        if age > Self::MAX_AGE {
            return Err(ValidationError::OutOfRange {
                field: "age",
                value: f64::from(age),
                min: 0.0,
                max: f64::from(Self::MAX_AGE),
            });
        }
        Ok(Self {
            vitals,
            age,
            sex,
            symptoms,
            history: MedicalHistory::default(),
        })
    }

    /// Returns a copy of this record carrying `history`.
    pub fn with_history(mut self, history: MedicalHistory) -> Self {
        self.history = history;
        self
    }

    /// Vital signs.
    pub fn vitals(&self) -> &VitalSigns {
        &self.vitals
    }

    /// Age in whole years.
    pub fn age(&self) -> u8 {
        self.age
    }

    /// Sex.
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Presenting symptoms.
    pub fn symptoms(&self) -> &Symptoms {
        &self.symptoms
    }

    /// Medical history.
    pub fn history(&self) -> &MedicalHistory {
        &self.history
    }
}

/// Unvalidated wire form of [`PatientRecord`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct PatientRecordFields {
    vitals: VitalSigns,
    age: u8,
    sex: Sex,
    #[serde(default)]
    symptoms: Symptoms,
    #[serde(default)]
    history: MedicalHistory,
}

#[cfg(feature = "serde")]
impl TryFrom<PatientRecordFields> for PatientRecord {
    type Error = ValidationError;

    fn try_from(raw: PatientRecordFields) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.vitals, raw.age, raw.sex, raw.symptoms)?.with_history(raw.history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vitals() -> VitalSigns {
        VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap()
    }

    #[test]
    fn test_age_bounds() {
        assert!(PatientRecord::new(vitals(), 0, Sex::Female, Symptoms::default()).is_ok());
        assert!(PatientRecord::new(vitals(), 120, Sex::Female, Symptoms::default()).is_ok());

        let err = PatientRecord::new(vitals(), 121, Sex::Female, Symptoms::default()).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "age", .. }));
    }

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::from_code("M").unwrap(), Sex::Male);
        assert_eq!(Sex::from_code(" female ").unwrap(), Sex::Female);
        assert_eq!(Sex::from_code("O").unwrap(), Sex::Other);
        assert!(Sex::from_code("X").is_err());
        assert_eq!(Sex::Male.male_indicator(), 1.0);
        assert_eq!(Sex::Other.male_indicator(), 0.0);
    }

    #[test]
    fn test_with_history() {
        let history = MedicalHistory {
            chronic_conditions: vec!["angina".to_string()],
            ..Default::default()
        };
        let record = PatientRecord::new(vitals(), 70, Sex::Male, Symptoms::default())
            .unwrap()
            .with_history(history);
        assert!(record.history().has_cardiac_history());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_age() {
        let json = r#"{"vitals":{"systolic":120.0,"diastolic":80.0,"heart_rate":72.0,"oxygen_saturation":98.0,"temperature":36.5},"age":130,"sex":"Male"}"#;
        assert!(serde_json::from_str::<PatientRecord>(json).is_err());
    }
}
