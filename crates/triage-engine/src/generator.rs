//! Seeded synthetic patient generator.
//!
//! Draws labelled patients from weighted risk profiles for offline training
//! and demos. Every generator owns its RNG, seeded explicitly, so the same
//! configuration always yields the same patients.

use std::f64::consts::PI;

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use triage_types::{PatientRecord, RiskCategory, Sex, Symptoms, VitalSigns};

use crate::classifier::LabeledSample;
use crate::features::extract;
use crate::types::{EngineResult, TriageError};

/// Inclusive `(min, max)` sampling range.
pub type Range = (f64, f64);

/// Base probability of each of the six common symptoms.
#[derive(Debug, Clone, PartialEq)]
pub struct SymptomRates {
    /// Chest pain; multiplied by 1.5 past age 60.
    pub chest_pain: f64,
    /// Breathing difficulty; multiplied by 1.3 past age 70.
    pub breathing_difficulty: f64,
    /// Fever.
    pub fever: f64,
    /// Dizziness.
    pub dizziness: f64,
    /// Vomiting.
    pub vomiting: f64,
    /// Abdominal pain.
    pub abdominal_pain: f64,
    /// Each of the six extended symptoms.
    pub extended: f64,
}

/// Distribution of patients belonging to one category.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskProfile {
    /// Ground-truth category of patients drawn from this profile.
    pub category: RiskCategory,
    /// Relative sampling weight.
    pub weight: f64,
    /// Mean and standard deviation of age.
    pub age: (f64, f64),
    /// Systolic pressure range.
    pub systolic: Range,
    /// Diastolic pressure range.
    pub diastolic: Range,
    /// Heart rate range.
    pub heart_rate: Range,
    /// Saturation range.
    pub saturation: Range,
    /// Temperature range.
    pub temperature: Range,
    /// Symptom probabilities.
    pub symptoms: SymptomRates,
}

impl RiskProfile {
    /// Critical patients: wide, unstable vitals and frequent red flags.
    pub fn emergency() -> Self {
        Self {
            category: RiskCategory::Emergency,
            weight: 0.2,
            age: (65.0, 20.0),
            systolic: (70.0, 200.0),
            diastolic: (40.0, 120.0),
            heart_rate: (40.0, 160.0),
            saturation: (78.0, 94.0),
            temperature: (35.5, 40.5),
            symptoms: SymptomRates {
                chest_pain: 0.6,
                breathing_difficulty: 0.6,
                fever: 0.4,
                dizziness: 0.4,
                vomiting: 0.3,
                abdominal_pain: 0.3,
                extended: 0.1,
            },
        }
    }

    /// Patients needing attention within the hour.
    pub fn urgent() -> Self {
        Self {
            category: RiskCategory::Urgent,
            weight: 0.3,
            age: (55.0, 25.0),
            systolic: (100.0, 175.0),
            diastolic: (60.0, 100.0),
            heart_rate: (55.0, 118.0),
            saturation: (90.0, 97.0),
            temperature: (36.5, 39.5),
            symptoms: SymptomRates {
                chest_pain: 0.25,
                breathing_difficulty: 0.2,
                fever: 0.3,
                dizziness: 0.25,
                vomiting: 0.2,
                abdominal_pain: 0.3,
                extended: 0.02,
            },
        }
    }

    /// Stable patients.
    pub fn non_urgent() -> Self {
        Self {
            category: RiskCategory::NonUrgent,
            weight: 0.5,
            age: (40.0, 20.0),
            systolic: (105.0, 140.0),
            diastolic: (65.0, 90.0),
            heart_rate: (60.0, 95.0),
            saturation: (95.0, 100.0),
            temperature: (36.0, 37.5),
            symptoms: SymptomRates {
                chest_pain: 0.05,
                breathing_difficulty: 0.05,
                fever: 0.1,
                dizziness: 0.1,
                vomiting: 0.1,
                abdominal_pain: 0.15,
                extended: 0.0,
            },
        }
    }
}

/// Configuration for [`SyntheticGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// RNG seed.
    pub seed: u64,
    /// Profiles to sample from, by weight.
    pub profiles: Vec<RiskProfile>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl GeneratorConfig {
    /// The three standard profiles (weights 0.2 / 0.3 / 0.5) with a seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            profiles: vec![
                RiskProfile::emergency(),
                RiskProfile::urgent(),
                RiskProfile::non_urgent(),
            ],
        }
    }
}

/// A generated patient with the category of the profile it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPatient {
    /// The generated record.
    pub record: PatientRecord,
    /// Ground-truth category.
    pub category: RiskCategory,
}

impl SyntheticPatient {
    /// Extracted features labelled with the ground-truth category.
    pub fn to_sample(&self) -> LabeledSample {
        LabeledSample {
            features: extract(&self.record),
            label: self.category.label().to_string(),
        }
    }
}

/// Seeded generator of labelled patients.
///
/// # Examples
///
/// ```
/// use triage_engine::{GeneratorConfig, SyntheticGenerator};
///
/// let a = SyntheticGenerator::new(GeneratorConfig::with_seed(7)).unwrap().generate(5).unwrap();
/// let b = SyntheticGenerator::new(GeneratorConfig::with_seed(7)).unwrap().generate(5).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug)]
pub struct SyntheticGenerator {
    profiles: Vec<RiskProfile>,
    weights: WeightedIndex<f64>,
    rng: StdRng,
}

impl SyntheticGenerator {
    /// Clinical bounds applied after sampling.
    const SYSTOLIC_CLIP: Range = (60.0, 250.0);
    const DIASTOLIC_CLIP: Range = (30.0, 150.0);
    const HEART_RATE_CLIP: Range = (30.0, 200.0);
    const SATURATION_CLIP: Range = (60.0, 100.0);
    const TEMPERATURE_CLIP: Range = (34.0, 43.0);
    const AGE_CLIP: Range = (18.0, 95.0);

    /// Creates a generator.
    ///
    /// # Errors
    /// `InvalidConfig` if there are no profiles or the weights are unusable.
    pub fn new(config: GeneratorConfig) -> EngineResult<Self> {
        let weights = WeightedIndex::new(config.profiles.iter().map(|p| p.weight))
            .map_err(|e| TriageError::InvalidConfig(format!("profile weights: {}", e)))?;
        Ok(Self {
            profiles: config.profiles,
            weights,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Generates `n` patients.
    pub fn generate(&mut self, n: usize) -> EngineResult<Vec<SyntheticPatient>> {
        let patients = (0..n)
            .map(|_| self.realtime_patient())
            .collect::<EngineResult<Vec<_>>>()?;
        tracing::debug!(count = patients.len(), "generated synthetic patients");
        Ok(patients)
    }

    /// Generates a single patient, e.g. to simulate an arrival.
    pub fn realtime_patient(&mut self) -> EngineResult<SyntheticPatient> {
        let profile = self.profiles[self.weights.sample(&mut self.rng)].clone();
        self.patient(&profile)
    }

    /// Generates one patient from a given profile.
    pub fn patient(&mut self, profile: &RiskProfile) -> EngineResult<SyntheticPatient> {
        let rng = &mut self.rng;

        let (age_mean, age_sd) = profile.age;
        let age = clip(normal(rng, age_mean, age_sd).round(), Self::AGE_CLIP);

        let systolic = if profile.category == RiskCategory::Emergency {
            let roll: f64 = rng.gen();
            if roll < 0.3 {
                normal(rng, profile.systolic.1, 20.0)
            } else if roll < 0.5 {
                normal(rng, profile.systolic.0, 10.0)
            } else {
                uniform(rng, profile.systolic)
            }
        } else {
            uniform(rng, profile.systolic)
        };
        let systolic = clip(systolic.round(), Self::SYSTOLIC_CLIP);
        let diastolic = clip(uniform(rng, profile.diastolic).round(), Self::DIASTOLIC_CLIP)
            .min(systolic - 10.0);
        let heart_rate = clip(uniform(rng, profile.heart_rate).round(), Self::HEART_RATE_CLIP);
        let saturation = clip(uniform(rng, profile.saturation).round(), Self::SATURATION_CLIP);
        let temperature = clip(
            (uniform(rng, profile.temperature) * 10.0).round() / 10.0,
            Self::TEMPERATURE_CLIP,
        );

        let rates = &profile.symptoms;
        let chest_pain_rate = if age > 60.0 {
            rates.chest_pain * 1.5
        } else {
            rates.chest_pain
        };
        let breathing_rate = if age > 70.0 {
            rates.breathing_difficulty * 1.3
        } else {
            rates.breathing_difficulty
        };
        let symptoms = Symptoms {
            chest_pain: chance(rng, chest_pain_rate),
            breathing_difficulty: chance(rng, breathing_rate),
            fever: chance(rng, rates.fever),
            dizziness: chance(rng, rates.dizziness),
            vomiting: chance(rng, rates.vomiting),
            abdominal_pain: chance(rng, rates.abdominal_pain),
            seizures: chance(rng, rates.extended),
            active_bleeding: chance(rng, rates.extended),
            loss_of_consciousness: chance(rng, rates.extended),
            severe_headache: chance(rng, rates.extended),
            extreme_weakness: chance(rng, rates.extended),
            extreme_pallor: chance(rng, rates.extended),
        };

        let sex = if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female };
        let vitals = VitalSigns::new(systolic, diastolic, heart_rate, saturation, temperature)?;
        let record = PatientRecord::new(vitals, age as u8, sex, symptoms)?;

        Ok(SyntheticPatient {
            record,
            category: profile.category,
        })
    }
}

/// Standard normal sample via Box-Muller, scaled.
fn normal(rng: &mut StdRng, mean: f64, sd: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + sd * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn uniform(rng: &mut StdRng, (min, max): Range) -> f64 {
    if min < max {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn chance(rng: &mut StdRng, p: f64) -> bool {
    rng.gen_bool(p.clamp(0.0, 1.0))
}

fn clip(value: f64, (min, max): Range) -> f64 {
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> SyntheticGenerator {
        SyntheticGenerator::new(GeneratorConfig::with_seed(seed)).unwrap()
    }

    #[test]
    fn test_same_seed_same_patients() {
        let a = generator(3).generate(50).unwrap();
        let b = generator(3).generate(50).unwrap();
        let c = generator(4).generate(50).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_patients_respect_clinical_bounds() {
        for patient in generator(11).generate(500).unwrap() {
            let vitals = patient.record.vitals();
            assert!((60.0..=250.0).contains(&vitals.systolic()));
            assert!((30.0..=150.0).contains(&vitals.diastolic()));
            assert!(vitals.diastolic() <= vitals.systolic() - 10.0);
            assert!((30.0..=200.0).contains(&vitals.heart_rate()));
            assert!((60.0..=100.0).contains(&vitals.oxygen_saturation()));
            assert!((34.0..=43.0).contains(&vitals.temperature()));
            assert!((18..=95).contains(&patient.record.age()));
            assert_eq!(vitals.systolic().fract(), 0.0);
        }
    }

    #[test]
    fn test_profile_weights_shape_the_mix() {
        let patients = generator(5).generate(2000).unwrap();
        let share = |c: RiskCategory| {
            patients.iter().filter(|p| p.category == c).count() as f64 / patients.len() as f64
        };
        assert!(share(RiskCategory::NonUrgent) > share(RiskCategory::Urgent));
        assert!(share(RiskCategory::Urgent) > share(RiskCategory::Emergency));
        assert!((share(RiskCategory::Emergency) - 0.2).abs() < 0.05);
    }

    #[test]
    fn test_single_profile() {
        let config = GeneratorConfig {
            seed: 1,
            profiles: vec![RiskProfile::non_urgent()],
        };
        let patients = SyntheticGenerator::new(config).unwrap().generate(20).unwrap();
        assert!(patients.iter().all(|p| p.category == RiskCategory::NonUrgent));
        assert!(patients.iter().all(|p| p.record.symptoms().red_flags().len() <= 2));

        let sample = patients[0].to_sample();
        assert_eq!(sample.label, "Non-urgent");
    }

    #[test]
    fn test_invalid_weights() {
        let empty = GeneratorConfig {
            seed: 1,
            profiles: Vec::new(),
        };
        assert!(matches!(
            SyntheticGenerator::new(empty),
            Err(TriageError::InvalidConfig(_))
        ));

        let mut zero = GeneratorConfig::with_seed(1);
        for profile in &mut zero.profiles {
            profile.weight = 0.0;
        }
        assert!(SyntheticGenerator::new(zero).is_err());
    }
}
