//! Severity score for queue ordering.
//!
//! A 0–10 additive rubric used to rank patients inside a category. It reads
//! the same signals as the rule evaluator but with its own thresholds and
//! weights; the two are not interchangeable.

use triage_types::PatientRecord;

/// Highest possible severity score.
pub const MAX_SEVERITY: f64 = 10.0;

/// Computes the severity score of a record.
///
/// | criterion | points |
/// |---|---|
/// | age > 65 (else age > 50) | 2 (1) |
/// | systolic outside [90, 180] | 2 |
/// | saturation < 90 | 2 |
/// | heart rate outside [50, 120] | 1 |
/// | temperature > 39.0 | 1 |
/// | red flags ≥ 3 / 2 / 1 | 3 / 2 / 1 |
/// | cardiac or respiratory history | 1 |
///
/// The total is clamped to [`MAX_SEVERITY`].
///
/// # Examples
///
/// ```
/// use triage_engine::severity_score;
/// use triage_types::{PatientRecord, Sex, Symptoms, VitalSigns};
///
/// let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
/// let record = PatientRecord::new(vitals, 70, Sex::Male, Symptoms::default()).unwrap();
/// assert_eq!(severity_score(&record), 2.0);
/// ```
pub fn severity_score(record: &PatientRecord) -> f64 {
    let vitals = record.vitals();
    let mut score = 0.0;

    if record.age() > 65 {
        score += 2.0;
    } else if record.age() > 50 {
        score += 1.0;
    }

    if !(90.0..=180.0).contains(&vitals.systolic()) {
        score += 2.0;
    }
    if vitals.oxygen_saturation() < 90.0 {
        score += 2.0;
    }
    if !(50.0..=120.0).contains(&vitals.heart_rate()) {
        score += 1.0;
    }
    if vitals.temperature() > 39.0 {
        score += 1.0;
    }

    score += match record.symptoms().red_flags().len() {
        0 => 0.0,
        1 => 1.0,
        2 => 2.0,
        _ => 3.0,
    };

    if record.history().is_relevant() {
        score += 1.0;
    }

    f64::min(score, MAX_SEVERITY)
}

/// Returns true if any vital sign is critical or any red-flag symptom is present.
///
/// Critical vitals: systolic outside [90, 180], saturation below 90, heart
/// rate outside [50, 120], temperature above 39.0.
pub fn is_emergency_case(record: &PatientRecord) -> bool {
    let vitals = record.vitals();
    let critical_vitals = !(90.0..=180.0).contains(&vitals.systolic())
        || vitals.oxygen_saturation() < 90.0
        || !(50.0..=120.0).contains(&vitals.heart_rate())
        || vitals.temperature() > 39.0;

    critical_vitals || !record.symptoms().red_flags().is_empty()
}
