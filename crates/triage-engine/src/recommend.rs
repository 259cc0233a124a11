//! Recommendation generator.

use triage_types::{PatientRecord, RiskCategory};

/// Single recommendation carried by the fail-safe result.
pub const MANUAL_EVALUATION: &str = "Immediate manual medical evaluation";

const EMERGENCY: &[&str] = &[
    "Immediate medical attention",
    "Prepare emergency room resources",
    "Continuous monitoring",
    "Immediate vascular access",
];

const URGENT: &[&str] = &[
    "Attend within 1 hour",
    "Re-evaluate within 30 minutes",
    "Periodic monitoring",
];

const NON_URGENT: &[&str] = &[
    "Attend within 4 hours",
    "General guidance",
    "Re-evaluate if condition worsens",
];

/// Returns the fixed, ordered recommendations for a category.
///
/// # Examples
///
/// ```
/// use triage_engine::recommend;
/// use triage_types::RiskCategory;
///
/// let actions = recommend(RiskCategory::Urgent);
/// assert_eq!(actions[0], "Attend within 1 hour");
/// assert_eq!(actions.len(), 3);
/// ```
pub fn recommend(category: RiskCategory) -> Vec<String> {
    let actions = match category {
        RiskCategory::Emergency => EMERGENCY,
        RiskCategory::Urgent => URGENT,
        RiskCategory::NonUrgent => NON_URGENT,
    };
    actions.iter().map(|a| a.to_string()).collect()
}

/// Record-specific recommendations appended after the category list.
///
/// Never replaces the base list; may be empty.
pub fn clinical_recommendations(record: &PatientRecord) -> Vec<String> {
    let vitals = record.vitals();
    let symptoms = record.symptoms();

    [
        (vitals.systolic() > 180.0, "Urgent blood pressure control"),
        (vitals.oxygen_saturation() < 90.0, "Ventilatory support"),
        (vitals.temperature() > 39.0, "Antipyretic measures"),
        (symptoms.chest_pain, "Immediate ECG"),
        (symptoms.breathing_difficulty, "Chest X-ray"),
    ]
    .into_iter()
    .filter_map(|(applies, action)| applies.then(|| action.to_string()))
    .collect()
}
