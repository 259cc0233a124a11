//! Rule-based risk evaluation.
//!
//! A deterministic weighted sum over vital signs and symptoms. Each triggered
//! rule adds points and records a factor; the total picks the category and a
//! confidence that grows with the score inside its bucket.
//!
//! | rule | points | factor |
//! |---|---|---|
//! | systolic outside [90, 180] | 3 | critical blood pressure |
//! | heart rate outside [50, 120] | 3 | abnormal heart rate |
//! | saturation < 90 | 4 | low oxygen saturation |
//! | temperature > 39.5 | 2 | high fever |
//! | chest pain and age > 50 | 4 | chest pain in patient over 50 |
//! | breathing difficulty | 3 | breathing difficulty |

use triage_types::{well_known, FeatureSet, RiskCategory};

use crate::features::read;
use crate::types::EngineResult;

/// Score at or above which a patient is an emergency.
pub const EMERGENCY_THRESHOLD: u32 = 7;
/// Score at or above which a patient is urgent.
pub const URGENT_THRESHOLD: u32 = 3;

/// Reasoning used when no rule fires.
pub const STABLE_REASONING: &str = "stable vital signs";

/// Factor recorded for systolic pressure outside [90, 180].
pub const FACTOR_BLOOD_PRESSURE: &str = "critical blood pressure";
/// Factor recorded for heart rate outside [50, 120].
pub const FACTOR_HEART_RATE: &str = "abnormal heart rate";
/// Factor recorded for saturation below 90.
pub const FACTOR_SATURATION: &str = "low oxygen saturation";
/// Factor recorded for temperature above 39.5.
pub const FACTOR_FEVER: &str = "high fever";
/// Factor recorded for chest pain past age 50.
pub const FACTOR_CHEST_PAIN: &str = "chest pain in patient over 50";
/// Factor recorded for breathing difficulty.
pub const FACTOR_BREATHING: &str = "breathing difficulty";

/// Outcome of the rule evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleAssessment {
    /// Accumulated risk score.
    pub score: u32,
    /// Category picked by the thresholds.
    pub category: RiskCategory,
    /// Calibrated confidence.
    pub confidence: f64,
    /// Triggered factors, in rule order.
    pub factors: Vec<&'static str>,
}

impl RuleAssessment {
    /// Factors for display; the stable phrase when nothing fired.
    pub fn reasoning(&self) -> Vec<String> {
        if self.factors.is_empty() {
            vec![STABLE_REASONING.to_string()]
        } else {
            self.factors.iter().map(|f| f.to_string()).collect()
        }
    }
}

/// The deterministic rule engine.
///
/// Stateless; one instance can be shared freely.
///
/// # Examples
///
/// ```
/// use triage_engine::{extract, RuleEvaluator};
/// use triage_types::{PatientRecord, RiskCategory, Sex, Symptoms, VitalSigns};
///
/// let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
/// let record = PatientRecord::new(vitals, 35, Sex::Male, Symptoms::default()).unwrap();
///
/// let assessment = RuleEvaluator.evaluate(&extract(&record)).unwrap();
/// assert_eq!(assessment.category, RiskCategory::NonUrgent);
/// assert_eq!(assessment.reasoning(), vec!["stable vital signs"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Scores a feature set.
    ///
    /// # Errors
    /// Returns `MissingFeature` or `MalformedFeature` if a feature any rule
    /// reads is absent or not finite.
    pub fn evaluate(&self, features: &FeatureSet) -> EngineResult<RuleAssessment> {
        let systolic = read::value(features, well_known::SYSTOLIC)?;
        let heart_rate = read::value(features, well_known::HEART_RATE)?;
        let saturation = read::value(features, well_known::OXYGEN_SATURATION)?;
        let temperature = read::value(features, well_known::TEMPERATURE)?;
        let age = read::value(features, well_known::AGE)?;
        let chest_pain = read::flag(features, well_known::CHEST_PAIN)?;
        let breathing = read::flag(features, well_known::BREATHING_DIFFICULTY)?;

        let mut score = 0;
        let mut factors = Vec::new();
        let mut add = |triggered: bool, points: u32, factor: &'static str| {
            if triggered {
                score += points;
                factors.push(factor);
            }
        };

        add(!(90.0..=180.0).contains(&systolic), 3, FACTOR_BLOOD_PRESSURE);
        add(!(50.0..=120.0).contains(&heart_rate), 3, FACTOR_HEART_RATE);
        add(saturation < 90.0, 4, FACTOR_SATURATION);
        add(temperature > 39.5, 2, FACTOR_FEVER);
        add(chest_pain && age > 50.0, 4, FACTOR_CHEST_PAIN);
        add(breathing, 3, FACTOR_BREATHING);

        let (category, confidence) = classify_score(score);
        tracing::debug!(score, ?category, confidence, ?factors, "rule evaluation");

        Ok(RuleAssessment {
            score,
            category,
            confidence,
            factors,
        })
    }
}

/// Maps a risk score to its category and calibrated confidence.
///
/// Confidence rises linearly with the score inside each bucket and is capped:
/// Emergency `0.70 + 0.05 (s − 7)` up to 0.95, Urgent `0.60 + 0.075 (s − 3)`
/// up to 0.90, Non-urgent `0.50 + 0.10 s` up to 0.85.
///
/// # Examples
///
/// ```
/// use triage_engine::rules::classify_score;
/// use triage_types::RiskCategory;
///
/// assert_eq!(classify_score(7), (RiskCategory::Emergency, 0.70));
/// assert_eq!(classify_score(6).0, RiskCategory::Urgent);
/// ```
pub fn classify_score(score: u32) -> (RiskCategory, f64) {
    let s = f64::from(score);
    if score >= EMERGENCY_THRESHOLD {
        (
            RiskCategory::Emergency,
            (0.70 + 0.05 * (s - 7.0)).min(0.95),
        )
    } else if score >= URGENT_THRESHOLD {
        (RiskCategory::Urgent, (0.60 + 0.075 * (s - 3.0)).min(0.90))
    } else {
        (RiskCategory::NonUrgent, (0.50 + 0.10 * s).min(0.85))
    }
}
