//! Triage orchestrator.
//!
//! Runs each record through a small state machine:
//!
//! ```text
//! Perceiving ──► Deciding ──► Acting ──► Done
//!      │            │            ▲
//!      └────────────┴─► Failed ──┘
//! ```
//!
//! `Failed` always lands in `Acting` with the fail-safe decision (Urgent,
//! confidence 0.5, one manual-evaluation recommendation), so [`TriageAgent::process`]
//! never returns an error and never panics on a valid record.

use triage_types::{DecisionPath, FeatureSet, PatientRecord, RiskCategory, TriageResult};

use crate::classifier::{Classifier, ClassifierAdapter};
use crate::features::{check_finite, extract};
use crate::recommend::{clinical_recommendations, recommend, MANUAL_EVALUATION};
use crate::rules::RuleEvaluator;
use crate::strategy::{Decision, DecisionStrategy};
use crate::types::{TriageConfig, TriageError};

/// Confidence carried by the fail-safe result.
pub const FAIL_SAFE_CONFIDENCE: f64 = 0.5;

/// Category carried by the fail-safe result.
pub const FAIL_SAFE_CATEGORY: RiskCategory = RiskCategory::Urgent;

#[derive(Debug)]
enum Stage {
    Perceiving(FeatureSet),
    Deciding(FeatureSet),
    Acting(Decision),
    Failed(TriageError),
    Done(TriageResult),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Perceiving(_) => "perceiving",
            Stage::Deciding(_) => "deciding",
            Stage::Acting(_) => "acting",
            Stage::Failed(_) => "failed",
            Stage::Done(_) => "done",
        }
    }
}

/// The triage agent: one decision strategy plus output configuration.
///
/// Holds no per-call state; a single agent can serve any number of threads.
///
/// # Examples
///
/// ```
/// use triage_engine::TriageAgent;
/// use triage_types::{PatientRecord, RiskCategory, Sex, Symptoms, VitalSigns};
///
/// let agent = TriageAgent::rule_based();
/// let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
/// let record = PatientRecord::new(vitals, 35, Sex::Male, Symptoms::default()).unwrap();
///
/// let result = agent.process(&record);
/// assert_eq!(result.category(), RiskCategory::NonUrgent);
/// assert_eq!(result.reasoning_text(), "stable vital signs");
/// ```
pub struct TriageAgent {
    strategy: Box<dyn DecisionStrategy>,
    config: TriageConfig,
}

impl std::fmt::Debug for TriageAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageAgent")
            .field("path", &self.strategy.path())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for TriageAgent {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl TriageAgent {
    /// Creates an agent around any strategy.
    pub fn new(strategy: Box<dyn DecisionStrategy>, config: TriageConfig) -> Self {
        Self { strategy, config }
    }

    /// Agent using the rule evaluator with default configuration.
    pub fn rule_based() -> Self {
        Self::new(Box::new(RuleEvaluator), TriageConfig::default())
    }

    /// Agent using a learned classifier with default configuration.
    ///
    /// An untrained adapter is accepted; every record then gets the fail-safe
    /// result naming the unavailable model.
    pub fn learned<C: Classifier + 'static>(adapter: ClassifierAdapter<C>) -> Self {
        Self::new(Box::new(adapter), TriageConfig::default())
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: TriageConfig) -> Self {
        self.config = config;
        self
    }

    /// The decision path of the configured strategy.
    pub fn path(&self) -> DecisionPath {
        self.strategy.path()
    }

    /// The active configuration.
    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Triages one record. Total: internal failures become the fail-safe result.
    pub fn process(&self, record: &PatientRecord) -> TriageResult {
        self.run(extract(record), Some(record))
    }

    /// Triages a bare feature set.
    ///
    /// Same pipeline as [`process`](Self::process) without record-specific
    /// recommendations. Missing or non-finite features give the fail-safe.
    pub fn assess(&self, features: &FeatureSet) -> TriageResult {
        self.run(features.clone(), None)
    }

    /// Triages many records, in parallel when the `parallel` feature is on.
    ///
    /// Output order matches input order.
    pub fn process_batch(&self, records: &[PatientRecord]) -> Vec<TriageResult> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            records.par_iter().map(|r| self.process(r)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            records.iter().map(|r| self.process(r)).collect()
        }
    }

    fn run(&self, features: FeatureSet, record: Option<&PatientRecord>) -> TriageResult {
        let mut stage = Stage::Perceiving(features);

        loop {
            let from = stage.name();
            stage = match stage {
                Stage::Perceiving(features) => match check_finite(&features) {
                    Ok(()) => Stage::Deciding(features),
                    Err(err) => Stage::Failed(err),
                },
                Stage::Deciding(features) => match self.strategy.decide(&features) {
                    Ok(decision) if !decision.confidence.is_finite() => Stage::Failed(
                        TriageError::Scoring(format!("non-finite confidence {}", decision.confidence)),
                    ),
                    Ok(decision) => Stage::Acting(decision),
                    Err(err) => Stage::Failed(err),
                },
                Stage::Failed(err) => {
                    tracing::warn!(error = %err, "triage failed, substituting fail-safe result");
                    Stage::Acting(fail_safe(&err))
                }
                Stage::Acting(decision) => Stage::Done(self.act(decision, record)),
                Stage::Done(result) => return result,
            };
            tracing::debug!(from, to = stage.name(), "triage transition");
        }
    }

    fn act(&self, decision: Decision, record: Option<&PatientRecord>) -> TriageResult {
        let recommendations = if decision.path == DecisionPath::FailSafe {
            vec![MANUAL_EVALUATION.to_string()]
        } else {
            let mut actions = recommend(decision.category);
            if let (true, Some(record)) = (self.config.clinical_recommendations, record) {
                actions.extend(clinical_recommendations(record));
            }
            actions
        };

        TriageResult::new(
            decision.category,
            decision.confidence,
            decision.reasoning,
            recommendations,
            decision.path,
        )
    }
}

fn fail_safe(err: &TriageError) -> Decision {
    Decision {
        category: FAIL_SAFE_CATEGORY,
        confidence: FAIL_SAFE_CONFIDENCE,
        reasoning: vec![format!("evaluation error: {}", err)],
        path: DecisionPath::FailSafe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineResult;
    use triage_types::{well_known, Sex, Symptoms, VitalSigns};

    fn record(vitals: (f64, f64, f64, f64, f64), age: u8, symptoms: Symptoms) -> PatientRecord {
        let (sys, dia, hr, spo2, temp) = vitals;
        let vitals = VitalSigns::new(sys, dia, hr, spo2, temp).unwrap();
        PatientRecord::new(vitals, age, Sex::Male, symptoms).unwrap()
    }

    struct Broken;

    impl DecisionStrategy for Broken {
        fn path(&self) -> DecisionPath {
            DecisionPath::Rules
        }

        fn decide(&self, _features: &FeatureSet) -> EngineResult<Decision> {
            Err(TriageError::Scoring("boom".to_string()))
        }
    }

    struct NanConfidence;

    impl DecisionStrategy for NanConfidence {
        fn path(&self) -> DecisionPath {
            DecisionPath::Rules
        }

        fn decide(&self, _features: &FeatureSet) -> EngineResult<Decision> {
            Ok(Decision {
                category: RiskCategory::NonUrgent,
                confidence: f64::NAN,
                reasoning: Vec::new(),
                path: DecisionPath::Rules,
            })
        }
    }

    #[test]
    fn test_rule_based_emergency_with_clinical_recommendations() {
        let symptoms = Symptoms {
            chest_pain: true,
            breathing_difficulty: true,
            ..Default::default()
        };
        let result = TriageAgent::rule_based().process(&record((200.0, 120.0, 140.0, 85.0, 40.0), 70, symptoms));

        assert_eq!(result.category(), RiskCategory::Emergency);
        assert_eq!(result.path(), DecisionPath::Rules);
        assert_eq!(result.recommendations()[0], "Immediate medical attention");
        assert!(result.recommendations().iter().any(|r| r == "Immediate ECG"));
    }

    #[test]
    fn test_base_profile_omits_clinical_recommendations() {
        let symptoms = Symptoms {
            chest_pain: true,
            ..Default::default()
        };
        let agent = TriageAgent::rule_based().with_config(TriageConfig::base_profile());
        let result = agent.process(&record((120.0, 80.0, 72.0, 98.0, 36.5), 60, symptoms));
        assert_eq!(result.category(), RiskCategory::Urgent);
        assert_eq!(result.recommendations(), recommend(RiskCategory::Urgent).as_slice());
    }

    #[test]
    fn test_strategy_error_gives_fail_safe() {
        let agent = TriageAgent::new(Box::new(Broken), TriageConfig::default());
        let result = agent.process(&record((120.0, 80.0, 72.0, 98.0, 36.5), 35, Symptoms::default()));

        assert_eq!(result.category(), RiskCategory::Urgent);
        assert_eq!(result.confidence(), 0.5);
        assert!(result.is_fail_safe());
        assert_eq!(result.recommendations(), [MANUAL_EVALUATION.to_string()]);
        assert!(result.reasoning_text().contains("boom"));
    }

    #[test]
    fn test_non_finite_confidence_gives_fail_safe() {
        let agent = TriageAgent::new(Box::new(NanConfidence), TriageConfig::default());
        let result = agent.process(&record((120.0, 80.0, 72.0, 98.0, 36.5), 35, Symptoms::default()));
        assert!(result.is_fail_safe());
    }

    #[test]
    fn test_untrained_model_is_surfaced() {
        let agent = TriageAgent::learned(ClassifierAdapter::<crate::GaussianNaiveBayes>::untrained());
        let result = agent.process(&record((120.0, 80.0, 72.0, 98.0, 36.5), 35, Symptoms::default()));

        assert_eq!(agent.path(), DecisionPath::Learned);
        assert_eq!(result.category(), RiskCategory::Urgent);
        assert!(result.reasoning_text().contains("model unavailable"));
        assert!(!result.recommendations().is_empty());
    }

    #[test]
    fn test_assess_missing_feature_gives_fail_safe() {
        let mut features = FeatureSet::new();
        features.insert(well_known::SYSTOLIC, 120.0);
        let result = TriageAgent::rule_based().assess(&features);
        assert!(result.is_fail_safe());
        assert!(result.reasoning_text().contains("missing feature"));
    }

    #[test]
    fn test_assess_non_finite_feature_gives_fail_safe() {
        let vitals = VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap();
        let mut features = extract(&PatientRecord::new(vitals, 35, Sex::Male, Symptoms::default()).unwrap());
        features.insert(well_known::HEART_RATE, f64::INFINITY);
        assert!(TriageAgent::rule_based().assess(&features).is_fail_safe());
    }

    #[test]
    fn test_process_and_assess_share_the_pipeline() {
        let patient = record((150.0, 95.0, 105.0, 92.0, 38.5), 55, Symptoms::default());
        let agent = TriageAgent::new(Box::new(RuleEvaluator), TriageConfig::base_profile());

        let from_record = agent.process(&patient);
        let from_features = agent.assess(&extract(&patient));
        assert_eq!(from_record.category(), from_features.category());
        assert_eq!(from_record.confidence(), from_features.confidence());
        assert_eq!(from_record.reasoning(), from_features.reasoning());
        assert_eq!(from_record.recommendations(), from_features.recommendations());
    }

    #[test]
    fn test_batch_preserves_order() {
        let records = vec![
            record((120.0, 80.0, 72.0, 98.0, 36.5), 35, Symptoms::default()),
            record((200.0, 120.0, 140.0, 85.0, 40.0), 70, Symptoms::default()),
            record((150.0, 95.0, 130.0, 95.0, 37.0), 40, Symptoms::default()),
        ];
        let categories: Vec<RiskCategory> = TriageAgent::rule_based()
            .process_batch(&records)
            .iter()
            .map(TriageResult::category)
            .collect();
        assert_eq!(
            categories,
            vec![RiskCategory::NonUrgent, RiskCategory::Emergency, RiskCategory::Urgent]
        );
    }
}
