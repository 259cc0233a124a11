//! Decision strategies.
//!
//! The rule evaluator and the learned classifier are interchangeable
//! strategies behind [`DecisionStrategy`]. Exactly one decides each record;
//! their outputs are never blended.

use triage_types::{DecisionPath, FeatureSet, RiskCategory};

use crate::classifier::{Classifier, ClassifierAdapter};
use crate::rules::RuleEvaluator;
use crate::types::EngineResult;

/// The category decision for one feature set.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Chosen category.
    pub category: RiskCategory,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Ordered reasoning strings.
    pub reasoning: Vec<String>,
    /// Which path produced the decision.
    pub path: DecisionPath,
}

/// A path from features to a category.
pub trait DecisionStrategy: Send + Sync {
    /// The path recorded on results.
    fn path(&self) -> DecisionPath;

    /// Decides the category for a feature set.
    fn decide(&self, features: &FeatureSet) -> EngineResult<Decision>;
}

impl DecisionStrategy for RuleEvaluator {
    fn path(&self) -> DecisionPath {
        DecisionPath::Rules
    }

    fn decide(&self, features: &FeatureSet) -> EngineResult<Decision> {
        let assessment = self.evaluate(features)?;
        Ok(Decision {
            category: assessment.category,
            confidence: assessment.confidence,
            reasoning: assessment.reasoning(),
            path: DecisionPath::Rules,
        })
    }
}

impl<C: Classifier> DecisionStrategy for ClassifierAdapter<C> {
    fn path(&self) -> DecisionPath {
        DecisionPath::Learned
    }

    fn decide(&self, features: &FeatureSet) -> EngineResult<Decision> {
        let prediction = self.predict(features)?;
        Ok(Decision {
            category: prediction.category,
            confidence: prediction.confidence,
            reasoning: vec![format!(
                "automatic classification by learned model ({})",
                prediction.label
            )],
            path: DecisionPath::Learned,
        })
    }
}
