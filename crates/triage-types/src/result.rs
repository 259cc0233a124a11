//! Triage outcome.

use chrono::{DateTime, Utc};

use crate::RiskCategory;

/// Which decision path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionPath {
    /// Deterministic weighted rules.
    Rules,
    /// Trained statistical classifier.
    Learned,
    /// Fixed conservative payload after a failure.
    FailSafe,
}

impl DecisionPath {
    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rules => "rules",
            Self::Learned => "learned",
            Self::FailSafe => "fail-safe",
        }
    }
}

/// Result of triaging one patient.
///
/// Built once and never mutated. Confidence is clamped into `[0, 1]` at
/// construction.
///
/// # Examples
///
/// ```
/// use triage_types::{DecisionPath, RiskCategory, TriageResult};
///
/// let result = TriageResult::new(
///     RiskCategory::Urgent,
///     0.6,
///     vec!["breathing difficulty".to_string()],
///     vec!["Attend within 1 hour".to_string()],
///     DecisionPath::Rules,
/// );
///
/// assert_eq!(result.category(), RiskCategory::Urgent);
/// assert_eq!(result.reasoning_text(), "breathing difficulty");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriageResult {
    category: RiskCategory,
    confidence: f64,
    reasoning: Vec<String>,
    recommendations: Vec<String>,
    path: DecisionPath,
    timestamp: DateTime<Utc>,
}

impl TriageResult {
    /// Creates a result stamped with the current time.
    pub fn new(
        category: RiskCategory,
        confidence: f64,
        reasoning: Vec<String>,
        recommendations: Vec<String>,
        path: DecisionPath,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            category,
            confidence,
            reasoning,
            recommendations,
            path,
            timestamp: Utc::now(),
        }
    }

    /// Returns a copy with a fixed timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Assigned category.
    pub fn category(&self) -> RiskCategory {
        self.category
    }

    /// Confidence in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Ordered triggering factors or failure description.
    pub fn reasoning(&self) -> &[String] {
        &self.reasoning
    }

    /// Reasoning joined for display.
    pub fn reasoning_text(&self) -> String {
        self.reasoning.join("; ")
    }

    /// Ordered recommended actions.
    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// Decision path that produced the result.
    pub fn path(&self) -> DecisionPath {
        self.path
    }

    /// Returns true if this is the fail-safe payload.
    pub fn is_fail_safe(&self) -> bool {
        self.path == DecisionPath::FailSafe
    }

    /// Creation time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(confidence: f64) -> TriageResult {
        TriageResult::new(
            RiskCategory::Emergency,
            confidence,
            vec!["a".to_string(), "b".to_string()],
            vec![],
            DecisionPath::Learned,
        )
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(result(1.5).confidence(), 1.0);
        assert_eq!(result(-0.1).confidence(), 0.0);
        assert_eq!(result(f64::NAN).confidence(), 0.0);
        assert_eq!(result(0.42).confidence(), 0.42);
    }

    #[test]
    fn test_reasoning_text() {
        assert_eq!(result(0.5).reasoning_text(), "a; b");
        assert!(!result(0.5).is_fail_safe());
    }

    #[test]
    fn test_with_timestamp() {
        let ts = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        assert_eq!(result(0.5).with_timestamp(ts).timestamp(), ts);
    }
}
