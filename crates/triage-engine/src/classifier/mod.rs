//! Learned classification path.
//!
//! [`Classifier`] is the opaque statistical model contract: fit on a dense
//! matrix with integer labels, return class probabilities. The
//! [`ClassifierAdapter`] owns everything around it: feature engineering,
//! column order, scaling and label decoding.

mod adapter;
mod naive_bayes;
mod scaler;

pub use adapter::{
    engineer, ClassifierAdapter, FittedModel, LabeledSample, LearnedPrediction, TrainingReport,
};
pub use naive_bayes::GaussianNaiveBayes;
pub use scaler::StandardScaler;

use std::fmt::Debug;

use crate::types::EngineResult;

/// A trainable multi-class probabilistic classifier.
///
/// Implementations are immutable after `fit`; inference takes `&self` and must
/// be safe to call from many threads at once.
pub trait Classifier: Send + Sync + Debug {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Fits on rows `x` with label indices `y` in `0..n_classes`.
    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> EngineResult<()>;

    /// Class probabilities per row, each summing to 1.
    fn predict_proba(&self, x: &[Vec<f64>]) -> EngineResult<Vec<Vec<f64>>>;

    /// Whether `fit` has completed.
    fn is_trained(&self) -> bool;

    /// Most probable label per row, together with the probabilities.
    fn predict(&self, x: &[Vec<f64>]) -> EngineResult<(Vec<usize>, Vec<Vec<f64>>)> {
        let probabilities = self.predict_proba(x)?;
        let labels = probabilities.iter().map(|row| argmax(row)).collect();
        Ok((labels, probabilities))
    }
}

/// Index of the largest value; first wins on ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_value), (i, &v)| {
            if v > best_value {
                (i, v)
            } else {
                (best, best_value)
            }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[]), 0);
    }
}
