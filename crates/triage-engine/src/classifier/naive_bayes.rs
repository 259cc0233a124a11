//! Gaussian naive Bayes.

use serde::{Deserialize, Serialize};

use super::scaler::check_rows;
use super::Classifier;
use crate::types::{EngineResult, TriageError};

/// Portion of the largest feature variance added to every variance.
const VAR_SMOOTHING: f64 = 1e-9;

/// Per-class Gaussian likelihoods with class priors.
///
/// Classes with no training samples get probability 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussianNaiveBayes {
    priors: Vec<f64>,
    means: Vec<Vec<f64>>,
    variances: Vec<Vec<f64>>,
}

impl GaussianNaiveBayes {
    /// Creates an untrained classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes seen at fit time.
    pub fn n_classes(&self) -> usize {
        self.priors.len()
    }

    fn joint_log_likelihood(&self, row: &[f64]) -> Vec<f64> {
        self.priors
            .iter()
            .zip(self.means.iter().zip(&self.variances))
            .map(|(&prior, (means, vars))| {
                if prior == 0.0 {
                    return f64::NEG_INFINITY;
                }
                let log_likelihood: f64 = row
                    .iter()
                    .zip(means.iter().zip(vars))
                    .map(|(x, (m, v))| {
                        -0.5 * (2.0 * std::f64::consts::PI * v).ln() - (x - m).powi(2) / (2.0 * v)
                    })
                    .sum();
                prior.ln() + log_likelihood
            })
            .collect()
    }
}

impl Classifier for GaussianNaiveBayes {
    fn name(&self) -> &'static str {
        "gaussian-naive-bayes"
    }

    fn fit(&mut self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> EngineResult<()> {
        let width = check_rows(x)?;
        if x.len() != y.len() {
            return Err(TriageError::Training(format!(
                "{} rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(TriageError::Training(format!(
                "label index {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let mut counts = vec![0usize; n_classes];
        let mut means = vec![vec![0.0; width]; n_classes];
        for (row, &label) in x.iter().zip(y) {
            counts[label] += 1;
            for (m, v) in means[label].iter_mut().zip(row) {
                *m += v;
            }
        }
        for (class_means, &count) in means.iter_mut().zip(&counts) {
            if count > 0 {
                for m in class_means.iter_mut() {
                    *m /= count as f64;
                }
            }
        }

        let mut variances = vec![vec![0.0; width]; n_classes];
        for (row, &label) in x.iter().zip(y) {
            for ((v, value), m) in variances[label].iter_mut().zip(row).zip(&means[label]) {
                *v += (value - m).powi(2);
            }
        }
        for (class_vars, &count) in variances.iter_mut().zip(&counts) {
            if count > 0 {
                for v in class_vars.iter_mut() {
                    *v /= count as f64;
                }
            }
        }

        let max_variance = feature_variances(x)
            .into_iter()
            .fold(0.0_f64, f64::max);
        let epsilon = (VAR_SMOOTHING * max_variance).max(VAR_SMOOTHING);
        for class_vars in &mut variances {
            for v in class_vars.iter_mut() {
                *v += epsilon;
            }
        }

        let total = x.len() as f64;
        self.priors = counts.iter().map(|&c| c as f64 / total).collect();
        self.means = means;
        self.variances = variances;

        tracing::debug!(
            classes = n_classes,
            features = width,
            samples = x.len(),
            "fitted gaussian naive bayes"
        );
        Ok(())
    }

    fn predict_proba(&self, x: &[Vec<f64>]) -> EngineResult<Vec<Vec<f64>>> {
        if !self.is_trained() {
            return Err(TriageError::model_unavailable("classifier has not been fit"));
        }
        let width = self.means.first().map(Vec::len).unwrap_or(0);

        x.iter()
            .map(|row| {
                if row.len() != width {
                    return Err(TriageError::Scoring(format!(
                        "classifier expects {} features, got {}",
                        width,
                        row.len()
                    )));
                }
                let jll = self.joint_log_likelihood(row);
                let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if !max.is_finite() {
                    return Err(TriageError::Scoring(
                        "no class produced a finite likelihood".to_string(),
                    ));
                }
                let exp: Vec<f64> = jll.iter().map(|l| (l - max).exp()).collect();
                let sum: f64 = exp.iter().sum();
                Ok(exp.into_iter().map(|e| e / sum).collect())
            })
            .collect()
    }

    fn is_trained(&self) -> bool {
        !self.priors.is_empty()
    }
}

fn feature_variances(x: &[Vec<f64>]) -> Vec<f64> {
    let n = x.len() as f64;
    let width = x.first().map(Vec::len).unwrap_or(0);
    (0..width)
        .map(|j| {
            let mean = x.iter().map(|r| r[j]).sum::<f64>() / n;
            x.iter().map(|r| (r[j] - mean).powi(2)).sum::<f64>() / n
        })
        .collect()
}
