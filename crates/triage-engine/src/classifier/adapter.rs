//! Adapter between feature sets and a trained [`Classifier`].

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use triage_types::{well_known, FeatureSet, RiskCategory};

use super::{Classifier, GaussianNaiveBayes, StandardScaler};
use crate::features::read;
use crate::metrics::{classification_report, ClassificationReport};
use crate::types::{EngineResult, TrainingConfig, TriageError};

/// A feature set with its known category label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    /// Base features, as produced by [`extract`](crate::extract).
    pub features: FeatureSet,
    /// Category label, e.g. `"Emergency"` or `"RED"`.
    pub label: String,
}

/// Adds the derived model inputs to a copy of `features`.
///
/// - mean pressure: `(systolic + 2 * diastolic) / 3`
/// - shock index: `heart_rate / systolic`
/// - age risk: 0 up to 50, 1 up to 65, 2 above
/// - critical symptoms: count of chest pain, breathing difficulty and fever
///
/// # Errors
/// `MissingFeature`/`MalformedFeature` if an input is absent or not finite,
/// `MalformedFeature` if systolic is not positive.
pub fn engineer(features: &FeatureSet) -> EngineResult<FeatureSet> {
    let systolic = read::value(features, well_known::SYSTOLIC)?;
    let diastolic = read::value(features, well_known::DIASTOLIC)?;
    let heart_rate = read::value(features, well_known::HEART_RATE)?;
    let age = read::value(features, well_known::AGE)?;
    if systolic <= 0.0 {
        return Err(TriageError::MalformedFeature {
            name: well_known::SYSTOLIC.to_string(),
            value: systolic,
        });
    }

    let mut critical = 0.0;
    for name in [
        well_known::CHEST_PAIN,
        well_known::BREATHING_DIFFICULTY,
        well_known::FEVER,
    ] {
        if read::flag(features, name)? {
            critical += 1.0;
        }
    }

    let age_risk = if age <= 50.0 {
        0.0
    } else if age <= 65.0 {
        1.0
    } else {
        2.0
    };

    let mut engineered = features.clone();
    engineered.insert(well_known::MEAN_PRESSURE, (systolic + 2.0 * diastolic) / 3.0);
    engineered.insert(well_known::SHOCK_INDEX, heart_rate / systolic);
    engineered.insert(well_known::AGE_RISK, age_risk);
    engineered.insert(well_known::CRITICAL_SYMPTOMS, critical);
    Ok(engineered)
}

/// Everything fixed at training time.
#[derive(Debug)]
pub struct FittedModel<C> {
    /// Model input columns, in order.
    pub feature_names: Vec<String>,
    /// Column statistics from the training split.
    pub scaler: StandardScaler,
    /// Class labels; position is the encoded label index.
    pub labels: Vec<String>,
    /// The trained classifier.
    pub classifier: C,
}

impl<C: Classifier> FittedModel<C> {
    fn row(&self, features: &FeatureSet) -> EngineResult<Vec<f64>> {
        let engineered = engineer(features)?;
        let raw = self
            .feature_names
            .iter()
            .map(|name| read::value(&engineered, name))
            .collect::<EngineResult<Vec<f64>>>()?;
        self.scaler.transform(&raw)
    }
}

/// Summary of a training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Name of the fitted classifier.
    pub classifier: &'static str,
    /// Samples used for fitting.
    pub n_train: usize,
    /// Samples held out; 0 means the report is on the training split.
    pub n_test: usize,
    /// Metrics on the holdout split.
    pub report: ClassificationReport,
}

/// Output of the learned path for one feature set.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnedPrediction {
    /// Decoded category; `Urgent` when the label is not recognised.
    pub category: RiskCategory,
    /// Highest class probability.
    pub confidence: f64,
    /// Raw label predicted by the model.
    pub label: String,
}

/// Wraps a trained classifier for per-record inference.
///
/// The fitted model sits behind an `Arc` and is never mutated after training,
/// so clones share it and can predict concurrently.
#[derive(Debug)]
pub struct ClassifierAdapter<C = GaussianNaiveBayes> {
    model: Option<Arc<FittedModel<C>>>,
}

impl<C> Clone for ClassifierAdapter<C> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
        }
    }
}

impl<C> Default for ClassifierAdapter<C> {
    fn default() -> Self {
        Self::untrained()
    }
}

impl<C> ClassifierAdapter<C> {
    /// An adapter with no model; every prediction is `ModelUnavailable`.
    pub fn untrained() -> Self {
        Self { model: None }
    }

    /// Wraps an already fitted model.
    pub fn from_model(model: FittedModel<C>) -> Self {
        Self {
            model: Some(Arc::new(model)),
        }
    }

    /// Whether a fitted model is loaded.
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// The fitted model, if any.
    pub fn model(&self) -> Option<&FittedModel<C>> {
        self.model.as_deref()
    }
}

impl<C: Classifier> ClassifierAdapter<C> {
    /// Fits `classifier` on `samples` and wraps the result.
    ///
    /// Labels are encoded in sorted order. Each class is shuffled with
    /// `config.seed` and `test_fraction` of it is held out, always leaving at
    /// least one training sample per class. When nothing is held out the
    /// report is computed on the training split.
    ///
    /// # Errors
    /// `Training` for an empty sample set or a fraction outside `[0, 1)`;
    /// feature errors for samples missing a model input.
    pub fn train(
        mut classifier: C,
        samples: &[LabeledSample],
        config: &TrainingConfig,
    ) -> EngineResult<(Self, TrainingReport)> {
        if samples.is_empty() {
            return Err(TriageError::Training("no samples".to_string()));
        }
        if !(0.0..1.0).contains(&config.test_fraction) {
            return Err(TriageError::Training(format!(
                "test fraction {} outside [0, 1)",
                config.test_fraction
            )));
        }

        let feature_names: Vec<String> = well_known::BASE_FEATURES
            .iter()
            .chain(well_known::ENGINEERED_FEATURES)
            .map(|name| name.to_string())
            .collect();

        let labels: Vec<String> = samples
            .iter()
            .map(|s| s.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut rows = Vec::with_capacity(samples.len());
        let mut targets = Vec::with_capacity(samples.len());
        for sample in samples {
            let engineered = engineer(&sample.features)?;
            let row = feature_names
                .iter()
                .map(|name| read::value(&engineered, name))
                .collect::<EngineResult<Vec<f64>>>()?;
            rows.push(row);
            targets.push(labels.binary_search(&sample.label).unwrap_or_default());
        }

        let (train_idx, test_idx) =
            stratified_split(&targets, labels.len(), config.test_fraction, config.seed);
        let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<usize>) {
            idx.iter().map(|&i| (rows[i].clone(), targets[i])).unzip()
        };
        let (train_x, train_y) = pick(&train_idx);
        let (test_x, test_y) = pick(&test_idx);

        let scaler = StandardScaler::fit(&train_x)?;
        let train_x = scaler.transform_all(&train_x)?;
        classifier.fit(&train_x, &train_y, labels.len())?;

        let (eval_x, eval_y) = if test_x.is_empty() {
            (train_x, train_y)
        } else {
            (scaler.transform_all(&test_x)?, test_y)
        };
        let (predicted, _) = classifier.predict(&eval_x)?;
        let report = classification_report(&eval_y, &predicted, &labels);

        tracing::info!(
            classifier = classifier.name(),
            n_train = train_idx.len(),
            n_test = test_idx.len(),
            accuracy = report.accuracy,
            weighted_f1 = report.weighted_f1,
            "trained classifier"
        );

        let training = TrainingReport {
            classifier: classifier.name(),
            n_train: train_idx.len(),
            n_test: test_idx.len(),
            report,
        };
        let adapter = Self::from_model(FittedModel {
            feature_names,
            scaler,
            labels,
            classifier,
        });
        Ok((adapter, training))
    }

    /// Predicts the category of one feature set.
    ///
    /// # Errors
    /// `ModelUnavailable` when untrained; feature or scoring errors otherwise.
    pub fn predict(&self, features: &FeatureSet) -> EngineResult<LearnedPrediction> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| TriageError::model_unavailable("no trained classifier loaded"))?;

        let row = model.row(features)?;
        let (indices, probabilities) = model.classifier.predict(&[row])?;
        let (index, probabilities) = indices
            .first()
            .copied()
            .zip(probabilities.first())
            .ok_or_else(|| TriageError::Scoring("classifier returned no prediction".to_string()))?;
        let confidence = probabilities.get(index).copied().unwrap_or(0.0);

        let label = model.labels.get(index).cloned().unwrap_or_default();
        let category = RiskCategory::from_label(&label).unwrap_or_else(|| {
            tracing::warn!(label = %label, "unrecognised model label, decoding as urgent");
            RiskCategory::Urgent
        });

        Ok(LearnedPrediction {
            category,
            confidence,
            label,
        })
    }

    /// Scores the fitted model against labelled samples.
    ///
    /// Sample labels the model never saw count as misclassified.
    pub fn evaluate(&self, samples: &[LabeledSample]) -> EngineResult<ClassificationReport> {
        let model = self
            .model
            .as_deref()
            .ok_or_else(|| TriageError::model_unavailable("no trained classifier loaded"))?;

        let rows = samples
            .iter()
            .map(|s| model.row(&s.features))
            .collect::<EngineResult<Vec<_>>>()?;
        let (predicted, _) = model.classifier.predict(&rows)?;
        let truth: Vec<usize> = samples
            .iter()
            .map(|s| {
                model
                    .labels
                    .iter()
                    .position(|l| *l == s.label)
                    .unwrap_or(model.labels.len())
            })
            .collect();
        Ok(classification_report(&truth, &predicted, &model.labels))
    }
}

/// Splits sample indices per class into (train, test).
fn stratified_split(
    targets: &[usize],
    n_classes: usize,
    test_fraction: f64,
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in 0..n_classes {
        let mut members: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t == class)
            .map(|(i, _)| i)
            .collect();
        members.shuffle(&mut rng);

        let n_test = ((members.len() as f64 * test_fraction).round() as usize)
            .min(members.len().saturating_sub(1));
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}
