//! Classification performance metrics.
//!
//! Accuracy, per-class precision/recall/F1, support-weighted F1 and the
//! confusion matrix, computed over class indices.

use triage_types::RiskCategory;

/// Metrics for a single class.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassMetrics {
    /// Class label.
    pub label: String,
    /// TP / (TP + FP); 0 when nothing was predicted as this class.
    pub precision: f64,
    /// TP / (TP + FN); 0 when the class never occurs.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Number of true instances.
    pub support: usize,
}

/// Full classification report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassificationReport {
    /// Share of correct predictions.
    pub accuracy: f64,
    /// Per-class metrics, in label order.
    pub classes: Vec<ClassMetrics>,
    /// F1 averaged with support weights.
    pub weighted_f1: f64,
    /// `confusion[truth][predicted]` counts.
    pub confusion: Vec<Vec<usize>>,
}

impl ClassificationReport {
    /// Returns the metrics for a label.
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

/// Share of positions where `truth` and `predicted` agree.
///
/// Returns 0 for empty input. Extra elements in the longer slice are ignored.
pub fn accuracy<T: PartialEq>(truth: &[T], predicted: &[T]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let correct = truth
        .iter()
        .zip(predicted)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / n as f64
}

/// Builds a `n_classes × n_classes` confusion matrix indexed `[truth][predicted]`.
///
/// Indices outside `0..n_classes` are skipped.
pub fn confusion_matrix(truth: &[usize], predicted: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    let mut matrix = vec![vec![0; n_classes]; n_classes];
    for (&t, &p) in truth.iter().zip(predicted) {
        if t < n_classes && p < n_classes {
            matrix[t][p] += 1;
        }
    }
    matrix
}

/// Computes a classification report over class indices labelled by `labels`.
///
/// # Examples
///
/// ```
/// use triage_engine::metrics::classification_report;
///
/// let labels = vec!["a".to_string(), "b".to_string()];
/// let report = classification_report(&[0, 0, 1, 1], &[0, 1, 1, 1], &labels);
///
/// assert_eq!(report.accuracy, 0.75);
/// assert_eq!(report.class("a").unwrap().precision, 1.0);
/// assert_eq!(report.confusion, vec![vec![1, 1], vec![0, 2]]);
/// ```
pub fn classification_report(
    truth: &[usize],
    predicted: &[usize],
    labels: &[String],
) -> ClassificationReport {
    let n_classes = labels.len();
    let confusion = confusion_matrix(truth, predicted, n_classes);

    let classes: Vec<ClassMetrics> = labels
        .iter()
        .enumerate()
        .map(|(k, label)| {
            let tp = confusion[k][k];
            let support: usize = confusion[k].iter().sum();
            let predicted_k: usize = confusion.iter().map(|row| row[k]).sum();

            let precision = ratio(tp, predicted_k);
            let recall = ratio(tp, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            ClassMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let total_support: usize = classes.iter().map(|c| c.support).sum();
    let weighted_f1 = if total_support == 0 {
        0.0
    } else {
        classes
            .iter()
            .map(|c| c.f1 * c.support as f64)
            .sum::<f64>()
            / total_support as f64
    };

    ClassificationReport {
        accuracy: accuracy(truth, predicted),
        classes,
        weighted_f1,
        confusion,
    }
}

/// Classification report over risk categories, labelled in rank order.
pub fn category_report(truth: &[RiskCategory], predicted: &[RiskCategory]) -> ClassificationReport {
    let index = |c: &RiskCategory| usize::from(c.rank() - 1);
    let labels: Vec<String> = RiskCategory::ALL
        .iter()
        .map(|c| c.label().to_string())
        .collect();
    let truth: Vec<usize> = truth.iter().map(index).collect();
    let predicted: Vec<usize> = predicted.iter().map(index).collect();
    classification_report(&truth, &predicted, &labels)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
