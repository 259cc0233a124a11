//! Per-column standardization.

use serde::{Deserialize, Serialize};

use crate::types::{EngineResult, TriageError};

/// Per-column standard scaler: `(x - mean) / std`.
///
/// Statistics use the population standard deviation. A constant column
/// gets a scale of 1, so it maps to 0 rather than dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fits column statistics on `rows`.
    ///
    /// # Errors
    /// `Training` for empty or ragged input.
    pub fn fit(rows: &[Vec<f64>]) -> EngineResult<Self> {
        let width = check_rows(rows)?;
        let n = rows.len() as f64;

        let mut means = vec![0.0; width];
        for row in rows {
            for (m, x) in means.iter_mut().zip(row) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut scales = vec![0.0; width];
        for row in rows {
            for ((s, x), m) in scales.iter_mut().zip(row).zip(&means) {
                *s += (x - m).powi(2);
            }
        }
        for s in &mut scales {
            let std = (*s / n).sqrt();
            *s = if std > 0.0 { std } else { 1.0 };
        }

        Ok(Self { means, scales })
    }

    /// Column means seen at fit time.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Column scales seen at fit time; 1 for constant columns.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Number of columns the scaler was fit on.
    pub fn width(&self) -> usize {
        self.means.len()
    }

    /// Scales one row.
    ///
    /// # Errors
    /// `Scoring` if the row width differs from the fitted width.
    pub fn transform(&self, row: &[f64]) -> EngineResult<Vec<f64>> {
        if row.len() != self.width() {
            return Err(TriageError::Scoring(format!(
                "scaler expects {} columns, got {}",
                self.width(),
                row.len()
            )));
        }
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (m, s))| (x - m) / s)
            .collect())
    }

    /// Scales many rows.
    pub fn transform_all(&self, rows: &[Vec<f64>]) -> EngineResult<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

/// Checks rows are non-empty and rectangular, returning the width.
pub(crate) fn check_rows(rows: &[Vec<f64>]) -> EngineResult<usize> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| TriageError::Training("no rows to fit".to_string()))?;
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(TriageError::Training(format!(
            "row {} has {} columns, expected {}",
            bad,
            rows[bad].len(),
            width
        )));
    }
    Ok(width)
}
