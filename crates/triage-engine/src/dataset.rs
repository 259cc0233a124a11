//! CSV datasets of labelled samples.
//!
//! Two formats are supported:
//!
//! - the native format written by [`write_samples`]: one column per feature
//!   plus a trailing `label` column, comma-delimited;
//! - KTAS emergency-department exports (`;`-delimited) read by [`read_ktas`].

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use triage_types::{well_known, FeatureSet, RiskCategory};

use crate::classifier::LabeledSample;
use crate::features::read;
use crate::types::{EngineResult, TriageError};

/// Name of the label column in the native format.
pub const LABEL_COLUMN: &str = "label";

/// KTAS columns mapped to feature names, in read order.
const KTAS_NUMERIC: &[(&str, &str)] = &[
    ("SBP", well_known::SYSTOLIC),
    ("DBP", well_known::DIASTOLIC),
    ("HR", well_known::HEART_RATE),
    ("Saturation", well_known::OXYGEN_SATURATION),
    ("BT", well_known::TEMPERATURE),
    ("Age", well_known::AGE),
];
const KTAS_SEX: &str = "Sex";
const KTAS_LEVEL: &str = "KTAS_RN";

/// Writes samples in the native format.
///
/// Columns are the feature names of the first sample, in name order.
///
/// # Errors
/// `MissingFeature` if a later sample lacks one of those features.
pub fn write_samples<W: Write>(writer: W, samples: &[LabeledSample]) -> EngineResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let names: Vec<String> = samples
        .first()
        .map(|s| s.features.names().map(str::to_string).collect())
        .unwrap_or_default();

    let mut header: Vec<&str> = names.iter().map(String::as_str).collect();
    header.push(LABEL_COLUMN);
    csv.write_record(&header)?;

    for sample in samples {
        let mut record = names
            .iter()
            .map(|name| read::value(&sample.features, name).map(|v| v.to_string()))
            .collect::<EngineResult<Vec<String>>>()?;
        record.push(sample.label.clone());
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes samples in the native format to a file.
pub fn save_samples(path: impl AsRef<Path>, samples: &[LabeledSample]) -> EngineResult<()> {
    let path = path.as_ref();
    write_samples(File::create(path)?, samples)?;
    tracing::info!(path = %path.display(), count = samples.len(), "saved dataset");
    Ok(())
}

/// Reads samples in the native format.
///
/// # Errors
/// `Dataset` if the label column is missing or a feature cell is not a number.
pub fn read_samples<R: Read>(reader: R) -> EngineResult<Vec<LabeledSample>> {
    let mut csv = csv::Reader::from_reader(reader);
    let headers = csv.headers()?.clone();
    let label_index = headers
        .iter()
        .position(|h| h == LABEL_COLUMN)
        .ok_or_else(|| TriageError::Dataset(format!("missing '{}' column", LABEL_COLUMN)))?;

    let mut samples = Vec::new();
    for (line, row) in csv.records().enumerate() {
        let row = row?;
        let mut features = FeatureSet::new();
        let mut label = String::new();
        for (index, (name, cell)) in headers.iter().zip(row.iter()).enumerate() {
            if index == label_index {
                label = cell.to_string();
                continue;
            }
            let value = cell.trim().parse::<f64>().map_err(|_| {
                TriageError::Dataset(format!("row {}: {} is not a number: '{}'", line + 1, name, cell))
            })?;
            features.insert(name, value);
        }
        samples.push(LabeledSample { features, label });
    }
    Ok(samples)
}

/// Reads samples in the native format from a file.
pub fn load_samples(path: impl AsRef<Path>) -> EngineResult<Vec<LabeledSample>> {
    let path = path.as_ref();
    let samples = read_samples(File::open(path)?)?;
    tracing::info!(path = %path.display(), count = samples.len(), "loaded dataset");
    Ok(samples)
}

/// Maps a KTAS level to a category: 1–2 Emergency, 3 Urgent, 4–5 Non-urgent.
pub fn ktas_category(level: u8) -> Option<RiskCategory> {
    match level {
        1 | 2 => Some(RiskCategory::Emergency),
        3 => Some(RiskCategory::Urgent),
        4 | 5 => Some(RiskCategory::NonUrgent),
        _ => None,
    }
}

/// Reads a KTAS export.
///
/// Uses `SBP`, `DBP`, `HR`, `Saturation`, `BT`, `Age`, `Sex` and `KTAS_RN`.
/// Numeric cells that do not parse (blanks, `??`) take the median of the
/// column; decimal commas are accepted. `Sex` code `1` reads as male. Symptom
/// flags are absent from KTAS data and are set to 0. Rows whose `KTAS_RN` is
/// not a level 1–5 are skipped.
///
/// # Errors
/// `Dataset` if a required column is missing or a column has no numeric value.
pub fn read_ktas<R: Read>(reader: R) -> EngineResult<Vec<LabeledSample>> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TriageError::Dataset(format!("missing KTAS column '{}'", name)))
    };

    let numeric_columns = KTAS_NUMERIC
        .iter()
        .map(|(ktas, _)| column(ktas))
        .collect::<EngineResult<Vec<usize>>>()?;
    let sex_column = column(KTAS_SEX)?;
    let level_column = column(KTAS_LEVEL)?;

    let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); KTAS_NUMERIC.len()];
    let mut sexes = Vec::new();
    let mut labels = Vec::new();
    let mut skipped = 0usize;

    for row in csv.records() {
        let row = row?;
        let level = row
            .get(level_column)
            .and_then(parse_number)
            .and_then(|v| ktas_category(v as u8).filter(|_| v.fract() == 0.0));
        let Some(category) = level else {
            skipped += 1;
            continue;
        };

        for (values, &index) in cells.iter_mut().zip(&numeric_columns) {
            values.push(row.get(index).and_then(parse_number));
        }
        sexes.push(row.get(sex_column).map(is_male_code).unwrap_or(false));
        labels.push(category);
    }

    let mut filled = Vec::with_capacity(cells.len());
    for ((_, name), values) in KTAS_NUMERIC.iter().zip(&cells) {
        let known: Vec<f64> = values.iter().flatten().copied().collect();
        let fill = if known.len() == values.len() {
            0.0
        } else {
            median(&known).ok_or_else(|| {
                TriageError::Dataset(format!("KTAS column for {} has no numeric values", name))
            })?
        };
        filled.push(values.iter().map(|v| v.unwrap_or(fill)).collect::<Vec<f64>>());
    }

    let samples: Vec<LabeledSample> = labels
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let mut features: FeatureSet = KTAS_NUMERIC
                .iter()
                .zip(&filled)
                .map(|((_, name), column)| (*name, column[i]))
                .collect();
            features.insert_flag(well_known::SEX_MALE, sexes[i]);
            for name in SYMPTOM_FLAGS {
                features.insert_flag(*name, false);
            }
            LabeledSample {
                features,
                label: category.label().to_string(),
            }
        })
        .collect();

    if skipped > 0 {
        tracing::warn!(skipped, "skipped KTAS rows without a valid triage level");
    }
    tracing::info!(count = samples.len(), "read KTAS dataset");
    Ok(samples)
}

/// Reads a KTAS export from a file.
pub fn load_ktas(path: impl AsRef<Path>) -> EngineResult<Vec<LabeledSample>> {
    read_ktas(File::open(path)?)
}

const SYMPTOM_FLAGS: &[&str] = &[
    well_known::CHEST_PAIN,
    well_known::BREATHING_DIFFICULTY,
    well_known::FEVER,
    well_known::DIZZINESS,
    well_known::VOMITING,
    well_known::ABDOMINAL_PAIN,
    well_known::SEIZURES,
    well_known::ACTIVE_BLEEDING,
    well_known::LOSS_OF_CONSCIOUSNESS,
    well_known::SEVERE_HEADACHE,
    well_known::EXTREME_WEAKNESS,
    well_known::EXTREME_PALLOR,
];

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn is_male_code(cell: &str) -> bool {
    matches!(cell.trim().to_ascii_lowercase().as_str(), "1" | "m" | "male")
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const KTAS: &str = "\
Group;Sex;Age;Patients number per hour;Arrival mode;Injury;Chief_complain;Mental;Pain;NRS_pain;SBP;DBP;HR;RR;BT;Saturation;KTAS_RN
2;2;71;3;3;2;right ocular pain;1;1;2;160;100;84;18;36,6;100;2
1;1;56;12;3;2;right forearm burn;1;1;2;137;75;60;20;36,5;??;4
2;1;68;8;2;2;arm pain;1;1;2;130;80;102;20;36,6;98;3
1;2;71;8;1;1;ascites tapping;1;1;3;139;94;88;20;36,5;;5
1;2;30;8;1;1;dizziness;1;1;3;120;70;70;20;36,5;96;9
";

    #[test]
    fn test_read_ktas() {
        let samples = read_ktas(Cursor::new(KTAS)).unwrap();
        assert_eq!(samples.len(), 4);

        assert_eq!(samples[0].label, "Emergency");
        assert_eq!(samples[1].label, "Non-urgent");
        assert_eq!(samples[2].label, "Urgent");

        let first = &samples[0].features;
        assert_eq!(first.get(well_known::SYSTOLIC), Some(160.0));
        assert_eq!(first.get(well_known::TEMPERATURE), Some(36.6));
        assert_eq!(first.get(well_known::AGE), Some(71.0));
        assert_eq!(first.get(well_known::SEX_MALE), Some(0.0));
        assert_eq!(first.get(well_known::CHEST_PAIN), Some(0.0));
        assert_eq!(samples[1].features.get(well_known::SEX_MALE), Some(1.0));
    }

    #[test]
    fn test_ktas_missing_cells_take_median() {
        let samples = read_ktas(Cursor::new(KTAS)).unwrap();
        // known saturations among kept rows: 100, 98 -> median 99
        assert_eq!(samples[1].features.get(well_known::OXYGEN_SATURATION), Some(99.0));
        assert_eq!(samples[3].features.get(well_known::OXYGEN_SATURATION), Some(99.0));
    }

    #[test]
    fn test_ktas_missing_column() {
        let data = "Sex;Age;KTAS_RN\n1;40;3\n";
        assert!(matches!(
            read_ktas(Cursor::new(data)),
            Err(TriageError::Dataset(_))
        ));
    }

    #[test]
    fn test_ktas_category() {
        assert_eq!(ktas_category(1), Some(RiskCategory::Emergency));
        assert_eq!(ktas_category(3), Some(RiskCategory::Urgent));
        assert_eq!(ktas_category(5), Some(RiskCategory::NonUrgent));
        assert_eq!(ktas_category(0), None);
        assert_eq!(ktas_category(6), None);
    }

    #[test]
    fn test_native_file_roundtrip() {
        let mut features = FeatureSet::new();
        features.insert(well_known::SYSTOLIC, 120.5);
        features.insert_flag(well_known::FEVER, true);
        let samples = vec![LabeledSample {
            features,
            label: "Urgent".to_string(),
        }];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        save_samples(&path, &samples).unwrap();
        assert_eq!(load_samples(&path).unwrap(), samples);
    }

    #[test]
    fn test_read_samples_rejects_bad_cells() {
        let no_label = "systolic,fever\n120,0\n";
        assert!(read_samples(Cursor::new(no_label)).is_err());

        let bad_cell = "systolic,label\nhigh,Urgent\n";
        assert!(matches!(
            read_samples(Cursor::new(bad_cell)),
            Err(TriageError::Dataset(_))
        ));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }
}
