//! Service configuration from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Which decision strategy the service triages with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyKind {
    /// Deterministic rule evaluator.
    #[default]
    Rules,
    /// Trained classifier.
    Learned,
}

/// Service configuration.
///
/// | variable | default | meaning |
/// |---|---|---|
/// | `TRIAGE_STRATEGY` | `rules` | `rules` or `learned` |
/// | `TRIAGE_SEED` | `42` | seed for synthetic data and the holdout split |
/// | `TRIAGE_TRAINING_SAMPLES` | `1000` | synthetic patients to train on |
/// | `TRIAGE_KTAS_PATH` | unset | train on a KTAS export instead of synthetic data |
/// | `TRIAGE_STORE_PATH` | unset | JSON file store; in-memory when unset |
/// | `TRIAGE_ESCALATE_RED_FLAGS` | `true` | force Emergency for emergency cases |
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Decision strategy.
    pub strategy: StrategyKind,
    /// RNG seed.
    pub seed: u64,
    /// Number of synthetic training patients.
    pub training_samples: usize,
    /// Optional KTAS training data.
    pub ktas_path: Option<PathBuf>,
    /// Optional JSON store location.
    pub store_path: Option<PathBuf>,
    /// Escalate emergency cases regardless of the decided category.
    pub escalate_red_flags: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Rules,
            seed: 42,
            training_samples: 1000,
            ktas_path: None,
            store_path: None,
            escalate_red_flags: true,
        }
    }
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("TRIAGE_STRATEGY") {
            config.strategy = match value.trim().to_ascii_lowercase().as_str() {
                "rules" => StrategyKind::Rules,
                "learned" => StrategyKind::Learned,
                _ => {
                    return Err(invalid("TRIAGE_STRATEGY", value, "expected 'rules' or 'learned'"))
                }
            };
        }
        if let Some(value) = lookup("TRIAGE_SEED") {
            config.seed = value
                .trim()
                .parse()
                .map_err(|_| invalid("TRIAGE_SEED", value.clone(), "expected an unsigned integer"))?;
        }
        if let Some(value) = lookup("TRIAGE_TRAINING_SAMPLES") {
            config.training_samples = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(invalid(
                        "TRIAGE_TRAINING_SAMPLES",
                        value,
                        "expected a positive integer",
                    ))
                }
            };
        }
        config.ktas_path = lookup("TRIAGE_KTAS_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        config.store_path = lookup("TRIAGE_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        if let Some(value) = lookup("TRIAGE_ESCALATE_RED_FLAGS") {
            config.escalate_red_flags = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(invalid(
                        "TRIAGE_ESCALATE_RED_FLAGS",
                        value,
                        "expected a boolean",
                    ))
                }
            };
        }

        Ok(config)
    }
}

fn invalid(key: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { key, value, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.strategy, StrategyKind::Rules);
        assert!(config.escalate_red_flags);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("TRIAGE_STRATEGY", "Learned"),
            ("TRIAGE_SEED", "7"),
            ("TRIAGE_TRAINING_SAMPLES", "250"),
            ("TRIAGE_KTAS_PATH", "data/ktas.csv"),
            ("TRIAGE_STORE_PATH", "/tmp/ward.json"),
            ("TRIAGE_ESCALATE_RED_FLAGS", "off"),
        ]))
        .unwrap();

        assert_eq!(config.strategy, StrategyKind::Learned);
        assert_eq!(config.seed, 7);
        assert_eq!(config.training_samples, 250);
        assert_eq!(config.ktas_path, Some(PathBuf::from("data/ktas.csv")));
        assert_eq!(config.store_path, Some(PathBuf::from("/tmp/ward.json")));
        assert!(!config.escalate_red_flags);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("TRIAGE_STRATEGY", "forest"),
            ("TRIAGE_SEED", "-1"),
            ("TRIAGE_TRAINING_SAMPLES", "0"),
            ("TRIAGE_ESCALATE_RED_FLAGS", "maybe"),
        ] {
            let err = ServiceConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            let ConfigError::Invalid { key: got, .. } = err;
            assert_eq!(got, key);
        }
    }
}
