//! Validation errors raised while constructing patient data.

/// A patient measurement was rejected at construction time.
///
/// Validation happens once, at the boundary, so scoring code can rely on
/// every accepted record being physiologically plausible.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A measurement fell outside its accepted range.
    OutOfRange {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// A measurement was NaN or infinite.
    NotFinite {
        /// Name of the rejected field.
        field: &'static str,
    },
    /// A coded value (such as a sex code) was not recognized.
    UnknownCode {
        /// Name of the rejected field.
        field: &'static str,
        /// The unrecognized code.
        code: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} out of valid range: {} (expected {}..={})",
                field, value, min, max
            ),
            Self::NotFinite { field } => write!(f, "{} is not a finite number", field),
            Self::UnknownCode { field, code } => write!(f, "unknown {} code: '{}'", field, code),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_out_of_range() {
        let err = ValidationError::OutOfRange {
            field: "systolic",
            value: 260.0,
            min: 50.0,
            max: 250.0,
        };
        assert_eq!(
            err.to_string(),
            "systolic out of valid range: 260 (expected 50..=250)"
        );
    }

    #[test]
    fn test_display_unknown_code() {
        let err = ValidationError::UnknownCode {
            field: "sex",
            code: "X".to_string(),
        };
        assert_eq!(err.to_string(), "unknown sex code: 'X'");
    }
}
