//! Risk categories.

/// Triage risk category, ordered by priority.
///
/// The derived ordering follows rank: `Emergency < Urgent < NonUrgent`, so
/// sorting ascending puts the patients who must wait least first.
///
/// # Examples
///
/// ```
/// use triage_types::RiskCategory;
///
/// assert!(RiskCategory::Emergency < RiskCategory::NonUrgent);
/// assert_eq!(RiskCategory::Urgent.rank(), 2);
/// assert_eq!(RiskCategory::from_label("yellow"), Some(RiskCategory::Urgent));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskCategory {
    /// Immediate care.
    Emergency,
    /// Care within about one hour.
    Urgent,
    /// Care within about four hours.
    NonUrgent,
}

impl RiskCategory {
    /// All categories in rank order.
    pub const ALL: [RiskCategory; 3] = [Self::Emergency, Self::Urgent, Self::NonUrgent];

    /// Numeric rank: 1 (highest priority) to 3.
    pub fn rank(self) -> u8 {
        match self {
            Self::Emergency => 1,
            Self::Urgent => 2,
            Self::NonUrgent => 3,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Emergency => "Emergency",
            Self::Urgent => "Urgent",
            Self::NonUrgent => "Non-urgent",
        }
    }

    /// Manchester colour code.
    pub fn color(self) -> &'static str {
        match self {
            Self::Emergency => "RED",
            Self::Urgent => "YELLOW",
            Self::NonUrgent => "GREEN",
        }
    }

    /// Target maximum wait, in minutes.
    pub fn expected_wait_minutes(self) -> u32 {
        match self {
            Self::Emergency => 0,
            Self::Urgent => 60,
            Self::NonUrgent => 240,
        }
    }

    /// Parses a label or colour code, ignoring case and surrounding space.
    ///
    /// Returns `None` for anything unrecognized; callers decide the default.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "emergency" | "red" => Some(Self::Emergency),
            "urgent" | "yellow" => Some(Self::Urgent),
            "non-urgent" | "non urgent" | "nonurgent" | "green" => Some(Self::NonUrgent),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_rank() {
        let mut categories = vec![
            RiskCategory::NonUrgent,
            RiskCategory::Emergency,
            RiskCategory::Urgent,
        ];
        categories.sort();
        assert_eq!(categories, RiskCategory::ALL.to_vec());

        for pair in RiskCategory::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_labels_roundtrip() {
        for category in RiskCategory::ALL {
            assert_eq!(RiskCategory::from_label(category.label()), Some(category));
            assert_eq!(RiskCategory::from_label(category.color()), Some(category));
        }
        assert_eq!(RiskCategory::from_label("unknown"), None);
    }

    #[test]
    fn test_wait_times() {
        assert_eq!(RiskCategory::Emergency.expected_wait_minutes(), 0);
        assert_eq!(RiskCategory::Urgent.expected_wait_minutes(), 60);
        assert_eq!(RiskCategory::NonUrgent.expected_wait_minutes(), 240);
    }
}
