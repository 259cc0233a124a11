//! Presenting symptoms.

/// Symptom flags reported at triage.
///
/// The first six flags form the base profile every decision path reads; the
/// remaining six extend it and feed the severity score.
///
/// # Examples
///
/// ```
/// use triage_types::Symptoms;
///
/// let symptoms = Symptoms {
///     chest_pain: true,
///     seizures: true,
///     vomiting: true,
///     ..Default::default()
/// };
///
/// assert_eq!(symptoms.red_flags(), vec!["chest pain", "seizures"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Symptoms {
    /// Chest pain.
    pub chest_pain: bool,
    /// Difficulty breathing.
    pub breathing_difficulty: bool,
    /// Reported fever.
    pub fever: bool,
    /// Dizziness.
    pub dizziness: bool,
    /// Vomiting.
    pub vomiting: bool,
    /// Abdominal pain.
    pub abdominal_pain: bool,
    /// Seizures.
    pub seizures: bool,
    /// Active bleeding.
    pub active_bleeding: bool,
    /// Loss of consciousness.
    pub loss_of_consciousness: bool,
    /// Severe headache.
    pub severe_headache: bool,
    /// Extreme weakness.
    pub extreme_weakness: bool,
    /// Extreme pallor.
    pub extreme_pallor: bool,
}

impl Symptoms {
    /// Returns all flags paired with their feature names, base profile first.
    pub fn flags(&self) -> [(&'static str, bool); 12] {
        use crate::well_known::*;
        [
            (CHEST_PAIN, self.chest_pain),
            (BREATHING_DIFFICULTY, self.breathing_difficulty),
            (FEVER, self.fever),
            (DIZZINESS, self.dizziness),
            (VOMITING, self.vomiting),
            (ABDOMINAL_PAIN, self.abdominal_pain),
            (SEIZURES, self.seizures),
            (ACTIVE_BLEEDING, self.active_bleeding),
            (LOSS_OF_CONSCIOUSNESS, self.loss_of_consciousness),
            (SEVERE_HEADACHE, self.severe_headache),
            (EXTREME_WEAKNESS, self.extreme_weakness),
            (EXTREME_PALLOR, self.extreme_pallor),
        ]
    }

    /// Returns the names of red-flag symptoms that are present.
    ///
    /// Red flags are chest pain, breathing difficulty, seizures, active
    /// bleeding, loss of consciousness and severe headache.
    pub fn red_flags(&self) -> Vec<&'static str> {
        [
            (self.chest_pain, "chest pain"),
            (self.breathing_difficulty, "breathing difficulty"),
            (self.seizures, "seizures"),
            (self.active_bleeding, "active bleeding"),
            (self.loss_of_consciousness, "loss of consciousness"),
            (self.severe_headache, "severe headache"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
    }

    /// Returns the number of symptoms present.
    pub fn count(&self) -> usize {
        self.flags().iter().filter(|(_, present)| *present).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_symptoms() {
        let symptoms = Symptoms::default();
        assert!(symptoms.red_flags().is_empty());
        assert_eq!(symptoms.count(), 0);
    }

    #[test]
    fn test_dizziness_is_not_a_red_flag() {
        let symptoms = Symptoms {
            dizziness: true,
            vomiting: true,
            ..Default::default()
        };
        assert!(symptoms.red_flags().is_empty());
        assert_eq!(symptoms.count(), 2);
    }

    #[test]
    fn test_flags_order() {
        let flags = Symptoms::default().flags();
        assert_eq!(flags[0].0, "chest_pain");
        assert_eq!(flags[5].0, "abdominal_pain");
        assert_eq!(flags[11].0, "extreme_pallor");
    }
}
