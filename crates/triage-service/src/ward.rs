//! Ward service: patients flowing through triage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use triage_engine::TriageAgent;
use triage_types::{MedicalHistory, RiskCategory, Sex, Symptoms, VitalSigns};
use uuid::Uuid;

use crate::error::{ServiceResult, StoreError};
use crate::profile::PatientProfile;
use crate::store::PatientStore;

/// Severity above which an emergency patient counts as critical.
pub const CRITICAL_SEVERITY: f64 = 7.0;

/// Summary of the emergency queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmergencyStats {
    /// Patients in the Emergency category.
    pub total_emergency: usize,
    /// Emergency patients with severity above [`CRITICAL_SEVERITY`].
    pub critical_count: usize,
    /// Mean severity of emergency patients.
    pub average_severity: f64,
    /// Highest severity among emergency patients.
    pub max_severity: f64,
    /// Longest wait among emergency patients, in minutes.
    pub oldest_waiting_minutes: f64,
    /// Mean wait among emergency patients, in minutes.
    pub average_waiting_minutes: f64,
}

/// Waiting times across all patients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitingTimeStats {
    /// Patients in the ward.
    pub total_patients: usize,
    /// Mean wait, in minutes.
    pub average_waiting_minutes: f64,
    /// Longest wait, in minutes.
    pub max_waiting_minutes: f64,
    /// Shortest wait, in minutes.
    pub min_waiting_minutes: f64,
    /// Patients in Emergency.
    pub emergency_count: usize,
    /// Patients in Urgent.
    pub urgent_count: usize,
    /// Patients in Non-urgent.
    pub non_urgent_count: usize,
}

/// Registers patients, keeps their category current and answers queue queries.
///
/// Every change to vitals, symptoms or history re-runs triage through the
/// agent. With red-flag escalation on, a patient whose vitals or symptoms make
/// them an emergency case is moved to Emergency whatever the agent decided.
pub struct WardService {
    store: Box<dyn PatientStore>,
    agent: TriageAgent,
    escalate_red_flags: bool,
}

impl WardService {
    /// Creates a service with red-flag escalation on.
    pub fn new(store: Box<dyn PatientStore>, agent: TriageAgent) -> Self {
        Self {
            store,
            agent,
            escalate_red_flags: true,
        }
    }

    /// Turns red-flag escalation on or off.
    pub fn with_red_flag_escalation(mut self, enabled: bool) -> Self {
        self.escalate_red_flags = enabled;
        self
    }

    /// The agent used for triage.
    pub fn agent(&self) -> &TriageAgent {
        &self.agent
    }

    /// Registers a new, untriaged patient.
    pub fn register(
        &self,
        name: &str,
        age: u8,
        sex: Sex,
        chief_complaint: &str,
    ) -> ServiceResult<PatientProfile> {
        let profile = PatientProfile::new(name, age, sex)?.with_complaint(chief_complaint);
        self.store.save(&profile)?;
        tracing::info!(id = %profile.id, "registered patient");
        Ok(profile)
    }

    /// Registers a patient directly into the Emergency category.
    pub fn register_emergency(
        &self,
        name: &str,
        age: u8,
        sex: Sex,
        chief_complaint: &str,
    ) -> ServiceResult<PatientProfile> {
        let mut profile = PatientProfile::new(name, age, sex)?.with_complaint(chief_complaint);
        profile.category = Some(RiskCategory::Emergency);
        self.store.save(&profile)?;
        tracing::info!(id = %profile.id, "registered emergency patient");
        Ok(profile)
    }

    /// Stores an externally built profile, triaging it if it has vitals.
    pub fn admit(&self, mut profile: PatientProfile) -> ServiceResult<PatientProfile> {
        self.retriage(&mut profile)?;
        self.store.save(&profile)?;
        Ok(profile)
    }

    /// Looks up a patient.
    pub fn get(&self, id: Uuid) -> ServiceResult<PatientProfile> {
        Ok(self.store.get_by_id(id)?.ok_or(StoreError::NotFound(id))?)
    }

    /// Records vital signs and re-triages.
    pub fn record_vitals(&self, id: Uuid, vitals: VitalSigns) -> ServiceResult<PatientProfile> {
        self.modify(id, |p| p.vitals = Some(vitals))
    }

    /// Updates reported symptoms and re-triages.
    pub fn record_symptoms(
        &self,
        id: Uuid,
        update: impl FnOnce(&mut Symptoms),
    ) -> ServiceResult<PatientProfile> {
        self.modify(id, |p| update(&mut p.symptoms))
    }

    /// Replaces the medical history and re-triages.
    pub fn record_history(
        &self,
        id: Uuid,
        history: MedicalHistory,
    ) -> ServiceResult<PatientProfile> {
        self.modify(id, |p| p.history = history)
    }

    /// Removes a patient from the ward.
    pub fn discharge(&self, id: Uuid) -> ServiceResult<()> {
        self.store.delete(id)?;
        tracing::info!(id = %id, "discharged patient");
        Ok(())
    }

    /// Patients in a category, oldest arrival first.
    pub fn patients_in(&self, category: RiskCategory) -> ServiceResult<Vec<PatientProfile>> {
        Ok(self.store.get_by_category(category)?)
    }

    /// Emergency patients by severity, highest first; ties by arrival, oldest first.
    pub fn emergency_queue(&self) -> ServiceResult<Vec<PatientProfile>> {
        let mut queue: Vec<(f64, PatientProfile)> = self
            .store
            .get_by_category(RiskCategory::Emergency)?
            .into_iter()
            .map(|p| (p.severity(), p))
            .collect();
        queue.sort_by(|(sa, a), (sb, b)| {
            sb.total_cmp(sa)
                .then(a.arrived_at.cmp(&b.arrived_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(queue.into_iter().map(|(_, p)| p).collect())
    }

    /// Emergency patients with severity above [`CRITICAL_SEVERITY`], in queue order.
    pub fn critical_patients(&self) -> ServiceResult<Vec<PatientProfile>> {
        Ok(self
            .emergency_queue()?
            .into_iter()
            .filter(|p| p.severity() > CRITICAL_SEVERITY)
            .collect())
    }

    /// Statistics over the emergency queue as of `now`; all zero when empty.
    pub fn emergency_stats(&self, now: DateTime<Utc>) -> ServiceResult<EmergencyStats> {
        let queue = self.emergency_queue()?;
        if queue.is_empty() {
            return Ok(EmergencyStats::default());
        }

        let severities: Vec<f64> = queue.iter().map(PatientProfile::severity).collect();
        let waits: Vec<f64> = queue.iter().map(|p| p.waiting_minutes(now)).collect();
        Ok(EmergencyStats {
            total_emergency: queue.len(),
            critical_count: severities.iter().filter(|&&s| s > CRITICAL_SEVERITY).count(),
            average_severity: mean(&severities),
            max_severity: severities.iter().copied().fold(0.0, f64::max),
            oldest_waiting_minutes: waits.iter().copied().fold(f64::MIN, f64::max),
            average_waiting_minutes: mean(&waits),
        })
    }

    /// Waiting-time statistics over every patient as of `now`; `None` when empty.
    pub fn waiting_time_stats(&self, now: DateTime<Utc>) -> ServiceResult<Option<WaitingTimeStats>> {
        let patients = self.store.get_all()?;
        if patients.is_empty() {
            return Ok(None);
        }

        let waits: Vec<f64> = patients.iter().map(|p| p.waiting_minutes(now)).collect();
        let count = |c: RiskCategory| patients.iter().filter(|p| p.category == Some(c)).count();
        Ok(Some(WaitingTimeStats {
            total_patients: patients.len(),
            average_waiting_minutes: mean(&waits),
            max_waiting_minutes: waits.iter().copied().fold(f64::MIN, f64::max),
            min_waiting_minutes: waits.iter().copied().fold(f64::MAX, f64::min),
            emergency_count: count(RiskCategory::Emergency),
            urgent_count: count(RiskCategory::Urgent),
            non_urgent_count: count(RiskCategory::NonUrgent),
        }))
    }

    /// Changes and re-triages a profile in one store transaction; a failed
    /// re-triage leaves the stored profile untouched.
    fn modify(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut PatientProfile),
    ) -> ServiceResult<PatientProfile> {
        let mut failure = None;
        let profile = self.store.modify(
            id,
            Box::new(|profile| {
                change(profile);
                match self.retriage(profile) {
                    Ok(()) => true,
                    Err(err) => {
                        failure = Some(err);
                        false
                    }
                }
            }),
        )?;
        match failure {
            Some(err) => Err(err),
            None => Ok(profile),
        }
    }

    fn retriage(&self, profile: &mut PatientProfile) -> ServiceResult<()> {
        let Some(record) = profile.record()? else {
            return Ok(());
        };

        let result = self.agent.process(&record);
        let mut category = result.category();
        if self.escalate_red_flags
            && category != RiskCategory::Emergency
            && triage_engine::is_emergency_case(&record)
        {
            tracing::warn!(
                id = %profile.id,
                decided = %category,
                "emergency case escalated to Emergency"
            );
            category = RiskCategory::Emergency;
        }

        tracing::debug!(
            id = %profile.id,
            category = %category,
            confidence = result.confidence(),
            path = result.path().as_str(),
            "patient triaged"
        );
        profile.category = Some(category);
        profile.last_triage = Some(result);
        Ok(())
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, JsonFileStore};
    use chrono::Duration;

    fn service() -> WardService {
        WardService::new(Box::new(InMemoryStore::new()), TriageAgent::rule_based())
    }

    fn stable() -> VitalSigns {
        VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5).unwrap()
    }

    fn critical() -> VitalSigns {
        VitalSigns::new(200.0, 120.0, 140.0, 85.0, 40.0).unwrap()
    }

    #[test]
    fn test_register_and_triage() {
        let ward = service();
        let patient = ward.register("Ana", 35, Sex::Female, "check-up").unwrap();
        assert_eq!(patient.category, None);

        let patient = ward.record_vitals(patient.id, stable()).unwrap();
        assert_eq!(patient.category, Some(RiskCategory::NonUrgent));
        assert!(patient.last_triage.is_some());
        assert_eq!(ward.get(patient.id).unwrap(), patient);
    }

    #[test]
    fn test_symptoms_retriage() {
        let ward = service();
        let patient = ward.register("Rui", 60, Sex::Male, "chest pain").unwrap();
        ward.record_vitals(patient.id, stable()).unwrap();

        let patient = ward
            .record_symptoms(patient.id, |s| s.chest_pain = true)
            .unwrap();
        // rules say Urgent; chest pain is a red flag, so escalation applies
        assert_eq!(
            patient.last_triage.as_ref().map(|r| r.category()),
            Some(RiskCategory::Urgent)
        );
        assert_eq!(patient.category, Some(RiskCategory::Emergency));
    }

    #[test]
    fn test_without_escalation_keeps_decided_category() {
        let ward = service().with_red_flag_escalation(false);
        let patient = ward.register("Rui", 60, Sex::Male, "chest pain").unwrap();
        ward.record_vitals(patient.id, stable()).unwrap();
        let patient = ward
            .record_symptoms(patient.id, |s| s.chest_pain = true)
            .unwrap();
        assert_eq!(patient.category, Some(RiskCategory::Urgent));
    }

    #[test]
    fn test_history_changes_severity() {
        let ward = service();
        let patient = ward.register("Lia", 70, Sex::Female, "").unwrap();
        let before = ward.record_vitals(patient.id, critical()).unwrap();
        let after = ward
            .record_history(
                patient.id,
                MedicalHistory {
                    chronic_conditions: vec!["heart failure".to_string()],
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(after.severity(), before.severity() + 1.0);
    }

    #[test]
    fn test_emergency_queue_order() {
        let ward = service();
        let now = Utc::now();

        let mut older = PatientProfile::new("older", 40, Sex::Male)
            .unwrap()
            .with_arrival(now - Duration::minutes(30));
        older.vitals = Some(critical());
        let mut newer = PatientProfile::new("newer", 40, Sex::Male)
            .unwrap()
            .with_arrival(now - Duration::minutes(5));
        newer.vitals = Some(critical());
        let mut sicker = PatientProfile::new("sicker", 80, Sex::Male)
            .unwrap()
            .with_arrival(now);
        sicker.vitals = Some(critical());
        sicker.symptoms.seizures = true;

        for p in [newer, sicker, older] {
            ward.admit(p).unwrap();
        }
        ward.register_emergency("no vitals", 30, Sex::Other, "trauma").unwrap();

        let names: Vec<String> = ward.emergency_queue().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["sicker", "older", "newer", "no vitals"]);

        // sicker: 2 + 2 + 2 + 1 + 1 + 1 = 9; others: 6
        let critical_names: Vec<String> = ward.critical_patients().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(critical_names, vec!["sicker"]);

        let stats = ward.emergency_stats(now).unwrap();
        assert_eq!(stats.total_emergency, 4);
        assert_eq!(stats.critical_count, 1);
        assert_eq!(stats.max_severity, 9.0);
        assert_eq!(stats.average_severity, (9.0 + 6.0 + 6.0) / 4.0);
        assert!(stats.oldest_waiting_minutes >= 30.0);
    }

    #[test]
    fn test_stats_on_empty_ward() {
        let ward = service();
        assert_eq!(ward.emergency_stats(Utc::now()).unwrap(), EmergencyStats::default());
        assert_eq!(ward.waiting_time_stats(Utc::now()).unwrap(), None);
    }

    #[test]
    fn test_waiting_time_stats() {
        let ward = service();
        let now = Utc::now();
        for (name, minutes, vitals) in [("a", 10, stable()), ("b", 50, critical())] {
            let mut p = PatientProfile::new(name, 30, Sex::Female)
                .unwrap()
                .with_arrival(now - Duration::minutes(minutes));
            p.vitals = Some(vitals);
            ward.admit(p).unwrap();
        }

        let stats = ward.waiting_time_stats(now).unwrap().unwrap();
        assert_eq!(stats.total_patients, 2);
        assert_eq!(stats.average_waiting_minutes, 30.0);
        assert_eq!(stats.max_waiting_minutes, 50.0);
        assert_eq!(stats.min_waiting_minutes, 10.0);
        assert_eq!(stats.emergency_count, 1);
        assert_eq!(stats.non_urgent_count, 1);
        assert_eq!(stats.urgent_count, 0);
    }

    fn concurrent_symptom_updates(ward: &WardService) {
        let patient = ward.register("Ana", 35, Sex::Female, "").unwrap();
        ward.record_vitals(patient.id, stable()).unwrap();

        let updates: [fn(&mut Symptoms); 6] = [
            |s| s.fever = true,
            |s| s.dizziness = true,
            |s| s.vomiting = true,
            |s| s.abdominal_pain = true,
            |s| s.severe_headache = true,
            |s| s.extreme_weakness = true,
        ];
        std::thread::scope(|scope| {
            for update in updates {
                scope.spawn(move || ward.record_symptoms(patient.id, update).unwrap());
            }
        });

        let patient = ward.get(patient.id).unwrap();
        assert_eq!(patient.symptoms.count(), 6);
        assert!(patient.last_triage.is_some());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        concurrent_symptom_updates(&service());

        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("patients.json")).unwrap();
        concurrent_symptom_updates(&WardService::new(Box::new(store), TriageAgent::rule_based()));
    }

    #[test]
    fn test_discharge_and_missing_patient() {
        let ward = service();
        let patient = ward.register("Ana", 35, Sex::Female, "").unwrap();
        ward.discharge(patient.id).unwrap();
        assert!(ward.get(patient.id).is_err());
        assert!(ward.record_vitals(patient.id, stable()).is_err());
        assert_eq!(ward.patients_in(RiskCategory::NonUrgent).unwrap().len(), 0);
    }
}
