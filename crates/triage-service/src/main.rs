//! Triage demo binary.
//!
//! Trains the learned classifier, compares both decision paths on three
//! reference patients, scores the rule engine against labelled synthetic
//! data, then runs a handful of simulated arrivals through the ward.

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_engine::dataset::load_ktas;
use triage_engine::metrics::category_report;
use triage_engine::{
    ClassifierAdapter, GaussianNaiveBayes, GeneratorConfig, LabeledSample, SyntheticGenerator,
    TrainingConfig, TriageAgent,
};
use triage_service::{
    InMemoryStore, JsonFileStore, PatientStore, ServiceConfig, StrategyKind, WardService,
};
use triage_types::{PatientRecord, RiskCategory, Sex, Symptoms, VitalSigns};

const ARRIVALS: usize = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::info!(?config, "starting triage demo");

    let mut generator = SyntheticGenerator::new(GeneratorConfig::with_seed(config.seed))?;
    let patients = generator.generate(config.training_samples)?;

    let samples: Vec<LabeledSample> = match &config.ktas_path {
        Some(path) => {
            tracing::info!("Training on KTAS data from: {}", path.display());
            load_ktas(path)?
        }
        None => patients.iter().map(|p| p.to_sample()).collect(),
    };
    let training = TrainingConfig {
        seed: config.seed,
        ..Default::default()
    };
    let (adapter, training_report) =
        ClassifierAdapter::train(GaussianNaiveBayes::new(), &samples, &training)?;
    println!("== learned model ({}) ==", training_report.classifier);
    println!("{}", serde_json::to_string_pretty(&training_report.report)?);

    let rules = TriageAgent::rule_based();
    let learned = TriageAgent::learned(adapter);

    // Rule engine against the synthetic ground truth
    let records: Vec<PatientRecord> = patients.iter().map(|p| p.record.clone()).collect();
    let truth: Vec<RiskCategory> = patients.iter().map(|p| p.category).collect();
    let predicted: Vec<RiskCategory> = rules
        .process_batch(&records)
        .iter()
        .map(|r| r.category())
        .collect();
    let rule_report = category_report(&truth, &predicted);
    println!("== rule engine on {} synthetic patients ==", records.len());
    println!("{}", serde_json::to_string_pretty(&rule_report)?);

    println!("== reference patients ==");
    for (name, record) in reference_patients()? {
        for agent in [&rules, &learned] {
            let result = agent.process(&record);
            println!(
                "{:<10} {:<9} {:<10} confidence {:.2}  [{}]",
                name,
                result.path().as_str(),
                result.category().label(),
                result.confidence(),
                result.reasoning_text()
            );
        }
    }

    let agent = match config.strategy {
        StrategyKind::Rules => rules,
        StrategyKind::Learned => learned,
    };
    let store: Box<dyn PatientStore> = match &config.store_path {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => Box::new(InMemoryStore::new()),
    };
    let ward = WardService::new(store, agent).with_red_flag_escalation(config.escalate_red_flags);

    for n in 1..=ARRIVALS {
        let arrival = generator.realtime_patient()?;
        let record = &arrival.record;
        let profile = ward.register(&format!("patient-{}", n), record.age(), record.sex(), "")?;
        let symptoms = *record.symptoms();
        ward.record_symptoms(profile.id, |s| *s = symptoms)?;
        let profile = ward.record_vitals(profile.id, *record.vitals())?;
        tracing::info!(
            "{} triaged as {} (generated as {})",
            profile.name,
            profile.category.map_or("untriaged", RiskCategory::label),
            arrival.category
        );
    }

    println!("== emergency queue ==");
    for profile in ward.emergency_queue()? {
        println!(
            "{:<12} severity {:>4.1}  red flags: {}",
            profile.name,
            profile.severity(),
            profile.symptoms.red_flags().join(", ")
        );
    }

    let now = Utc::now();
    println!("{}", serde_json::to_string_pretty(&ward.emergency_stats(now)?)?);
    if let Some(stats) = ward.waiting_time_stats(now)? {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Ok(())
}

fn reference_patients() -> Result<Vec<(&'static str, PatientRecord)>, Box<dyn std::error::Error>> {
    let stable = PatientRecord::new(
        VitalSigns::new(120.0, 80.0, 72.0, 98.0, 36.5)?,
        35,
        Sex::Male,
        Symptoms::default(),
    )?;
    let critical = PatientRecord::new(
        VitalSigns::new(200.0, 120.0, 140.0, 85.0, 40.0)?,
        70,
        Sex::Female,
        Symptoms {
            chest_pain: true,
            breathing_difficulty: true,
            fever: true,
            dizziness: true,
            vomiting: true,
            ..Default::default()
        },
    )?;
    let moderate = PatientRecord::new(
        VitalSigns::new(150.0, 95.0, 105.0, 92.0, 38.5)?,
        55,
        Sex::Male,
        Symptoms {
            chest_pain: true,
            fever: true,
            abdominal_pain: true,
            ..Default::default()
        },
    )?;
    Ok(vec![
        ("stable", stable),
        ("critical", critical),
        ("moderate", moderate),
    ])
}
