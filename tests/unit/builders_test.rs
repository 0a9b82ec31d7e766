//! Tests for the simulation builder

use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};
use lease_sim::builders::SimulationBuilder;
use lease_sim::config::SimulationConfig;
use lease_sim::core::{EventKind, SimulationError};

const CONFIG: &str = r#"{
    "max_active_leases": 1,
    "job_timeout_mins": 480,
    "lease_wait_timeout_mins": 30,
    "simulation_duration_hours": 24,
    "start": "2024-01-01T00:00:00Z",
    "jobs": [
        {"name": "twice-daily", "duration_mins": 60, "trigger": {"type": "cron", "schedule": "0 */12 * * *"}},
        {"name": "shadow", "duration_mins": 10, "trigger": {"type": "cron", "schedule": "0 */12 * * *"}},
        {"name": "broken", "duration_mins": 10, "trigger": {"type": "cron", "schedule": "not a cron"}}
    ]
}"#;

fn config() -> SimulationConfig {
    SimulationConfig::from_json_str(CONFIG).unwrap()
}

#[test]
fn test_builder_window_from_config() {
    let sim = SimulationBuilder::new(config()).build().unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(sim.window().start, start);
    assert_eq!(sim.window().duration(), Duration::hours(24));
    assert_eq!(sim.definitions().len(), 3);
    assert_eq!(sim.engine().params().max_active_leases, 1);
}

#[test]
fn test_builder_defaults_start_to_monday() {
    let mut cfg = config();
    cfg.start = None;
    let sim = SimulationBuilder::new(cfg).build().unwrap();
    let start = sim.window().start;
    assert_eq!(start.weekday(), Weekday::Mon);
    assert_eq!(start.time(), chrono::NaiveTime::MIN);
    assert!(start <= Utc::now());
}

#[test]
fn test_builder_overrides() {
    let start = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
    let builder = SimulationBuilder::new(config()).with_start(start).with_seed(5);
    assert_eq!(builder.config().seed, Some(5));
    assert_eq!(builder.build().unwrap().window().start, start);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let mut cfg = config();
    cfg.max_active_leases = 0;
    let err = SimulationBuilder::new(cfg).build().unwrap_err();
    assert!(matches!(err, SimulationError::Config(_)));
}

#[test]
fn test_report_counts_and_diagnostics() {
    let report = SimulationBuilder::new(config()).build().unwrap().run().unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].job, "broken");
    assert_eq!(report.instances.len(), 4);

    // "shadow" queues behind "twice-daily" and gives up after 30 minutes, twice.
    assert_eq!(report.count(EventKind::LeaseAcquired), 2);
    assert_eq!(report.count(EventKind::Waiting), 2);
    assert_eq!(report.count(EventKind::WaitTimeout), 2);
    assert!(report.has_warnings());
    assert_eq!(report.warnings().len(), 4);
    // Samples every 30 minutes across the closed window.
    assert_eq!(report.samples.len(), 49);
}

#[test]
fn test_report_json_document() {
    let report = SimulationBuilder::new(config()).build().unwrap().run().unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["max_active_leases"], 1);
    assert_eq!(json["events"].as_array().unwrap().len(), report.events.len());
    assert_eq!(json["warnings"].as_array().unwrap().len(), 4);
    assert_eq!(json["events"][0]["kind"], "lease_acquired");
}
