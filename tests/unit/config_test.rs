//! Tests for configuration validation

use chrono::{TimeZone, Utc};
use lease_sim::config::{JobConfig, SimulationConfig};
use lease_sim::core::{AdmissionPolicy, SimulationError, TriggerKind};
use lease_sim::generator::ReleaseCadence;

fn cron_job(name: &str, schedule: &str) -> JobConfig {
    JobConfig {
        name: name.to_string(),
        version: String::new(),
        scenario: None,
        payload_type: None,
        duration_mins: 60,
        trigger: TriggerKind::Cron {
            schedule: schedule.to_string(),
        },
    }
}

fn valid() -> SimulationConfig {
    SimulationConfig {
        max_active_leases: 4,
        job_timeout_mins: 480,
        lease_wait_timeout_mins: 120,
        simulation_duration_hours: 168,
        tick_mins: 5,
        sample_interval_mins: 30,
        start: None,
        seed: None,
        admission: AdmissionPolicy::Fifo,
        release_interval: ReleaseCadence::default(),
        jobs: vec![cron_job("nightly", "0 0 * * *")],
    }
}

#[test]
fn test_simulation_config_validation() {
    assert!(valid().validate().is_ok());
}

#[test]
fn test_zero_scalars_rejected() {
    let mut cfg = valid();
    cfg.max_active_leases = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = valid();
    cfg.lease_wait_timeout_mins = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = valid();
    cfg.simulation_duration_hours = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_no_jobs_rejected() {
    let mut cfg = valid();
    cfg.jobs.clear();
    assert_eq!(
        cfg.validate().unwrap_err(),
        "at least one job must be defined"
    );
}

#[test]
fn test_job_errors_name_the_job() {
    let mut cfg = valid();
    cfg.jobs.push(cron_job("weekly", "  "));
    let err = cfg.validate().unwrap_err();
    assert!(err.contains("weekly"), "{err}");

    let mut cfg = valid();
    let mut job = cron_job("zero", "0 0 * * *");
    job.duration_mins = 0;
    cfg.jobs.push(job);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_release_interval_bounds() {
    let mut cfg = valid();
    cfg.release_interval = ReleaseCadence {
        min_hours: 9,
        max_hours: 4,
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_full_json_round_trip() {
    let json = r#"{
        "max_active_leases": 3,
        "job_timeout_mins": 300,
        "lease_wait_timeout_mins": 90,
        "simulation_duration_hours": 72,
        "tick_mins": 10,
        "sample_interval_mins": 60,
        "start": "2024-03-04T00:00:00Z",
        "seed": 11,
        "admission": "release_priority",
        "release_interval": {"min_hours": 2, "max_hours": 3},
        "jobs": [
            {"name": "e2e", "version": "4.16", "scenario": "aws", "payload_type": "nightly",
             "duration_mins": 120, "trigger": {"type": "release_controller"}}
        ]
    }"#;
    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.admission, AdmissionPolicy::ReleasePriority);
    assert_eq!(cfg.start, Some(Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()));
    assert_eq!(cfg.seed, Some(11));
    assert_eq!(cfg.jobs[0].trigger, TriggerKind::ReleaseTriggered);
    assert_eq!(cfg.jobs[0].scenario.as_deref(), Some("aws"));

    let again = SimulationConfig::from_json_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(again, cfg);
}

#[test]
fn test_malformed_json_reported() {
    let err = SimulationConfig::from_json_str("{").unwrap_err();
    assert!(err.starts_with("parse error"), "{err}");
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SimulationConfig::from_path("does/not/exist.json").unwrap_err();
    match err {
        SimulationError::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_file_contents_are_config_error() {
    let path = std::env::temp_dir().join(format!("lease-sim-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"max_active_leases": 0}"#).unwrap();
    let err = SimulationConfig::from_path(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(err, SimulationError::Config(_)), "{err}");
}
