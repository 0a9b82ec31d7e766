//! Tests for error types

use lease_sim::core::SimulationError;
use lease_sim::generator::CronSchedule;

#[test]
fn test_config_error() {
    let err = SimulationError::Config("max_active_leases must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: max_active_leases must be greater than 0"
    );
}

#[test]
fn test_schedule_error_names_expression() {
    let err = CronSchedule::parse("every tuesday").unwrap_err();
    assert!(matches!(err, SimulationError::Schedule { .. }));
    assert!(format!("{}", err).starts_with("invalid cron schedule `every tuesday`: "));
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: SimulationError = io.into();
    assert_eq!(format!("{}", err), "io error: missing");
}

#[test]
fn test_errors_convert_into_anyhow() {
    let result: lease_sim::core::AppResult<()> =
        Err(SimulationError::Config("bad".to_string()).into());
    assert_eq!(
        result.unwrap_err().to_string(),
        "invalid configuration: bad"
    );
}
