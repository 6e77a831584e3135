//! Configuration files planned end to end.

use super::assert_follows;
use jolt_common::config::{ConfigError, LogLevel};
use jolt_planner::config::load_config;
use jolt_planner::plan::{MoveReport, plan_min_time, plan_with_duration};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn shipped_configuration_plans_every_move() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/jolt.toml");
    let config = load_config(&path).unwrap();
    let limits = config.limits.to_limits();
    assert_eq!(config.shared.log_level, LogLevel::Info);
    assert!(!config.moves.is_empty());

    for mv in &config.moves {
        let block = plan_min_time(&mv.start, &mv.goal, &limits)
            .unwrap_or_else(|e| panic!("move {}: {e}", mv.name));
        let profile = match mv.duration {
            Some(duration) => plan_with_duration(&mv.start, &mv.goal, &limits, duration).unwrap(),
            None => block.p_min,
        };
        assert_follows(&profile, &mv.goal, &limits);

        let report = MoveReport::new(&mv.name, &block, &profile);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], mv.name.as_str());
        assert!(json["phases"].as_array().is_some_and(|p| p.len() == 7));
    }
}

#[test]
fn temporary_configuration_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[shared]
service_name = "bench-axis"
log_level = "trace"

[limits]
v_max = 1.0
v_min = -0.5
a_max = 2.0
j_max = 10.0

[[move]]
name = "step"
start = {{ p = 0.0 }}
goal = {{ p = 0.5, v = 0.25 }}
duration = 2.0
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.shared.log_level, LogLevel::Trace);
    let mv = config.find_move("step").unwrap();
    let limits = config.limits.to_limits();
    let profile = plan_with_duration(&mv.start, &mv.goal, &limits, 2.0).unwrap();
    assert!((profile.duration() - 2.0).abs() < 1e-7);
    assert_follows(&profile, &mv.goal, &limits);
}

#[test]
fn missing_file() {
    let err = load_config(Path::new("/nonexistent/jolt.toml")).unwrap_err();
    assert_eq!(err, ConfigError::FileNotFound);
}
