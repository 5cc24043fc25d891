//! Tests for configuration loading and validation

use head_tilt_quiz::config::{Config, EXAMPLE_CONFIG};
use head_tilt_quiz::selector::AngleSignConvention;
use head_tilt_quiz::Error;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    let mut config = Config::default();
    config.selector.ready_threshold = 1.2;
    config.selector.angle_sign_convention = AngleSignConvention::PositiveIsLeft;
    config.transmit.interval_ms = 250;
    config.game.seed = Some(7);
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_example_config_file_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_malformed_file_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"selector: [not, a, mapping]\n").unwrap();

    assert!(matches!(Config::from_file(file.path()), Err(Error::ConfigError(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(Config::from_file("/nonexistent/config.yaml"), Err(Error::Io(_))));
}

#[test]
fn test_missing_questions_file_rejected() {
    let mut config = Config::default();
    config.game.questions_file = Some(PathBuf::from("/nonexistent/questions.yaml"));
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
}

#[test]
fn test_questions_file_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "- {{id: 1, question: 'Q', left_answer: A, right_answer: B, correct_side: RIGHT, category: Test}}"
    )
    .unwrap();

    let mut config = Config::default();
    config.game.questions_file = Some(file.path().to_path_buf());
    assert!(config.validate().is_ok());
    assert_eq!(config.create_question_bank().unwrap().len(), 1);
}

#[test]
fn test_factories_use_configured_values() {
    let mut config = Config::default();
    config.selector.window_size = 3;
    config.estimator.fold_half_turn = true;

    assert_eq!(config.create_selector().config().window_size, 3);
    assert!(config.create_estimator().config().fold_half_turn);
    assert_eq!(config.create_question_bank().unwrap().len(), 25);
}

#[test]
fn test_posture_section_partial_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"posture:\n  bad_severity: 70\n  axis_max_angle: 40.0\n").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.posture.bad_severity, 70);
    assert_eq!(config.posture.forward_range, 0.10);
    assert!(config.validate().is_ok());

    let estimator = config.create_posture_estimator();
    assert_eq!(estimator.config().axis_max_angle, 40.0);
    assert_eq!(estimator.tilt_axis(40.0), 1.0);
}
