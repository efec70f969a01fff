use std::io::Write;
use std::sync::Mutex;

use tempfile::{Builder, NamedTempFile};

use fallwatch::config::MonitorConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "FALLWATCH_CONFIG",
        "FALLWATCH_SOURCE",
        "FALLWATCH_COOLDOWN_SECS",
        "FALLWATCH_ALERT_SECS",
        "FALLWATCH_SCORE_THRESHOLD",
        "FALLWATCH_OVERLAP_THRESHOLD",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = MonitorConfig::load().expect("load defaults");
    assert_eq!(cfg, MonitorConfig::default());
    assert_eq!(cfg.source.path, "stub://fall_scenario");
    assert_eq!(cfg.source.target_fps, 15);
    assert_eq!(cfg.detection.confidence_floor, 0.3);
    assert_eq!(cfg.detection.score_threshold, 0.3);
    assert_eq!(cfg.detection.overlap_threshold, 0.4);
    assert_eq!(cfg.fall.cooldown_secs, 1.0);
    assert_eq!(cfg.fall.alert_duration_secs, 2.0);
    assert_eq!(cfg.fall.max_tracked_identities, 64);
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "source": { "path": "/var/lib/fallwatch/ward3.jsonl", "target_fps": 12 },
        "detection": { "confidence_floor": 0.5, "overlap_threshold": 0.5 },
        "fall": { "cooldown_secs": 3.0, "max_tracked_identities": 8 }
    }"#;
    file.write_all(json.as_bytes()).expect("write config");

    std::env::set_var("FALLWATCH_CONFIG", file.path());
    std::env::set_var("FALLWATCH_ALERT_SECS", "5");
    std::env::set_var("FALLWATCH_OVERLAP_THRESHOLD", "0.6");

    let cfg = MonitorConfig::load().expect("load config");

    assert_eq!(cfg.source.path, "/var/lib/fallwatch/ward3.jsonl");
    assert_eq!(cfg.source.target_fps, 12);
    assert_eq!(cfg.detection.confidence_floor, 0.5);
    assert_eq!(cfg.detection.score_threshold, 0.3);
    assert_eq!(cfg.detection.overlap_threshold, 0.6);
    assert_eq!(cfg.fall.cooldown_secs, 3.0);
    assert_eq!(cfg.fall.alert_duration_secs, 5.0);
    assert_eq!(cfg.fall.max_tracked_identities, 8);

    let policy = cfg.fall_policy();
    assert_eq!(policy.cooldown_secs, 3.0);
    assert_eq!(cfg.suppression_params().overlap_threshold, 0.6);

    clear_env();
}

#[test]
fn loads_toml_by_extension() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    let toml = r#"
[source]
path = "stub://fall_scenario"

[fall]
cooldown_secs = 0.5
alert_duration_secs = 4.0
"#;
    file.write_all(toml.as_bytes()).expect("write config");
    std::env::set_var("FALLWATCH_SOURCE", "/srv/fallwatch/bedroom.jsonl");

    let cfg = MonitorConfig::load_from(Some(file.path())).expect("load toml");
    assert_eq!(cfg.source.path, "/srv/fallwatch/bedroom.jsonl");
    assert_eq!(cfg.fall.cooldown_secs, 0.5);
    assert_eq!(cfg.fall.alert_duration_secs, 4.0);

    clear_env();
}

#[test]
fn rejects_invalid_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("FALLWATCH_COOLDOWN_SECS", "soon");
    let err = MonitorConfig::load().unwrap_err();
    assert!(err.to_string().contains("FALLWATCH_COOLDOWN_SECS"));
    clear_env();

    std::env::set_var("FALLWATCH_OVERLAP_THRESHOLD", "1.5");
    assert!(MonitorConfig::load().is_err());
    clear_env();

    std::env::set_var("FALLWATCH_COOLDOWN_SECS", "-1");
    assert!(MonitorConfig::load().is_err());
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(br#"{ "source": { "target_fps": 0 } }"#)
        .expect("write config");
    assert!(MonitorConfig::load_from(Some(file.path())).is_err());

    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(b"{ not json").expect("write config");
    let err = MonitorConfig::load_from(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("invalid config file"));

    clear_env();
}
