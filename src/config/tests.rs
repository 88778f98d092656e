use serial_test::serial;

use super::{Settings, load_config};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.bus.topic_capacity, 16);
    assert_eq!(settings.bus.handler_capacity, 4);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_load_config_falls_back_to_defaults() {
    temp_env::with_var_unset("LOGGING_LEVEL", || {
        let settings = load_config().expect("load config");
        assert_eq!(settings.bus.topic_capacity, 16);
        assert_eq!(settings.bus.handler_capacity, 4);
        assert_eq!(settings.logging.level, "info");
    });
}

#[test]
#[serial]
fn test_env_overrides_logging_level() {
    temp_env::with_var("LOGGING_LEVEL", Some("debug"), || {
        let settings = load_config().expect("load config");
        assert_eq!(settings.logging.level, "debug");
        // untouched sections keep their defaults
        assert_eq!(settings.bus.topic_capacity, 16);
    });
}
