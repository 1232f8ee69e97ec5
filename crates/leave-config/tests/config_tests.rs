use leave_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_uses_cl_first_and_three_months() {
    let cfg = Config::default();

    assert_eq!(cfg.default_priority, "cl-first");
    assert_eq!(cfg.look_ahead_months, 3);
    assert!(cfg.ui_color_enabled);
    assert!(cfg.data_dir.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("defaults"), Config::default());

    let mut cfg = Config::default();
    cfg.set("look_ahead_months", "6").expect("set months");
    cfg.set("log_filter", "leave_planner=debug").expect("set filter");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.look_ahead_months, 6);
    assert_eq!(loaded.log_filter.as_deref(), Some("leave_planner=debug"));
    assert_eq!(manager.data_dir(&loaded), dir.path().join("data"));
    assert!(!manager
        .config_path()
        .with_extension("json.tmp")
        .exists());
}

#[test]
fn corrupt_config_reports_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.config_path(), "{").expect("write garbage");
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}
