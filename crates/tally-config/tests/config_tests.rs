use tally_config::{BalanceSource, Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn load_returns_defaults_when_missing() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config, Config::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn save_then_load_preserves_changes() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();

    let mut config = Config::default();
    config.set("api_base_url", "http://127.0.0.1:9000").unwrap();
    config.set("balance_source", "remote").unwrap();
    config.set("currency_label", "EUR").unwrap();
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded.api_base_url, "http://127.0.0.1:9000");
    assert_eq!(loaded.balance_source, BalanceSource::Remote);
    assert_eq!(loaded.currency_label, "EUR");
    assert!(!manager
        .config_path()
        .with_extension("json.tmp")
        .exists());
}

#[test]
fn corrupt_file_reports_serde_error() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(manager.config_path(), "{ not json").unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}
