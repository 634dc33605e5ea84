use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_empty_toml_produces_defaults() {
    let cfg: UserConfig = toml::from_str("").expect("Should parse empty TOML");
    assert_eq!(cfg, UserConfig::default());
    assert_eq!(cfg.write_timeout(), DEFAULT_WRITE_TIMEOUT);
    assert_eq!(cfg.store_dir(), default_store_dir());
}

#[test]
fn test_full_config() {
    let toml_str = r#"
[store]
dir = "/srv/stories"
api_url = "http://localhost:5000"

[ordering]
write_timeout_ms = 2500
"#;
    let cfg: UserConfig = toml::from_str(toml_str).expect("Should parse full config");
    assert_eq!(cfg.store_dir(), PathBuf::from("/srv/stories"));
    assert_eq!(cfg.store.api_url.as_deref(), Some("http://localhost:5000"));
    assert_eq!(cfg.write_timeout(), Duration::from_millis(2500));
}

#[test]
fn test_unknown_store_key_is_rejected() {
    let result: Result<UserConfig, _> = toml::from_str("[store]\npath = \"/x\"\n");
    assert!(result.is_err());
}

#[test]
fn test_roundtrip_serialization() {
    let cfg = UserConfig {
        store: StoreConfig {
            dir: Some(PathBuf::from("/data")),
            api_url: None,
        },
        ordering: OrderingConfig {
            write_timeout_ms: Some(100),
        },
    };
    let serialized = toml::to_string(&cfg).expect("Should serialize");
    let deserialized: UserConfig = toml::from_str(&serialized).expect("Should deserialize");
    assert_eq!(cfg, deserialized);
}

#[test]
fn test_load_absent_file_gives_defaults() {
    let dir = tempdir().expect("tempdir");
    let cfg = load_user_config_from(&dir.path().join(CONFIG_FILENAME)).expect("defaults");
    assert_eq!(cfg, UserConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join(CONFIG_FILENAME);
    fs::write(&config_path, "[ordering]\nwrite_timeout_ms = 50\n").expect("write config");

    let cfg = load_user_config_from(&config_path).expect("parse config");
    assert_eq!(cfg.write_timeout(), Duration::from_millis(50));
}

#[test]
fn test_load_invalid_file_errors() {
    let dir = tempdir().expect("tempdir");
    let config_path = dir.path().join(CONFIG_FILENAME);
    fs::write(&config_path, "[ordering\n").expect("write config");

    assert!(matches!(
        load_user_config_from(&config_path),
        Err(UserConfigError::Toml(_))
    ));
}
