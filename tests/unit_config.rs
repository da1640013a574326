use chrono::Duration;
use tb::config::{parse_duration, Config};

#[test]
fn default_config_serializes_and_reloads() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("tb.toml");

    Config::default().save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    assert_eq!(loaded.auth.code_ttl, "10m");
    assert_eq!(
        loaded.boards.default_lists,
        vec!["To Do", "In Progress", "Done"]
    );
    assert!(!loaded.integrations.assistant.enabled);
    assert_eq!(loaded.integrations.assistant.timeout, "30s");
}

#[test]
fn unknown_file_is_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let config = Config::load(&temp.path().join("missing.toml")).unwrap();
    assert_eq!(config.auth.code_ttl, "10m");
}

#[test]
fn assistant_section_round_trips() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("tb.toml");
    std::fs::write(
        &path,
        r#"
[integrations.assistant]
enabled = true
url = "http://localhost:5000/chat"
timeout = "5s"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert!(config.integrations.assistant.enabled);
    assert_eq!(
        parse_duration(&config.integrations.assistant.timeout).unwrap(),
        Duration::seconds(5)
    );
}

#[test]
fn invalid_sections_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("tb.toml");

    std::fs::write(&path, "[auth]\ncode_ttl = \"whenever\"\n").unwrap();
    assert!(Config::load(&path).is_err());

    std::fs::write(&path, "auth = \"oops\"\n").unwrap();
    assert!(Config::load(&path).is_err());
}
