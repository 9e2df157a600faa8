use super::*;

#[test]
fn empty_config_uses_defaults() {
    let config = RulrConfig::parse("").unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.shutdown_timeout_seconds, 30);
    assert_eq!(config.store.backend, "memory");
    assert!(config.store.url.is_none());
    assert!(config.store.pool_size.is_none());
    assert!(config.store.table.is_none());
}

#[test]
fn full_config() {
    let toml = r#"
        [server]
        host = "0.0.0.0"
        port = 8080
        shutdown_timeout_seconds = 5

        [store]
        backend = "sqlite"
        url = "sqlite://data/rules.db"
        pool_size = 4
        table = "eligibility_rules"
    "#;

    let config = RulrConfig::parse(toml).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.server.shutdown_timeout_seconds, 5);
    assert_eq!(config.store.backend, "sqlite");
    assert_eq!(config.store.url.as_deref(), Some("sqlite://data/rules.db"));
    assert_eq!(config.store.pool_size, Some(4));
    assert_eq!(config.store.table.as_deref(), Some("eligibility_rules"));
}

#[test]
fn partial_section_keeps_other_defaults() {
    let toml = r"
        [server]
        port = 9000
    ";

    let config = RulrConfig::parse(toml).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.store.backend, "memory");
}

#[test]
fn invalid_toml_is_config_error() {
    let err = RulrConfig::parse("[server\nport = 1").unwrap_err();
    assert!(matches!(err, crate::error::ServerError::Config(_)));

    let err = RulrConfig::parse("[server]\nport = \"not a number\"").unwrap_err();
    assert!(matches!(err, crate::error::ServerError::Config(_)));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = RulrConfig::load("does/not/exist/rulr.toml").unwrap();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.store.backend, "memory");
}
