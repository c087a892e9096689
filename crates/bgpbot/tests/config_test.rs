//! Tests for layered configuration loading.

use bgpbot::{BotConfig, CommandKind, UnknownCommandPolicy};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = config_file("");
    let config = BotConfig::from_file(file.path()).unwrap();

    assert_eq!(config, BotConfig::default());
    assert_eq!(config.alert_marker(), "%");
    assert_eq!(*config.unknown_command(), UnknownCommandPolicy::Ignore);
    assert_eq!(*config.transport().max_block_len(), 2000);
}

#[test]
fn test_default_cache_table() {
    let config = BotConfig::default();
    let cache = config.cache();

    let route = cache.for_command(CommandKind::Route);
    assert_eq!(*route.capacity(), 20);
    assert_eq!(route.ttl(), Duration::from_secs(60));

    let asname = cache.for_command(CommandKind::AsName);
    assert_eq!(*asname.capacity(), 50);
    assert_eq!(asname.ttl(), Duration::from_secs(3600));

    assert_eq!(*cache.invalids_bulk.capacity(), 1);
    assert_eq!(cache.invalids_bulk.ttl(), Duration::from_secs(3600));
    assert_eq!(cache.totals.ttl(), Duration::from_secs(300));
}

#[test]
fn test_file_overrides_single_keys() {
    let file = config_file(
        r#"
alert_marker = "!"
unknown_command = "help"

[upstream]
timeout_secs = 3

[cache.route]
ttl_secs = 5
"#,
    );
    let config = BotConfig::from_file(file.path()).unwrap();

    assert_eq!(config.alert_marker(), "!");
    assert_eq!(*config.unknown_command(), UnknownCommandPolicy::Help);
    assert_eq!(config.upstream().timeout(), Duration::from_secs(3));
    assert_eq!(config.upstream().base_url(), "https://bgpstuff.net");

    let route = config.cache().for_command(CommandKind::Route);
    assert_eq!(route.ttl(), Duration::from_secs(5));
    assert_eq!(*route.capacity(), 20);
}

#[test]
fn test_empty_alert_marker_rejected() {
    let file = config_file("alert_marker = \"\"");
    assert!(BotConfig::from_file(file.path()).is_err());
}

#[test]
fn test_tiny_block_len_rejected() {
    let file = config_file("[transport]\nmax_block_len = 4");
    assert!(BotConfig::from_file(file.path()).is_err());
}

#[test]
fn test_unknown_policy_value_rejected() {
    let file = config_file("unknown_command = \"shout\"");
    assert!(BotConfig::from_file(file.path()).is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = BotConfig::from_file("/nonexistent/bgpbot-config.toml");
    assert!(result.is_err());
}
