// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

const MINIMAL: &str = r#"
[gateway]
base_url = "https://crm.example.com"

[tables]
leads = 11
activities = 12
"#;

#[test]
fn minimal_config_uses_defaults() {
    let config = Config::from_toml(MINIMAL).unwrap();

    assert_eq!(config.gateway.base_url, "https://crm.example.com");
    assert_eq!(config.gateway.timeout, Duration::from_secs(30));
    assert_eq!(config.gateway.token_env, None);
    assert_eq!(config.tables.leads, TableId(11));
    assert_eq!(config.tables.activities, TableId(12));
    assert_eq!(config.tables.documents, None);
    assert_eq!(config.user.id, None);
    assert_eq!(config.sla, SlaThresholds::default());
    assert_eq!(config.alerts.poll_interval, Duration::from_secs(300));
    assert_eq!(config.outbox.path, PathBuf::from(".foreman/outbox.wal"));
    assert_eq!(config.pipeline.page_size, 200);
    assert_eq!(config.log.file, None);
    assert_eq!(config.notify, NotifyConfig::default());
}

#[test]
fn full_config_parses() {
    let config = Config::from_toml(
        r#"
[gateway]
base_url = "http://localhost:8080"
token_env = "CRM_TOKEN"
timeout = "10s"

[tables]
leads = 1
activities = 2
documents = 3

[user]
id = 42

[sla]
critical_within = "4h"
warning_within = "1day"

[alerts]
poll_interval = "90s"

[outbox]
path = "/var/lib/foreman/outbox.wal"

[log]
file = "/var/log/foreman.log"

[pipeline]
page_size = 50

[[notify.rule]]
pattern = "lead:**"
urgency = "important"
"#,
    )
    .unwrap();

    assert_eq!(config.gateway.token_env.as_deref(), Some("CRM_TOKEN"));
    assert_eq!(config.gateway.timeout, Duration::from_secs(10));
    assert_eq!(config.tables.documents, Some(TableId(3)));
    assert_eq!(config.user.id, Some(42));
    assert_eq!(config.sla.critical_within, Duration::from_secs(4 * 3600));
    assert_eq!(config.sla.warning_within, Duration::from_secs(24 * 3600));
    assert_eq!(config.alerts.poll_interval, Duration::from_secs(90));
    assert_eq!(config.pipeline.page_size, 50);
    assert_eq!(config.notify.rules().len(), 1);
    assert_eq!(
        config.log.file.as_deref(),
        Some(Path::new("/var/log/foreman.log"))
    );
}

#[test]
fn partial_sla_section_keeps_other_default() {
    let config = Config::from_toml(&format!("{MINIMAL}\n[sla]\ncritical_within = \"2h\"\n")).unwrap();
    assert_eq!(config.sla.critical_within, Duration::from_secs(7200));
    assert_eq!(config.sla.warning_within, Duration::from_secs(12 * 3600));
}

#[test]
fn inverted_sla_thresholds_are_rejected() {
    let err = Config::from_toml(&format!(
        "{MINIMAL}\n[sla]\ncritical_within = \"12h\"\nwarning_within = \"6h\"\n"
    ))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("sla.critical_within"));
}

#[test]
fn missing_tables_section_is_a_parse_error() {
    let err = Config::from_toml("[gateway]\nbase_url = \"https://x\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn non_http_base_url_is_rejected() {
    let err = Config::from_toml(&MINIMAL.replace("https://crm.example.com", "crm.example.com"))
        .unwrap_err();
    assert!(err.to_string().contains("gateway.base_url"));
}

#[test]
fn zero_page_size_is_rejected() {
    let err = Config::from_toml(&format!("{MINIMAL}\n[pipeline]\npage_size = 0\n")).unwrap_err();
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(MINIMAL.as_bytes()).unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.tables.leads, TableId(11));
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn explicit_path_wins() {
    let path = Config::locate(Some(Path::new("/etc/foreman.toml"))).unwrap();
    assert_eq!(path, PathBuf::from("/etc/foreman.toml"));
}
