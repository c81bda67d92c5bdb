use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use cells::cli::{CliArgs, RunOpts};
use cells::config::{Config, ConfigManager};
use cells::CommitPolicy;
use clap::Parser;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.report.default_report, "next");
    assert_eq!(config.report.width, 0);
    assert_eq!(config.editing.on_change, CommitPolicy::Reload);
    assert!(!config.editing.read_only);
    assert!(config.ui.show_status_bar);
    assert!(config.ui.show_toasts);
    assert_eq!(config.ui.scroll_step, 3);
}

#[test]
fn test_missing_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let mut manager = ConfigManager::new(dir.path());

    manager.load().unwrap();
    assert_eq!(manager.get_config(), &Config::default());
    assert_eq!(manager.config_path(), dir.path().join("config.json"));
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("nested").join("taskcell");

    let mut manager = ConfigManager::new(&config_dir);
    manager.update_setting("report.defaultReport", json!("list")).unwrap();
    manager.update_setting("editing.onChange", json!("keep")).unwrap();
    manager.update_setting("ui.scrollStep", json!(5)).unwrap();
    manager.save().unwrap();

    let mut reloaded = ConfigManager::new(&config_dir);
    reloaded.load().unwrap();
    let config = reloaded.into_config();
    assert_eq!(config.report.default_report, "list");
    assert_eq!(config.editing.on_change, CommitPolicy::Keep);
    assert_eq!(config.ui.scroll_step, 5);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{ "editing": { "read_only": true } }"#).unwrap();

    let mut manager = ConfigManager::with_path(path);
    manager.load().unwrap();

    let config = manager.get_config();
    assert!(config.editing.read_only);
    assert_eq!(config.editing.on_change, CommitPolicy::Reload);
    assert_eq!(config.report.default_report, "next");
}

#[test]
fn test_invalid_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    let mut manager = ConfigManager::with_path(path);
    assert!(manager.load().is_err());
}

#[test]
fn test_settings_by_path() {
    let dir = TempDir::new().unwrap();
    let mut manager = ConfigManager::new(dir.path());

    manager.update_setting("editing.readOnly", json!(true)).unwrap();
    assert_eq!(manager.get_setting("editing.readOnly").unwrap(), json!(true));
    assert_eq!(manager.get_setting("editing.onChange").unwrap(), json!("reload"));

    assert!(manager.update_setting("editing.onChange", json!("save")).is_err());
    assert!(manager.update_setting("report.width", json!("wide")).is_err());
    assert!(manager.update_setting("ui.theme", json!("dark")).is_err());
    assert!(manager.get_setting("ui.theme").is_err());

    manager.get_config_mut().report.width = 120;
    assert_eq!(manager.get_setting("report.width").unwrap(), json!(120));
}

#[test]
fn test_cli_defaults_follow_config() {
    let mut config = Config::default();
    config.report.default_report = "list".to_string();
    config.report.width = 100;
    config.editing.on_change = CommitPolicy::Keep;

    let opts = CliArgs::try_parse_from(["taskcell"])
        .unwrap()
        .into_run_opts(&config, None);

    assert_eq!(opts.report, "list");
    assert_eq!(opts.report_width, 100);
    assert_eq!(opts.on_change, CommitPolicy::Keep);
    assert!(!opts.read_only);
    assert_eq!(opts.task_data_dir, None);
}

#[test]
fn test_cli_overrides_config() {
    let mut config = Config::default();
    config.report.task_data_dir = Some(PathBuf::from("/from/config"));

    let args = CliArgs::try_parse_from([
        "taskcell",
        "waiting",
        "-w",
        "80",
        "--read-only",
        "--on-change",
        "keep",
        "--task-data",
        "/from/cli",
    ])
    .unwrap();
    let opts = args.into_run_opts(&config, Some(OsString::from("/from/env")));

    assert_eq!(opts.report, "waiting");
    assert_eq!(opts.report_width, 80);
    assert!(opts.read_only);
    assert_eq!(opts.on_change, CommitPolicy::Keep);
    assert_eq!(opts.task_data_dir, Some(OsString::from("/from/cli")));
}

#[test]
fn test_task_data_precedence() {
    let mut config = Config::default();
    config.report.task_data_dir = Some(PathBuf::from("/from/config"));

    let from_env = CliArgs::default().into_run_opts(&config, Some(OsString::from("/from/env")));
    assert_eq!(from_env.task_data_dir, Some(OsString::from("/from/env")));

    let from_config = CliArgs::default().into_run_opts(&config, None);
    assert_eq!(from_config.task_data_dir, Some(OsString::from("/from/config")));
}

#[test]
fn test_read_only_from_config_cannot_be_lifted() {
    let mut config = Config::default();
    config.editing.read_only = true;

    let opts = CliArgs::try_parse_from(["taskcell"])
        .unwrap()
        .into_run_opts(&config, None);
    assert!(opts.read_only);
}

#[test]
fn test_invalid_policy_is_rejected() {
    assert!(CliArgs::try_parse_from(["taskcell", "--on-change", "save"]).is_err());
}

#[test]
fn test_run_opts_default() {
    let opts = RunOpts::default();
    assert_eq!(opts.report, "next");
    assert_eq!(opts.on_change, CommitPolicy::Reload);
    assert_eq!(opts.report_width, 0);
}

#[test]
fn test_logs_dir_is_created() {
    let dir = TempDir::new().unwrap();
    let logs_dir = cells::logging::ensure_logs_dir(dir.path()).unwrap();

    assert_eq!(logs_dir, dir.path().join("logs"));
    assert!(logs_dir.is_dir());
}
