// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for layered configuration loading.

use std::fs;
use std::path::PathBuf;

use envbot::cli::try_parse_from;
use envbot::config::Config;
use envbot::config::loader::ConfigLoader;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

#[test]
fn config_later_files_override_earlier() {
    let dir = temp_dir();
    let base = dir.path().join("base.toml");
    let team = dir.path().join("team.toml");
    fs::write(&base, "channel = \"base\"\ninclude = [\"*\"]\n").unwrap();
    fs::write(&team, "channel = \"team\"\n").unwrap();

    let config = ConfigLoader::new()
        .add_toml_file(&base)
        .add_toml_file(&team)
        .build()
        .unwrap();
    assert_eq!(config.channel, "team");
    assert_eq!(config.include, vec!["*"]);
}

#[test]
fn config_invalid_toml_fails() {
    let dir = temp_dir();
    let file = dir.path().join("broken.toml");
    fs::write(&file, "channel = [").unwrap();
    assert!(Config::from_file(&file).is_err());
}

#[test]
fn config_cli_layers_over_files() {
    let dir = temp_dir();
    let file = dir.path().join("envbot.toml");
    fs::write(
        &file,
        "channel = \"from-file\"\nenv_file = \"from-file.env\"\n\n[slack]\napi_url = \"http://localhost:1\"\n",
    )
    .unwrap();
    let path = file.display().to_string();

    let cli = try_parse_from([
        "envbot",
        "--no-default-config",
        "--config",
        &path,
        "--env-file",
        "from-cli.env",
        "--user-token",
        "xoxp-cli",
    ])
    .unwrap();
    let config = cli.global.config_loader().unwrap().build().unwrap();

    assert_eq!(config.channel, "from-file");
    assert_eq!(config.env_file, PathBuf::from("from-cli.env"));
    assert_eq!(config.slack.api_url, "http://localhost:1");
    assert_eq!(config.slack.user_token.as_deref(), Some("xoxp-cli"));
    assert!(
        config
            .format_options()
            .iter()
            .all(|line| !line.contains("xoxp-cli"))
    );
}
