// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_range() {
    assert_eq!(LogLevel::from_u8(0), Some(LogLevel::SILENT));
    assert_eq!(LogLevel::from_u8(6), Some(LogLevel::DUMP));
    assert_eq!(LogLevel::from_u8(7), None);

    let err = LogLevel::new(9).expect_err("9 is out of range");
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'log_level': log level must be 0-6, got 9"
    );
}

#[test]
fn test_filter_strings() {
    let filters: Vec<_> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(|level| (level.as_u8(), level.to_filter_string()))
        .collect();
    insta::assert_debug_snapshot!(filters, @r#"
    [
        (
            0,
            "off",
        ),
        (
            1,
            "error,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        ),
        (
            2,
            "warn,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        ),
        (
            3,
            "info,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        ),
        (
            4,
            "debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        ),
        (
            5,
            "trace,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        ),
        (
            6,
            "trace",
        ),
    ]
    "#);
}

#[test]
fn test_log_level_serde() {
    let level: LogLevel = serde_json::from_str("4").expect("valid level");
    assert_eq!(level, LogLevel::DEBUG);
    assert_eq!(serde_json::to_string(&level).expect("serialize"), "4");
    assert!(serde_json::from_str::<LogLevel>("12").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());

    let custom = LogConfig::builder()
        .with_console_level(LogLevel::TRACE)
        .with_log_file("logs/envbot.log".to_string())
        .build();
    assert_eq!(custom.console_level(), LogLevel::TRACE);
    assert_eq!(custom.log_file(), Some("logs/envbot.log"));
}
