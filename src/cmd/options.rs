// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Options command.

use crate::config::Config;

/// Lines printed by `envbot options`: loaded files, then effective values.
#[must_use]
pub fn options_report(config: &Config, config_files: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if config_files.is_empty() {
        lines.push("# no configuration files loaded".to_string());
    } else {
        lines.extend(config_files.iter().map(|f| format!("# {f}")));
    }
    lines.extend(config.format_options());
    lines
}

/// Display current configuration options.
pub fn run_options_command(config: &Config, config_files: &[String]) {
    for line in options_report(config, config_files) {
        println!("{line}");
    }
}
