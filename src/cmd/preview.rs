// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Preview command: shows what a sync would upload.

use anyhow::Context;

use crate::cli::{PreviewArgs, PreviewFormat};
use crate::config::Config;
use crate::env::EnvMap;
use crate::error::Result;
use crate::filter::final_map;

/// Renders the snapshot for `config` without contacting the channel.
///
/// # Errors
///
/// Returns an error if the env file cannot be read.
pub fn render_preview(config: &Config, format: PreviewFormat) -> Result<String> {
    let local = EnvMap::load(&config.env_file)
        .with_context(|| format!("failed to preview {}", config.env_file.display()))?;
    let snapshot = final_map(&local, &config.patterns()).without_placeholders();

    match format {
        PreviewFormat::Text => Ok(snapshot
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")),
        PreviewFormat::Json => {
            serde_json::to_string_pretty(&snapshot).context("failed to encode preview")
        }
    }
}

/// Main handler for preview command.
///
/// # Errors
///
/// Returns an error if the env file cannot be read.
pub fn run_preview_command(args: &PreviewArgs, config: &Config) -> Result<()> {
    if config.patterns().is_empty() {
        tracing::warn!("no include patterns configured, every value will be blank");
    }
    println!("{}", render_preview(config, args.format)?);
    Ok(())
}
