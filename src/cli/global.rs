// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE        ← Additional config files (can repeat)
//! --channel NAME       ← channel
//! --include PATTERN    ← include (can repeat, or comma-separated)
//! --env-file FILE      ← env_file
//! --dry                ← dry
//! --bot-token TOKEN    ← slack.bot_token  (ENVBOT_SLACK_BOT_TOKEN)
//! --user-token TOKEN   ← slack.user_token (ENVBOT_SLACK_USER_TOKEN)
//! --log-level N        ← Console verbosity (0-6)
//! --file-log-level N   ← File verbosity (defaults to --log-level)
//!
//! Precedence: CLI flags > ENVBOT_* > --config > envbot.toml > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "envbot.toml";

/// Prefix of environment variables read by the config loader.
pub const ENV_PREFIX: &str = "ENVBOT";

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Path to additional TOML configuration file(s).
    /// Can be specified multiple times.
    #[arg(short = 'c', long = "config", value_name = "FILE", action = clap::ArgAction::Append)]
    pub configs: Vec<PathBuf>,

    /// Disables loading `envbot.toml` from the current directory.
    #[arg(long = "no-default-config")]
    pub no_default_config: bool,

    /// Channel to sync with.
    #[arg(long, value_name = "NAME")]
    pub channel: Option<String>,

    /// Variable whose value is shared, `*` for all, `!NAME` to always hide.
    /// Can be specified multiple times or comma-separated.
    #[arg(
        short = 'i',
        long = "include",
        value_name = "PATTERN",
        value_delimiter = ',',
        action = clap::ArgAction::Append
    )]
    pub include: Vec<String>,

    /// Local env file to publish.
    #[arg(short = 'e', long = "env-file", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Compares with the channel but never uploads.
    #[arg(long)]
    pub dry: bool,

    /// Slack bot token.
    #[arg(long, value_name = "TOKEN", env = "ENVBOT_SLACK_BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Slack user token, used to find the latest snapshot.
    #[arg(long, value_name = "TOKEN", env = "ENVBOT_SLACK_USER_TOKEN", hide_env_values = true)]
    pub user_token: Option<String>,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(
        short = 'l',
        long = "log-level",
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub log_level: Option<u8>,

    /// File log level, overrides --log-level for the log file.
    #[arg(
        long = "file-log-level",
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(0..=6)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalOptions {
    /// Builds the config loader for these options: default file, `--config`
    /// files, `ENVBOT_*` variables, then flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be applied.
    pub fn config_loader(&self) -> Result<ConfigLoader> {
        let mut loader = ConfigLoader::new();
        if !self.no_default_config {
            loader = loader.add_toml_file_optional(DEFAULT_CONFIG_FILE);
        }
        for path in &self.configs {
            loader = loader.add_toml_file(path);
        }
        self.apply_overrides(loader.with_env_prefix(ENV_PREFIX))
    }

    /// Applies command-line flags on top of `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be applied.
    pub fn apply_overrides(&self, loader: ConfigLoader) -> Result<ConfigLoader> {
        let mut loader = loader
            .set_some("channel", self.channel.clone())?
            .set_some(
                "env_file",
                self.env_file.as_ref().map(|p| p.display().to_string()),
            )?
            .set_some("slack.bot_token", self.bot_token.clone())?
            .set_some("slack.user_token", self.user_token.clone())?;

        if !self.include.is_empty() {
            loader = loader.set("include", self.include.clone())?;
        }
        if self.dry {
            loader = loader.set("dry", true)?;
        }
        Ok(loader)
    }
}
