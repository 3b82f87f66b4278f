// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for envbot.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. envbot.toml (cwd, optional)
//! 3. --config FILE (required, repeatable)
//! 4. ENVBOT_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! ENVBOT_CHANNEL=backend-envs     → channel = "backend-envs"
//! ENVBOT_INCLUDE=DB_NAME,!DB_PASS → include = ["DB_NAME", "!DB_PASS"]
//! ENVBOT_ENV_FILE=.env            → env_file = ".env"
//! ENVBOT_SLACK__API_URL=...       → slack.api_url = "..."
//! ```
//!
//! # Example
//!
//! ```toml
//! channel = "backend-envs"
//! include = ["*", "!DB_PASSWORD"]
//! env_file = ".env.local"
//!
//! [slack]
//! api_url = "https://slack.com/api"
//! ```

pub mod loader;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::env::EnvMap;
use crate::error::{ConfigError, Result};
use crate::filter::PatternSet;
use crate::store::slack::DEFAULT_API_URL;

use loader::ConfigLoader;

/// Env file read when none is configured.
pub const DEFAULT_ENV_FILE: &str = ".env.local";

/// Local env file keys consulted when a token is not configured anywhere else.
pub const BOT_TOKEN_KEY: &str = "ENVBOT_SLACK_BOT_TOKEN";
pub const USER_TOKEN_KEY: &str = "ENVBOT_SLACK_USER_TOKEN";

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Channel the snapshot is posted to.
    pub channel: String,
    /// Include/exclude patterns. Empty discloses nothing.
    pub include: Vec<String>,
    /// Local env file to publish.
    pub env_file: PathBuf,
    /// Compare only, never upload.
    pub dry: bool,
    /// Slack API settings.
    pub slack: SlackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: String::new(),
            include: Vec::new(),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            dry: false,
            slack: SlackConfig::default(),
        }
    }
}

/// Slack Web API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlackConfig {
    pub api_url: String,
    /// Bot token (`xoxb-`), used for everything but listing files.
    pub bot_token: Option<String>,
    /// User token (`xoxp-`), used to list files by author.
    pub user_token: Option<String>,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bot_token: None,
            user_token: None,
        }
    }
}

impl SlackConfig {
    fn has(token: Option<&String>) -> bool {
        matches!(token, Some(t) if !t.is_empty())
    }

    /// True when both tokens are set to non-empty values.
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        Self::has(self.bot_token.as_ref()) && Self::has(self.user_token.as_ref())
    }

    /// Fills tokens that are still unset from the local env file.
    pub fn fill_tokens_from(&mut self, env: &EnvMap) {
        if !Self::has(self.bot_token.as_ref()) {
            self.bot_token = env.get(BOT_TOKEN_KEY).map(str::to_string);
        }
        if !Self::has(self.user_token.as_ref()) {
            self.user_token = env.get(USER_TOKEN_KEY).map(str::to_string);
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use envbot::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("envbot.toml")
    ///     .with_env_prefix("ENVBOT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Compiled include/exclude patterns.
    #[must_use]
    pub fn patterns(&self) -> PatternSet {
        PatternSet::new(&self.include)
    }

    /// Validate values that serde cannot check.
    ///
    /// The channel is not checked here; a blank channel is reported by the
    /// sync run itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a non-HTTP API URL or an empty
    /// env file path.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let api_url = self.slack.api_url.trim();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: "slack.api_url".to_string(),
                message: format!("expected an http(s) url, got '{api_url}'"),
            });
        }
        if self.env_file.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "env_file".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Tokens are shown as `[hidden]` when set. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let hide = |token: &Option<String>| match token {
            Some(t) if !t.is_empty() => "[hidden]".to_string(),
            _ => String::new(),
        };

        let mut options = BTreeMap::new();
        options.insert("channel", self.channel.clone());
        options.insert("include", self.include.join(","));
        options.insert("env_file", self.env_file.display().to_string());
        options.insert("dry", self.dry.to_string());
        options.insert("slack.api_url", self.slack.api_url.clone());
        options.insert("slack.bot_token", hide(&self.slack.bot_token));
        options.insert("slack.user_token", hide(&self.slack.user_token));

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}
