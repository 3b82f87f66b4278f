// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!           EnvbotError (~24 bytes)
//!                  |
//!   +--------+-----+-----+---------+
//!   |        |           |         |
//!   v        v           v         v
//! Config  Channel    Transport    Read
//!  Box    NotFound      Box        Box
//!         Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config     MissingChannel, InvalidValue
//!   Transport  Reqwest, HttpError, Api, MissingToken, Decode, TooLarge
//!   Read       env file could not be opened
//!
//! user_message(): the status line shown to the user
//!   MissingChannel  -> "channel name is required"
//!   ChannelNotFound -> "<name> channel not found. ..."
//!   everything else -> "failed to sync env"
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`EnvbotError`].
pub type EnvbotResult<T> = std::result::Result<T, EnvbotError>;

/// Status line shown for every failure without a more specific message.
pub const SYNC_FAILED_MESSAGE: &str = "failed to sync env";

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum EnvbotError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// The named channel does not exist or the bot cannot see it.
    #[error(
        "{0} channel not found. Perhaps you forgot to invite envbot to the private channel"
    )]
    ChannelNotFound(Box<str>),

    /// Chat API operation failed.
    #[error("transport error: {0}")]
    Transport(#[from] Box<TransportError>),

    /// Local env file could not be read.
    #[error("read error: {0}")]
    Read(#[from] Box<ReadError>),
}

impl EnvbotError {
    /// Create a [`EnvbotError::ChannelNotFound`] for the given channel name.
    pub fn channel_not_found(channel: impl Into<String>) -> Self {
        Self::ChannelNotFound(channel.into().into_boxed_str())
    }

    /// The status line presented to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) if matches!(**err, ConfigError::MissingChannel) => err.to_string(),
            Self::ChannelNotFound(_) => self.to_string(),
            _ => SYNC_FAILED_MESSAGE.to_string(),
        }
    }

    /// Process exit code for this failure. Every failure maps to 1.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for EnvbotError {
                fn from(err: $error) -> Self {
                    EnvbotError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    TransportError => Transport,
    ReadError => Read,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No channel identifier was supplied.
    #[error("channel name is required")]
    MissingChannel,

    /// Invalid configuration value.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// --- Transport Errors ---

/// Which credential a chat API call needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Bot,
    User,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bot => write!(f, "bot"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Chat API and HTTP errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// The API answered with `ok: false`.
    #[error("{method} failed: {code}")]
    Api { method: String, code: String },

    /// A call was attempted without the credential it needs.
    #[error("missing slack {0} token")]
    MissingToken(TokenKind),

    /// The response body did not have the expected shape.
    #[error("unexpected response from {method}: {message}")]
    Decode { method: String, message: String },

    /// Snapshot download exceeded the size cap.
    #[error("snapshot at {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

// --- Read Errors ---

/// Local env source could not be read.
#[derive(Debug, Error)]
#[error("failed to read env file '{}': {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
