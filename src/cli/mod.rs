// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for envbot using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! envbot [global options] [command]
//! sync                       (default)
//! preview [--format text|json]
//! options
//! version
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Env snapshot sync for chat channels.
#[derive(Debug, Parser)]
#[command(
    name = "envbot",
    author,
    version,
    about = "Share your local env file with your team through a Slack channel",
    long_about = "envbot Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Reads the local env file, blanks every value not disclosed by\n\
                  the include patterns, and posts the result to a Slack channel\n\
                  unless the latest snapshot there is already identical.\n\n\
                  Invoking `envbot --channel backend-envs -i '*' -i '!DB_PASSWORD'`\n\
                  syncs `.env.local`. Use `envbot preview` to see what would be\n\
                  uploaded without touching the network.",
    after_help = "CONFIG FILES:\n\n\
                  envbot reads `envbot.toml` from the current directory if it\n\
                  exists, then every file given with --config, then ENVBOT_*\n\
                  environment variables, then command-line flags. Later sources\n\
                  override earlier ones. Slack tokens that are not configured\n\
                  anywhere are looked up in the env file itself under\n\
                  ENVBOT_SLACK_BOT_TOKEN and ENVBOT_SLACK_USER_TOKEN."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Syncs the local env file with the channel (default).
    Sync,

    /// Prints the snapshot that would be uploaded, without network access.
    Preview(PreviewArgs),

    /// Lists all options and their values.
    Options,

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

/// Arguments for `preview`.
#[derive(Debug, Clone, Default, Args)]
pub struct PreviewArgs {
    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t)]
    pub format: PreviewFormat,
}

/// Output format for `preview`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PreviewFormat {
    /// `NAME=value` lines, as uploaded.
    #[default]
    Text,
    /// A JSON object in file order.
    Json,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
