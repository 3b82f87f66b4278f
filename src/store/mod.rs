// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Channel store: where snapshots are posted.
//!
//! ```text
//! ChannelStore (trait)
//!   resolve_channel(name)      -> Option<Channel>
//!   latest_snapshot(channel)   -> Option<SnapshotRef>   (bot-authored only)
//!   snapshot_contents(ref)     -> bytes
//!   upload_snapshot(ch, bytes) -> ()
//!        ^
//!        |
//!   SlackStore (Slack Web API over reqwest)
//! ```

pub mod slack;

use futures_util::future::BoxFuture;
use serde::Deserialize;

use crate::error::EnvbotResult;

/// A chat channel, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
}

/// A previously uploaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRef {
    pub id: String,
    pub title: String,
    /// Where the contents can be downloaded from, if the store exposes it.
    pub url: Option<String>,
}

/// Capability the sync orchestrator needs from the chat platform.
///
/// Methods return `BoxFuture` so the trait stays object safe and fakes can be
/// swapped in for tests.
pub trait ChannelStore: Send + Sync {
    /// Looks up a channel visible to the bot by its display name.
    fn resolve_channel<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, EnvbotResult<Option<Channel>>>;

    /// Returns the most recent snapshot posted by the bot in `channel`.
    fn latest_snapshot<'a>(
        &'a self,
        channel: &'a Channel,
    ) -> BoxFuture<'a, EnvbotResult<Option<SnapshotRef>>>;

    /// Downloads the raw contents of a snapshot.
    fn snapshot_contents<'a>(
        &'a self,
        snapshot: &'a SnapshotRef,
    ) -> BoxFuture<'a, EnvbotResult<Vec<u8>>>;

    /// Posts new snapshot contents to `channel`.
    fn upload_snapshot<'a>(
        &'a self,
        channel: &'a Channel,
        contents: Vec<u8>,
    ) -> BoxFuture<'a, EnvbotResult<()>>;
}
