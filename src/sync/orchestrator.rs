// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync state machine.
//!
//! ```text
//! Start --(empty channel)--> Failed "channel name is required"
//!   |
//!   v
//! ChannelLookup --(none)--> Failed "<name> channel not found. ..."
//!   |
//!   v
//! load env file --(io)--> Failed
//!   |
//!   v
//! FetchSnapshot --(no snapshot / no url)--------------+
//!   |                                                 |
//!   v                                                 v
//! Compare --InSync--> Done (skip)         Upload --> Done
//!   |                                       ^
//!   +-------------OutOfSync-----------------+
//!
//! Store errors at any step end the run with "failed to sync env".
//! ```
//!
//! Progress is reported as [`SyncEvent`]s to a caller-supplied callback.

use std::fmt;
use std::path::{Path, PathBuf};

use bon::Builder;
use tracing::{debug, info};

use super::{SyncDecision, check};
use crate::env::EnvMap;
use crate::error::{ConfigError, EnvbotError, EnvbotResult};
use crate::filter::{PatternSet, final_map};
use crate::store::{Channel, ChannelStore};

/// Inputs for one sync run.
#[derive(Debug, Clone, Builder)]
pub struct SyncRequest {
    /// Channel display name.
    #[builder(into)]
    channel: String,
    /// Local env file.
    #[builder(into)]
    env_file: PathBuf,
    /// Which values may be published.
    #[builder(default)]
    patterns: PatternSet,
    /// Compare but never upload.
    #[builder(default)]
    dry_run: bool,
}

impl SyncRequest {
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    #[must_use]
    pub const fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }
}

/// State transitions reported while a sync runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    LookingUpChannel { channel: String },
    ChannelFound { channel: String },
    FetchingSnapshot,
    Comparing,
    OutOfSync,
    Uploading,
    Uploaded,
    InSync,
    /// Dry run reached the upload step.
    SkippedUpload,
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LookingUpChannel { channel } => write!(f, "looking up {channel} channel"),
            Self::ChannelFound { channel } => write!(f, "found {channel} channel"),
            Self::FetchingSnapshot => write!(f, "fetching latest snapshot"),
            Self::Comparing => write!(f, "comparing envs"),
            Self::OutOfSync => write!(f, "env not in sync"),
            Self::Uploading => write!(f, "synchronizing env with slack channel"),
            Self::Uploaded => write!(f, "env uploaded"),
            Self::InSync => write!(f, "env in sync"),
            Self::SkippedUpload => write!(f, "dry run, skipping upload"),
        }
    }
}

/// Successful end states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new snapshot was posted.
    Uploaded { first_sync: bool },
    /// The channel already had an equivalent snapshot.
    InSync,
    /// An upload was needed but `dry_run` was set.
    DryRun { first_sync: bool },
}

impl SyncOutcome {
    /// Status line shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Uploaded { .. } => "sync successful 🎉",
            Self::InSync => "env in sync",
            Self::DryRun { .. } => "env not in sync (dry run, nothing uploaded)",
        }
    }

    /// Every successful end state exits with 0.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        0
    }
}

/// Drives one sync run against a [`ChannelStore`].
pub struct SyncOrchestrator<'a, S: ChannelStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ChannelStore + ?Sized> SyncOrchestrator<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs lookup, fetch, compare and upload in sequence.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingChannel`] if the channel name is blank; no
    ///   store call is made.
    /// - [`EnvbotError::ChannelNotFound`] if the store does not know the channel.
    /// - [`EnvbotError::Read`] if the env file cannot be read.
    /// - Any store error, unchanged.
    pub async fn run<R>(&self, request: &SyncRequest, report: R) -> EnvbotResult<SyncOutcome>
    where
        R: Fn(&SyncEvent),
    {
        let name = request.channel.trim();
        if name.is_empty() {
            return Err(ConfigError::MissingChannel.into());
        }

        report(&SyncEvent::LookingUpChannel {
            channel: name.to_string(),
        });
        let Some(channel) = self.store.resolve_channel(name).await? else {
            return Err(EnvbotError::channel_not_found(name));
        };
        report(&SyncEvent::ChannelFound {
            channel: name.to_string(),
        });

        let local = EnvMap::load(&request.env_file)?;
        debug!(file = %request.env_file.display(), keys = local.len(), "local env loaded");

        report(&SyncEvent::FetchingSnapshot);
        let remote = self.fetch_remote(&channel).await?;

        let decision = if remote.is_some() {
            report(&SyncEvent::Comparing);
            check(&local, remote.as_ref(), &request.patterns)
        } else {
            SyncDecision::NoPriorSnapshot
        };
        info!(channel = %channel.name, ?decision, "sync check finished");

        match decision {
            SyncDecision::InSync => {
                report(&SyncEvent::InSync);
                Ok(SyncOutcome::InSync)
            }
            SyncDecision::OutOfSync | SyncDecision::NoPriorSnapshot => {
                let first_sync = decision == SyncDecision::NoPriorSnapshot;
                if !first_sync {
                    report(&SyncEvent::OutOfSync);
                }
                self.upload(&channel, &local, request, &report)
                    .await
                    .map(|uploaded| {
                        if uploaded {
                            SyncOutcome::Uploaded { first_sync }
                        } else {
                            SyncOutcome::DryRun { first_sync }
                        }
                    })
            }
        }
    }

    /// Latest bot snapshot parsed into a map, or `None` if there is nothing
    /// to compare against.
    async fn fetch_remote(&self, channel: &Channel) -> EnvbotResult<Option<EnvMap>> {
        let Some(snapshot) = self.store.latest_snapshot(channel).await? else {
            debug!(channel = %channel.name, "no previous snapshot");
            return Ok(None);
        };
        if snapshot.url.is_none() {
            debug!(snapshot = %snapshot.id, "snapshot has no contents reference");
            return Ok(None);
        }

        let bytes = self.store.snapshot_contents(&snapshot).await?;
        let remote = EnvMap::parse(&String::from_utf8_lossy(&bytes));
        debug!(snapshot = %snapshot.id, keys = remote.len(), "remote snapshot parsed");
        Ok(Some(remote))
    }

    /// Uploads the filtered local map. Returns `false` when skipped for a dry run.
    async fn upload<R>(
        &self,
        channel: &Channel,
        local: &EnvMap,
        request: &SyncRequest,
        report: &R,
    ) -> EnvbotResult<bool>
    where
        R: Fn(&SyncEvent),
    {
        let contents = final_map(local, &request.patterns).to_snapshot();

        if request.dry_run {
            info!(channel = %channel.name, bytes = contents.len(), "dry run, not uploading");
            report(&SyncEvent::SkippedUpload);
            return Ok(false);
        }

        report(&SyncEvent::Uploading);
        self.store
            .upload_snapshot(channel, contents.into_bytes())
            .await?;
        report(&SyncEvent::Uploaded);
        Ok(true)
    }
}
