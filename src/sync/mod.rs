// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync check and orchestration.
//!
//! ```text
//! check(local, remote?, patterns)
//!   remote absent            -> NoPriorSnapshot
//!   final = final_map(local, patterns)
//!   same key set && for every key final[k] == remote[k]
//!                            -> InSync
//!   otherwise                -> OutOfSync
//! ```
//!
//! Value comparison covers blanked keys too: a remote value for a key that
//! is no longer disclosed counts as a difference. Placeholder keys are never
//! uploaded, so both sides are compared without them.

pub mod orchestrator;


use serde::Serialize;

use crate::env::EnvMap;
use crate::filter::{PatternSet, final_map};

pub use orchestrator::{SyncEvent, SyncOrchestrator, SyncOutcome, SyncRequest};

/// Classification of local state against the last posted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncDecision {
    NoPriorSnapshot,
    InSync,
    OutOfSync,
}

/// Compares `local` (after filtering) with `remote`.
#[must_use]
pub fn check(local: &EnvMap, remote: Option<&EnvMap>, patterns: &PatternSet) -> SyncDecision {
    match remote {
        None => SyncDecision::NoPriorSnapshot,
        Some(remote) if is_in_sync(local, remote, patterns) => SyncDecision::InSync,
        Some(_) => SyncDecision::OutOfSync,
    }
}

/// True when the filtered `local` map and `remote` have the same keys and
/// equal values for every key.
#[must_use]
pub fn is_in_sync(local: &EnvMap, remote: &EnvMap, patterns: &PatternSet) -> bool {
    let finalized = final_map(local, patterns).without_placeholders();
    let remote = remote.without_placeholders();
    keys_in_sync(&finalized, &remote) && values_in_sync(&finalized, &remote)
}

fn keys_in_sync(finalized: &EnvMap, remote: &EnvMap) -> bool {
    finalized.len() == remote.len() && finalized.keys().all(|k| remote.contains_key(k))
}

fn values_in_sync(finalized: &EnvMap, remote: &EnvMap) -> bool {
    finalized
        .iter()
        .all(|(key, value)| remote.get(key) == Some(value))
}
