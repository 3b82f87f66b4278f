// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync command implementation.

use tracing::{debug, error, warn};

use crate::config::{Config, SlackConfig};
use crate::env::EnvMap;
use crate::error::EnvbotResult;
use crate::store::ChannelStore;
use crate::store::slack::SlackStore;
use crate::sync::{SyncOrchestrator, SyncOutcome, SyncRequest};
use crate::ui::{Spinner, Status};

/// Builds the run inputs from configuration.
#[must_use]
pub fn sync_request(config: &Config) -> SyncRequest {
    SyncRequest::builder()
        .channel(config.channel.clone())
        .env_file(config.env_file.clone())
        .patterns(config.patterns())
        .dry_run(config.dry)
        .build()
}

/// Slack settings with unset tokens filled from the local env file.
#[must_use]
pub fn resolve_slack_config(config: &Config) -> SlackConfig {
    let mut slack = config.slack.clone();
    if slack.has_tokens() {
        return slack;
    }
    match EnvMap::load(&config.env_file) {
        Ok(env) => {
            slack.fill_tokens_from(&env);
            debug!(file = %config.env_file.display(), "looked up slack tokens in env file");
        }
        Err(e) => debug!(error = %e, "no token fallback"),
    }
    slack
}

/// Slack store for `config`.
#[must_use]
pub fn slack_store(config: &Config) -> SlackStore {
    let slack = resolve_slack_config(config);
    SlackStore::builder()
        .api_url(slack.api_url)
        .maybe_bot_token(slack.bot_token)
        .maybe_user_token(slack.user_token)
        .build()
}

/// Runs one sync against `store`, driving `spinner` and printing the final
/// status line.
///
/// # Errors
///
/// Returns the run's error after it has been reported.
pub async fn run_sync<S: ChannelStore + ?Sized>(
    store: &S,
    request: &SyncRequest,
    spinner: &Spinner,
) -> EnvbotResult<SyncOutcome> {
    if request.patterns().is_empty() {
        warn!("no include patterns configured, every value will be blank");
    }

    let result = SyncOrchestrator::new(store)
        .run(request, |event| spinner.report(event))
        .await;

    match &result {
        Ok(outcome) => spinner.finish(Status::of(outcome), outcome.message()),
        Err(e) => {
            error!(error = %e, "sync failed");
            spinner.fail(&e.user_message());
        }
    }
    result
}

/// Main handler for sync command.
///
/// # Errors
///
/// Returns an error if any sync step fails. The status line has already been
/// printed.
pub async fn run_sync_command(config: &Config) -> EnvbotResult<SyncOutcome> {
    let store = slack_store(config);
    let spinner = Spinner::new();
    run_sync(&store, &sync_request(config), &spinner).await
}
