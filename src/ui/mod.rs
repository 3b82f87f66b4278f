// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal status display for a sync run.
//!
//! ```text
//! SyncEvent --> Spinner::report() --> "⠋ looking up ops channel"
//!
//! end of run:
//!   ✔ sync successful 🎉        finish(Status::of(outcome))
//!   ℹ env in sync               finish(Status::of(outcome))
//!   ✖ failed to sync env        fail()
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::sync::{SyncEvent, SyncOutcome};

const TICK: Duration = Duration::from_millis(80);

fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        })
        .clone()
}

/// Final status kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Info,
    Failure,
}

impl Status {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Info => "ℹ",
            Self::Failure => "✖",
        }
    }

    /// Status used to announce a finished run.
    #[must_use]
    pub const fn of(outcome: &SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::Uploaded { .. } => Self::Success,
            SyncOutcome::InSync | SyncOutcome::DryRun { .. } => Self::Info,
        }
    }
}

/// Formats a final status line.
#[must_use]
pub fn status_line(status: Status, message: &str) -> String {
    format!("{} {message}", status.symbol())
}

/// Spinner driven by [`SyncEvent`]s.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Spinner on stderr. Hidden automatically when stderr is not a terminal.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(spinner_style());
        bar.enable_steady_tick(TICK);
        Self { bar }
    }

    /// Spinner that draws nothing.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Shows the event as the current step.
    pub fn report(&self, event: &SyncEvent) {
        self.bar.set_message(event.to_string());
    }

    /// Current step text.
    #[must_use]
    pub fn message(&self) -> String {
        self.bar.message()
    }

    pub fn fail(&self, message: &str) {
        self.finish(Status::Failure, message);
    }

    /// Stops the spinner and prints the final line to stderr.
    pub fn finish(&self, status: Status, message: &str) {
        self.bar.finish_and_clear();
        eprintln!("{}", status_line(status, message));
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}
