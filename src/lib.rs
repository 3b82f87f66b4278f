// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |          sync / preview / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML, ENVBOT_*, flags    |
//!              '-------------+-------------'
//!                            v
//!                 sync::SyncOrchestrator ----> ui (spinner)
//!                  |         |        |
//!                  v         v        v
//!                 env      filter   store
//!               EnvMap   PatternSet  ChannelStore
//!                                     SlackStore
//!
//!   +-----------------------------------------+
//!   |  foundation        error, logging       |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod env;
pub mod error;
pub mod filter;
pub mod logging;
pub mod store;
pub mod sync;
pub mod ui;
