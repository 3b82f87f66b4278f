// envbot: env snapshot sync for chat channels
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Command Dispatch
//!   Sync (default) | Preview | Options | Version
//! ```

use std::process::ExitCode;

use envbot::cli::global::GlobalOptions;
use envbot::cli::{self, Command};
use envbot::cmd::options::run_options_command;
use envbot::cmd::preview::run_preview_command;
use envbot::cmd::sync::run_sync_command;
use envbot::config::Config;
use envbot::logging::init_logging;
use envbot::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let log_config = build_log_config(&cli.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

fn build_log_config(global: &GlobalOptions) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or_default();

    let file_level = global
        .file_log_level
        .or(global.log_level)
        .and_then(LogLevel::from_u8)
        .unwrap_or(LogLevel::DEBUG);

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Command::Options) => cli.global.config_loader().and_then(|loader| {
            let files = loader.format_loaded_files();
            let config = loader.build()?;
            run_options_command(&config, &files);
            Ok(())
        }),
        Some(Command::Preview(args)) => {
            load_config(&cli.global).and_then(|config| run_preview_command(args, &config))
        }
        Some(Command::Sync) | None => {
            return match load_config(&cli.global) {
                Ok(config) => match run_sync_command(&config).await {
                    Ok(outcome) => ExitCode::from(outcome.exit_code()),
                    Err(e) => ExitCode::from(e.exit_code()),
                },
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(global: &GlobalOptions) -> envbot::error::Result<Config> {
    global.config_loader()?.build()
}
