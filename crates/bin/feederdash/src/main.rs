//! # feederdash — pet feeder dashboard
//!
//! Composition root that wires the dashboard session to a feeder and drives
//! it from the terminal.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialise `tracing` logging to stderr
//! - Construct the reqwest feeder client and the photo store (adapters)
//! - Construct the `DashboardSession`, injecting both via port traits
//! - Dispatch the subcommand; `demo` serves the virtual feeder and never
//!   starts the session
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod commands;
mod config;
mod photo_store;
mod render;

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use feederdash_adapter_http_reqwest::ReqwestFeederApi;
use feederdash_app::session::DashboardSession;
use feederdash_domain::command::Command as FeederCommand;

use crate::cli::{Cli, Command, ConfigSubcommand};
use crate::commands::{ConfigEdit, Terminal};
use crate::config::Config;
use crate::photo_store::DirectoryPhotoStore;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config, cli.device_url)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Command::Watch);

    let capture_dir = match &command {
        Command::Capture { output } => {
            commands::capture_dir(config.camera.capture_dir.clone(), output.clone())
        }
        _ => config.camera.capture_dir.clone(),
    };

    let api = ReqwestFeederApi::new(&config.device)?;
    tracing::debug!(device = api.base_url(), "feeder client ready");
    let session = DashboardSession::new(
        api,
        DirectoryPhotoStore::new(capture_dir),
        config.session_settings(),
    );
    let mut terminal = Terminal::new(cli.yes);

    match command {
        Command::Watch => commands::watch(&session, &mut terminal).await,
        Command::Status => commands::status(&session).await,
        Command::Feed => commands::command(&session, &mut terminal, FeederCommand::FeedNow).await,
        Command::Cancel => {
            commands::command(&session, &mut terminal, FeederCommand::CancelFeeding).await
        }
        Command::ResetDaily => {
            commands::command(&session, &mut terminal, FeederCommand::ResetDaily).await
        }
        Command::Reboot => commands::command(&session, &mut terminal, FeederCommand::Reboot).await,
        Command::Capture { .. } => commands::capture(&session).await,
        Command::Config(config_command) => match config_command.command {
            ConfigSubcommand::Show => commands::config_show(&session).await,
            ConfigSubcommand::Schedule {
                auto,
                interval,
                portions,
            } => {
                let edit = ConfigEdit::Schedule {
                    auto,
                    interval,
                    portions,
                };
                commands::config_save(&session, edit).await
            }
            ConfigSubcommand::Advanced {
                presence,
                sound,
                temp_alerts,
                humidity_alerts,
            } => {
                let edit = ConfigEdit::Advanced {
                    presence,
                    sound,
                    temp_alerts,
                    humidity_alerts,
                };
                commands::config_save(&session, edit).await
            }
        },
        Command::Demo { bind, no_camera } => {
            let bind = bind.unwrap_or(config.demo.bind);
            commands::demo(&bind, !no_camera).await
        }
    }
}
