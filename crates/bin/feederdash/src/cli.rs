//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "feederdash", version, about = "Dashboard client for the pet feeder")]
pub struct Cli {
    /// Config file; missing is fine, every setting has a default.
    #[arg(long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Feeder origin, overriding the config file and `FEEDERDASH_DEVICE_URL`.
    #[arg(long)]
    pub device_url: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Live dashboard with line commands on stdin (the default).
    Watch,
    /// Poll once and print the panel.
    Status,
    /// Start a manual feeding.
    Feed,
    /// Cancel the feeding in progress.
    Cancel,
    /// Capture a photo and save it.
    Capture {
        /// Directory to save into, overriding `[camera] capture_dir`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show or change the feeder configuration.
    Config(ConfigCommand),
    /// Reset today's feeding counter.
    ResetDaily,
    /// Reboot the feeder.
    Reboot,
    /// Serve a virtual feeder to point the dashboard at.
    Demo {
        /// Address to bind, overriding `[demo] bind`.
        #[arg(long)]
        bind: Option<String>,
        /// Simulate a feeder without a camera.
        #[arg(long)]
        no_camera: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigSubcommand {
    /// Print the current configuration.
    Show,
    /// Save the schedule group; unset flags keep the device's values.
    Schedule {
        #[arg(long)]
        auto: Option<bool>,
        /// Hours between automatic feedings.
        #[arg(long)]
        interval: Option<String>,
        #[arg(long)]
        portions: Option<String>,
    },
    /// Save the advanced group; unset flags keep the device's values.
    Advanced {
        #[arg(long)]
        presence: Option<bool>,
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        temp_alerts: Option<bool>,
        #[arg(long)]
        humidity_alerts: Option<bool>,
    },
}

/// One line typed into the live dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCommand {
    Feed,
    Cancel,
    Capture,
    RefreshCamera,
    ResetDaily,
    Reboot,
    Help,
    Quit,
}

impl LineCommand {
    pub const HELP: &'static str =
        "f feed · c cancel · p photo · s camera · r reset daily · b reboot · q quit";

    /// Parse a typed line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let word = line.trim();
        if word.is_empty() {
            return None;
        }
        let command = match word.to_ascii_lowercase().as_str() {
            "f" | "feed" => Self::Feed,
            "c" | "cancel" => Self::Cancel,
            "p" | "photo" | "capture" => Self::Capture,
            "s" | "stream" | "camera" => Self::RefreshCamera,
            "r" | "reset" => Self::ResetDaily,
            "b" | "reboot" => Self::Reboot,
            "h" | "?" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Some(Err(format!("unknown command `{word}`"))),
        };
        Some(Ok(command))
    }
}
