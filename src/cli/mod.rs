pub mod notification_commands;
pub mod reminder_commands;
pub mod request_commands;

use clap::{Parser, Subcommand};
use notification_commands::NotificationCommands;
use reminder_commands::ReminderCommands;
use request_commands::RequestCommands;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "clearpass", version, about = "Clearance notifications and reminders")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage notifications
    #[command(subcommand)]
    Notifications(NotificationCommands),
    /// Manage reminder settings
    #[command(subcommand)]
    Reminders(ReminderCommands),
    /// Manage clearance requests
    #[command(subcommand)]
    Requests(RequestCommands),
    /// Run the reminder scheduler until Ctrl-C
    Run,
}

/*
CLI Module Tests

Argument parsing for every command group.
*/
