// src/main.rs
use clap::Parser;
use clearpass::cli::notification_commands::NotificationCommandHandler;
use clearpass::cli::reminder_commands::ReminderCommandHandler;
use clearpass::cli::request_commands::RequestCommandHandler;
use clearpass::cli::{Cli, Commands};
use clearpass::config::Settings;
use clearpass::infrastructure::adapters::logs::init_logging;
use clearpass::setup::app_context::AppContext;
use clearpass::setup::service_runner::run_services;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = match init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };
    debug!(?settings, "Loaded configuration");

    if let Err(e) = run(cli.command, &settings).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let context = AppContext::build(settings)?;

    match command {
        Commands::Notifications(command) => {
            NotificationCommandHandler::new(context.notifications.clone()).handle_command(command)
        }
        Commands::Reminders(command) => {
            ReminderCommandHandler::new(context.reminders.clone()).handle_command(command)
        }
        Commands::Requests(command) => {
            RequestCommandHandler::new(context.clearance.clone()).handle_command(command)
        }
        Commands::Run => run_services(&context).await,
    }
}
