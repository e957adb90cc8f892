use crate::core::platform::container::reminder_config::{ReminderConfig, ReminderConfigUpdate};
use crate::core::platform::manager::reminder_scheduler::ReminderScheduler;
use clap::{Args, Subcommand};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
pub enum ReminderCommands {
    /// Show the reminder configuration
    Show,
    /// Change the reminder configuration; omitted options keep their value
    Set(SetReminderArgs),
    /// Run one reminder check now
    Check,
}

#[derive(Debug, Args)]
pub struct SetReminderArgs {
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Remind students about their own pending requests
    #[arg(long)]
    pub student: Option<bool>,

    /// Remind departments about requests awaiting approval
    #[arg(long)]
    pub department: Option<bool>,

    /// Days a request must be pending before it is reminded
    #[arg(long)]
    pub interval_days: Option<u32>,
}

impl From<SetReminderArgs> for ReminderConfigUpdate {
    fn from(args: SetReminderArgs) -> Self {
        Self {
            enabled: args.enabled,
            student_reminders: args.student,
            department_reminders: args.department,
            reminder_interval_days: args.interval_days,
        }
    }
}

pub struct ReminderCommandHandler {
    scheduler: Arc<ReminderScheduler>,
}

impl ReminderCommandHandler {
    pub fn new(scheduler: Arc<ReminderScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn handle_command(&self, command: ReminderCommands) -> Result<(), Box<dyn std::error::Error>> {
        match command {
            ReminderCommands::Show => {
                print_config(&self.scheduler.get_config()?);
                Ok(())
            }
            ReminderCommands::Set(args) => {
                let update = ReminderConfigUpdate::from(args);
                if update.is_empty() {
                    println!("Nothing to change");
                    return Ok(());
                }
                // An enabling update restarts the timer; this process exits right after.
                let config = self.scheduler.update_config(update)?;
                self.scheduler.stop();
                println!("✅ Reminder configuration updated");
                print_config(&config);
                Ok(())
            }
            ReminderCommands::Check => {
                let sent = self.scheduler.run_check()?;
                println!("✅ Reminder check complete, {} reminder(s) sent", sent);
                Ok(())
            }
        }
    }
}

fn print_config(config: &ReminderConfig) {
    println!("⏰ Reminder configuration:");
    println!("   Enabled: {}", config.enabled);
    println!("   Student reminders: {}", config.student_reminders);
    println!("   Department reminders: {}", config.department_reminders);
    println!("   Interval: {} day(s)", config.reminder_interval_days);
}
