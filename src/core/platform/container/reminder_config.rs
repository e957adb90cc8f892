/*
Reminder Configuration Container

Settings that control whether, and for whom, the reminder scheduler emits reminders about
pending clearance requests. The configuration is a single persisted document; partial
updates are merged into it through ReminderConfigUpdate.
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted reminder interval, ten years
pub const MAX_REMINDER_INTERVAL_DAYS: u32 = 3650;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReminderConfigError {
    #[error("Reminder interval must be between 1 and {max} days, got {0}", max = MAX_REMINDER_INTERVAL_DAYS)]
    InvalidInterval(u32),
}

/// Reminder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderConfig {
    /// Master switch for the scheduler
    pub enabled: bool,
    /// Remind students about their own pending requests
    pub student_reminders: bool,
    /// Remind departments about requests awaiting approval
    pub department_reminders: bool,
    /// Age in days a pending request must reach before it is reminded
    #[serde(alias = "reminderInterval")]
    pub reminder_interval_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            student_reminders: true,
            department_reminders: true,
            reminder_interval_days: 3,
        }
    }
}

impl ReminderConfig {
    pub fn validate(&self) -> Result<(), ReminderConfigError> {
        if !(1..=MAX_REMINDER_INTERVAL_DAYS).contains(&self.reminder_interval_days) {
            return Err(ReminderConfigError::InvalidInterval(self.reminder_interval_days));
        }
        Ok(())
    }

    /// Returns a copy with the update merged in. The result is validated.
    pub fn merged(&self, update: &ReminderConfigUpdate) -> Result<Self, ReminderConfigError> {
        let merged = Self {
            enabled: update.enabled.unwrap_or(self.enabled),
            student_reminders: update.student_reminders.unwrap_or(self.student_reminders),
            department_reminders: update
                .department_reminders
                .unwrap_or(self.department_reminders),
            reminder_interval_days: update
                .reminder_interval_days
                .unwrap_or(self.reminder_interval_days),
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn interval(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.reminder_interval_days))
    }

    /// Roles that currently receive reminders
    pub fn recipients(&self) -> Vec<ReminderRecipient> {
        let mut recipients = Vec::with_capacity(2);
        if self.student_reminders {
            recipients.push(ReminderRecipient::Student);
        }
        if self.department_reminders {
            recipients.push(ReminderRecipient::Department);
        }
        recipients
    }
}

/// Who a reminder is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderRecipient {
    Student,
    Department,
}

impl std::fmt::Display for ReminderRecipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderRecipient::Student => write!(f, "student"),
            ReminderRecipient::Department => write!(f, "department"),
        }
    }
}

/// Partial reminder settings; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderConfigUpdate {
    pub enabled: Option<bool>,
    pub student_reminders: Option<bool>,
    pub department_reminders: Option<bool>,
    pub reminder_interval_days: Option<u32>,
}

impl ReminderConfigUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.student_reminders.is_none()
            && self.department_reminders.is_none()
            && self.reminder_interval_days.is_none()
    }
}
