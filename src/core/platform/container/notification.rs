/*
Notification Container Module

A Notification informs a student or department member about something that happened in the
clearance workflow: a request was submitted, approved or rejected, a pending request needs
attention, or the system itself has something to announce.

Notifications are created by the clearance workflow and by the reminder scheduler, and are
held by the platform level Notification Store. The JSON shape defined here is the shape
that is persisted, so field names and type tags must stay stable.
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Link used by notifications that point the user at their request list.
pub const REQUESTS_ACTION_URL: &str = "/dashboard/requests";

/// Notification domain errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationDomainError {
    #[error("Notification id cannot be empty")]
    EmptyId,
    #[error("Notification title cannot be empty")]
    EmptyTitle,
    #[error("Unknown notification type: {0}")]
    UnknownType(String),
}

/// Kind of event a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "request_approved")]
    RequestApproved,
    #[serde(rename = "request_rejected")]
    RequestRejected,
    #[serde(rename = "request_submitted")]
    RequestSubmitted,
    #[serde(rename = "reminder")]
    Reminder,
    #[serde(rename = "system")]
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::RequestApproved => "request_approved",
            NotificationType::RequestRejected => "request_rejected",
            NotificationType::RequestSubmitted => "request_submitted",
            NotificationType::Reminder => "reminder",
            NotificationType::System => "system",
        }
    }

    /// Title used when the caller does not supply one
    pub fn default_title(&self) -> &'static str {
        match self {
            NotificationType::RequestApproved => "Clearance Approved",
            NotificationType::RequestRejected => "Clearance Rejected",
            NotificationType::RequestSubmitted => "Clearance Submitted",
            NotificationType::Reminder => "Clearance Reminder",
            NotificationType::System => "System Notification",
        }
    }

    /// Message used when the caller does not supply one
    pub fn default_message(&self) -> &'static str {
        match self {
            NotificationType::RequestApproved => {
                "Your clearance request has been approved by a department."
            }
            NotificationType::RequestRejected => {
                "Your clearance request has been rejected. Please review the comments."
            }
            NotificationType::RequestSubmitted => {
                "Your clearance request has been successfully submitted."
            }
            NotificationType::Reminder => {
                "You have pending clearance requests that require your attention."
            }
            NotificationType::System => "System update: The clearance system has been updated.",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = NotificationDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "request_approved" | "approved" => Ok(NotificationType::RequestApproved),
            "request_rejected" | "rejected" => Ok(NotificationType::RequestRejected),
            "request_submitted" | "submitted" => Ok(NotificationType::RequestSubmitted),
            "reminder" => Ok(NotificationType::Reminder),
            "system" => Ok(NotificationType::System),
            other => Err(NotificationDomainError::UnknownType(other.to_string())),
        }
    }
}

/// A single notification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Notification {
    /// Creates a new unread notification with a generated id
    pub fn new(
        notification_type: NotificationType,
        title: String,
        message: String,
    ) -> Result<Self, NotificationDomainError> {
        Self::with_id(Uuid::new_v4().to_string(), notification_type, title, message)
    }

    /// Creates a new unread notification with a caller supplied id
    pub fn with_id(
        id: String,
        notification_type: NotificationType,
        title: String,
        message: String,
    ) -> Result<Self, NotificationDomainError> {
        if id.trim().is_empty() {
            return Err(NotificationDomainError::EmptyId);
        }
        if title.trim().is_empty() {
            return Err(NotificationDomainError::EmptyTitle);
        }

        Ok(Self {
            id,
            notification_type,
            title,
            message,
            timestamp: Utc::now(),
            read: false,
            action_url: None,
        })
    }

    /// Creates a notification using the default title and message of its type
    pub fn of_type(notification_type: NotificationType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            notification_type,
            title: notification_type.default_title().to_string(),
            message: notification_type.default_message().to_string(),
            timestamp: Utc::now(),
            read: false,
            action_url: None,
        }
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Marks the notification read. Read never goes back to unread.
    pub fn mark_read(&mut self) {
        self.read = true;
    }
}
