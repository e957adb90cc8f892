/*
Toast Port

Output port for transient, dismissible messages shown to the user when a notification
arrives. Showing a toast is fire-and-forget: the caller never learns whether the message
was seen, and a failing adapter must not affect the notification that triggered it.
*/

use crate::core::platform::container::notification::Notification;

/// Action button attached to a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    pub label: String,
    pub url: String,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub action: Option<ToastAction>,
}

impl Toast {
    /// Builds the toast for a freshly added notification. Notifications with an action URL
    /// get a "View" button.
    pub fn for_notification(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            description: notification.message.clone(),
            action: notification.action_url.as_ref().map(|url| ToastAction {
                label: "View".to_string(),
                url: url.clone(),
            }),
        }
    }
}

pub trait ToastPort: Send + Sync {
    fn show(&self, toast: Toast);
}
