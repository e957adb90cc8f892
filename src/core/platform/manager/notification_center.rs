/*
Notification Center

Presentation model for the notification bell: an unread badge, a scrollable list, "mark one
read" on click and "mark all read". The center subscribes to the Notification Store when it is
mounted and keeps its own copy of the latest snapshot; the subscription is released when the
center is unmounted or dropped.
*/

use crate::core::platform::container::notification::Notification;
use crate::core::platform::manager::notification_store::{
    NotificationError, NotificationResult, NotificationStore, Subscription,
};
use std::sync::{Arc, RwLock};

/// Largest unread count shown as a number on the badge
pub const BADGE_LIMIT: usize = 99;

/// One row of the notification list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub id: String,
    pub title: String,
    pub message: String,
    pub time: String,
    pub unread: bool,
    pub action_url: Option<String>,
}

impl From<&Notification> for NotificationEntry {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.clone(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            time: format_time(notification),
            unread: notification.is_unread(),
            action_url: notification.action_url.clone(),
        }
    }
}

/// `MMM d, h:mm a`, e.g. "Oct 19, 4:05 PM"
pub fn format_time(notification: &Notification) -> String {
    notification.timestamp.format("%b %-d, %-I:%M %p").to_string()
}

/// Badge text for an unread count, or None when there is nothing unread
pub fn badge_text(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        n if n > BADGE_LIMIT => Some(format!("{}+", BADGE_LIMIT)),
        n => Some(n.to_string()),
    }
}

pub struct NotificationCenter {
    store: Arc<NotificationStore>,
    snapshot: Arc<RwLock<Vec<Notification>>>,
    subscription: Option<Subscription>,
}

impl NotificationCenter {
    /// Subscribes to the store, then takes the initial snapshot. An update delivered while
    /// mounting waits for the initial snapshot and replaces it.
    pub fn mount(store: Arc<NotificationStore>) -> NotificationResult<Self> {
        let snapshot = Arc::new(RwLock::new(Vec::new()));

        let sink = snapshot.clone();
        let subscription = {
            let mut initial = snapshot
                .write()
                .map_err(|_| NotificationError::Unavailable("center snapshot lock poisoned".to_string()))?;
            let subscription = store.subscribe(Arc::new(move |updated: &[Notification]| {
                if let Ok(mut snapshot) = sink.write() {
                    *snapshot = updated.to_vec();
                }
            }));
            *initial = store.get_notifications()?;
            subscription
        };

        Ok(Self {
            store,
            snapshot,
            subscription: Some(subscription),
        })
    }

    /// Releases the store subscription. Also happens on drop.
    pub fn unmount(&mut self) {
        self.subscription.take();
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn unread_count(&self) -> usize {
        self.snapshot
            .read()
            .map(|s| s.iter().filter(|n| n.is_unread()).count())
            .unwrap_or(0)
    }

    pub fn badge(&self) -> Option<String> {
        badge_text(self.unread_count())
    }

    pub fn entries(&self) -> Vec<NotificationEntry> {
        self.snapshot
            .read()
            .map(|s| s.iter().map(NotificationEntry::from).collect())
            .unwrap_or_default()
    }

    /// Handles a click on a list entry: marks it read if needed and returns where to
    /// navigate, if anywhere.
    pub fn click(&self, id: &str) -> NotificationResult<Option<String>> {
        let Some(entry) = self.entries().into_iter().find(|e| e.id == id) else {
            return Ok(None);
        };

        if entry.unread {
            self.store.mark_as_read(id)?;
        }
        Ok(entry.action_url)
    }

    pub fn mark_all_as_read(&self) -> NotificationResult<usize> {
        self.store.mark_all_as_read()
    }

    /// Plain text rendering of the center
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self.badge() {
            Some(badge) => out.push_str(&format!("Notifications ({} unread)\n", badge)),
            None => out.push_str("Notifications\n"),
        }

        let entries = self.entries();
        if entries.is_empty() {
            out.push_str("No notifications yet\n");
            out.push_str("You'll see updates here when you receive notifications\n");
            return out;
        }

        for entry in entries {
            let marker = if entry.unread { "*" } else { " " };
            out.push_str(&format!("{} {}  [{}]\n", marker, entry.title, entry.time));
            out.push_str(&format!("    {}\n", entry.message));
            if let Some(url) = &entry.action_url {
                out.push_str(&format!("    -> {}\n", url));
            }
            out.push_str(&format!("    id: {}\n", entry.id));
        }
        out
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("mounted", &self.is_mounted())
            .field("unread", &self.unread_count())
            .finish()
    }
}
