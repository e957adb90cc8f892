/*
Notification Store

This is the Notification Store, the platform level service that holds the notification state
for one user session. It is the single source of truth for the notification list: the
clearance workflow and the reminder scheduler add to it, the notification center reads from
it and marks entries read.

The store keeps the list newest first and capped (50 by default). Every mutation writes the
whole list through the Key Value Store port under a fixed key, then notifies subscribers
synchronously with a snapshot. Adding a notification also raises a toast through the Toast
port.

Mutations and their deliveries are serialized, so listeners see snapshots in the order the
mutations happened. A listener may read the store but must not mutate it from `on_update`.

Persistence is best effort. A failed write is logged and the in-memory state stays as it is;
a corrupt stored document is discarded on load. Notifications are never allowed to block the
clearance workflow.
*/

use crate::application::ports::output::toast_port::{Toast, ToastPort};
use crate::application::storage::key_value_store::KeyValueStorePort;
use crate::core::platform::container::notification::Notification;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key holding the JSON encoded notification list
pub const NOTIFICATIONS_KEY: &str = "clearpass_notifications";

/// Number of notifications kept by default
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 50;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification already exists: {0}")]
    DuplicateId(String),

    #[error("Notifications temporarily unavailable: {0}")]
    Unavailable(String),
}

/// Observer of notification state. Invoked with the full list after every mutation, in
/// mutation order. Calling a mutating store method from `on_update` deadlocks.
pub trait NotificationListener: Send + Sync {
    fn on_update(&self, snapshot: &[Notification]);
}

impl<F> NotificationListener for F
where
    F: Fn(&[Notification]) + Send + Sync,
{
    fn on_update(&self, snapshot: &[Notification]) {
        self(snapshot)
    }
}

type ListenerRegistry = RwLock<Vec<(u64, Arc<dyn NotificationListener>)>>;

/// Handle for a registered listener. The listener stays attached until the handle is
/// unsubscribed or dropped.
#[must_use = "dropping a Subscription immediately detaches the listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerRegistry>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            match listeners.write() {
                Ok(mut listeners) => listeners.retain(|(id, _)| *id != self.id),
                Err(poisoned) => poisoned.into_inner().retain(|(id, _)| *id != self.id),
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

pub struct NotificationStore {
    storage: Arc<dyn KeyValueStorePort>,
    toast: Arc<dyn ToastPort>,
    max_stored: usize,
    notifications: RwLock<Vec<Notification>>,
    // Held from a mutation until its listeners have run
    delivery: Mutex<()>,
    listeners: Arc<ListenerRegistry>,
    next_listener_id: AtomicU64,
}

impl NotificationStore {
    /// Creates a store holding at most 50 notifications, loading any persisted list
    pub fn new(storage: Arc<dyn KeyValueStorePort>, toast: Arc<dyn ToastPort>) -> Self {
        Self::with_capacity(storage, toast, DEFAULT_MAX_NOTIFICATIONS)
    }

    pub fn with_capacity(
        storage: Arc<dyn KeyValueStorePort>,
        toast: Arc<dyn ToastPort>,
        max_stored: usize,
    ) -> Self {
        let max_stored = max_stored.max(1);
        let notifications = Self::load(storage.as_ref(), max_stored);

        Self {
            storage,
            toast,
            max_stored,
            notifications: RwLock::new(notifications),
            delivery: Mutex::new(()),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: AtomicU64::new(1),
        }
    }

    fn load(storage: &dyn KeyValueStorePort, max_stored: usize) -> Vec<Notification> {
        let raw = match storage.get(NOTIFICATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Notification storage unavailable, starting with an empty list");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Notification>>(&raw) {
            Ok(mut notifications) => {
                notifications.truncate(max_stored);
                debug!(count = notifications.len(), "Loaded persisted notifications");
                notifications
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupt notification state");
                if let Err(e) = storage.remove(NOTIFICATIONS_KEY) {
                    warn!(error = %e, "Failed to remove corrupt notification state");
                }
                Vec::new()
            }
        }
    }

    /// Adds a notification at the head of the list.
    ///
    /// Ids must be unique among the stored notifications; a duplicate is rejected and the
    /// state is left untouched.
    pub fn add_notification(&self, notification: Notification) -> NotificationResult<()> {
        let delivery = self.lock_delivery();
        let snapshot = {
            let mut notifications = self.write_list()?;
            if notifications.iter().any(|n| n.id == notification.id) {
                return Err(NotificationError::DuplicateId(notification.id));
            }

            notifications.insert(0, notification.clone());
            notifications.truncate(self.max_stored);
            self.persist(&notifications);
            notifications.clone()
        };

        debug!(
            id = %notification.id,
            kind = %notification.notification_type,
            "Notification added"
        );

        self.notify_listeners(&snapshot);
        drop(delivery);
        self.toast.show(Toast::for_notification(&notification));
        Ok(())
    }

    /// Snapshot of the list, most recent first
    pub fn get_notifications(&self) -> NotificationResult<Vec<Notification>> {
        Ok(self.read_list()?.clone())
    }

    pub fn get_unread_count(&self) -> NotificationResult<usize> {
        Ok(self.read_list()?.iter().filter(|n| n.is_unread()).count())
    }

    /// Marks the first notification with `id` read. Returns whether one was found.
    pub fn mark_as_read(&self, id: &str) -> NotificationResult<bool> {
        let _delivery = self.lock_delivery();
        let snapshot = {
            let mut notifications = self.write_list()?;
            let Some(notification) = notifications.iter_mut().find(|n| n.id == id) else {
                return Ok(false);
            };
            if notification.read {
                return Ok(true);
            }

            notification.mark_read();
            self.persist(&notifications);
            notifications.clone()
        };

        self.notify_listeners(&snapshot);
        Ok(true)
    }

    /// Marks every notification read. Returns how many were unread.
    pub fn mark_all_as_read(&self) -> NotificationResult<usize> {
        let _delivery = self.lock_delivery();
        let (changed, snapshot) = {
            let mut notifications = self.write_list()?;
            let changed = notifications.iter().filter(|n| n.is_unread()).count();
            if changed == 0 {
                return Ok(0);
            }

            notifications.iter_mut().for_each(Notification::mark_read);
            self.persist(&notifications);
            (changed, notifications.clone())
        };

        self.notify_listeners(&snapshot);
        Ok(changed)
    }

    /// Clears every notification, in memory and in storage
    pub fn reset(&self) -> NotificationResult<()> {
        let _delivery = self.lock_delivery();
        {
            let mut notifications = self.write_list()?;
            notifications.clear();
            if let Err(e) = self.storage.remove(NOTIFICATIONS_KEY) {
                warn!(error = %e, "Failed to remove persisted notifications");
            }
        }

        self.notify_listeners(&[]);
        Ok(())
    }

    /// Registers a listener. It is invoked after every mutation until the returned
    /// subscription is dropped.
    pub fn subscribe(&self, listener: Arc<dyn NotificationListener>) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        match self.listeners.write() {
            Ok(mut listeners) => listeners.push((id, listener)),
            Err(poisoned) => poisoned.into_inner().push((id, listener)),
        }

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        match self.listeners.read() {
            Ok(listeners) => listeners.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_stored
    }

    fn notify_listeners(&self, snapshot: &[Notification]) {
        // Listeners run without the registry lock so they may subscribe or read the store.
        let listeners: Vec<Arc<dyn NotificationListener>> = match self.listeners.read() {
            Ok(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(poisoned) => poisoned.into_inner().iter().map(|(_, l)| l.clone()).collect(),
        };

        for listener in listeners {
            listener.on_update(snapshot);
        }
    }

    fn persist(&self, notifications: &[Notification]) {
        let encoded = match serde_json::to_string(notifications) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Failed to encode notifications");
                return;
            }
        };

        if let Err(e) = self.storage.set(NOTIFICATIONS_KEY, &encoded) {
            warn!(error = %e, "Failed to persist notifications, keeping in-memory state");
        }
    }

    // A listener that panicked leaves nothing half-done behind this lock, so poison is ignored.
    fn lock_delivery(&self) -> MutexGuard<'_, ()> {
        match self.delivery.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn read_list(&self) -> NotificationResult<RwLockReadGuard<'_, Vec<Notification>>> {
        self.notifications
            .read()
            .map_err(|_| NotificationError::Unavailable("notification list lock poisoned".to_string()))
    }

    fn write_list(&self) -> NotificationResult<RwLockWriteGuard<'_, Vec<Notification>>> {
        self.notifications
            .write()
            .map_err(|_| NotificationError::Unavailable("notification list lock poisoned".to_string()))
    }
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("max_stored", &self.max_stored)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
