/*
Application Context

Builds every service from Settings and owns them for the lifetime of the process. There is
exactly one Notification Store and one Reminder Scheduler per context; anything that needs
them borrows them from here.
*/

use crate::application::storage::clearance_store::ClearanceRequestRepositoryPort;
use crate::application::storage::key_value_store::{KeyValueStorePort, StorageResult};
use crate::config::application_settings::Settings;
use crate::core::platform::manager::clearance_service::ClearanceService;
use crate::core::platform::manager::notification_store::NotificationStore;
use crate::core::platform::manager::reminder_scheduler::ReminderScheduler;
use crate::infrastructure::adapters::notifications::system_notification_adapter::{
    SystemAdapterConfig, SystemToastAdapter,
};
use crate::infrastructure::adapters::storage::{FileKeyValueStore, MemoryKeyValueStore};
use crate::infrastructure::repositories::kv_clearance_repository::KeyValueClearanceRepository;
use std::sync::Arc;
use tracing::info;

pub struct AppContext {
    pub storage: Arc<dyn KeyValueStorePort>,
    pub toasts: Arc<SystemToastAdapter>,
    pub notifications: Arc<NotificationStore>,
    pub requests: Arc<dyn ClearanceRequestRepositoryPort>,
    pub reminders: Arc<ReminderScheduler>,
    pub clearance: Arc<ClearanceService>,
}

impl AppContext {
    pub fn build(settings: &Settings) -> StorageResult<Self> {
        let storage: Arc<dyn KeyValueStorePort> = if settings.storage.ephemeral {
            info!("Using in-memory storage");
            Arc::new(MemoryKeyValueStore::new())
        } else {
            let store = FileKeyValueStore::open(&settings.storage.data_dir)?;
            info!(data_dir = %store.root().display(), "Using file storage");
            Arc::new(store)
        };

        Ok(Self::with_storage(settings, storage))
    }

    /// Wires the services on top of an already opened store
    pub fn with_storage(settings: &Settings, storage: Arc<dyn KeyValueStorePort>) -> Self {
        let toasts = Arc::new(SystemToastAdapter::new(SystemAdapterConfig::default()));
        let notifications = Arc::new(NotificationStore::with_capacity(
            storage.clone(),
            toasts.clone(),
            settings.notifications.max_stored,
        ));
        let requests: Arc<dyn ClearanceRequestRepositoryPort> =
            Arc::new(KeyValueClearanceRepository::new(storage.clone()));
        let reminders = Arc::new(ReminderScheduler::new(
            notifications.clone(),
            requests.clone(),
            storage.clone(),
            settings.reminders.check_period(),
        ));
        let clearance = Arc::new(ClearanceService::new(requests.clone(), notifications.clone()));

        Self {
            storage,
            toasts,
            notifications,
            requests,
            reminders,
            clearance,
        }
    }

    /// Stops background work. Safe to call more than once.
    pub fn shutdown(&self) {
        self.reminders.stop();
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}
