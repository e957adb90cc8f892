/*
Reminder Scheduler

This module is responsible for running the reminder scheduler, a background service that
periodically looks for clearance requests that have been pending for too long and sends
reminder notifications about them through the Notification Store.

The scheduler is either Idle or Running. Starting it performs one check immediately and then
arms a recurring timer that repeats the check every check period. Starting it again cancels
the previous timer first, so at most one timer is ever alive. Stopping is safe at any time.

A check (one scheduler tick) works as follows:
- cutoff = now - reminder interval
- every pending request filed at or before the cutoff is due
- for each due request, one reminder per enabled recipient role (student, department)
- a (request, role) pair already reminded after the cutoff is skipped, so each pair is
  reminded at most once per interval no matter how often the timer fires

The log of reminded pairs is persisted next to the configuration, so a fresh process (one CLI
invocation after another) sees what earlier ones already sent.
*/

use crate::application::storage::clearance_store::{ClearanceRequestRepositoryPort, RepositoryError};
use crate::application::storage::key_value_store::KeyValueStorePort;
use crate::core::platform::container::clearance_request::{ClearanceRequest, ClearanceStatus};
use crate::core::platform::container::notification::{
    Notification, NotificationType, REQUESTS_ACTION_URL,
};
use crate::core::platform::container::reminder_config::{
    ReminderConfig, ReminderConfigError, ReminderConfigUpdate, ReminderRecipient,
};
use crate::core::platform::manager::notification_store::{NotificationError, NotificationStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Storage key holding the JSON encoded reminder configuration
pub const REMINDER_CONFIG_KEY: &str = "clearpass_reminder_config";

/// Storage key holding the JSON encoded log of sent reminders
pub const REMINDER_LOG_KEY: &str = "clearpass_reminder_log";

/// Default time between two scheduler ticks
pub const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Longest accepted time between two scheduler ticks
pub const MAX_CHECK_PERIOD: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub type ReminderResult<T> = Result<T, ReminderError>;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("Invalid reminder configuration: {0}")]
    InvalidConfig(#[from] ReminderConfigError),

    #[error("Failed to read clearance requests: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("No async runtime available to run the reminder timer: {0}")]
    NoRuntime(String),

    #[error("Reminder scheduler unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

type ReminderKey = (String, ReminderRecipient);

/// One persisted entry of the reminder log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ReminderLogEntry {
    request_id: String,
    recipient: ReminderRecipient,
    reminded_at: DateTime<Utc>,
}

/// State shared between the scheduler and its timer task
struct ReminderChecker {
    store: Arc<NotificationStore>,
    requests: Arc<dyn ClearanceRequestRepositoryPort>,
    storage: Arc<dyn KeyValueStorePort>,
    config: RwLock<ReminderConfig>,
    last_reminded: Mutex<HashMap<ReminderKey, DateTime<Utc>>>,
    ticks: AtomicU64,
}

impl ReminderChecker {
    fn config(&self) -> ReminderResult<ReminderConfig> {
        self.config
            .read()
            .map(|c| c.clone())
            .map_err(|_| ReminderError::Unavailable("config lock poisoned".to_string()))
    }

    fn last_reminded(&self) -> ReminderResult<MutexGuard<'_, HashMap<ReminderKey, DateTime<Utc>>>> {
        self.last_reminded
            .lock()
            .map_err(|_| ReminderError::Unavailable("reminder log lock poisoned".to_string()))
    }

    fn check(&self, now: DateTime<Utc>) -> ReminderResult<usize> {
        self.ticks.fetch_add(1, Ordering::Relaxed);

        let config = self.config()?;
        if !config.enabled {
            debug!("Reminders disabled, skipping check");
            return Ok(0);
        }

        let Some(cutoff) = now.checked_sub_signed(config.interval()) else {
            warn!(
                interval_days = config.reminder_interval_days,
                "Reminder cutoff out of range, skipping check"
            );
            return Ok(0);
        };
        let pending = self.requests.list_by_status(ClearanceStatus::Pending)?;
        let recipients = config.recipients();

        // Work out what is due while holding the log, emit without it: a subscriber reacting
        // to a reminder may call back into the scheduler.
        let (due, pruned) = {
            let mut last_reminded = self.last_reminded()?;
            let before = last_reminded.len();
            last_reminded.retain(|(id, _), _| pending.iter().any(|r| &r.id == id));
            let pruned = last_reminded.len() != before;

            let due: Vec<(&ClearanceRequest, ReminderRecipient)> = pending
                .iter()
                .filter(|request| request.is_overdue(cutoff))
                .flat_map(|request| recipients.iter().map(move |recipient| (request, *recipient)))
                .filter(|(request, recipient)| {
                    match last_reminded.get(&(request.id.clone(), *recipient)) {
                        Some(at) => *at <= cutoff,
                        None => true,
                    }
                })
                .collect();
            (due, pruned)
        };

        let mut emitted = Vec::with_capacity(due.len());
        for (request, recipient) in due {
            match self.store.add_notification(reminder_for(request, recipient, now)) {
                Ok(()) => emitted.push((request.id.clone(), recipient)),
                Err(e) => warn!(request_id = %request.id, %recipient, error = %e, "Failed to emit reminder"),
            }
        }

        let count = emitted.len();
        let mut last_reminded = self.last_reminded()?;
        for key in emitted {
            last_reminded.insert(key, now);
        }
        if pruned || count > 0 {
            self.persist_log(&last_reminded);
        }
        drop(last_reminded);

        if count > 0 {
            info!(reminders = count, pending = pending.len(), "Sent clearance reminders");
        }
        Ok(count)
    }

    fn persist_log(&self, log: &HashMap<ReminderKey, DateTime<Utc>>) {
        let entries: Vec<ReminderLogEntry> = log
            .iter()
            .map(|((request_id, recipient), at)| ReminderLogEntry {
                request_id: request_id.clone(),
                recipient: *recipient,
                reminded_at: *at,
            })
            .collect();

        match serde_json::to_string(&entries) {
            Ok(encoded) => {
                if let Err(e) = self.storage.set(REMINDER_LOG_KEY, &encoded) {
                    warn!(error = %e, "Failed to persist reminder log");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode reminder log"),
        }
    }

    /// Timer entry point; a failed tick is logged and the timer keeps going
    fn check_logged(&self, now: DateTime<Utc>) {
        if let Err(e) = self.check(now) {
            warn!(error = %e, "Reminder check failed");
        }
    }
}

fn reminder_for(
    request: &ClearanceRequest,
    recipient: ReminderRecipient,
    now: DateTime<Utc>,
) -> Notification {
    let (title, message) = match recipient {
        ReminderRecipient::Student => (
            "Clearance Status Reminder",
            format!(
                "Your clearance request with {} has been pending since {}. Please check its status.",
                request.department_name,
                request.request_date.format("%b %-d, %Y")
            ),
        ),
        ReminderRecipient::Department => (
            "Pending Approvals Reminder",
            format!(
                "{}'s clearance request to {} is awaiting your approval.",
                request.student_name, request.department_name
            ),
        ),
    };

    Notification {
        id: format!("reminder-{}-{}-{}", recipient, request.id, now.timestamp_millis()),
        notification_type: NotificationType::Reminder,
        title: title.to_string(),
        message,
        timestamp: now,
        read: false,
        action_url: Some(REQUESTS_ACTION_URL.to_string()),
    }
}

pub struct ReminderScheduler {
    checker: Arc<ReminderChecker>,
    check_period: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    /// Creates an idle scheduler, loading the persisted reminder configuration and log.
    /// The check period is clamped to between 1ms and [`MAX_CHECK_PERIOD`].
    pub fn new(
        store: Arc<NotificationStore>,
        requests: Arc<dyn ClearanceRequestRepositoryPort>,
        storage: Arc<dyn KeyValueStorePort>,
        check_period: Duration,
    ) -> Self {
        let config = Self::load_config(storage.as_ref());
        let last_reminded = Self::load_log(storage.as_ref());

        Self {
            checker: Arc::new(ReminderChecker {
                store,
                requests,
                storage,
                config: RwLock::new(config),
                last_reminded: Mutex::new(last_reminded),
                ticks: AtomicU64::new(0),
            }),
            check_period: check_period.clamp(Duration::from_millis(1), MAX_CHECK_PERIOD),
            timer: Mutex::new(None),
        }
    }

    fn load_config(storage: &dyn KeyValueStorePort) -> ReminderConfig {
        let raw = match storage.get(REMINDER_CONFIG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ReminderConfig::default(),
            Err(e) => {
                warn!(error = %e, "Reminder config unavailable, using defaults");
                return ReminderConfig::default();
            }
        };

        match serde_json::from_str::<ReminderConfig>(&raw) {
            Ok(config) if config.validate().is_ok() => config,
            Ok(config) => {
                warn!(?config, "Stored reminder config is invalid, using defaults");
                ReminderConfig::default()
            }
            Err(e) => {
                warn!(error = %e, "Discarding corrupt reminder config");
                if let Err(e) = storage.remove(REMINDER_CONFIG_KEY) {
                    warn!(error = %e, "Failed to remove corrupt reminder config");
                }
                ReminderConfig::default()
            }
        }
    }

    fn load_log(storage: &dyn KeyValueStorePort) -> HashMap<ReminderKey, DateTime<Utc>> {
        let raw = match storage.get(REMINDER_LOG_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashMap::new(),
            Err(e) => {
                warn!(error = %e, "Reminder log unavailable, starting empty");
                return HashMap::new();
            }
        };

        match serde_json::from_str::<Vec<ReminderLogEntry>>(&raw) {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| ((entry.request_id, entry.recipient), entry.reminded_at))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt reminder log");
                if let Err(e) = storage.remove(REMINDER_LOG_KEY) {
                    warn!(error = %e, "Failed to remove corrupt reminder log");
                }
                HashMap::new()
            }
        }
    }

    /// Starts the scheduler. Does nothing while reminders are disabled.
    ///
    /// Any running timer is cancelled first. One check runs immediately; the timer repeats
    /// it every check period.
    pub fn start(&self) -> ReminderResult<()> {
        if !self.checker.config()?.enabled {
            debug!("Reminders disabled, scheduler not started");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|e| ReminderError::NoRuntime(e.to_string()))?;

        {
            let mut timer = self.lock_timer()?;
            if let Some(previous) = timer.take() {
                previous.abort();
                debug!("Cancelled previous reminder timer");
            }

            let checker = self.checker.clone();
            let period = self.check_period;
            *timer = Some(runtime.spawn(async move {
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    checker.check_logged(Utc::now());
                }
            }));
        }

        info!(period_secs = self.check_period.as_secs(), "Reminder scheduler started");
        self.checker.check_logged(Utc::now());
        Ok(())
    }

    /// Stops the scheduler. Returns whether a timer was running.
    pub fn stop(&self) -> bool {
        let previous = match self.timer.lock() {
            Ok(mut timer) => timer.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        match previous {
            Some(handle) => {
                handle.abort();
                info!("Reminder scheduler stopped");
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> SchedulerState {
        let running = match self.timer.lock() {
            Ok(timer) => timer.as_ref().map(|h| !h.is_finished()).unwrap_or(false),
            Err(_) => false,
        };

        if running {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    pub fn get_config(&self) -> ReminderResult<ReminderConfig> {
        self.checker.config()
    }

    /// Merges `update` into the configuration and persists it. Disabling stops the
    /// scheduler; enabling (re)starts it.
    pub fn update_config(&self, update: ReminderConfigUpdate) -> ReminderResult<ReminderConfig> {
        let updated = {
            let mut config = self
                .checker
                .config
                .write()
                .map_err(|_| ReminderError::Unavailable("config lock poisoned".to_string()))?;
            let updated = config.merged(&update)?;
            *config = updated.clone();
            updated
        };

        self.persist_config(&updated);
        info!(?updated, "Reminder config updated");

        if updated.enabled {
            self.start()?;
        } else {
            self.stop();
        }
        Ok(updated)
    }

    /// Runs one check now
    pub fn run_check(&self) -> ReminderResult<usize> {
        self.run_check_at(Utc::now())
    }

    /// Runs one check as if the current time were `now`
    pub fn run_check_at(&self, now: DateTime<Utc>) -> ReminderResult<usize> {
        self.checker.check(now)
    }

    /// Number of checks performed so far, by the timer or manually
    pub fn tick_count(&self) -> u64 {
        self.checker.ticks.load(Ordering::Relaxed)
    }

    pub fn check_period(&self) -> Duration {
        self.check_period
    }

    fn persist_config(&self, config: &ReminderConfig) {
        match serde_json::to_string(config) {
            Ok(encoded) => {
                if let Err(e) = self.checker.storage.set(REMINDER_CONFIG_KEY, &encoded) {
                    warn!(error = %e, "Failed to persist reminder config");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode reminder config"),
        }
    }

    fn lock_timer(&self) -> ReminderResult<MutexGuard<'_, Option<JoinHandle<()>>>> {
        self.timer
            .lock()
            .map_err(|_| ReminderError::Unavailable("timer lock poisoned".to_string()))
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::container::clearance_request::{DepartmentRef, StudentRef};
    use crate::infrastructure::adapters::notifications::system_notification_adapter::{
        SystemAdapterConfig, SystemToastAdapter,
    };
    use crate::infrastructure::adapters::storage::memory_key_value_store::MemoryKeyValueStore;
    use crate::infrastructure::repositories::kv_clearance_repository::KeyValueClearanceRepository;
    use chrono::Duration as ChronoDuration;

    const PERIOD: Duration = Duration::from_secs(600);

    struct Fixture {
        scheduler: ReminderScheduler,
        store: Arc<NotificationStore>,
        requests: Arc<KeyValueClearanceRepository>,
        storage: Arc<MemoryKeyValueStore>,
    }

    fn create_fixture() -> Fixture {
        let storage = Arc::new(MemoryKeyValueStore::new());
        let toast = Arc::new(SystemToastAdapter::new(SystemAdapterConfig {
            max_stored_toasts: 10,
            log_toasts: false,
        }));
        let store = Arc::new(NotificationStore::new(storage.clone(), toast));
        let requests = Arc::new(KeyValueClearanceRepository::new(storage.clone()));
        let scheduler = ReminderScheduler::new(store.clone(), requests.clone(), storage.clone(), PERIOD);
        Fixture { scheduler, store, requests, storage }
    }

    fn file_request(requests: &KeyValueClearanceRepository, student: &str, age_days: i64) -> ClearanceRequest {
        let request = ClearanceRequest::new(
            &StudentRef { id: student.to_string(), name: format!("Student {}", student) },
            &DepartmentRef { id: "lib".to_string(), name: "Library".to_string() },
        )
        .with_request_date(Utc::now() - ChronoDuration::days(age_days));
        requests.save(request).unwrap()
    }

    fn notification_count(store: &NotificationStore) -> usize {
        store.get_notifications().unwrap().len()
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_then_stop_leaves_no_timer() {
        let fixture = create_fixture();

        fixture.scheduler.start().unwrap();
        fixture.scheduler.start().unwrap();
        assert!(fixture.scheduler.is_running());
        assert!(fixture.scheduler.stop());

        assert_eq!(fixture.scheduler.state(), SchedulerState::Idle);
        assert_eq!(fixture.scheduler.tick_count(), 2);

        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(fixture.scheduler.tick_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_repeats_check() {
        let fixture = create_fixture();
        fixture.scheduler.start().unwrap();
        assert_eq!(fixture.scheduler.tick_count(), 1);

        tokio::time::sleep(PERIOD * 2 + Duration::from_secs(1)).await;
        assert_eq!(fixture.scheduler.tick_count(), 3);

        fixture.scheduler.stop();
    }

    #[tokio::test]
    async fn test_stop_when_idle_is_noop() {
        let fixture = create_fixture();
        assert!(!fixture.scheduler.stop());
        assert!(!fixture.scheduler.stop());
        assert_eq!(fixture.scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let fixture = create_fixture();
        assert!(matches!(fixture.scheduler.start(), Err(ReminderError::NoRuntime(_))));
        assert!(!fixture.scheduler.is_running());
    }

    #[tokio::test]
    async fn test_disable_while_running_goes_idle() {
        let fixture = create_fixture();
        fixture.scheduler.start().unwrap();
        assert!(fixture.scheduler.is_running());

        fixture.scheduler.update_config(ReminderConfigUpdate::enabled(false)).unwrap();
        assert!(!fixture.scheduler.is_running());

        file_request(&fixture.requests, "s1", 10);
        let before = notification_count(&fixture.store);
        assert_eq!(fixture.scheduler.run_check().unwrap(), 0);
        assert_eq!(notification_count(&fixture.store), before);
    }

    #[tokio::test]
    async fn test_enable_restarts() {
        let fixture = create_fixture();
        fixture.scheduler.update_config(ReminderConfigUpdate::enabled(false)).unwrap();
        fixture.scheduler.start().unwrap();
        assert!(!fixture.scheduler.is_running());

        fixture.scheduler.update_config(ReminderConfigUpdate::enabled(true)).unwrap();
        assert!(fixture.scheduler.is_running());
        fixture.scheduler.stop();
    }

    #[test]
    fn test_only_overdue_pending_requests_reminded() {
        let fixture = create_fixture();
        let overdue = file_request(&fixture.requests, "old", 5);
        file_request(&fixture.requests, "fresh", 1);
        let mut decided = file_request(&fixture.requests, "done", 9);
        decided.approve(None).unwrap();
        fixture.requests.save(decided).unwrap();

        assert_eq!(fixture.scheduler.run_check().unwrap(), 2);

        let notifications = fixture.store.get_notifications().unwrap();
        assert_eq!(notifications.len(), 2);
        assert!(notifications.iter().all(|n| n.notification_type == NotificationType::Reminder));
        assert!(notifications.iter().all(|n| n.id.contains(&overdue.id)));
        assert!(notifications.iter().all(|n| n.action_url.as_deref() == Some(REQUESTS_ACTION_URL)));
        assert!(notifications.iter().any(|n| n.title == "Pending Approvals Reminder"));
        assert!(notifications.iter().any(|n| n.title == "Clearance Status Reminder"));
    }

    #[test]
    fn test_pair_reminded_once_per_interval() {
        let fixture = create_fixture();
        file_request(&fixture.requests, "s1", 5);
        let now = Utc::now();

        assert_eq!(fixture.scheduler.run_check_at(now).unwrap(), 2);
        assert_eq!(fixture.scheduler.run_check_at(now + ChronoDuration::hours(1)).unwrap(), 0);
        assert_eq!(fixture.scheduler.run_check_at(now + ChronoDuration::days(2)).unwrap(), 0);
        assert_eq!(fixture.scheduler.run_check_at(now + ChronoDuration::days(4)).unwrap(), 2);
        assert_eq!(notification_count(&fixture.store), 4);
    }

    #[test]
    fn test_student_reminders_disabled() {
        let fixture = create_fixture();
        file_request(&fixture.requests, "s1", 5);
        {
            let mut config = fixture.scheduler.checker.config.write().unwrap();
            config.student_reminders = false;
        }

        assert_eq!(fixture.scheduler.run_check().unwrap(), 1);
        let notifications = fixture.store.get_notifications().unwrap();
        assert_eq!(notifications[0].title, "Pending Approvals Reminder");
    }

    #[test]
    fn test_resolved_request_forgotten() {
        let fixture = create_fixture();
        let request = file_request(&fixture.requests, "s1", 5);
        fixture.scheduler.run_check().unwrap();

        let mut resolved = request.clone();
        resolved.reject("Missing form".to_string()).unwrap();
        fixture.requests.save(resolved).unwrap();
        assert_eq!(fixture.scheduler.run_check().unwrap(), 0);
        assert!(fixture.scheduler.checker.last_reminded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_config_persisted_and_reloaded() {
        let fixture = create_fixture();
        let update = ReminderConfigUpdate {
            enabled: Some(false),
            reminder_interval_days: Some(7),
            ..Default::default()
        };
        fixture.scheduler.update_config(update).unwrap();

        let reloaded = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            PERIOD,
        );
        let config = reloaded.get_config().unwrap();
        assert!(!config.enabled);
        assert_eq!(config.reminder_interval_days, 7);
        assert!(config.student_reminders);
    }

    #[test]
    fn test_corrupt_config_falls_back_to_defaults() {
        let fixture = create_fixture();
        fixture.storage.set(REMINDER_CONFIG_KEY, "[[[").unwrap();

        let scheduler = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            PERIOD,
        );
        assert_eq!(scheduler.get_config().unwrap(), ReminderConfig::default());
        assert!(fixture.storage.get(REMINDER_CONFIG_KEY).unwrap().is_none());
    }

    #[test]
    fn test_log_survives_new_scheduler() {
        let fixture = create_fixture();
        file_request(&fixture.requests, "s1", 5);
        let now = Utc::now();
        assert_eq!(fixture.scheduler.run_check_at(now).unwrap(), 2);
        assert!(fixture.storage.get(REMINDER_LOG_KEY).unwrap().is_some());

        let next_process = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            PERIOD,
        );
        assert_eq!(next_process.run_check_at(now + ChronoDuration::minutes(1)).unwrap(), 0);
        assert_eq!(next_process.run_check_at(now + ChronoDuration::days(4)).unwrap(), 2);
        assert_eq!(notification_count(&fixture.store), 4);
    }

    #[test]
    fn test_resolved_request_dropped_from_stored_log() {
        let fixture = create_fixture();
        let request = file_request(&fixture.requests, "s1", 5);
        fixture.scheduler.run_check().unwrap();

        let mut resolved = request.clone();
        resolved.approve(None).unwrap();
        fixture.requests.save(resolved).unwrap();
        fixture.scheduler.run_check().unwrap();

        let stored = fixture.storage.get(REMINDER_LOG_KEY).unwrap().unwrap();
        let entries: Vec<ReminderLogEntry> = serde_json::from_str(&stored).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupt_log_discarded() {
        let fixture = create_fixture();
        file_request(&fixture.requests, "s1", 5);
        fixture.storage.set(REMINDER_LOG_KEY, "{not json").unwrap();

        let scheduler = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            PERIOD,
        );
        assert!(fixture.storage.get(REMINDER_LOG_KEY).unwrap().is_none());
        assert_eq!(scheduler.run_check().unwrap(), 2);
    }

    #[test]
    fn test_huge_interval_does_not_panic() {
        let fixture = create_fixture();
        file_request(&fixture.requests, "s1", 5);
        fixture.scheduler.checker.config.write().unwrap().reminder_interval_days = 200_000_000;

        assert_eq!(fixture.scheduler.run_check().unwrap(), 0);
        assert_eq!(fixture.scheduler.run_check_at(DateTime::<Utc>::MIN_UTC).unwrap(), 0);
        assert_eq!(notification_count(&fixture.store), 0);
    }

    #[test]
    fn test_huge_interval_rejected_on_update_and_load() {
        let fixture = create_fixture();
        let update = ReminderConfigUpdate {
            reminder_interval_days: Some(200_000_000),
            ..Default::default()
        };
        assert!(matches!(
            fixture.scheduler.update_config(update),
            Err(ReminderError::InvalidConfig(_))
        ));

        fixture
            .storage
            .set(REMINDER_CONFIG_KEY, r#"{"enabled":true,"reminderIntervalDays":200000000}"#)
            .unwrap();
        let scheduler = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            PERIOD,
        );
        assert_eq!(scheduler.get_config().unwrap(), ReminderConfig::default());
        assert!(scheduler.run_check().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_check_period_clamped() {
        let fixture = create_fixture();
        let scheduler = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            Duration::MAX,
        );
        assert_eq!(scheduler.check_period(), MAX_CHECK_PERIOD);

        scheduler.start().unwrap();
        assert!(scheduler.is_running());
        assert_eq!(scheduler.tick_count(), 1);
        scheduler.stop();

        let zero = ReminderScheduler::new(
            fixture.store.clone(),
            fixture.requests.clone(),
            fixture.storage.clone(),
            Duration::ZERO,
        );
        assert_eq!(zero.check_period(), Duration::from_millis(1));
    }

    #[test]
    fn test_invalid_update_rejected() {
        let fixture = create_fixture();
        let update = ReminderConfigUpdate {
            reminder_interval_days: Some(0),
            ..Default::default()
        };

        assert!(matches!(
            fixture.scheduler.update_config(update),
            Err(ReminderError::InvalidConfig(_))
        ));
        assert_eq!(fixture.scheduler.get_config().unwrap().reminder_interval_days, 3);
    }
}
