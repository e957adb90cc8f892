/*
Platform Managers

Services that own the notification state and the workflows feeding it.
*/

pub mod clearance_service;
pub mod notification_center;
pub mod notification_store;
pub mod reminder_scheduler;

pub use clearance_service::{BatchOutcome, ClearanceError, ClearanceService, ClearanceStats, ClearanceSummary};
pub use notification_center::NotificationCenter;
pub use notification_store::{NotificationError, NotificationListener, NotificationStore, Subscription};
pub use reminder_scheduler::{ReminderError, ReminderScheduler, SchedulerState};
