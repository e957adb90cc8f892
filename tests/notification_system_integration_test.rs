/*
Integration Test for the Notification System

Covers the flow from a clearance action to the notification center: the request workflow
adds notifications to the store, the store persists them through the file backed key value
store and raises toasts, and a mounted center sees every update.
*/

use std::sync::{Arc, Mutex};

use clearpass::application::storage::key_value_store::KeyValueStorePort;
use clearpass::config::Settings;
use clearpass::core::platform::container::clearance_request::{DepartmentRef, StudentRef};
use clearpass::core::platform::container::notification::{
    Notification, NotificationType, REQUESTS_ACTION_URL,
};
use clearpass::core::platform::manager::notification_center::NotificationCenter;
use clearpass::core::platform::manager::notification_store::{NotificationStore, NOTIFICATIONS_KEY};
use clearpass::infrastructure::adapters::notifications::{SystemAdapterConfig, SystemToastAdapter};
use clearpass::infrastructure::adapters::storage::{FileKeyValueStore, MemoryKeyValueStore};
use clearpass::setup::AppContext;
use tempfile::TempDir;

fn create_test_settings(temp_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.storage.data_dir = temp_dir.path().join("data");
    settings
}

fn student() -> StudentRef {
    StudentRef { id: "stu-1".to_string(), name: "Grace Hopper".to_string() }
}

fn department(id: &str, name: &str) -> DepartmentRef {
    DepartmentRef { id: id.to_string(), name: name.to_string() }
}

#[test]
fn test_clearance_workflow_feeds_notification_center() {
    let temp_dir = TempDir::new().unwrap();
    let context = AppContext::build(&create_test_settings(&temp_dir)).unwrap();
    let center = NotificationCenter::mount(context.notifications.clone()).unwrap();
    assert!(center.render().contains("No notifications yet"));

    let library = context.clearance.submit_request(student(), department("lib", "Library")).unwrap();
    let hostel = context.clearance.submit_request(student(), department("hostel", "Hostel")).unwrap();
    context.clearance.approve(&library.id, None).unwrap();
    context.clearance.reject(&hostel.id, "Room key not returned".to_string()).unwrap();

    let kinds: Vec<NotificationType> = context
        .notifications
        .get_notifications()
        .unwrap()
        .iter()
        .map(|n| n.notification_type)
        .collect();
    assert_eq!(
        kinds,
        vec![
            NotificationType::RequestRejected,
            NotificationType::RequestApproved,
            NotificationType::RequestSubmitted,
            NotificationType::RequestSubmitted,
        ]
    );

    assert_eq!(center.badge().as_deref(), Some("4"));
    let newest = center.entries().remove(0);
    assert!(newest.message.contains("Room key not returned"));
    assert_eq!(center.click(&newest.id).unwrap().as_deref(), Some(REQUESTS_ACTION_URL));
    assert_eq!(center.badge().as_deref(), Some("3"));

    assert_eq!(context.toasts.shown_count(), 4);
    assert_eq!(context.toasts.recent().last().unwrap().title, "Clearance Rejected");

    let summary = context.clearance.clearance_summary("stu-1").unwrap();
    assert_eq!((summary.approved, summary.rejected), (1, 1));
    assert!(!summary.fully_cleared);
}

#[test]
fn test_scenario_order_and_read_state() {
    let store = NotificationStore::new(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(SystemToastAdapter::new(SystemAdapterConfig::default())),
    );

    for id in ["a", "b", "c"] {
        let notification = Notification::with_id(
            id.to_string(),
            NotificationType::System,
            format!("Notice {}", id),
            "Maintenance window".to_string(),
        )
        .unwrap();
        store.add_notification(notification).unwrap();
    }

    let ids: Vec<String> = store.get_notifications().unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    assert_eq!(store.get_unread_count().unwrap(), 3);

    assert!(store.mark_as_read("b").unwrap());
    assert!(store.mark_as_read("b").unwrap());
    assert_eq!(store.get_unread_count().unwrap(), 2);

    store.mark_all_as_read().unwrap();
    assert_eq!(store.get_unread_count().unwrap(), 0);
}

#[test]
fn test_persisted_list_reloads_equal() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileKeyValueStore::open(temp_dir.path()).unwrap());
    let toast = Arc::new(SystemToastAdapter::new(SystemAdapterConfig::default()));

    let store = NotificationStore::new(storage.clone(), toast.clone());
    store
        .add_notification(Notification::of_type(NotificationType::Reminder).with_action_url(REQUESTS_ACTION_URL))
        .unwrap();
    store.add_notification(Notification::of_type(NotificationType::System)).unwrap();
    store.mark_all_as_read().unwrap();
    let before = store.get_notifications().unwrap();

    let reloaded = NotificationStore::new(storage.clone(), toast);
    assert_eq!(reloaded.get_notifications().unwrap(), before);

    let raw = storage.get(NOTIFICATIONS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"type\":\"system\""));
    assert!(raw.contains("\"actionUrl\":\"/dashboard/requests\""));
}

#[test]
fn test_capacity_keeps_most_recent() {
    let store = NotificationStore::new(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(SystemToastAdapter::new(SystemAdapterConfig::default())),
    );
    for i in 0..60 {
        let notification = Notification::with_id(
            format!("n{}", i),
            NotificationType::Reminder,
            "Clearance Reminder".to_string(),
            String::new(),
        )
        .unwrap();
        store.add_notification(notification).unwrap();
    }

    let notifications = store.get_notifications().unwrap();
    assert_eq!(notifications.len(), 50);
    assert_eq!(notifications[0].id, "n59");
    assert_eq!(notifications[49].id, "n10");
}

#[test]
fn test_subscribers_see_every_mutation() {
    let store = NotificationStore::new(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(SystemToastAdapter::new(SystemAdapterConfig::default())),
    );
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    let subscription = store.subscribe(Arc::new(move |snapshot: &[Notification]| {
        let unread = snapshot.iter().filter(|n| n.is_unread()).count();
        sink.lock().unwrap().push(unread);
    }));

    store.add_notification(Notification::of_type(NotificationType::System)).unwrap();
    store.add_notification(Notification::of_type(NotificationType::System)).unwrap();
    store.mark_all_as_read().unwrap();
    subscription.unsubscribe();
    store.add_notification(Notification::of_type(NotificationType::System)).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0]);
}
