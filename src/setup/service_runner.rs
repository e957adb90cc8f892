use crate::core::platform::container::notification::Notification;
use crate::core::platform::manager::notification_center::NotificationCenter;
use crate::setup::app_context::AppContext;
use tracing::{info, warn};

/// Runs the long-lived services until Ctrl-C: the reminder scheduler plus a mounted
/// notification center that logs every update.
pub async fn run_services(context: &AppContext) -> Result<(), Box<dyn std::error::Error>> {
    context.reminders.start()?;

    let mut center = NotificationCenter::mount(context.notifications.clone())?;
    let _updates = context
        .notifications
        .subscribe(std::sync::Arc::new(|notifications: &[Notification]| {
            let unread = notifications.iter().filter(|n| n.is_unread()).count();
            info!(total = notifications.len(), unread, "Notifications updated");
        }));
    info!(unread = center.unread_count(), "ClearPass running, press Ctrl-C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }

    center.unmount();
    context.shutdown();
    info!("ClearPass stopped");
    Ok(())
}
