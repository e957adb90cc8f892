/*
CLI Commands for Notifications

Command-line access to the Notification Store, going through the same Notification Center
model the run mode mounts.
*/

use crate::core::platform::container::notification::{Notification, NotificationType};
use crate::core::platform::manager::notification_center::NotificationCenter;
use crate::core::platform::manager::notification_store::NotificationStore;
use clap::{Args, Subcommand};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
pub enum NotificationCommands {
    /// List notifications, newest first
    List(ListNotificationsArgs),
    /// Print the number of unread notifications
    UnreadCount,
    /// Mark one notification as read
    MarkRead(MarkReadArgs),
    /// Mark every notification as read
    MarkAllRead,
    /// Add a notification
    Push(PushArgs),
    /// Remove every stored notification
    Reset,
}

#[derive(Debug, Args)]
pub struct ListNotificationsArgs {
    /// Only show unread notifications
    #[arg(long)]
    pub unread: bool,
}

#[derive(Debug, Args)]
pub struct MarkReadArgs {
    /// Notification ID
    pub id: String,
}

#[derive(Debug, Args)]
pub struct PushArgs {
    /// request_approved, request_rejected, request_submitted, reminder or system
    #[arg(short, long)]
    pub kind: NotificationType,

    /// Title; defaults to the title for the kind
    #[arg(short, long)]
    pub title: Option<String>,

    /// Message; defaults to the message for the kind
    #[arg(short, long)]
    pub message: Option<String>,

    /// Page to open when the notification is clicked
    #[arg(long)]
    pub action_url: Option<String>,
}

/// Notification command handler
pub struct NotificationCommandHandler {
    store: Arc<NotificationStore>,
}

impl NotificationCommandHandler {
    pub fn new(store: Arc<NotificationStore>) -> Self {
        Self { store }
    }

    pub fn handle_command(&self, command: NotificationCommands) -> Result<(), Box<dyn std::error::Error>> {
        match command {
            NotificationCommands::List(args) => self.list(args),
            NotificationCommands::UnreadCount => {
                println!("{}", self.store.get_unread_count()?);
                Ok(())
            }
            NotificationCommands::MarkRead(args) => self.mark_read(args),
            NotificationCommands::MarkAllRead => {
                let marked = self.store.mark_all_as_read()?;
                println!("✅ Marked {} notification(s) as read", marked);
                Ok(())
            }
            NotificationCommands::Push(args) => self.push(args),
            NotificationCommands::Reset => {
                self.store.reset()?;
                println!("✅ Notifications cleared");
                Ok(())
            }
        }
    }

    fn list(&self, args: ListNotificationsArgs) -> Result<(), Box<dyn std::error::Error>> {
        let center = NotificationCenter::mount(self.store.clone())?;
        if !args.unread {
            print!("{}", center.render());
            return Ok(());
        }

        let unread: Vec<_> = center.entries().into_iter().filter(|e| e.unread).collect();
        if unread.is_empty() {
            println!("No unread notifications");
        }
        for entry in unread {
            println!("* {}  [{}]", entry.title, entry.time);
            println!("    {}", entry.message);
            println!("    id: {}", entry.id);
        }
        Ok(())
    }

    fn mark_read(&self, args: MarkReadArgs) -> Result<(), Box<dyn std::error::Error>> {
        if !self.store.mark_as_read(&args.id)? {
            println!("No notification with id {}", args.id);
            return Ok(());
        }

        println!("✅ Marked {} as read", args.id);
        let action_url = self
            .store
            .get_notifications()?
            .into_iter()
            .find(|n| n.id == args.id)
            .and_then(|n| n.action_url);
        if let Some(url) = action_url {
            println!("   Open: {}", url);
        }
        Ok(())
    }

    fn push(&self, args: PushArgs) -> Result<(), Box<dyn std::error::Error>> {
        let mut notification = match (args.title, args.message) {
            (None, None) => Notification::of_type(args.kind),
            (title, message) => Notification::new(
                args.kind,
                title.unwrap_or_else(|| args.kind.default_title().to_string()),
                message.unwrap_or_else(|| args.kind.default_message().to_string()),
            )?,
        };
        notification.action_url = args.action_url;

        let id = notification.id.clone();
        self.store.add_notification(notification)?;
        println!("✅ Notification added");
        println!("   ID: {}", id);
        Ok(())
    }
}
