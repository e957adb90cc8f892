pub mod system_notification_adapter;

// Re-export main adapters for convenience
pub use system_notification_adapter::{SystemAdapterConfig, SystemToastAdapter};
