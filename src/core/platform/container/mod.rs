pub mod clearance_request;
pub mod notification;
pub mod reminder_config;
