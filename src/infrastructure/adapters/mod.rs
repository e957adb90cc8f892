pub mod logs;
pub mod notifications;
pub mod storage;
