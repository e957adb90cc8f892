pub mod app_context;
pub mod service_runner;

pub use app_context::AppContext;
