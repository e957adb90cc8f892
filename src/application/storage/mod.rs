pub mod clearance_store;
pub mod key_value_store;
