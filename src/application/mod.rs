pub mod ports;
pub mod storage;
