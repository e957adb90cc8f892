pub mod kv_clearance_repository;
