/*
Clearance Request Repository Port

This port defines the contract for clearance request persistence. The reminder scheduler
reads pending requests through it and the clearance service reads and writes through it.
*/

use crate::application::storage::key_value_store::StorageError;
use crate::core::platform::container::clearance_request::{ClearanceRequest, ClearanceStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

pub trait ClearanceRequestRepositoryPort: Send + Sync {
    /// Find a request by id
    fn find_by_id(&self, id: &str) -> Result<Option<ClearanceRequest>, RepositoryError>;

    /// Find the request a student filed with a department, if any
    fn find_by_student_and_department(
        &self,
        student_id: &str,
        department_id: &str,
    ) -> Result<Option<ClearanceRequest>, RepositoryError>;

    /// Insert or replace a request
    fn save(&self, request: ClearanceRequest) -> Result<ClearanceRequest, RepositoryError>;

    /// All requests, oldest first
    fn list(&self) -> Result<Vec<ClearanceRequest>, RepositoryError>;

    /// Requests in the given status, oldest first
    fn list_by_status(&self, status: ClearanceStatus) -> Result<Vec<ClearanceRequest>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.status == status)
            .collect())
    }

    /// Requests filed by one student
    fn list_by_student(&self, student_id: &str) -> Result<Vec<ClearanceRequest>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .collect())
    }

    /// Requests addressed to one department
    fn list_by_department(&self, department_id: &str) -> Result<Vec<ClearanceRequest>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.department_id == department_id)
            .collect())
    }
}
