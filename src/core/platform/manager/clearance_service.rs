/*
Clearance Service

Business logic for the clearance workflow: students submit requests to departments,
departments approve or reject them. Every transition is recorded through the clearance
request repository and announced through the Notification Store.

Batch approval and rejection apply the single-request transition to each id in turn. One
failing id does not stop the rest; the outcome lists what succeeded and what failed.

Decided requests are final. The service refuses to move a request out of a terminal state,
and a student may hold at most one request per department.
*/

use crate::application::storage::clearance_store::{ClearanceRequestRepositoryPort, RepositoryError};
use crate::core::platform::container::clearance_request::{
    ClearanceRequest, ClearanceRequestError, ClearanceStatus, DepartmentRef, StudentRef,
};
use crate::core::platform::container::notification::{
    Notification, NotificationType, REQUESTS_ACTION_URL,
};
use crate::core::platform::manager::notification_store::NotificationStore;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ClearanceError {
    #[error("Clearance request not found: {0}")]
    NotFound(String),

    #[error("{student_id} already has a request with {department_id}")]
    AlreadyRequested { student_id: String, department_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Transition(#[from] ClearanceRequestError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ClearanceResult<T> = Result<T, ClearanceError>;

/// Per-student progress across departments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceSummary {
    pub student_id: String,
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub fully_cleared: bool,
}

/// Request counts across every student and department
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Result of a batch approval or rejection
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<ClearanceRequest>,
    pub failed: Vec<(String, ClearanceError)>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct ClearanceService {
    requests: Arc<dyn ClearanceRequestRepositoryPort>,
    notifications: Arc<NotificationStore>,
}

impl ClearanceService {
    pub fn new(
        requests: Arc<dyn ClearanceRequestRepositoryPort>,
        notifications: Arc<NotificationStore>,
    ) -> Self {
        Self { requests, notifications }
    }

    pub fn submit_request(
        &self,
        student: StudentRef,
        department: DepartmentRef,
    ) -> ClearanceResult<ClearanceRequest> {
        for (field, value) in [
            ("student id", &student.id),
            ("student name", &student.name),
            ("department id", &department.id),
            ("department name", &department.name),
        ] {
            if value.trim().is_empty() {
                return Err(ClearanceError::InvalidInput(format!("{} cannot be empty", field)));
            }
        }

        if self
            .requests
            .find_by_student_and_department(&student.id, &department.id)?
            .is_some()
        {
            return Err(ClearanceError::AlreadyRequested {
                student_id: student.id,
                department_id: department.id,
            });
        }

        let request = self.requests.save(ClearanceRequest::new(&student, &department))?;
        info!(request_id = %request.id, student = %request.student_id, department = %request.department_id, "Clearance request submitted");

        self.announce(
            NotificationType::RequestSubmitted,
            format!(
                "Your clearance request to {} has been successfully submitted.",
                request.department_name
            ),
        );
        Ok(request)
    }

    pub fn approve(&self, id: &str, comment: Option<String>) -> ClearanceResult<ClearanceRequest> {
        let mut request = self.find(id)?;
        request.approve(comment)?;
        let request = self.requests.save(request)?;
        info!(request_id = %request.id, "Clearance request approved");

        self.announce(
            NotificationType::RequestApproved,
            format!(
                "Your clearance request has been approved by {}.",
                request.department_name
            ),
        );
        Ok(request)
    }

    pub fn reject(&self, id: &str, comment: String) -> ClearanceResult<ClearanceRequest> {
        let mut request = self.find(id)?;
        request.reject(comment)?;
        let request = self.requests.save(request)?;
        info!(request_id = %request.id, "Clearance request rejected");

        self.announce(
            NotificationType::RequestRejected,
            format!(
                "Your clearance request has been rejected by {}: {}",
                request.department_name,
                request.comment.as_deref().unwrap_or_default()
            ),
        );
        Ok(request)
    }

    pub fn get(&self, id: &str) -> ClearanceResult<ClearanceRequest> {
        self.find(id)
    }

    pub fn list(&self, status: Option<ClearanceStatus>) -> ClearanceResult<Vec<ClearanceRequest>> {
        Ok(match status {
            Some(status) => self.requests.list_by_status(status)?,
            None => self.requests.list()?,
        })
    }

    pub fn requests_for_student(&self, student_id: &str) -> ClearanceResult<Vec<ClearanceRequest>> {
        Ok(self.requests.list_by_student(student_id)?)
    }

    pub fn requests_for_department(&self, department_id: &str) -> ClearanceResult<Vec<ClearanceRequest>> {
        Ok(self.requests.list_by_department(department_id)?)
    }

    /// Pending requests awaiting a department's decision, oldest first
    pub fn department_queue(&self, department_id: &str) -> ClearanceResult<Vec<ClearanceRequest>> {
        Ok(self
            .requests_for_department(department_id)?
            .into_iter()
            .filter(ClearanceRequest::is_pending)
            .collect())
    }

    pub fn system_stats(&self) -> ClearanceResult<ClearanceStats> {
        let requests = self.requests.list()?;
        let count = |status: ClearanceStatus| requests.iter().filter(|r| r.status == status).count();

        Ok(ClearanceStats {
            total: requests.len(),
            pending: count(ClearanceStatus::Pending),
            approved: count(ClearanceStatus::Approved),
            rejected: count(ClearanceStatus::Rejected),
        })
    }

    /// Approves each request in `ids`, announcing every approval
    pub fn approve_all(&self, ids: &[String], comment: Option<String>) -> BatchOutcome {
        let outcome = self.apply_all(ids, |id| self.approve(id, comment.clone()));
        info!(approved = outcome.succeeded.len(), failed = outcome.failed.len(), "Batch approval finished");
        outcome
    }

    /// Rejects each request in `ids` with the same reason. The reason is checked once up
    /// front, so an empty one rejects nothing.
    pub fn reject_all(&self, ids: &[String], comment: String) -> ClearanceResult<BatchOutcome> {
        if comment.trim().is_empty() {
            return Err(ClearanceRequestError::MissingComment.into());
        }

        let outcome = self.apply_all(ids, |id| self.reject(id, comment.clone()));
        info!(rejected = outcome.succeeded.len(), failed = outcome.failed.len(), "Batch rejection finished");
        Ok(outcome)
    }

    fn apply_all<F>(&self, ids: &[String], transition: F) -> BatchOutcome
    where
        F: Fn(&str) -> ClearanceResult<ClearanceRequest>,
    {
        let mut outcome = BatchOutcome::default();
        for id in ids {
            match transition(id) {
                Ok(request) => outcome.succeeded.push(request),
                Err(e) => {
                    warn!(request_id = %id, error = %e, "Batch transition failed");
                    outcome.failed.push((id.clone(), e));
                }
            }
        }
        outcome
    }

    /// A student is fully cleared once they have requests and every one is approved
    pub fn clearance_summary(&self, student_id: &str) -> ClearanceResult<ClearanceSummary> {
        let requests = self.requests_for_student(student_id)?;
        let count = |status: ClearanceStatus| requests.iter().filter(|r| r.status == status).count();

        let approved = count(ClearanceStatus::Approved);
        Ok(ClearanceSummary {
            student_id: student_id.to_string(),
            total: requests.len(),
            pending: count(ClearanceStatus::Pending),
            approved,
            rejected: count(ClearanceStatus::Rejected),
            fully_cleared: !requests.is_empty() && approved == requests.len(),
        })
    }

    fn find(&self, id: &str) -> ClearanceResult<ClearanceRequest> {
        self.requests
            .find_by_id(id)?
            .ok_or_else(|| ClearanceError::NotFound(id.to_string()))
    }

    // The request is already saved; a notification failure is logged, never returned.
    fn announce(&self, notification_type: NotificationType, message: String) {
        let mut notification = Notification::of_type(notification_type).with_action_url(REQUESTS_ACTION_URL);
        notification.message = message;

        if let Err(e) = self.notifications.add_notification(notification) {
            warn!(kind = %notification_type, error = %e, "Failed to record clearance notification");
        }
    }
}
