/*
Clearance Request Container

A Clearance Request is a student's ask for one department's sign-off. A request starts out
pending and is either approved or rejected by the department; both outcomes are terminal.
A rejection must carry a comment explaining what the student has to fix.
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClearanceRequestError {
    #[error("Request {id} is already {status} and cannot change")]
    AlreadyDecided { id: String, status: ClearanceStatus },
    #[error("A rejection requires a comment")]
    MissingComment,
    #[error("Unknown clearance status: {0}")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearanceStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClearanceStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ClearanceStatus::Pending)
    }
}

impl std::fmt::Display for ClearanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClearanceStatus::Pending => "pending",
            ClearanceStatus::Approved => "approved",
            ClearanceStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ClearanceStatus {
    type Err = ClearanceRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ClearanceStatus::Pending),
            "approved" => Ok(ClearanceStatus::Approved),
            "rejected" => Ok(ClearanceStatus::Rejected),
            other => Err(ClearanceRequestError::UnknownStatus(other.to_string())),
        }
    }
}

/// The student side of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: String,
    pub name: String,
}

/// The department side of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceRequest {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub department_id: String,
    pub department_name: String,
    pub request_date: DateTime<Utc>,
    pub status: ClearanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_date: Option<DateTime<Utc>>,
}

impl ClearanceRequest {
    pub fn new(student: &StudentRef, department: &DepartmentRef) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            department_id: department.id.clone(),
            department_name: department.name.clone(),
            request_date: Utc::now(),
            status: ClearanceStatus::Pending,
            comment: None,
            response_date: None,
        }
    }

    pub fn with_request_date(mut self, request_date: DateTime<Utc>) -> Self {
        self.request_date = request_date;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == ClearanceStatus::Pending
    }

    /// True when the request is still pending and was filed at or before `cutoff`
    pub fn is_overdue(&self, cutoff: DateTime<Utc>) -> bool {
        self.is_pending() && self.request_date <= cutoff
    }

    pub fn approve(&mut self, comment: Option<String>) -> Result<(), ClearanceRequestError> {
        self.ensure_pending()?;
        self.status = ClearanceStatus::Approved;
        self.comment = comment.filter(|c| !c.trim().is_empty());
        self.response_date = Some(Utc::now());
        Ok(())
    }

    pub fn reject(&mut self, comment: String) -> Result<(), ClearanceRequestError> {
        self.ensure_pending()?;
        if comment.trim().is_empty() {
            return Err(ClearanceRequestError::MissingComment);
        }
        self.status = ClearanceStatus::Rejected;
        self.comment = Some(comment);
        self.response_date = Some(Utc::now());
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), ClearanceRequestError> {
        if self.status.is_terminal() {
            return Err(ClearanceRequestError::AlreadyDecided {
                id: self.id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_request() -> ClearanceRequest {
        ClearanceRequest::new(
            &StudentRef { id: "s-1".to_string(), name: "Ada".to_string() },
            &DepartmentRef { id: "lib".to_string(), name: "Library".to_string() },
        )
    }

    #[test]
    fn test_new_request_is_pending() {
        let request = create_test_request();
        assert!(request.is_pending());
        assert!(request.comment.is_none());
        assert!(request.response_date.is_none());
    }

    #[test]
    fn test_approve_is_terminal() {
        let mut request = create_test_request();
        request.approve(None).unwrap();
        assert_eq!(request.status, ClearanceStatus::Approved);
        assert!(request.response_date.is_some());

        let err = request.reject("late".to_string()).unwrap_err();
        assert!(matches!(err, ClearanceRequestError::AlreadyDecided { status: ClearanceStatus::Approved, .. }));
        assert!(request.approve(None).is_err());
    }

    #[test]
    fn test_reject_requires_comment() {
        let mut request = create_test_request();
        assert_eq!(request.reject("   ".to_string()).unwrap_err(), ClearanceRequestError::MissingComment);
        assert!(request.is_pending());

        request.reject("Return overdue books".to_string()).unwrap();
        assert_eq!(request.status, ClearanceStatus::Rejected);
        assert_eq!(request.comment.as_deref(), Some("Return overdue books"));
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let request = create_test_request().with_request_date(now - chrono::Duration::days(5));
        assert!(request.is_overdue(now - chrono::Duration::days(3)));
        assert!(!request.is_overdue(now - chrono::Duration::days(6)));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let request = create_test_request();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["status"], "pending");
        assert!(value.get("studentId").is_some());
    }
}
