/*
Key Value Clearance Repository

Clearance request repository backed by the Key Value Store port. The whole request list is
one JSON document under `clearpass_requests`, read and rewritten wholesale like the other
persisted documents. A corrupt document is reported as an error rather than discarded, since
requests are workflow state and not a cache.
*/

use crate::application::storage::clearance_store::{ClearanceRequestRepositoryPort, RepositoryError};
use crate::application::storage::key_value_store::KeyValueStorePort;
use crate::core::platform::container::clearance_request::ClearanceRequest;
use std::sync::{Arc, Mutex};

/// Storage key holding the JSON encoded request list
pub const REQUESTS_KEY: &str = "clearpass_requests";

pub struct KeyValueClearanceRepository {
    storage: Arc<dyn KeyValueStorePort>,
    // Serializes read-modify-write cycles on the single document.
    write_lock: Mutex<()>,
}

impl KeyValueClearanceRepository {
    pub fn new(storage: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<ClearanceRequest>, RepositoryError> {
        match self.storage.get(REQUESTS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn store(&self, requests: &[ClearanceRequest]) -> Result<(), RepositoryError> {
        let encoded = serde_json::to_string(requests)?;
        self.storage.set(REQUESTS_KEY, &encoded)?;
        Ok(())
    }
}

impl ClearanceRequestRepositoryPort for KeyValueClearanceRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<ClearanceRequest>, RepositoryError> {
        Ok(self.load()?.into_iter().find(|r| r.id == id))
    }

    fn find_by_student_and_department(
        &self,
        student_id: &str,
        department_id: &str,
    ) -> Result<Option<ClearanceRequest>, RepositoryError> {
        Ok(self
            .load()?
            .into_iter()
            .find(|r| r.student_id == student_id && r.department_id == department_id))
    }

    fn save(&self, request: ClearanceRequest) -> Result<ClearanceRequest, RepositoryError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("request list lock poisoned".to_string()))?;

        let mut requests = self.load()?;
        match requests.iter_mut().find(|r| r.id == request.id) {
            Some(existing) => *existing = request.clone(),
            None => requests.push(request.clone()),
        }
        self.store(&requests)?;
        Ok(request)
    }

    fn list(&self) -> Result<Vec<ClearanceRequest>, RepositoryError> {
        let mut requests = self.load()?;
        requests.sort_by(|a, b| a.request_date.cmp(&b.request_date));
        Ok(requests)
    }
}
