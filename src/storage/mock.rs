//! Scriptable store gateway
//!
//! Serves the fixture bills, echoes created and updated records without
//! persisting them, counts calls and can be told to fail the next call of a
//! given operation.
//!
//! ```rust,ignore
//! let store = MockStore::new();
//! store.fail_next(BillsOperation::List, StoreError::status(404));
//! app.navigate(Route::Bills).await?;
//! assert!(app.root_html().contains("Erreur 404"));
//! ```

use crate::core::bill::{Bill, BillPayload};
use crate::core::error::StoreError;
use crate::core::store::{BillsResource, StoreGateway};
use crate::storage::fixtures;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Id given to every record echoed by `create`
pub const MOCK_CREATED_ID: &str = "1234";

/// Operations of the bills resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillsOperation {
    List,
    Create,
    Update,
}

#[derive(Default)]
struct MockState {
    bills: Vec<Bill>,
    bills_calls: usize,
    calls: HashMap<BillsOperation, usize>,
    failures: HashMap<BillsOperation, VecDeque<StoreError>>,
    created: Vec<BillPayload>,
    updated: Vec<(String, BillPayload)>,
}

/// Mock store gateway
#[derive(Clone)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl MockStore {
    /// Mock serving the fixture bills
    pub fn new() -> Self {
        Self::with_bills(fixtures::bills())
    }

    /// Mock serving the given bills
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                bills,
                ..MockState::default()
            })),
        }
    }

    /// Make the next call of `operation` fail with `error`
    ///
    /// Failures queue up: calling this twice fails the next two calls.
    pub fn fail_next(&self, operation: BillsOperation, error: StoreError) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.entry(operation).or_default().push_back(error);
        }
    }

    /// Number of calls made to `operation`
    pub fn calls(&self, operation: BillsOperation) -> usize {
        self.state
            .lock()
            .map(|s| s.calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of times the bills resource was requested
    pub fn bills_calls(&self) -> usize {
        self.state.lock().map(|s| s.bills_calls).unwrap_or(0)
    }

    /// Payloads received by `create`, oldest first
    pub fn created_payloads(&self) -> Vec<BillPayload> {
        self.state
            .lock()
            .map(|s| s.created.clone())
            .unwrap_or_default()
    }

    /// `(id, payload)` pairs received by `update`, oldest first
    pub fn updated_payloads(&self) -> Vec<(String, BillPayload)> {
        self.state
            .lock()
            .map(|s| s.updated.clone())
            .unwrap_or_default()
    }

    /// Count the call and pop a scripted failure, if any
    fn enter(&self, operation: BillsOperation) -> Result<(), StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StoreError::backend(format!("Failed to acquire lock: {}", e)))?;
        *state.calls.entry(operation).or_default() += 1;

        match state
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(error) => {
                tracing::debug!(?operation, error = %error, "mock store failing call");
                Err(error)
            }
            None => Ok(()),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> Result<T, StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| StoreError::backend(format!("Failed to acquire lock: {}", e)))?;
        Ok(f(&mut state))
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreGateway for MockStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        if let Ok(mut state) = self.state.lock() {
            state.bills_calls += 1;
        }
        Arc::new(self.clone())
    }
}

#[async_trait]
impl BillsResource for MockStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        self.enter(BillsOperation::List)?;
        self.with_state(|s| s.bills.clone())
    }

    async fn create(&self, payload: BillPayload) -> Result<Bill, StoreError> {
        self.enter(BillsOperation::Create)?;
        self.with_state(|s| s.created.push(payload.clone()))?;
        Ok(Bill::from_payload(MOCK_CREATED_ID, payload))
    }

    async fn update(&self, id: &str, payload: BillPayload) -> Result<Bill, StoreError> {
        self.enter(BillsOperation::Update)?;
        self.with_state(|s| s.updated.push((id.to_string(), payload.clone())))?;
        Ok(Bill::from_payload(id, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bill::BillStatus;

    fn payload() -> BillPayload {
        BillPayload {
            email: "ryan@mail".to_string(),
            bill_type: "Restaurants et bars".to_string(),
            name: "holidays".to_string(),
            amount: 200.0,
            date: "2002-02-02".to_string(),
            vat: Some("40".to_string()),
            pct: 20,
            commentary: Some("holidays".to_string()),
            file_url: "justificatif.jpg".to_string(),
            file_name: "justificatif.jpg".to_string(),
            status: BillStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_list_serves_fixtures() {
        let store = MockStore::new();
        let bills = store.bills().list().await.unwrap();
        assert_eq!(bills.len(), 4);
        assert_eq!(store.calls(BillsOperation::List), 1);
        assert_eq!(store.bills_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_echoes_and_records() {
        let store = MockStore::new();
        let created = store.bills().create(payload()).await.unwrap();

        assert_eq!(created.id, MOCK_CREATED_ID);
        assert_eq!(created.file_url.as_deref(), Some("justificatif.jpg"));
        assert_eq!(store.created_payloads(), vec![payload()]);
        assert_eq!(store.calls(BillsOperation::Create), 1);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let store = MockStore::new();
        store.fail_next(BillsOperation::List, StoreError::status(404));

        let err = store.bills().list().await.unwrap_err();
        assert_eq!(err.message(), "Erreur 404");
        assert!(store.bills().list().await.is_ok());
        assert_eq!(store.calls(BillsOperation::List), 2);
    }

    #[tokio::test]
    async fn test_failures_are_per_operation() {
        let store = MockStore::new();
        store.fail_next(BillsOperation::Create, StoreError::status(500));

        assert!(store.bills().list().await.is_ok());
        let err = store.bills().create(payload()).await.unwrap_err();
        assert_eq!(err.message(), "Erreur 500");
        assert!(store.created_payloads().is_empty());
    }

    #[tokio::test]
    async fn test_update_records_selector() {
        let store = MockStore::new();
        let updated = store.bills().update("abc", payload()).await.unwrap();
        assert_eq!(updated.id, "abc");
        assert_eq!(store.updated_payloads()[0].0, "abc");
    }
}
