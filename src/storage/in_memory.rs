//! In-memory implementation of the store gateway for development and tests

use crate::core::bill::{Bill, BillPayload};
use crate::core::error::StoreError;
use crate::core::store::{BillsResource, StoreGateway};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory bill store
///
/// Bills are kept in insertion order. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryBillStore {
    bills: Arc<RwLock<IndexMap<String, Bill>>>,
}

impl InMemoryBillStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing bills
    pub fn with_bills(bills: impl IntoIterator<Item = Bill>) -> Self {
        let map = bills.into_iter().map(|b| (b.id.clone(), b)).collect();
        Self {
            bills: Arc::new(RwLock::new(map)),
        }
    }

    /// Number of stored bills
    pub fn len(&self) -> usize {
        self.bills.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::backend(format!("Failed to acquire lock: {}", e))
}

impl StoreGateway for InMemoryBillStore {
    fn bills(&self) -> Arc<dyn BillsResource> {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl BillsResource for InMemoryBillStore {
    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        let bills = self.bills.read().map_err(lock_error)?;
        Ok(bills.values().cloned().collect())
    }

    async fn create(&self, payload: BillPayload) -> Result<Bill, StoreError> {
        let mut bills = self.bills.write().map_err(lock_error)?;

        let bill = Bill::from_payload(Uuid::new_v4().to_string(), payload);
        bills.insert(bill.id.clone(), bill.clone());
        tracing::debug!(bill_id = %bill.id, "bill created");

        Ok(bill)
    }

    async fn update(&self, id: &str, payload: BillPayload) -> Result<Bill, StoreError> {
        let mut bills = self.bills.write().map_err(lock_error)?;

        let existing = bills.get_mut(id).ok_or_else(|| StoreError::NotFound {
            id: id.to_string(),
        })?;

        let comment_admin = existing.comment_admin.take();
        let mut updated = Bill::from_payload(id, payload);
        updated.comment_admin = comment_admin;
        *existing = updated.clone();
        tracing::debug!(bill_id = %id, "bill updated");

        Ok(updated)
    }
}
