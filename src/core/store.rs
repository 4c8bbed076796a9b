//! Store gateway traits
//!
//! The controllers only know the store through these traits. The gateway
//! hands out a bills resource whose operations are asynchronous and fail with
//! a [`StoreError`] carrying the message the view should show.

use crate::core::bill::{Bill, BillPayload};
use crate::core::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;

/// Entry point to the data-access capability
pub trait StoreGateway: Send + Sync {
    /// Resource giving access to the bills collection
    fn bills(&self) -> Arc<dyn BillsResource>;
}

/// Operations available on the bills collection
#[async_trait]
pub trait BillsResource: Send + Sync {
    /// List every bill visible to the caller
    async fn list(&self) -> Result<Vec<Bill>, StoreError>;

    /// Create a bill and return the stored record
    async fn create(&self, payload: BillPayload) -> Result<Bill, StoreError>;

    /// Replace the bill identified by `id` and return the stored record
    async fn update(&self, id: &str, payload: BillPayload) -> Result<Bill, StoreError>;
}
