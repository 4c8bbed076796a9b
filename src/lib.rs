//! # Billed
//!
//! Employee side of an expense-report application: list your bills, preview
//! their proof of purchase and submit new ones.
//!
//! ## Features
//!
//! - **Bills page**: bills ordered by date (most recent first), French
//!   date and status labels, proof preview modal, store errors rendered verbatim
//! - **New bill form**: attachment extension check, declarative form
//!   validation, creation or update through the store
//! - **Store gateway**: async traits with in-memory and mock implementations
//! - **Event dispatch**: FIFO UI events with run-to-completion handlers and
//!   disposable registrations
//! - **Configuration-Based**: YAML configuration with sensible defaults
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use billed::prelude::*;
//!
//! let storage = Arc::new(InMemoryLocalStorage::new());
//! User::employee("a@a").save(storage.as_ref())?;
//!
//! let mut app = App::new(Some(Arc::new(MockStore::new())), storage, AppConfig::default())?;
//! app.navigate(Route::Bills).await?;
//! app.dispatch(UiEvent::NewBillClicked).await?;
//! assert_eq!(app.current_route(), Some(Route::NewBill));
//! ```

pub mod app;
pub mod config;
pub mod controllers;
pub mod core;
pub mod logging;
pub mod storage;
pub mod views;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        bill::{Bill, BillPayload, BillStatus, DisplayBill},
        error::{BilledError, BilledResult, StoreError, ValidationError},
        events::{Dispatcher, ElementRef, EventKind, HandlerToken, NewBillForm, SelectedFile, UiEvent},
        format::{format_date, format_status},
        routes::{Navigator, Route, RouteHistory},
        store::{BillsResource, StoreGateway},
        user::{User, UserType},
    };

    // === Controllers & views ===
    pub use crate::app::App;
    pub use crate::controllers::{
        AttachmentState, BillsController, BillsView, NewBillController, NewBillView, SubmitState,
    };
    pub use crate::views::Renderer;

    // === Storage ===
    pub use crate::storage::{
        BillsOperation, FileLocalStorage, InMemoryBillStore, InMemoryLocalStorage, LocalStorage,
        MockStore,
    };

    // === Config ===
    pub use crate::config::AppConfig;
    pub use crate::logging::init_tracing;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
