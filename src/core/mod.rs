//! Core module containing the domain types, traits and event plumbing

pub mod bill;
pub mod error;
pub mod events;
pub mod format;
pub mod routes;
pub mod store;
pub mod user;
pub mod validation;

pub use bill::{Bill, BillPayload, BillStatus, DisplayBill};
pub use error::{BilledError, BilledResult, StoreError, ValidationError};
pub use events::{Dispatcher, ElementRef, EventKind, HandlerToken, NewBillForm, SelectedFile, UiEvent};
pub use routes::{Navigator, Route, RouteHistory};
pub use store::{BillsResource, StoreGateway};
pub use user::{User, UserType};
