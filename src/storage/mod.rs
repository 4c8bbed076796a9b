//! Storage implementations: store gateways and client key-value storage

pub mod fixtures;
pub mod in_memory;
pub mod local_storage;
pub mod mock;

pub use in_memory::InMemoryBillStore;
pub use local_storage::{FileLocalStorage, InMemoryLocalStorage, LocalStorage};
pub use mock::{BillsOperation, MockStore};
