//! Shared test harness for store gateway testing
//!
//! Provides payload builders and the `bills_resource_tests!` macro that
//! validates any store gateway against the bills resource contract.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! bills_resource_tests!(InMemoryBillStore::with_bills);
//! ```

#![allow(dead_code)]

pub mod bills_resource_tests;

use billed::core::bill::{BillPayload, BillStatus};
use billed::core::events::NewBillForm;

/// A valid payload as the new bill form would produce it
pub fn sample_payload(email: &str, file_name: &str) -> BillPayload {
    BillPayload {
        email: email.to_string(),
        bill_type: "Transports".to_string(),
        name: "Vol Paris Londres".to_string(),
        amount: 348.0,
        date: "2022-02-15".to_string(),
        vat: Some("70".to_string()),
        pct: 20,
        commentary: None,
        file_url: file_name.to_string(),
        file_name: file_name.to_string(),
        status: BillStatus::Pending,
    }
}

/// A complete, valid new bill form
pub fn sample_form() -> NewBillForm {
    NewBillForm {
        expense_type: "Transports".to_string(),
        expense_name: "Vol Paris Londres".to_string(),
        datepicker: "2022-02-15".to_string(),
        amount: "348".to_string(),
        vat: "70".to_string(),
        pct: "20".to_string(),
        commentary: "séminaire".to_string(),
    }
}
