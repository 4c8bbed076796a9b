//! Page controllers
//!
//! Each controller owns the view state of its page and talks to the store
//! gateway, the navigator and the persisted client state through traits.

pub mod bills;
pub mod new_bill;

pub use bills::{BillsController, BillsView, ModalView};
pub use new_bill::{Attachment, AttachmentState, NewBillController, NewBillView, SubmitState};
