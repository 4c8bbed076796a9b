//! New bill form controller
//!
//! # Attachment states
//!
//! ```text
//! NoFile ──file picked──▶ check extension ──ok──▶ Accepted
//!    ▲                          │
//!    └──────── rejected ◀───────┘  (warning shown, input cleared)
//! ```
//!
//! A submission needs an `Accepted` attachment. It ends either in
//! `SubmitState::Submitted` (navigation back to the bills) or in
//! `SubmitState::Failed` with the store message.

use crate::config::AppConfig;
use crate::core::bill::{Bill, BillPayload, BillStatus};
use crate::core::error::{BilledResult, FieldValidationError, StoreError, ValidationError};
use crate::core::events::{NewBillForm, SelectedFile};
use crate::core::routes::{Navigator, Route};
use crate::core::store::StoreGateway;
use crate::core::user::User;
use crate::core::validation::{AttachmentPolicy, ValidationConfig, bill_form_rules};
use crate::storage::LocalStorage;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Accepted proof of purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub file_name: String,
    /// Placeholder until an upload service exists: the file name itself
    pub file_url: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttachmentState {
    #[default]
    NoFile,
    Accepted(Attachment),
}

impl AttachmentState {
    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            AttachmentState::Accepted(attachment) => Some(attachment),
            AttachmentState::NoFile => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmitState {
    #[default]
    Idle,
    Submitted(Bill),
    Failed { message: String },
}

/// State rendered by the new bill template
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewBillView {
    pub attachment: AttachmentState,
    /// Extension warning shown under the file input
    pub warning: Option<String>,
    /// Value of the file input
    pub file_input: String,
    pub submit: SubmitState,
    /// Form-level message blocking the submission
    pub form_error: Option<String>,
    pub field_errors: Vec<FieldValidationError>,
    pub expense_types: Vec<String>,
    pub default_pct: u32,
    /// Id of the bill being edited, `None` for a new one
    pub editing: Option<String>,
}

/// Form values once filtered and validated
#[derive(Debug, Deserialize)]
struct CleanForm {
    #[serde(rename = "type")]
    bill_type: String,
    #[serde(default)]
    name: String,
    amount: f64,
    date: String,
    vat: Option<String>,
    pct: f64,
    commentary: Option<String>,
}

pub struct NewBillController {
    store: Option<Arc<dyn StoreGateway>>,
    navigator: Arc<dyn Navigator>,
    local_storage: Arc<dyn LocalStorage>,
    policy: AttachmentPolicy,
    rules: ValidationConfig,
    view: NewBillView,
}

impl NewBillController {
    pub fn new(
        store: Option<Arc<dyn StoreGateway>>,
        navigator: Arc<dyn Navigator>,
        local_storage: Arc<dyn LocalStorage>,
        config: &AppConfig,
    ) -> BilledResult<Self> {
        Ok(Self {
            store,
            navigator,
            local_storage,
            policy: config.attachment_policy()?,
            rules: bill_form_rules(&config.bills),
            view: NewBillView {
                expense_types: config.bills.expense_types.clone(),
                default_pct: config.bills.default_pct,
                ..NewBillView::default()
            },
        })
    }

    /// Submit as an update of `bill_id` instead of a creation
    pub fn editing(mut self, bill_id: impl Into<String>) -> Self {
        self.view.editing = Some(bill_id.into());
        self
    }

    /// Validate a picked file and remember it when accepted
    pub fn handle_change_file(&mut self, file: SelectedFile) -> BilledResult<Attachment> {
        if let Err(e) = self.policy.check(&file.name) {
            tracing::warn!(file_name = %file.name, "rejected proof of purchase");
            self.view.attachment = AttachmentState::NoFile;
            self.view.warning = Some(self.policy.warning().to_string());
            self.view.file_input.clear();
            return Err(e.into());
        }

        let attachment = Attachment {
            file_name: file.name.clone(),
            file_url: file.name.clone(),
            mime_type: file.mime_type,
        };
        tracing::debug!(file_name = %attachment.file_name, size = file.size, "proof of purchase accepted");

        self.view.attachment = AttachmentState::Accepted(attachment.clone());
        self.view.warning = None;
        self.view.form_error = None;
        self.view.file_input = file.name;
        Ok(attachment)
    }

    /// Validate the form and send it to the store
    ///
    /// Calls `create` (or `update` when editing) exactly once. On success the
    /// bills page is requested; on failure the store message is kept in
    /// [`SubmitState::Failed`] and the error returned.
    pub async fn handle_submit(&mut self, form: NewBillForm) -> BilledResult<Bill> {
        let Some(attachment) = self.view.attachment.attachment().cloned() else {
            let err = ValidationError::MissingAttachment;
            tracing::warn!("submission blocked: no accepted proof of purchase");
            self.view.form_error = Some(err.to_string());
            return Err(err.into());
        };

        let raw = json!({
            "type": form.expense_type,
            "name": form.expense_name,
            "amount": form.amount,
            "date": form.datepicker,
            "vat": form.vat,
            "pct": form.pct,
            "commentary": form.commentary,
        });
        let clean: CleanForm = match self.rules.validate_and_filter(raw) {
            Ok(value) => serde_json::from_value(value)?,
            Err(errors) => {
                tracing::warn!(fields = errors.len(), "submission blocked: invalid form");
                self.view.field_errors = errors.clone();
                return Err(ValidationError::FieldErrors(errors).into());
            }
        };
        self.view.field_errors.clear();
        self.view.form_error = None;

        let email = match User::load(self.local_storage.as_ref()) {
            Ok(user) => user.and_then(|user| user.email).unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), "failed to read the user record");
                self.view.submit = SubmitState::Failed {
                    message: e.to_string(),
                };
                return Err(e.into());
            }
        };

        let payload = BillPayload {
            email,
            bill_type: clean.bill_type,
            name: clean.name,
            amount: clean.amount,
            date: clean.date,
            vat: clean.vat,
            pct: clean.pct as u32,
            commentary: clean.commentary,
            file_url: attachment.file_url,
            file_name: attachment.file_name,
            status: BillStatus::Pending,
        };

        let result = match &self.store {
            None => Err(StoreError::Unavailable),
            Some(store) => {
                let bills = store.bills();
                match &self.view.editing {
                    Some(id) => bills.update(id, payload).await,
                    None => bills.create(payload).await,
                }
            }
        };

        match result {
            Ok(bill) => {
                tracing::info!(bill_id = %bill.id, editing = self.view.editing.is_some(), "bill submitted");
                self.view.submit = SubmitState::Submitted(bill.clone());
                self.navigator.navigate(Route::Bills);
                Ok(bill)
            }
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), "failed to submit bill");
                self.view.submit = SubmitState::Failed {
                    message: e.message().to_string(),
                };
                Err(e.into())
            }
        }
    }

    pub fn view(&self) -> &NewBillView {
        &self.view
    }
}
