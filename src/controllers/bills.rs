//! Bills page controller
//!
//! Loads the bills of the connected employee, orders them for display and
//! drives the proof-of-purchase modal.

use crate::config::AppConfig;
use crate::core::bill::{DisplayBill, sort_by_date_desc};
use crate::core::error::{BilledError, BilledResult, ValidationError};
use crate::core::events::ElementRef;
use crate::core::routes::{Navigator, Route};
use crate::core::store::StoreGateway;
use crate::core::user::User;
use crate::storage::LocalStorage;
use serde::Serialize;
use std::sync::Arc;

/// Attribute of the eye icon holding the proof URL
pub const BILL_URL_ATTRIBUTE: &str = "data-bill-url";

/// Proof-of-purchase preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub file_url: String,
    pub image_width: u32,
}

/// State rendered by the bills template
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillsView {
    pub bills: Vec<DisplayBill>,
    /// Message of the last failed load, rendered verbatim
    pub error: Option<String>,
    pub modal: Option<ModalView>,
}

pub struct BillsController {
    store: Option<Arc<dyn StoreGateway>>,
    navigator: Arc<dyn Navigator>,
    local_storage: Arc<dyn LocalStorage>,
    config: Arc<AppConfig>,
    view: BillsView,
}

impl BillsController {
    pub fn new(
        store: Option<Arc<dyn StoreGateway>>,
        navigator: Arc<dyn Navigator>,
        local_storage: Arc<dyn LocalStorage>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            store,
            navigator,
            local_storage,
            config,
            view: BillsView::default(),
        }
    }

    /// Fetch, project and order the bills
    ///
    /// A store failure is kept in the view so that it can be rendered, then
    /// returned. Nothing is retried.
    pub async fn load(&mut self) -> BilledResult<Vec<DisplayBill>> {
        let Some(store) = &self.store else {
            tracing::debug!("no store configured, showing an empty list");
            self.view.bills.clear();
            self.view.error = None;
            return Ok(Vec::new());
        };

        let scope = if self.config.bills.scope_to_user {
            match User::load(self.local_storage.as_ref()) {
                Ok(user) => user.and_then(|user| user.email),
                Err(e) => {
                    tracing::error!(error = %e, code = e.error_code(), "failed to read the user record");
                    self.view.bills.clear();
                    self.view.error = Some(e.to_string());
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        let records = match store.bills().list().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), "failed to list bills");
                self.view.bills.clear();
                self.view.error = Some(e.message().to_string());
                return Err(e.into());
            }
        };

        let mut bills: Vec<DisplayBill> = records
            .iter()
            .filter(|bill| scope.as_deref().is_none_or(|email| bill.email == email))
            .map(DisplayBill::from_bill)
            .collect();
        sort_by_date_desc(&mut bills);

        tracing::info!(
            count = bills.len(),
            total = records.len(),
            scoped = scope.is_some(),
            "bills loaded"
        );

        self.view.bills = bills.clone();
        self.view.error = None;
        Ok(bills)
    }

    /// Open the preview modal for the clicked eye icon
    ///
    /// Only one modal exists: clicking another icon replaces its content.
    pub fn handle_click_icon_eye(&mut self, target: &ElementRef) -> BilledResult<ModalView> {
        let file_url = target.attribute(BILL_URL_ATTRIBUTE).ok_or_else(|| {
            BilledError::from(ValidationError::MissingAttribute {
                attribute: BILL_URL_ATTRIBUTE.to_string(),
            })
        })?;

        let modal = ModalView {
            file_url: file_url.to_string(),
            image_width: self.config.modal_image_width(),
        };
        tracing::debug!(file_url = %modal.file_url, width = modal.image_width, "opening proof modal");
        self.view.modal = Some(modal.clone());
        Ok(modal)
    }

    pub fn close_modal(&mut self) {
        self.view.modal = None;
    }

    /// Go to the new bill form
    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill);
    }

    pub fn view(&self) -> &BillsView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bill::Bill;
    use crate::core::error::StoreError;
    use crate::core::routes::RouteHistory;
    use crate::storage::{BillsOperation, InMemoryLocalStorage, MockStore};
    use serde_json::json;

    fn controller(store: Option<MockStore>, storage: Arc<InMemoryLocalStorage>) -> BillsController {
        BillsController::new(
            store.map(|s| Arc::new(s) as Arc<dyn StoreGateway>),
            Arc::new(RouteHistory::new()),
            storage,
            Arc::new(AppConfig::default()),
        )
    }

    fn bill(id: &str, email: &str, date: &str) -> Bill {
        serde_json::from_value(json!({
            "id": id,
            "email": email,
            "type": "Transports",
            "name": "train",
            "amount": 12,
            "date": date,
            "status": "accepted"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_orders_fixture_bills() {
        let mut c = controller(Some(MockStore::new()), Arc::new(InMemoryLocalStorage::new()));
        let bills = c.load().await.unwrap();

        let dates: Vec<&str> = bills.iter().map(|b| b.date.as_str()).collect();
        assert_eq!(dates, vec!["4 Avr. 04", "3 Mar. 03", "2 Fév. 02", "1 Jan. 01"]);
        assert_eq!(c.view().bills.len(), 4);
        assert!(c.view().error.is_none());
    }

    #[tokio::test]
    async fn test_load_without_store_is_empty() {
        let mut c = controller(None, Arc::new(InMemoryLocalStorage::new()));
        assert!(c.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_is_kept_for_the_view() {
        let store = MockStore::new();
        store.fail_next(BillsOperation::List, StoreError::status(500));
        let mut c = controller(Some(store), Arc::new(InMemoryLocalStorage::new()));

        let err = c.load().await.unwrap_err();
        assert_eq!(err.user_message(), "Erreur 500");
        assert_eq!(c.view().error.as_deref(), Some("Erreur 500"));
        assert!(c.view().bills.is_empty());
    }

    #[tokio::test]
    async fn test_load_scopes_to_connected_user() {
        let storage = Arc::new(InMemoryLocalStorage::new());
        User::employee("b@b").save(storage.as_ref()).unwrap();
        let store = MockStore::with_bills(vec![
            bill("1", "a@a", "2020-01-01"),
            bill("2", "b@b", "2021-01-01"),
        ]);

        let mut c = controller(Some(store), storage);
        let bills = c.load().await.unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].id, "2");
    }

    #[tokio::test]
    async fn test_unreadable_user_record_is_kept_for_the_view() {
        let storage = Arc::new(InMemoryLocalStorage::new());
        storage.set_item(crate::core::user::USER_KEY, "{not json").unwrap();
        let store = MockStore::new();
        let mut c = controller(Some(store.clone()), storage);

        let err = c.load().await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_USER");
        assert!(c.view().error.as_deref().unwrap().starts_with("Invalid user record"));
        assert!(c.view().bills.is_empty());
        assert_eq!(store.calls(BillsOperation::List), 0);
    }

    #[tokio::test]
    async fn test_corrupted_dates_go_last_and_stay_raw() {
        let store = MockStore::with_bills(vec![
            bill("bad", "a@a", "pas une date"),
            bill("old", "a@a", "2001-01-01"),
            bill("new", "a@a", "2005-05-05"),
        ]);
        let mut c = controller(Some(store), Arc::new(InMemoryLocalStorage::new()));

        let bills = c.load().await.unwrap();
        let ids: Vec<&str> = bills.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "bad"]);
        assert_eq!(bills[2].date, "pas une date");
    }

    #[test]
    fn test_icon_eye_opens_single_modal() {
        let mut c = controller(Some(MockStore::new()), Arc::new(InMemoryLocalStorage::new()));
        let first = ElementRef::new("div").with_attribute(BILL_URL_ATTRIBUTE, "https://x/a.jpg");
        let second = ElementRef::new("div").with_attribute(BILL_URL_ATTRIBUTE, "https://x/b.jpg");

        c.handle_click_icon_eye(&first).unwrap();
        let modal = c.handle_click_icon_eye(&second).unwrap();

        assert_eq!(modal.image_width, 400);
        assert_eq!(c.view().modal.as_ref().unwrap().file_url, "https://x/b.jpg");

        c.close_modal();
        assert!(c.view().modal.is_none());
    }

    #[test]
    fn test_icon_eye_without_url() {
        let mut c = controller(None, Arc::new(InMemoryLocalStorage::new()));
        let err = c.handle_click_icon_eye(&ElementRef::new("div")).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_ATTRIBUTE");
    }

    #[test]
    fn test_new_bill_requests_navigation() {
        let history = Arc::new(RouteHistory::new());
        let c = BillsController::new(
            None,
            history.clone(),
            Arc::new(InMemoryLocalStorage::new()),
            Arc::new(AppConfig::default()),
        );

        c.handle_click_new_bill();
        assert_eq!(history.take_pending(), Some(Route::NewBill));
    }
}
