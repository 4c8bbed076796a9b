//! Macro-generated test suite for the bills resource contract.
//!
//! # Generated Tests
//!
//! - `test_list_returns_seeded_bills` — every seeded bill is listed once
//! - `test_list_keeps_raw_fields` — dates and status come back untouched
//! - `test_create_returns_stored_record` — payload fields plus a non-empty id
//! - `test_update_keeps_id` — the returned record carries the updated id
//! - `test_bills_resource_is_shared` — clones of the gateway see the same data
//! - `test_concurrent_lists` — parallel lists from spawned tasks

/// Generate a bills resource conformance test suite.
///
/// `$factory` must be callable with the seed `Vec<Bill>` and return a
/// `StoreGateway + Clone + 'static`. It is called once per test.
#[macro_export]
macro_rules! bills_resource_tests {
    ($factory:expr) => {
        mod bills_resource_contract_tests {
            use super::*;
            use billed::core::bill::{Bill, BillStatus};
            use billed::core::store::StoreGateway;
            use billed::storage::fixtures;

            fn seeded() -> impl StoreGateway + Clone + 'static {
                let factory = $factory;
                factory(fixtures::bills())
            }

            #[tokio::test]
            async fn test_list_returns_seeded_bills() {
                let store = seeded();
                let bills = store.bills().list().await.unwrap();

                let mut ids: Vec<String> = bills.iter().map(|b| b.id.clone()).collect();
                ids.sort();
                let mut expected: Vec<String> =
                    fixtures::bills().into_iter().map(|b| b.id).collect();
                expected.sort();
                assert_eq!(ids, expected);
            }

            #[tokio::test]
            async fn test_list_keeps_raw_fields() {
                let store = seeded();
                let bills = store.bills().list().await.unwrap();
                let bill: &Bill = bills
                    .iter()
                    .find(|b| b.id == "47qAXb6fIm2zOKkLzMro")
                    .expect("fixture bill should be listed");

                assert_eq!(bill.date, "2004-04-04");
                assert_eq!(bill.status, BillStatus::Pending);
                assert_eq!(bill.email, "a@a");
            }

            #[tokio::test]
            async fn test_create_returns_stored_record() {
                let store = seeded();
                let created = store
                    .bills()
                    .create(sample_payload("a@a", "facture.png"))
                    .await
                    .unwrap();

                assert!(!created.id.is_empty());
                assert_eq!(created.file_url.as_deref(), Some("facture.png"));
                assert_eq!(created.file_name.as_deref(), Some("facture.png"));
                assert_eq!(created.status, BillStatus::Pending);
                assert_eq!(created.pct, Some(20));
            }

            #[tokio::test]
            async fn test_update_keeps_id() {
                let store = seeded();
                let mut payload = sample_payload("a@a", "scan.jpg");
                payload.status = BillStatus::Accepted;

                let updated = store
                    .bills()
                    .update("BeKy5Mo4jkmdfPGYpTxZ", payload)
                    .await
                    .unwrap();
                assert_eq!(updated.id, "BeKy5Mo4jkmdfPGYpTxZ");
                assert_eq!(updated.status, BillStatus::Accepted);
                assert_eq!(updated.file_name.as_deref(), Some("scan.jpg"));
            }

            #[tokio::test]
            async fn test_bills_resource_is_shared() {
                let store = seeded();
                let first = store.bills().list().await.unwrap();
                let second = store.clone().bills().list().await.unwrap();
                assert_eq!(first.len(), second.len());
            }

            #[tokio::test]
            async fn test_concurrent_lists() {
                let store = seeded();
                let mut handles = Vec::new();
                for _ in 0..8 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store.bills().list().await.map(|b| b.len())
                    }));
                }
                for handle in handles {
                    assert_eq!(handle.await.unwrap().unwrap(), 4);
                }
            }
        }
    };
}
