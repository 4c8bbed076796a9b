//! Sample bills used by the mock store and the tests

use crate::core::bill::{Bill, BillStatus};

const STORAGE_URL: &str = "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o";

#[allow(clippy::too_many_arguments)]
fn fixture(
    id: &str,
    bill_type: &str,
    name: &str,
    amount: f64,
    date: &str,
    vat: &str,
    commentary: &str,
    comment_admin: &str,
    file_name: &str,
    status: BillStatus,
) -> Bill {
    Bill {
        id: id.to_string(),
        email: "a@a".to_string(),
        bill_type: bill_type.to_string(),
        name: name.to_string(),
        amount,
        date: date.to_string(),
        vat: Some(vat.to_string()),
        pct: Some(20),
        commentary: Some(commentary.to_string()),
        comment_admin: Some(comment_admin.to_string()),
        file_url: Some(format!("{}/justificatifs%2F{}?alt=media", STORAGE_URL, file_name)),
        file_name: Some(file_name.to_string()),
        status,
    }
}

/// Four bills of `a@a`, deliberately not in date order
pub fn bills() -> Vec<Bill> {
    vec![
        fixture(
            "47qAXb6fIm2zOKkLzMro",
            "Hôtel et logement",
            "encore",
            400.0,
            "2004-04-04",
            "80",
            "séminaire billed",
            "ok",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Pending,
        ),
        fixture(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "Transports",
            "test1",
            100.0,
            "2001-01-01",
            "",
            "plop",
            "en fait non",
            "1592770761.jpeg",
            BillStatus::Refused,
        ),
        fixture(
            "UIUZtnPQvnbFnB0ozvJh",
            "Services en ligne",
            "test3",
            300.0,
            "2003-03-03",
            "60",
            "",
            "bon bah d'accord",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            BillStatus::Accepted,
        ),
        fixture(
            "qcCK3SzECmaZAGRrHjaC",
            "Restaurants et bars",
            "test2",
            200.0,
            "2002-02-02",
            "40",
            "test2",
            "pas la bonne facture",
            "preview-facture-free-201801-pdf-1.jpg",
            BillStatus::Refused,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_have_valid_dates_and_files() {
        let bills = bills();
        assert_eq!(bills.len(), 4);
        for bill in &bills {
            assert!(bill.parsed_date().is_some(), "bad date in {}", bill.id);
            assert!(bill.file_url.as_deref().unwrap_or("").contains(bill.file_name.as_deref().unwrap_or("?")));
        }
    }
}
