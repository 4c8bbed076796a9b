//! Bill records and their display projection

use crate::core::format::{display_date, format_amount, format_status, parse_bill_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Approval status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    /// Localized label shown in the list
    pub fn label(self) -> &'static str {
        format_status(self)
    }
}

/// An expense report as the store returns it
///
/// `date` stays the raw store string so that corrupted values survive the
/// trip to the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type")]
    pub bill_type: String,
    #[serde(default)]
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub vat: Option<String>,
    #[serde(default)]
    pub pct: Option<u32>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub comment_admin: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub status: BillStatus,
}

impl Bill {
    /// Materialize a payload under the id assigned by the store
    pub fn from_payload(id: impl Into<String>, payload: BillPayload) -> Self {
        Self {
            id: id.into(),
            email: payload.email,
            bill_type: payload.bill_type,
            name: payload.name,
            amount: payload.amount,
            date: payload.date,
            vat: payload.vat,
            pct: Some(payload.pct),
            commentary: payload.commentary,
            comment_admin: None,
            file_url: Some(payload.file_url),
            file_name: Some(payload.file_name),
            status: payload.status,
        }
    }

    /// Calendar date of the expense, if the stored string is valid
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_bill_date(&self.date).ok()
    }
}

/// Body sent to the store on create and update
///
/// File metadata is mandatory: a payload only exists once an attachment
/// passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayload {
    pub email: String,
    #[serde(rename = "type")]
    pub bill_type: String,
    #[serde(default)]
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub vat: Option<String>,
    pub pct: u32,
    #[serde(default)]
    pub commentary: Option<String>,
    pub file_url: String,
    pub file_name: String,
    #[serde(default)]
    pub status: BillStatus,
}

/// Render-ready projection of a [`Bill`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayBill {
    pub id: String,
    pub email: String,
    pub bill_type: String,
    pub name: String,
    pub amount: f64,
    pub amount_label: String,
    /// Formatted date, or the raw store value when it does not parse
    pub date: String,
    /// Calendar date used for ordering; `None` for corrupted dates
    #[serde(skip)]
    pub sort_date: Option<NaiveDate>,
    pub status: BillStatus,
    pub status_label: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl DisplayBill {
    /// Project a bill, passing unparseable dates through untouched
    pub fn from_bill(bill: &Bill) -> Self {
        let (date, sort_date) = match parse_bill_date(&bill.date) {
            Ok(parsed) => (display_date(parsed), Some(parsed)),
            Err(e) => {
                tracing::warn!(bill_id = %bill.id, error = %e, "keeping raw bill date");
                (bill.date.clone(), None)
            }
        };

        Self {
            id: bill.id.clone(),
            email: bill.email.clone(),
            bill_type: bill.bill_type.clone(),
            name: bill.name.clone(),
            amount: bill.amount,
            amount_label: format_amount(bill.amount),
            date,
            sort_date,
            status: bill.status,
            status_label: bill.status.label().to_string(),
            file_url: bill.file_url.clone(),
            file_name: bill.file_name.clone(),
        }
    }
}

/// Order bills by transaction date, most recent first
///
/// The sort is stable; bills whose date does not parse go last in input order.
pub fn sort_by_date_desc(bills: &mut [DisplayBill]) {
    bills.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bill(id: &str, date: &str) -> Bill {
        serde_json::from_value(json!({
            "id": id,
            "email": "a@a",
            "type": "Hôtel et logement",
            "name": "encore",
            "amount": 400,
            "date": date,
            "vat": "80",
            "pct": 20,
            "commentary": "séminaire billed",
            "fileUrl": "https://test.storage.tld/preview-facture-free-201801-pdf-1.jpg",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "status": "pending"
        }))
        .unwrap()
    }

    #[test]
    fn test_bill_deserializes_store_shape() {
        let b = bill("47qAXb6fIm2zOKkLzMro", "2004-04-04");
        assert_eq!(b.bill_type, "Hôtel et logement");
        assert_eq!(b.pct, Some(20));
        assert_eq!(b.status, BillStatus::Pending);
        assert_eq!(
            b.file_name.as_deref(),
            Some("preview-facture-free-201801-pdf-1.jpg")
        );
    }

    #[test]
    fn test_bill_serializes_camel_case_and_type() {
        let value = serde_json::to_value(bill("1", "2004-04-04")).unwrap();
        assert_eq!(value["type"], "Hôtel et logement");
        assert!(value.get("fileUrl").is_some());
        assert!(value.get("file_url").is_none());
        assert_eq!(value["status"], "pending");
    }

    #[test]
    fn test_display_bill_formats_date_and_status() {
        let mut b = bill("1", "2004-04-04");
        b.status = BillStatus::Refused;
        let display = DisplayBill::from_bill(&b);
        assert_eq!(display.date, "4 Avr. 04");
        assert_eq!(display.status_label, "Refusé");
        assert_eq!(display.amount_label, "400");
        assert!(display.sort_date.is_some());
    }

    #[test]
    fn test_display_bill_keeps_corrupted_date() {
        let display = DisplayBill::from_bill(&bill("1", "04-04-2004x"));
        assert_eq!(display.date, "04-04-2004x");
        assert!(display.sort_date.is_none());
    }

    #[test]
    fn test_sort_by_date_desc_uses_calendar_order() {
        let mut bills: Vec<DisplayBill> = ["2001-01-01", "2004-04-04", "garbage", "2003-03-03"]
            .iter()
            .enumerate()
            .map(|(i, d)| DisplayBill::from_bill(&bill(&i.to_string(), d)))
            .collect();

        sort_by_date_desc(&mut bills);

        let ids: Vec<&str> = bills.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "0", "2"]);
    }

    #[test]
    fn test_from_payload_sets_file_metadata() {
        let payload = BillPayload {
            email: "a@a".to_string(),
            bill_type: "Transports".to_string(),
            name: "train".to_string(),
            amount: 42.0,
            date: "2022-05-01".to_string(),
            vat: None,
            pct: 20,
            commentary: None,
            file_url: "ticket.png".to_string(),
            file_name: "ticket.png".to_string(),
            status: BillStatus::Pending,
        };
        let b = Bill::from_payload("abc", payload);
        assert_eq!(b.id, "abc");
        assert_eq!(b.file_url.as_deref(), Some("ticket.png"));
        assert_eq!(b.parsed_date(), NaiveDate::from_ymd_opt(2022, 5, 1));
    }
}
