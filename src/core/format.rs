//! Display formatting for bill dates and statuses

use crate::core::bill::BillStatus;
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Format of the dates exchanged with the store and typed in the form
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Abbreviated French month names, already capitalized and cut to three letters
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// A stored date that could not be turned into a calendar date
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot parse date '{value}': {reason}")]
pub struct DateFormatError {
    pub value: String,
    pub reason: String,
}

/// Parse a store date (`YYYY-MM-DD`)
pub fn parse_bill_date(value: &str) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::parse_from_str(value.trim(), STORE_DATE_FORMAT).map_err(|e| DateFormatError {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Render a calendar date the way the bill list shows it
///
/// `2004-04-04` becomes `4 Avr. 04`.
pub fn display_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} {}. {:02}", date.day(), month, date.year().rem_euclid(100))
}

/// Parse and render a store date in one step
pub fn format_date(value: &str) -> Result<String, DateFormatError> {
    parse_bill_date(value).map(display_date)
}

/// Amount as shown next to the currency sign, without a trailing `.0`
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}

/// Localized status label
pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refusé",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_drops_leading_zero_and_shortens_year() {
        assert_eq!(format_date("2004-04-04").unwrap(), "4 Avr. 04");
        assert_eq!(format_date("2021-11-22").unwrap(), "22 Nov. 21");
    }

    #[test]
    fn test_format_date_accented_months() {
        assert_eq!(format_date("2003-02-15").unwrap(), "15 Fév. 03");
        assert_eq!(format_date("2010-08-01").unwrap(), "1 Aoû. 10");
        assert_eq!(format_date("2019-12-31").unwrap(), "31 Déc. 19");
    }

    #[test]
    fn test_format_date_rejects_corrupted_value() {
        let err = format_date("2004-13-45").unwrap_err();
        assert_eq!(err.value, "2004-13-45");
        assert!(format_date("not a date").is_err());
        assert!(format_date("").is_err());
    }

    #[test]
    fn test_parse_bill_date_trims() {
        let date = parse_bill_date(" 2002-02-02 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2002, 2, 2).unwrap());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(400.0), "400");
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_format_status_labels() {
        assert_eq!(format_status(BillStatus::Pending), "En attente");
        assert_eq!(format_status(BillStatus::Accepted), "Accepté");
        assert_eq!(format_status(BillStatus::Refused), "Refusé");
    }
}
