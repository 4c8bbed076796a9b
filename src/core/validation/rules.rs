//! Rules applied to the new bill form

use super::{ValidationConfig, filters, validators};
use crate::config::BillsConfig;
use crate::core::format::STORE_DATE_FORMAT;
use serde_json::json;

/// Filters and validators for the fields of a bill payload
pub fn bill_form_rules(config: &BillsConfig) -> ValidationConfig {
    ValidationConfig::new()
        .filter("type", filters::trim())
        .filter("type", filters::empty_as_null())
        .validate("type", validators::required())
        .validate("type", validators::in_list(config.expense_types.clone()))
        .filter("name", filters::trim())
        .filter("amount", filters::empty_as_null())
        .filter("amount", filters::parse_number())
        .filter("amount", filters::round_decimals(2))
        .validate("amount", validators::required())
        .validate("amount", validators::numeric())
        .validate("amount", validators::positive())
        .filter("date", filters::trim())
        .filter("date", filters::empty_as_null())
        .validate("date", validators::required())
        .validate("date", validators::date_format(STORE_DATE_FORMAT))
        .filter("vat", filters::trim())
        .filter("vat", filters::empty_as_null())
        .filter("pct", filters::empty_as_null())
        .filter("pct", filters::parse_number())
        .filter("pct", filters::round_decimals(0))
        .filter("pct", filters::default_value(json!(config.default_pct)))
        .validate("pct", validators::within(0.0, 100.0))
        .filter("commentary", filters::trim())
        .filter("commentary", filters::empty_as_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(amount: &str, date: &str, pct: &str) -> serde_json::Value {
        json!({
            "type": "Transports",
            "name": " vol Paris Londres ",
            "amount": amount,
            "date": date,
            "vat": "70",
            "pct": pct,
            "commentary": "",
        })
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let rules = bill_form_rules(&BillsConfig::default());
        let out = rules
            .validate_and_filter(form("348", "2022-04-04", ""))
            .unwrap();

        assert_eq!(out["name"], json!("vol Paris Londres"));
        assert_eq!(out["amount"], json!(348.0));
        assert_eq!(out["pct"], json!(20));
        assert_eq!(out["commentary"], json!(null));
        assert_eq!(out["vat"], json!("70"));
    }

    #[test]
    fn test_invalid_fields_are_all_reported() {
        let rules = bill_form_rules(&BillsConfig::default());
        let errors = rules
            .validate_and_filter(form("-1", "04/04/2022", "150"))
            .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["amount", "date", "pct"]);
    }

    #[test]
    fn test_unknown_expense_type() {
        let rules = bill_form_rules(&BillsConfig::default());
        let mut payload = form("10", "2022-04-04", "20");
        payload["type"] = json!("Casino");

        let errors = rules.validate_and_filter(payload).unwrap_err();
        assert_eq!(errors[0].field, "type");
    }

    #[test]
    fn test_configured_default_pct() {
        let config = BillsConfig {
            default_pct: 10,
            ..BillsConfig::default()
        };
        let out = bill_form_rules(&config)
            .validate_and_filter(form("10", "2022-04-04", " "))
            .unwrap();
        assert_eq!(out["pct"], json!(10));
    }
}
