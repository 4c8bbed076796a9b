//! Markup rendering
//!
//! Views are pure functions of the controllers' view state. Templates are
//! embedded in the crate and rendered with tera; values are escaped by the
//! `attr` filter, which leaves `/` alone so URLs stay readable in the
//! markup.

use crate::controllers::{BillsView, NewBillView};
use crate::core::error::{BilledResult, RenderError};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

pub const BILLS_TEMPLATE: &str = "bills.html";
pub const NEW_BILL_TEMPLATE: &str = "new_bill.html";
pub const ERROR_TEMPLATE: &str = "error.html";
pub const LOADING_TEMPLATE: &str = "loading.html";

const TEMPLATES: [(&str, &str); 4] = [
    (BILLS_TEMPLATE, include_str!("templates/bills.html")),
    (NEW_BILL_TEMPLATE, include_str!("templates/new_bill.html")),
    (ERROR_TEMPLATE, include_str!("templates/error.html")),
    (LOADING_TEMPLATE, include_str!("templates/loading.html")),
];

/// Escape text for HTML content and quoted attribute values
pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn attr_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(escape_attr(s))),
        Value::Null => Ok(Value::String(String::new())),
        other => Ok(Value::String(escape_attr(&other.to_string()))),
    }
}

/// Template registry for every page
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> BilledResult<Self> {
        let mut tera = Tera::default();
        // Escaping is explicit through `attr`
        tera.autoescape_on(vec![]);
        tera.register_filter("attr", attr_filter);
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| RenderError {
                template: "<embedded>".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { tera })
    }

    pub fn render_bills(&self, view: &BillsView) -> BilledResult<String> {
        if let Some(message) = &view.error {
            return self.render_error(message);
        }
        self.render(BILLS_TEMPLATE, view)
    }

    pub fn render_new_bill(&self, view: &NewBillView) -> BilledResult<String> {
        self.render(NEW_BILL_TEMPLATE, view)
    }

    /// Error page showing `message` verbatim
    pub fn render_error(&self, message: &str) -> BilledResult<String> {
        #[derive(Serialize)]
        struct ErrorView<'a> {
            message: &'a str,
        }
        self.render(ERROR_TEMPLATE, &ErrorView { message })
    }

    pub fn render_loading(&self) -> BilledResult<String> {
        self.render(LOADING_TEMPLATE, &serde_json::json!({}))
    }

    fn render<T: Serialize>(&self, template: &str, view: &T) -> BilledResult<String> {
        let render_error = |e: tera::Error| RenderError {
            template: template.to_string(),
            message: e.to_string(),
        };
        let context = Context::from_serialize(view).map_err(render_error)?;
        let html = self.tera.render(template, &context).map_err(render_error)?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::{AttachmentState, ModalView, SubmitState};
    use crate::core::bill::{Bill, DisplayBill};
    use crate::storage::fixtures;

    fn renderer() -> Renderer {
        Renderer::new().unwrap()
    }

    fn displayed() -> Vec<DisplayBill> {
        fixtures::bills().iter().map(DisplayBill::from_bill).collect()
    }

    #[test]
    fn test_escape_attr_keeps_slashes() {
        assert_eq!(
            escape_attr(r#"https://x/a.jpg?b=1&c="2""#),
            "https://x/a.jpg?b=1&amp;c=&quot;2&quot;"
        );
    }

    #[test]
    fn test_bills_page_markup() {
        let view = BillsView {
            bills: displayed(),
            ..BillsView::default()
        };
        let html = renderer().render_bills(&view).unwrap();

        assert!(html.contains(r#"data-testid="icon-window" class="active-icon""#));
        assert!(html.contains(r#"data-testid="btn-new-bill""#));
        assert_eq!(html.matches(r#"data-testid="icon-eye""#).count(), 4);
        assert!(html.contains("4 Avr. 04"));
        assert!(html.contains("En attente"));
        assert!(html.contains("<td>400 €</td>"));
        assert!(!html.contains("400.0"));
        assert!(!html.contains("modaleFile"));
    }

    #[test]
    fn test_bills_page_modal() {
        let view = BillsView {
            modal: Some(ModalView {
                file_url: "https://test.storage.tld/proof.jpg".to_string(),
                image_width: 400,
            }),
            ..BillsView::default()
        };
        let html = renderer().render_bills(&view).unwrap();

        assert_eq!(html.matches(r#"id="modaleFile""#).count(), 1);
        assert!(html.contains(r#"<img width=400 src="https://test.storage.tld/proof.jpg" alt="Bill" />"#));
    }

    #[test]
    fn test_bills_error_is_rendered_verbatim() {
        let view = BillsView {
            error: Some("Erreur 404".to_string()),
            ..BillsView::default()
        };
        let html = renderer().render_bills(&view).unwrap();
        assert!(html.contains("Erreur 404"));
        assert!(!html.contains("tbody"));
    }

    #[test]
    fn test_new_bill_page_markup() {
        let view = NewBillView {
            expense_types: vec!["Transports".to_string()],
            default_pct: 20,
            warning: Some("format <invalide>".to_string()),
            ..NewBillView::default()
        };
        let html = renderer().render_new_bill(&view).unwrap();

        assert!(html.contains("Envoyer une note de frais"));
        assert!(html.contains(r#"data-testid="form-new-bill""#));
        assert!(html.contains("<option>Transports</option>"));
        assert!(html.contains("format &lt;invalide&gt;"));
        assert!(!html.contains("submit-error"));
    }

    #[test]
    fn test_new_bill_failed_submission() {
        let view = NewBillView {
            attachment: AttachmentState::NoFile,
            submit: SubmitState::Failed {
                message: "Erreur 500".to_string(),
            },
            ..NewBillView::default()
        };
        let html = renderer().render_new_bill(&view).unwrap();
        assert!(html.contains(r#"data-testid="submit-error">Erreur 500<"#));
    }

    #[test]
    fn test_submitted_state_serializes() {
        let bill: Bill = fixtures::bills().remove(0);
        let view = NewBillView {
            submit: SubmitState::Submitted(bill),
            ..NewBillView::default()
        };
        assert!(renderer().render_new_bill(&view).is_ok());
    }

    #[test]
    fn test_loading_page() {
        assert!(renderer().render_loading().unwrap().contains("Loading..."));
    }
}
