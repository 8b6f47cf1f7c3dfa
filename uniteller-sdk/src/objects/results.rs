//! Order status lookup against the Uniteller results endpoint.

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;

use crate::config::ProviderSettings;

/// `Format` value requesting an XML report.
pub const RESULTS_FORMAT_XML: &str = "4";

/// Form posted to the results endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusQuery {
    #[serde(rename = "Shop_ID")]
    pub shop_id: String,
    #[serde(rename = "Login")]
    pub login: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Format")]
    pub format: &'static str,
    #[serde(rename = "ShopOrderNumber")]
    pub shop_order_number: String,
    #[serde(rename = "S_FIELDS")]
    pub fields: &'static str,
}

impl StatusQuery {
    /// Ask for the `Status` field of one order, as XML.
    pub fn new(settings: &ProviderSettings, order_id: &str) -> Self {
        Self {
            shop_id: settings.shop_idp.clone(),
            login: settings.login.clone(),
            password: settings.password.clone(),
            format: RESULTS_FORMAT_XML,
            shop_order_number: order_id.to_owned(),
            fields: "Status",
        }
    }
}

/// Errors produced while reading a status report.
#[derive(Debug, thiserror::Error)]
pub enum StatusParseError {
    #[error("malformed xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Before,
    Inside,
    After,
}

/// Extract the reported statuses from a results response body.
///
/// Statuses are the `status` children of the first `order` element inside
/// the first `orders` element under the document root, uppercased, in
/// document order. A body that is not an XML document (no `?xml`
/// declaration) carries no statuses.
pub fn parse_status_response(body: &str) -> Result<Vec<String>, StatusParseError> {
    if !body.contains("?xml") {
        return Ok(Vec::new());
    }

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut orders = Position::Before;
    let mut order = Position::Before;
    let mut current: Option<String> = None;
    let mut statuses = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match (depth, e.local_name().as_ref()) {
                    (2, b"orders") if orders == Position::Before => orders = Position::Inside,
                    (3, b"order") if orders == Position::Inside && order == Position::Before => {
                        order = Position::Inside
                    }
                    (4, b"status") if order == Position::Inside => current = Some(String::new()),
                    _ => {}
                }
            }
            Event::Empty(e) => match (depth + 1, e.local_name().as_ref()) {
                (2, b"orders") if orders == Position::Before => orders = Position::After,
                (3, b"order") if orders == Position::Inside && order == Position::Before => {
                    order = Position::After
                }
                (4, b"status") if order == Position::Inside => statuses.push(String::new()),
                _ => {}
            },
            Event::Text(t) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&t.unescape()?);
                }
            }
            Event::CData(t) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(_) => {
                match depth {
                    4 if order == Position::Inside => {
                        if let Some(text) = current.take() {
                            statuses.push(text.to_uppercase());
                        }
                    }
                    3 if order == Position::Inside => order = Position::After,
                    2 if orders == Position::Inside => orders = Position::After,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(statuses)
}
