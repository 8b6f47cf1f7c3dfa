//! Status callbacks sent by Uniteller and the reply it expects.

use std::fmt;
use std::str::FromStr;

use crate::signature::{SignatureError, verify_callback};

pub const ORDER_ID_KEY: &str = "Order_ID";
pub const SIGNATURE_KEY: &str = "Signature";
pub const STATUS_KEY: &str = "Status";

/// Raw callback fields exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackFields {
    pub order_id: String,
    pub signature: String,
    pub status: String,
}

impl CallbackFields {
    /// Collect the callback fields from a decoded form body and query string.
    ///
    /// A key present in the form wins over the query string; a key present
    /// in neither is read as the empty string.
    pub fn from_pairs(form: &[(String, String)], query: &[(String, String)]) -> Self {
        let value = |key: &str| {
            lookup(form, key)
                .or_else(|| lookup(query, key))
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            order_id: value(ORDER_ID_KEY),
            signature: value(SIGNATURE_KEY),
            status: value(STATUS_KEY),
        }
    }

    /// Check the callback signature against the shop password.
    pub fn verify(&self, password: &str) -> Result<(), SignatureError> {
        verify_callback(&self.order_id, &self.status, password, &self.signature)
    }

    /// Audit text recorded on the order for every callback.
    pub fn audit_note(&self) -> String {
        format!(
            "Uniteller:\n{ORDER_ID_KEY}: {}\n{SIGNATURE_KEY}: {}\n{STATUS_KEY}: {}\n",
            self.order_id, self.signature, self.status
        )
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Order statuses reported by Uniteller that map onto an order transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackStatus {
    Canceled,
    Authorized,
    Paid,
}

/// A status string outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for CallbackStatus {
    type Err = UnknownStatus;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CANCELED" => Ok(Self::Canceled),
            "AUTHORIZED" => Ok(Self::Authorized),
            "PAID" => Ok(Self::Paid),
            _ => Err(UnknownStatus(s.to_owned())),
        }
    }
}

impl fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackStatus::Canceled => write!(f, "CANCELED"),
            CallbackStatus::Authorized => write!(f, "AUTHORIZED"),
            CallbackStatus::Paid => write!(f, "PAID"),
        }
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Plain-text reply to a callback.
///
/// ```text
/// SUCCESS|FAIL\r\n
/// {system}. {message}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackReply {
    pub success: bool,
    pub system: String,
    pub message: String,
}

impl CallbackReply {
    pub fn success(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            system: system.into(),
            message: message.into(),
        }
    }

    pub fn fail(system: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            system: system.into(),
            message: message.into(),
        }
    }

    pub fn banner(&self) -> &'static str {
        if self.success { "SUCCESS" } else { "FAIL" }
    }
}

impl fmt::Display for CallbackReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\r\n{}. {}", self.banner(), self.system, self.message)
    }
}
