pub mod callback;
pub mod payment;
pub mod results;

pub use callback::{CallbackFields, CallbackReply, CallbackStatus, UnknownStatus};
pub use payment::{PaymentForm, PaymentRequest, ReturnUrls, format_subtotal};
pub use results::{StatusParseError, StatusQuery, parse_status_response};
