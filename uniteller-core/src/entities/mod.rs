pub mod order_note;
pub mod order_records;

pub use order_note::OrderNote;
pub use order_records::{Order, OrderStatus, PaymentStatus};
