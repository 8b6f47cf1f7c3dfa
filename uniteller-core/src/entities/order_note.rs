/// A note attached to an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNote {
    pub order_id: i64,
    pub note: String,
    pub display_to_customer: bool,
    pub created_at: time::OffsetDateTime,
}

impl OrderNote {
    /// A note only visible to shop staff, timestamped now.
    pub fn internal(order_id: i64, note: impl Into<String>) -> Self {
        Self {
            order_id,
            note: note.into(),
            display_to_customer: false,
            created_at: time::OffsetDateTime::now_utc(),
        }
    }
}
