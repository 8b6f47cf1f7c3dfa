//! Router fixtures for handler tests.

use std::io::Write;
use std::sync::Arc;

use axum::Router;
use axum::response::Response;
use rust_decimal_macros::dec;
use uniteller_core::entities::{Order, OrderStatus, PaymentStatus};
use uniteller_core::services::MemoryOrderBook;
pub use uniteller_core::testing::StubStatuses;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::server::build_router;
use crate::state::AppState;

pub const PASSWORD: &str = "secret";
pub const ADMIN_SECRET: &str = "admin-secret";

const CONFIG: &str = r#"
[server]
listen = "127.0.0.1:0"
store_location = "https://shop.example/"

[admin]
secret = "admin-secret"

[currency]
primary_currency_id = 1

[[currency.currencies]]
id = 1
code = "RUB"

[settings]
shop_idp = "00001234"
login = "shop-login"
password = "secret"
"#;

pub struct TestApp {
    pub state: AppState,
    pub orders: MemoryOrderBook,
    pub statuses: Arc<StubStatuses>,
    pub config_file: tempfile::NamedTempFile,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_statuses(StubStatuses::reporting(&[])).await
    }

    pub async fn with_statuses(statuses: StubStatuses) -> Self {
        let mut config_file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        config_file.write_all(CONFIG.as_bytes()).unwrap();

        let loader = Arc::new(ConfigLoader::new(config_file.path(), None));
        let config = loader.load().unwrap().into_shared();
        let orders = MemoryOrderBook::new();
        let statuses = Arc::new(statuses);
        let state = AppState::new(
            config,
            Arc::new(orders.clone()),
            statuses.clone(),
            loader,
        );

        Self {
            state,
            orders,
            statuses,
            config_file,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    pub async fn add_order(&self, payment_status: PaymentStatus) -> Order {
        let order = Order {
            id: 17,
            guid: Uuid::new_v4(),
            customer_id: 42,
            order_total: dec!(1234.5),
            order_status: OrderStatus::Pending,
            payment_status,
            created_at: time::OffsetDateTime::now_utc(),
        };
        self.orders.insert(order.clone()).await;
        order
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
