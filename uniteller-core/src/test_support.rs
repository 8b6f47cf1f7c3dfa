//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal_macros::dec;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use uniteller_sdk::config::ProviderSettings;
use uniteller_sdk::signature::sign_callback;
use uuid::Uuid;

use crate::entities::{Order, OrderNote, OrderStatus, PaymentStatus};
use crate::errors::OrderError;
use crate::services::{MemoryOrderBook, OrderManagement};

pub use crate::testing::StubStatuses;

pub const PASSWORD: &str = "secret";

pub fn settings() -> ProviderSettings {
    ProviderSettings {
        shop_idp: "00001234".into(),
        login: "shop-login".into(),
        password: PASSWORD.into(),
        additional_fee: dec!(0),
        additional_fee_percentage: false,
    }
}

pub fn sample_order(payment_status: PaymentStatus) -> Order {
    Order {
        id: 42,
        guid: Uuid::new_v4(),
        customer_id: 7,
        order_total: dec!(1234.50),
        order_status: OrderStatus::Pending,
        payment_status,
        created_at: time::OffsetDateTime::now_utc(),
    }
}

/// Correctly signed callback fields.
pub fn signed_fields(order_id: &str, status: &str) -> uniteller_sdk::objects::CallbackFields {
    uniteller_sdk::objects::CallbackFields {
        order_id: order_id.to_owned(),
        signature: sign_callback(order_id, status, PASSWORD),
        status: status.to_owned(),
    }
}

/// [`MemoryOrderBook`] that counts lookups and mutations.
#[derive(Default)]
pub struct SpyOrders {
    pub book: MemoryOrderBook,
    pub lookups: AtomicUsize,
    pub mutations: AtomicUsize,
}

impl SpyOrders {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderManagement for SpyOrders {
    async fn get_order_by_guid(&self, guid: Uuid) -> Result<Option<Order>, OrderError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.book.get_order_by_guid(guid).await
    }

    async fn insert_order_note(&self, note: OrderNote) -> Result<(), OrderError> {
        self.book.insert_order_note(note).await
    }

    fn can_cancel_order(&self, order: &Order) -> bool {
        self.book.can_cancel_order(order)
    }

    async fn cancel_order(
        &self,
        order: &Order,
        from_payment_notice: bool,
    ) -> Result<Order, OrderError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.book.cancel_order(order, from_payment_notice).await
    }

    fn can_mark_order_as_authorized(&self, order: &Order) -> bool {
        self.book.can_mark_order_as_authorized(order)
    }

    async fn mark_order_as_authorized(&self, order: &Order) -> Result<Order, OrderError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.book.mark_order_as_authorized(order).await
    }

    fn can_mark_order_as_paid(&self, order: &Order) -> bool {
        self.book.can_mark_order_as_paid(order)
    }

    async fn mark_order_as_paid(&self, order: &Order) -> Result<Order, OrderError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.book.mark_order_as_paid(order).await
    }
}

/// Local stand-in for the Uniteller results endpoint.
///
/// Every connection gets the same canned answer after `delay`, then is
/// closed, so each client attempt shows up as one hit.
pub struct StubProvider {
    pub url: url::Url,
    hits: Arc<AtomicUsize>,
}

impl StubProvider {
    pub async fn start(status: u16, body: &'static str) -> Self {
        Self::start_delayed(status, body, Duration::ZERO).await
    }

    pub async fn start_delayed(status: u16, body: &'static str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = url::Url::parse(&format!("http://{}/results/", listener.local_addr().unwrap()))
            .unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    read_request(&mut socket).await;
                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 {status} Stub\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { url, hits }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Consume one request: headers, then `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}
