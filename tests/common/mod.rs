#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use orderflow::application::pipeline::OrderPipeline;
use orderflow::application::workflow::{FulfillmentWorkflow, OrderRequest};
use orderflow::config::{PaymentSettings, PipelineSettings};
use orderflow::domain::customer::{Customer, CustomerId};
use orderflow::domain::order::{Order, OrderId, OrderItem};
use orderflow::domain::ports::{Notifier, OrderStore, PaymentProvider, TransactionLogEntry};
use orderflow::error::{OrderError, PaymentFailure, Result};
use orderflow::infrastructure::in_memory::{InMemoryCustomerStore, InMemoryOrderStore};
use orderflow::payment::PaymentDispatcher;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CUSTOMER_ID: CustomerId = CustomerId(1001);

pub fn customer() -> Customer {
    Customer::with_created_at(
        CUSTOMER_ID,
        "Lee Gu",
        "lee.gu@example.com",
        "+1-555-0123",
        "123 Main St, Seattle, WA 98765",
        Utc::now() - Duration::days(365),
    )
}

pub fn new_customer() -> Customer {
    Customer::new(
        CUSTOMER_ID,
        "Lee Gu",
        "lee.gu@example.com",
        "+1-555-0123",
        "123 Main St, Seattle, WA 98765",
    )
}

pub fn sample_items() -> Vec<OrderItem> {
    vec![
        OrderItem::new("Wireless Mouse", dec!(29.99), 2),
        OrderItem::new("USB-C Cable", dec!(12.99), 3),
        OrderItem::new("Laptop Stand", dec!(49.99), 1),
    ]
}

pub fn order(items: Vec<OrderItem>, method: &str) -> Order {
    Order::new(OrderId::new("ORD-TEST"), CUSTOMER_ID, items, method)
}

pub fn request(items: Vec<OrderItem>, method: &str) -> OrderRequest {
    OrderRequest {
        customer_id: CUSTOMER_ID,
        items,
        payment_method: method.to_string(),
        client_ip: None,
    }
}

pub fn pipeline(settings: PipelineSettings) -> OrderPipeline {
    OrderPipeline::new(
        PaymentDispatcher::from_settings(&PaymentSettings::default()),
        settings,
    )
}

/// Card provider that declines every charge.
pub struct DecliningProvider;

impl PaymentProvider for DecliningProvider {
    fn name(&self) -> &'static str {
        "declining"
    }

    fn charge(&self, _order: &Order) -> std::result::Result<(), PaymentFailure> {
        Err(PaymentFailure::Declined {
            provider: "declining",
            reason: "card expired".to_string(),
        })
    }

    fn refund(&self, _order_id: &OrderId, _amount: Decimal) -> std::result::Result<(), PaymentFailure> {
        Ok(())
    }
}

pub fn declining_dispatcher() -> PaymentDispatcher {
    PaymentDispatcher::new(Box::new(DecliningProvider), Box::new(DecliningProvider))
}

/// Approves every charge and rejects every refund.
pub struct RefundRejectingProvider;

impl PaymentProvider for RefundRejectingProvider {
    fn name(&self) -> &'static str {
        "refund-rejecting"
    }

    fn charge(&self, _order: &Order) -> std::result::Result<(), PaymentFailure> {
        Ok(())
    }

    fn refund(&self, _order_id: &OrderId, _amount: Decimal) -> std::result::Result<(), PaymentFailure> {
        Err(PaymentFailure::Declined {
            provider: "refund-rejecting",
            reason: "refund window closed".to_string(),
        })
    }
}

pub fn refund_rejecting_dispatcher() -> PaymentDispatcher {
    PaymentDispatcher::new(
        Box::new(RefundRejectingProvider),
        Box::new(RefundRejectingProvider),
    )
}

/// Records which notifications were sent, optionally failing all of them.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Arc::default(),
            fail: true,
        }
    }

    async fn record(&self, message: String) -> Result<()> {
        if self.fail {
            return Err(OrderError::Notification("mail server unavailable".to_string()));
        }
        self.sent.lock().await.push(message);
        Ok(())
    }

    pub async fn messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_order_confirmation(&self, order: &Order, _customer: &Customer) -> Result<()> {
        self.record(format!("confirmation:{}", order.id())).await
    }

    async fn send_shipping_notification(
        &self,
        order: &Order,
        _customer: &Customer,
        tracking_number: &str,
    ) -> Result<()> {
        self.record(format!("shipping:{}:{}", order.id(), tracking_number))
            .await
    }

    async fn send_payment_failure(&self, order: &Order, _customer: &Customer) -> Result<()> {
        self.record(format!("payment_failure:{}", order.id())).await
    }
}

/// Order store whose writes always fail; the transaction log still works.
#[derive(Clone, Default)]
pub struct BrokenOrderStore {
    pub log: InMemoryOrderStore,
    pub attempted: Arc<Mutex<Vec<Order>>>,
}

impl BrokenOrderStore {
    /// The last order a caller tried to save.
    pub async fn last_attempt(&self) -> Option<Order> {
        self.attempted.lock().await.last().cloned()
    }
}

#[async_trait]
impl OrderStore for BrokenOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        self.attempted.lock().await.push(order);
        Err(OrderError::Persistence("database unavailable".to_string()))
    }

    async fn get(&self, _order_id: &OrderId) -> Result<Option<Order>> {
        Ok(None)
    }

    async fn log_transaction(&self, entry: TransactionLogEntry) -> Result<()> {
        self.log.log_transaction(entry).await
    }

    async fn transactions(&self, order_id: &OrderId) -> Result<Vec<TransactionLogEntry>> {
        self.log.transactions(order_id).await
    }
}

/// A workflow whose order store rejects every save.
pub fn broken_store_workflow(
    pipeline: OrderPipeline,
) -> (FulfillmentWorkflow, BrokenOrderStore, RecordingNotifier) {
    let orders = BrokenOrderStore::default();
    let notifier = RecordingNotifier::default();
    let workflow = FulfillmentWorkflow::new(
        pipeline,
        Box::new(InMemoryCustomerStore::with_customers([customer()])),
        Box::new(orders.clone()),
        Box::new(notifier.clone()),
    );
    (workflow, orders, notifier)
}

/// A workflow over in-memory stores seeded with `customer`, returning handles to inspect afterwards.
pub fn workflow(
    customer: Customer,
    pipeline: OrderPipeline,
) -> (FulfillmentWorkflow, InMemoryOrderStore, RecordingNotifier) {
    let orders = InMemoryOrderStore::new();
    let notifier = RecordingNotifier::default();
    let workflow = FulfillmentWorkflow::new(
        pipeline,
        Box::new(InMemoryCustomerStore::with_customers([customer])),
        Box::new(orders.clone()),
        Box::new(notifier.clone()),
    );
    (workflow, orders, notifier)
}
