use super::customer::{Customer, CustomerId};
use super::order::{Order, OrderId};
use crate::error::{PaymentFailure, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn store(&self, customer: Customer) -> Result<()>;
    async fn get(&self, customer_id: CustomerId) -> Result<Option<Customer>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Payment,
    Refund,
}

/// One line of the payment audit trail kept next to persisted orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionLogEntry {
    pub order_id: OrderId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub transaction_id: String,
    pub recorded_at: DateTime<Utc>,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>>;
    async fn log_transaction(&self, entry: TransactionLogEntry) -> Result<()>;
    async fn transactions(&self, order_id: &OrderId) -> Result<Vec<TransactionLogEntry>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_order_confirmation(&self, order: &Order, customer: &Customer) -> Result<()>;
    async fn send_shipping_notification(
        &self,
        order: &Order,
        customer: &Customer,
        tracking_number: &str,
    ) -> Result<()>;
    async fn send_payment_failure(&self, order: &Order, customer: &Customer) -> Result<()>;
}

/// A payment processor the dispatcher can route an order to.
///
/// Implementations report declines as `PaymentFailure::Declined` and must not panic.
pub trait PaymentProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn charge(&self, order: &Order) -> std::result::Result<(), PaymentFailure>;
    fn refund(&self, order_id: &OrderId, amount: Decimal) -> std::result::Result<(), PaymentFailure>;
}

pub type CustomerStoreBox = Box<dyn CustomerStore>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type NotifierBox = Box<dyn Notifier>;
pub type PaymentProviderBox = Box<dyn PaymentProvider>;
