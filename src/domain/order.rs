use crate::domain::customer::CustomerId;
use crate::error::{OrderError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds an id from the current UTC time, `ORD-yyyyMMddHHmmss`.
    pub fn generate() -> Self {
        Self(format!("ORD-{}", Utc::now().format("%Y%m%d%H%M%S")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single line of an order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(product_name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            product_name: product_name.into(),
            price,
            quantity,
        }
    }

    /// `price * quantity`, saturating at the bounds of `Decimal`.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// Lifecycle of an order.
///
/// `Pending -> [Pending Review] -> Payment Confirmed | Payment Failed -> Confirmed -> Shipped`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Pending Review")]
    PendingReview,
    #[serde(rename = "Payment Confirmed")]
    PaymentConfirmed,
    #[serde(rename = "Payment Failed")]
    PaymentFailed,
    #[serde(rename = "Confirmed")]
    Confirmed,
    #[serde(rename = "Shipped")]
    Shipped,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::PendingReview => "Pending Review",
            OrderStatus::PaymentConfirmed => "Payment Confirmed",
            OrderStatus::PaymentFailed => "Payment Failed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
        }
    }

    /// Whether `next` is a forward edge of the lifecycle graph.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, PendingReview)
                | (Pending | PendingReview, PaymentConfirmed | PaymentFailed)
                | (PaymentConfirmed, Confirmed)
                | (PaymentConfirmed | Confirmed, Shipped)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment methods the system knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Stripe,
    CreditCard,
    PayPal,
    DebitCard,
}

impl PaymentMethod {
    /// Parses a payment method ignoring ASCII case. Surrounding whitespace is not trimmed.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_lowercase().as_str() {
            "stripe" => Some(PaymentMethod::Stripe),
            "credit card" => Some(PaymentMethod::CreditCard),
            "paypal" => Some(PaymentMethod::PayPal),
            "debit card" => Some(PaymentMethod::DebitCard),
            _ => None,
        }
    }
}

/// A purchase request.
///
/// The order owns its items and computes the total once, at construction.
/// The status only moves forward through [`Order::update_status`].
/// A total that does not fit a `Decimal` saturates, which the amount range check rejects.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    items: Vec<OrderItem>,
    total_amount: Decimal,
    status: OrderStatus,
    payment_method: String,
    created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        items: Vec<OrderItem>,
        payment_method: impl Into<String>,
    ) -> Self {
        let total_amount = items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()));
        Self {
            id,
            customer_id,
            items,
            total_amount,
            status: OrderStatus::Pending,
            payment_method: payment_method.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &OrderId {
        &self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moves the order to `next`, rejecting anything that is not a forward edge.
    pub fn update_status(&mut self, next: OrderStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::info!(
            component = "order",
            stage = "status",
            order_id = %self.id,
            from = %self.status,
            to = %next,
            "order status updated"
        );
        self.status = next;
        Ok(())
    }
}
