use crate::domain::customer::CustomerId;
use crate::domain::order::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// A structural rule violated by a customer or an order.
///
/// Validation failures are final: the caller must abort or ask for a corrected input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("customer name is blank")]
    BlankName,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
    #[error("suspicious content in shipping address")]
    SuspiciousShippingAddress,
    #[error("order amount {0} is outside the accepted range")]
    AmountOutOfRange(Decimal),
    #[error("order has no items")]
    NoItems,
    #[error("item {index} has a blank product name")]
    BlankProductName { index: usize },
    #[error("item {index} has a non-positive price or quantity")]
    InvalidItem { index: usize },
    #[error("suspicious content in product name: {0}")]
    SuspiciousProductName(String),
    #[error("unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),
    #[error("client IP address is blank")]
    BlankIpAddress,
    #[error("blocked IP address: {0}")]
    BlockedIpAddress(String),
}

/// Soft signal raised by the fraud rule: a large order from a recently created customer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("order total {order_total} from a customer created at {customer_since}")]
pub struct FraudFlag {
    pub order_total: Decimal,
    pub customer_since: DateTime<Utc>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentFailure {
    #[error("unrecognized payment method: {0}")]
    UnrecognizedMethod(String),
    #[error("{provider} declined the payment: {reason}")]
    Declined {
        provider: &'static str,
        reason: String,
    },
    #[error("order in status {0} cannot be charged")]
    InvalidState(OrderStatus),
}

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationFailure),
    #[error("Fraud review required: {0}")]
    FraudReview(#[from] FraudFlag),
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentFailure),
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Customer {0} not found")]
    CustomerNotFound(CustomerId),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Notification error: {0}")]
    Notification(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OrderError>;
