use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::error::FraudFlag;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Orders above this total are considered large.
pub const HIGH_RISK_ORDER_TOTAL: Decimal = dec!(5000.00);
/// Customers created within this many days are considered new.
pub const NEW_CUSTOMER_WINDOW_DAYS: i64 = 30;

/// Two-factor fraud rule: only a large order from a new customer is flagged.
#[derive(Debug, Default, Clone, Copy)]
pub struct FraudScorer;

impl FraudScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn check_fraud_risk(&self, order: &Order, customer: &Customer) -> Result<(), FraudFlag> {
        self.check_fraud_risk_at(order, customer, Utc::now())
    }

    /// Same as [`FraudScorer::check_fraud_risk`] with an explicit clock.
    pub fn check_fraud_risk_at(
        &self,
        order: &Order,
        customer: &Customer,
        now: DateTime<Utc>,
    ) -> Result<(), FraudFlag> {
        let high_risk_order = order.total_amount() > HIGH_RISK_ORDER_TOTAL;
        let new_customer =
            customer.created_at() > now - Duration::days(NEW_CUSTOMER_WINDOW_DAYS);

        if high_risk_order && new_customer {
            tracing::warn!(
                component = "fraud",
                stage = "assessment",
                order_id = %order.id(),
                customer_id = %customer.id(),
                total = %order.total_amount(),
                "high fraud risk: new customer with large order"
            );
            return Err(FraudFlag {
                order_total: order.total_amount(),
                customer_since: customer.created_at(),
            });
        }

        tracing::info!(
            component = "fraud",
            stage = "assessment",
            order_id = %order.id(),
            "fraud risk assessment passed"
        );
        Ok(())
    }
}
