use crate::config::{PaymentSettings, Secret};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::PaymentProvider;
use crate::error::PaymentFailure;
use rust_decimal::Decimal;

fn credential_state(secret: Option<&Secret>) -> &'static str {
    match secret {
        Some(secret) if !secret.expose().is_empty() => "configured",
        _ => "not configured",
    }
}

/// Card gateway used for `stripe` and `credit card` orders.
///
/// Simulated: no request leaves the process and every charge is approved.
#[derive(Debug, Clone, Default)]
pub struct CardProvider {
    api_key: Option<Secret>,
}

impl CardProvider {
    pub fn new(api_key: Option<Secret>) -> Self {
        Self { api_key }
    }
}

impl PaymentProvider for CardProvider {
    fn name(&self) -> &'static str {
        "stripe"
    }

    fn charge(&self, order: &Order) -> Result<(), PaymentFailure> {
        tracing::debug!(
            component = "payment",
            stage = "card",
            order_id = %order.id(),
            amount = %order.total_amount(),
            api_key = credential_state(self.api_key.as_ref()),
            "creating card payment intent"
        );
        Ok(())
    }

    fn refund(&self, order_id: &OrderId, amount: Decimal) -> Result<(), PaymentFailure> {
        tracing::debug!(
            component = "payment",
            stage = "card",
            %order_id,
            %amount,
            "issuing card refund"
        );
        Ok(())
    }
}

/// PayPal wallet checkout. Simulated like [`CardProvider`].
#[derive(Debug, Clone, Default)]
pub struct PayPalProvider {
    client_id: Option<Secret>,
    client_secret: Option<Secret>,
}

impl PayPalProvider {
    pub fn new(client_id: Option<Secret>, client_secret: Option<Secret>) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }
}

impl PaymentProvider for PayPalProvider {
    fn name(&self) -> &'static str {
        "paypal"
    }

    fn charge(&self, order: &Order) -> Result<(), PaymentFailure> {
        tracing::debug!(
            component = "payment",
            stage = "paypal",
            order_id = %order.id(),
            amount = %order.total_amount(),
            client_id = credential_state(self.client_id.as_ref()),
            client_secret = credential_state(self.client_secret.as_ref()),
            "creating PayPal order"
        );
        Ok(())
    }

    fn refund(&self, order_id: &OrderId, amount: Decimal) -> Result<(), PaymentFailure> {
        tracing::debug!(
            component = "payment",
            stage = "paypal",
            %order_id,
            %amount,
            "issuing PayPal refund"
        );
        Ok(())
    }
}

impl From<&PaymentSettings> for CardProvider {
    fn from(settings: &PaymentSettings) -> Self {
        Self::new(settings.stripe_api_key.clone())
    }
}

impl From<&PaymentSettings> for PayPalProvider {
    fn from(settings: &PaymentSettings) -> Self {
        Self::new(
            settings.paypal_client_id.clone(),
            settings.paypal_client_secret.clone(),
        )
    }
}
