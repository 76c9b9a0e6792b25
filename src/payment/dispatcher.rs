use crate::config::PaymentSettings;
use crate::domain::order::{Order, OrderStatus, PaymentMethod};
use crate::domain::ports::{PaymentProvider, PaymentProviderBox};
use crate::error::PaymentFailure;
use crate::payment::providers::{CardProvider, PayPalProvider};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of the random part of generated identifiers.
const TOKEN_LEN: usize = 8;

/// Random uppercase alphanumeric token.
pub(crate) fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}

/// Routes orders to the provider matching their payment method.
///
/// The dispatcher applies exactly one status transition per routed charge:
/// `Payment Confirmed` when the provider accepts, `Payment Failed` otherwise.
/// Orders with an unroutable method are left untouched.
pub struct PaymentDispatcher {
    card: PaymentProviderBox,
    paypal: PaymentProviderBox,
}

impl PaymentDispatcher {
    pub fn new(card: PaymentProviderBox, paypal: PaymentProviderBox) -> Self {
        Self { card, paypal }
    }

    /// Builds the dispatcher over the simulated providers.
    pub fn from_settings(settings: &PaymentSettings) -> Self {
        Self::new(
            Box::new(CardProvider::from(settings)),
            Box::new(PayPalProvider::from(settings)),
        )
    }

    fn route(&self, method: &str) -> Option<&dyn PaymentProvider> {
        match PaymentMethod::parse(method)? {
            PaymentMethod::Stripe | PaymentMethod::CreditCard => Some(self.card.as_ref()),
            PaymentMethod::PayPal => Some(self.paypal.as_ref()),
            // Accepted by validation, but no provider handles it.
            PaymentMethod::DebitCard => None,
        }
    }

    pub fn process_payment(&self, order: &mut Order) -> Result<(), PaymentFailure> {
        tracing::info!(
            component = "payment",
            stage = "dispatch",
            order_id = %order.id(),
            method = order.payment_method(),
            amount = %order.total_amount(),
            "processing payment"
        );

        let Some(provider) = self.route(order.payment_method()) else {
            tracing::warn!(
                component = "payment",
                stage = "dispatch",
                order_id = %order.id(),
                method = order.payment_method(),
                "unknown payment method"
            );
            return Err(PaymentFailure::UnrecognizedMethod(
                order.payment_method().to_string(),
            ));
        };

        if !order.status().can_transition_to(OrderStatus::PaymentConfirmed) {
            return Err(PaymentFailure::InvalidState(order.status()));
        }

        let outcome = provider.charge(order);
        let next = match &outcome {
            Ok(()) => OrderStatus::PaymentConfirmed,
            Err(_) => OrderStatus::PaymentFailed,
        };
        // Both outcomes are reachable from the state checked above.
        if let Err(e) = order.update_status(next) {
            tracing::error!(component = "payment", stage = "dispatch", error = %e, "status update rejected");
            return Err(PaymentFailure::InvalidState(order.status()));
        }

        match &outcome {
            Ok(()) => tracing::info!(
                component = "payment",
                stage = "dispatch",
                order_id = %order.id(),
                provider = provider.name(),
                "payment processed successfully"
            ),
            Err(reason) => tracing::warn!(
                component = "payment",
                stage = "dispatch",
                order_id = %order.id(),
                provider = provider.name(),
                %reason,
                "payment failed"
            ),
        }
        outcome
    }

    /// `TXN-<yyyyMMddHHmmss>-<token>`; only uniqueness is promised to callers.
    pub fn generate_transaction_id(&self) -> String {
        format!(
            "TXN-{}-{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            random_token()
        )
    }

    /// Reverses the payment of `order` through the provider that charged it.
    pub fn refund_payment(&self, order: &Order) -> Result<(), PaymentFailure> {
        let order_id = order.id();
        let amount = order.total_amount();
        tracing::info!(
            component = "payment",
            stage = "refund",
            %order_id,
            %amount,
            method = order.payment_method(),
            "processing refund"
        );
        let provider = self.route(order.payment_method()).ok_or_else(|| {
            PaymentFailure::UnrecognizedMethod(order.payment_method().to_string())
        })?;
        provider.refund(order_id, amount)?;
        tracing::info!(
            component = "payment",
            stage = "refund",
            %order_id,
            provider = provider.name(),
            "refund processed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::CustomerId;
    use crate::domain::order::{OrderId, OrderItem};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        calls: Arc<AtomicUsize>,
        refunds: Arc<AtomicUsize>,
        approve: bool,
    }

    impl PaymentProvider for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn charge(&self, _order: &Order) -> Result<(), PaymentFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.approve {
                Ok(())
            } else {
                Err(PaymentFailure::Declined {
                    provider: "counting",
                    reason: "insufficient funds".to_string(),
                })
            }
        }

        fn refund(&self, _order_id: &OrderId, _amount: Decimal) -> Result<(), PaymentFailure> {
            self.refunds.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn counting_dispatcher(approve: bool) -> (PaymentDispatcher, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let card_calls = Arc::new(AtomicUsize::new(0));
        let paypal_calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = PaymentDispatcher::new(
            Box::new(Counting {
                calls: card_calls.clone(),
                refunds: card_calls.clone(),
                approve,
            }),
            Box::new(Counting {
                calls: paypal_calls.clone(),
                refunds: paypal_calls.clone(),
                approve,
            }),
        );
        (dispatcher, card_calls, paypal_calls)
    }

    fn order(method: &str) -> Order {
        Order::new(
            OrderId::new("ORD-PAY"),
            CustomerId(1001),
            vec![OrderItem::new("Laptop Stand", dec!(49.99), 1)],
            method,
        )
    }

    #[test]
    fn test_routes_by_method() {
        let (dispatcher, card, paypal) = counting_dispatcher(true);

        for method in ["stripe", "Credit Card", "STRIPE"] {
            let mut o = order(method);
            dispatcher.process_payment(&mut o).unwrap();
            assert_eq!(o.status(), OrderStatus::PaymentConfirmed);
        }
        let mut o = order("PayPal");
        dispatcher.process_payment(&mut o).unwrap();

        assert_eq!(card.load(Ordering::SeqCst), 3);
        assert_eq!(paypal.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unrecognized_method_leaves_status() {
        let (dispatcher, card, paypal) = counting_dispatcher(true);

        for method in ["bitcoin", "debit card"] {
            let mut o = order(method);
            let result = dispatcher.process_payment(&mut o);
            assert_eq!(
                result,
                Err(PaymentFailure::UnrecognizedMethod(method.to_string()))
            );
            assert_eq!(o.status(), OrderStatus::Pending);
        }
        assert_eq!(card.load(Ordering::SeqCst) + paypal.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_declined_payment_marks_failed() {
        let (dispatcher, _, _) = counting_dispatcher(false);
        let mut o = order("stripe");

        let result = dispatcher.process_payment(&mut o);
        assert!(matches!(result, Err(PaymentFailure::Declined { provider: "counting", .. })));
        assert_eq!(o.status(), OrderStatus::PaymentFailed);
    }

    #[test]
    fn test_paid_order_is_not_charged_twice() {
        let (dispatcher, card, _) = counting_dispatcher(true);
        let mut o = order("stripe");
        dispatcher.process_payment(&mut o).unwrap();

        let result = dispatcher.process_payment(&mut o);
        assert_eq!(
            result,
            Err(PaymentFailure::InvalidState(OrderStatus::PaymentConfirmed))
        );
        assert_eq!(card.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_order_under_review_can_still_be_paid() {
        let (dispatcher, _, _) = counting_dispatcher(true);
        let mut o = order("paypal");
        o.update_status(OrderStatus::PendingReview).unwrap();
        dispatcher.process_payment(&mut o).unwrap();
        assert_eq!(o.status(), OrderStatus::PaymentConfirmed);
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let dispatcher = PaymentDispatcher::from_settings(&PaymentSettings::default());
        let ids: HashSet<String> = (0..100)
            .map(|_| dispatcher.generate_transaction_id())
            .collect();
        assert_eq!(ids.len(), 100);

        let id = ids.iter().next().unwrap();
        assert!(id.starts_with("TXN-"));
        let token = id.rsplit('-').next().unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_refund_goes_to_the_charging_provider() {
        let (dispatcher, card, paypal) = counting_dispatcher(true);

        let mut o = order("PayPal");
        dispatcher.process_payment(&mut o).unwrap();
        dispatcher.refund_payment(&o).unwrap();
        assert_eq!(card.load(Ordering::SeqCst), 0);
        assert_eq!(paypal.load(Ordering::SeqCst), 2);

        let mut o = order("Credit Card");
        dispatcher.process_payment(&mut o).unwrap();
        dispatcher.refund_payment(&o).unwrap();
        assert_eq!(card.load(Ordering::SeqCst), 2);
        assert_eq!(paypal.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_refund_of_unrouted_method_fails() {
        let dispatcher = PaymentDispatcher::from_settings(&PaymentSettings::default());
        assert_eq!(
            dispatcher.refund_payment(&order("debit card")),
            Err(PaymentFailure::UnrecognizedMethod("debit card".to_string()))
        );
        assert_eq!(dispatcher.refund_payment(&order("stripe")), Ok(()));
    }
}
