use crate::config::{PipelineSettings, ReviewPolicy};
use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderStatus};
use crate::error::{FraudFlag, OrderError, Result};
use crate::payment::PaymentDispatcher;
use crate::security::{FraudScorer, SecurityValidator};

/// What the pipeline hands back once the payment went through.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    /// Set when the fraud rule flagged the order and the policy let it continue.
    pub fraud_flag: Option<FraudFlag>,
}

/// Validation-and-dispatch pipeline for a single customer/order pair.
///
/// Runs customer validation, order validation, the fraud rule and payment
/// dispatch, in that order. The first failing stage decides the error variant,
/// so callers can tell a validation failure from a fraud hold or a payment
/// failure.
pub struct OrderPipeline {
    validator: SecurityValidator,
    fraud: FraudScorer,
    dispatcher: PaymentDispatcher,
    settings: PipelineSettings,
}

impl OrderPipeline {
    pub fn new(dispatcher: PaymentDispatcher, settings: PipelineSettings) -> Self {
        Self {
            validator: SecurityValidator::new(),
            fraud: FraudScorer::new(),
            dispatcher,
            settings,
        }
    }

    pub fn validator(&self) -> &SecurityValidator {
        &self.validator
    }

    pub fn dispatcher(&self) -> &PaymentDispatcher {
        &self.dispatcher
    }

    pub fn process(&self, order: &mut Order, customer: &Customer) -> Result<PaymentReceipt> {
        self.validator.validate_customer(customer)?;
        self.validator.validate_order(order)?;

        let fraud_flag = if self.settings.enable_fraud_detection {
            self.assess_fraud(order, customer)?
        } else {
            tracing::debug!(component = "pipeline", stage = "fraud", "fraud detection disabled");
            None
        };

        self.dispatcher.process_payment(order)?;
        let transaction_id = self.dispatcher.generate_transaction_id();
        tracing::info!(
            component = "pipeline",
            stage = "complete",
            order_id = %order.id(),
            %transaction_id,
            status = %order.status(),
            "order paid"
        );

        Ok(PaymentReceipt {
            transaction_id,
            fraud_flag,
        })
    }

    fn assess_fraud(&self, order: &mut Order, customer: &Customer) -> Result<Option<FraudFlag>> {
        let Err(flag) = self.fraud.check_fraud_risk(order, customer) else {
            return Ok(None);
        };

        order.update_status(OrderStatus::PendingReview)?;
        match self.settings.review_policy {
            ReviewPolicy::Halt => {
                tracing::warn!(
                    component = "pipeline",
                    stage = "fraud",
                    order_id = %order.id(),
                    "manual review required, payment halted"
                );
                Err(OrderError::FraudReview(flag))
            }
            ReviewPolicy::Continue => {
                tracing::warn!(
                    component = "pipeline",
                    stage = "fraud",
                    order_id = %order.id(),
                    "manual review required, continuing to payment"
                );
                Ok(Some(flag))
            }
        }
    }
}
