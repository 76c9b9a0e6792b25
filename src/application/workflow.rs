use crate::application::pipeline::OrderPipeline;
use crate::domain::customer::{Customer, CustomerId};
use crate::domain::order::{Order, OrderId, OrderItem, OrderStatus};
use crate::domain::ports::{
    CustomerStoreBox, NotifierBox, OrderStoreBox, TransactionKind, TransactionLogEntry,
};
use crate::error::{FraudFlag, OrderError, Result};
use crate::payment::dispatcher::random_token;
use chrono::Utc;

/// Everything the workflow needs to place one order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    pub payment_method: String,
    pub client_ip: Option<String>,
}

/// Outcome of a completed fulfillment run.
#[derive(Debug, Clone)]
pub struct FulfillmentSummary {
    pub order: Order,
    pub customer: Customer,
    pub transaction_id: String,
    pub tracking_number: String,
    pub fraud_flag: Option<FraudFlag>,
}

/// Drives one order from customer lookup to the shipping notification.
///
/// The decision logic lives in [`OrderPipeline`]; this type wires it to the
/// stores and the notifier.
pub struct FulfillmentWorkflow {
    pipeline: OrderPipeline,
    customers: CustomerStoreBox,
    orders: OrderStoreBox,
    notifier: NotifierBox,
    send_emails: bool,
}

impl FulfillmentWorkflow {
    pub fn new(
        pipeline: OrderPipeline,
        customers: CustomerStoreBox,
        orders: OrderStoreBox,
        notifier: NotifierBox,
    ) -> Self {
        Self {
            pipeline,
            customers,
            orders,
            notifier,
            send_emails: true,
        }
    }

    /// Skips the confirmation email; the order then ships without passing through `Confirmed`.
    pub fn with_email_notifications(mut self, enabled: bool) -> Self {
        self.send_emails = enabled;
        self
    }

    pub async fn run(&self, request: OrderRequest) -> Result<FulfillmentSummary> {
        if let Some(ip) = request.client_ip.as_deref() {
            self.pipeline.validator().validate_ip_address(ip)?;
        }

        let customer = self
            .customers
            .get(request.customer_id)
            .await?
            .ok_or(OrderError::CustomerNotFound(request.customer_id))?;

        let mut order = Order::new(
            OrderId::generate(),
            customer.id(),
            request.items,
            request.payment_method,
        );
        tracing::info!(
            component = "workflow",
            stage = "order",
            order_id = %order.id(),
            total = %order.total_amount(),
            items = order.items().len(),
            "order created"
        );

        let receipt = match self.pipeline.process(&mut order, &customer) {
            Ok(receipt) => receipt,
            Err(e @ OrderError::Payment(_)) => {
                self.notify_payment_failure(&order, &customer).await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if let Err(e) = self.orders.store(order.clone()).await {
            tracing::error!(
                component = "workflow",
                stage = "persist",
                order_id = %order.id(),
                error = %e,
                "failed to save order, refunding"
            );
            self.pipeline.dispatcher().refund_payment(&order)?;
            let refund = TransactionLogEntry {
                order_id: order.id().clone(),
                kind: TransactionKind::Refund,
                amount: order.total_amount(),
                transaction_id: receipt.transaction_id,
                recorded_at: Utc::now(),
            };
            if let Err(log_err) = self.orders.log_transaction(refund).await {
                tracing::warn!(component = "workflow", stage = "persist", error = %log_err, "refund not logged");
            }
            return Err(OrderError::Persistence(e.to_string()));
        }

        self.orders
            .log_transaction(TransactionLogEntry {
                order_id: order.id().clone(),
                kind: TransactionKind::Payment,
                amount: order.total_amount(),
                transaction_id: receipt.transaction_id.clone(),
                recorded_at: Utc::now(),
            })
            .await?;

        if self.send_emails {
            match self.notifier.send_order_confirmation(&order, &customer).await {
                Ok(()) => order.update_status(OrderStatus::Confirmed)?,
                Err(e) => tracing::warn!(
                    component = "workflow",
                    stage = "confirmation",
                    order_id = %order.id(),
                    error = %e,
                    "confirmation email not sent"
                ),
            }
        }

        order.update_status(OrderStatus::Shipped)?;
        let tracking_number = format!("TRK-{}", random_token());
        if let Err(e) = self
            .notifier
            .send_shipping_notification(&order, &customer, &tracking_number)
            .await
        {
            tracing::warn!(
                component = "workflow",
                stage = "shipping",
                order_id = %order.id(),
                error = %e,
                "shipping notification not sent"
            );
        }

        tracing::info!(
            component = "workflow",
            stage = "complete",
            order_id = %order.id(),
            transaction_id = %receipt.transaction_id,
            %tracking_number,
            "order processing completed"
        );

        Ok(FulfillmentSummary {
            order,
            customer,
            transaction_id: receipt.transaction_id,
            tracking_number,
            fraud_flag: receipt.fraud_flag,
        })
    }

    async fn notify_payment_failure(&self, order: &Order, customer: &Customer) {
        if let Err(e) = self.notifier.send_payment_failure(order, customer).await {
            tracing::warn!(
                component = "workflow",
                stage = "payment_failure",
                order_id = %order.id(),
                error = %e,
                "payment failure notification not sent"
            );
        }
    }
}
