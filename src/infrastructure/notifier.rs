use crate::config::NotificationSettings;
use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::ports::Notifier;
use crate::error::Result;
use crate::security::sanitize;
use async_trait::async_trait;
use std::fmt::Write;

/// Simulated mail delivery: messages are rendered and logged, never sent.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    settings: NotificationSettings,
}

impl LogNotifier {
    pub fn new(settings: NotificationSettings) -> Self {
        Self { settings }
    }

    fn api_key_state(&self) -> &'static str {
        match &self.settings.sendgrid_api_key {
            Some(key) if !key.expose().is_empty() => "configured",
            _ => "not configured",
        }
    }
}

/// Renders the confirmation email. Every customer- or catalogue-supplied field is escaped.
pub fn render_order_confirmation(order: &Order, customer: &Customer) -> String {
    let mut items = String::new();
    for item in order.items() {
        // Writing to a String cannot fail.
        let _ = writeln!(
            items,
            "  - {} (Qty: {}) - ${}",
            sanitize(&item.product_name),
            item.quantity,
            item.line_total()
        );
    }

    format!(
        "Dear {name},\n\
         \n\
         Thank you for your order!\n\
         \n\
         Order Details:\n\
         - Order ID: {order_id}\n\
         - Order Date: {date}\n\
         - Total Amount: ${total}\n\
         - Payment Method: {method}\n\
         \n\
         Items Ordered:\n\
         {items}\n\
         Shipping Address:\n\
         {address}\n\
         \n\
         We will send you another email once your order ships.\n",
        name = sanitize(customer.name()),
        order_id = order.id(),
        date = order.created_at().format("%Y-%m-%d %H:%M:%S"),
        total = order.total_amount(),
        method = sanitize(order.payment_method()),
        items = items,
        address = sanitize(customer.shipping_address()),
    )
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_order_confirmation(&self, order: &Order, customer: &Customer) -> Result<()> {
        let body = render_order_confirmation(order, customer);
        tracing::info!(
            component = "notifier",
            stage = "confirmation",
            order_id = %order.id(),
            to = customer.email(),
            api_key = self.api_key_state(),
            body_len = body.len(),
            "order confirmation sent"
        );
        tracing::debug!(component = "notifier", stage = "confirmation", %body);
        Ok(())
    }

    async fn send_shipping_notification(
        &self,
        order: &Order,
        customer: &Customer,
        tracking_number: &str,
    ) -> Result<()> {
        tracing::info!(
            component = "notifier",
            stage = "shipping",
            order_id = %order.id(),
            to = customer.email(),
            smtp_host = self.settings.smtp_host.as_deref().unwrap_or("not configured"),
            tracking_number,
            "shipping notification sent"
        );
        Ok(())
    }

    async fn send_payment_failure(&self, order: &Order, customer: &Customer) -> Result<()> {
        tracing::info!(
            component = "notifier",
            stage = "payment_failure",
            order_id = %order.id(),
            to = customer.email(),
            "payment failure notification sent"
        );
        Ok(())
    }
}
