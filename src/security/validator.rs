use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderItem, PaymentMethod};
use crate::error::ValidationFailure;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MIN_ORDER_AMOUNT: Decimal = dec!(0.01);
pub const MAX_ORDER_AMOUNT: Decimal = dec!(50000.00);

const SUSPICIOUS_PATTERNS: [&str; 11] = [
    "<script>",
    "javascript:",
    "onerror=",
    "onload=",
    "SELECT * FROM",
    "DROP TABLE",
    "UNION SELECT",
    "../",
    "..\\",
    "eval(",
    "exec(",
];

const BLOCKED_IP_ADDRESSES: [&str; 3] = ["192.0.2.0", "198.51.100.0", "203.0.113.0"];

/// Characters that never appear unquoted in an address.
const EMAIL_SPECIALS: &[char] = &['<', '>', '(', ')', '[', ']', ',', ';', ':', '\\', '"'];

/// Structural and content checks applied to customers and orders before payment.
///
/// The deny-lists are fixed at compile time, so one validator can be shared by
/// any number of pipeline runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityValidator;

impl SecurityValidator {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive match against the deny-list. Empty input is never suspicious.
    pub fn contains_suspicious_content(&self, input: &str) -> bool {
        if input.is_empty() {
            return false;
        }
        let haystack = input.to_lowercase();
        SUSPICIOUS_PATTERNS
            .iter()
            .any(|pattern| haystack.contains(&pattern.to_lowercase()))
    }

    pub fn validate_customer(&self, customer: &Customer) -> Result<(), ValidationFailure> {
        tracing::debug!(
            component = "validator",
            stage = "customer",
            customer_id = %customer.id(),
            "validating customer"
        );

        let result = if customer.name().trim().is_empty() {
            Err(ValidationFailure::BlankName)
        } else if !is_valid_email(customer.email()) {
            Err(ValidationFailure::InvalidEmail(customer.email().to_string()))
        } else if self.contains_suspicious_content(customer.shipping_address()) {
            Err(ValidationFailure::SuspiciousShippingAddress)
        } else {
            Ok(())
        };

        match &result {
            Ok(()) => tracing::info!(
                component = "validator",
                stage = "customer",
                customer_id = %customer.id(),
                "customer validation passed"
            ),
            Err(reason) => tracing::warn!(
                component = "validator",
                stage = "customer",
                customer_id = %customer.id(),
                %reason,
                "customer validation failed"
            ),
        }
        result
    }

    pub fn validate_order(&self, order: &Order) -> Result<(), ValidationFailure> {
        tracing::debug!(
            component = "validator",
            stage = "order",
            order_id = %order.id(),
            "validating order"
        );

        let result = self
            .validate_amount(order.total_amount())
            .and_then(|()| self.validate_items(order.items()))
            .and_then(|()| self.validate_payment_method(order.payment_method()));

        match &result {
            Ok(()) => tracing::info!(
                component = "validator",
                stage = "order",
                order_id = %order.id(),
                "order validation passed"
            ),
            Err(reason) => tracing::warn!(
                component = "validator",
                stage = "order",
                order_id = %order.id(),
                %reason,
                "order validation failed"
            ),
        }
        result
    }

    /// Rejects blank addresses and the fixed blocklist (exact textual match).
    pub fn validate_ip_address(&self, ip_address: &str) -> Result<(), ValidationFailure> {
        if ip_address.trim().is_empty() {
            return Err(ValidationFailure::BlankIpAddress);
        }
        if BLOCKED_IP_ADDRESSES.contains(&ip_address) {
            tracing::warn!(
                component = "validator",
                stage = "ip",
                ip_address,
                "blocked IP address detected"
            );
            return Err(ValidationFailure::BlockedIpAddress(ip_address.to_string()));
        }
        Ok(())
    }

    fn validate_amount(&self, amount: Decimal) -> Result<(), ValidationFailure> {
        if (MIN_ORDER_AMOUNT..=MAX_ORDER_AMOUNT).contains(&amount) {
            Ok(())
        } else {
            Err(ValidationFailure::AmountOutOfRange(amount))
        }
    }

    fn validate_items(&self, items: &[OrderItem]) -> Result<(), ValidationFailure> {
        if items.is_empty() {
            return Err(ValidationFailure::NoItems);
        }
        for (index, item) in items.iter().enumerate() {
            if item.product_name.trim().is_empty() {
                return Err(ValidationFailure::BlankProductName { index });
            }
            if item.price <= Decimal::ZERO || item.quantity == 0 {
                return Err(ValidationFailure::InvalidItem { index });
            }
            if self.contains_suspicious_content(&item.product_name) {
                return Err(ValidationFailure::SuspiciousProductName(
                    item.product_name.clone(),
                ));
            }
        }
        Ok(())
    }

    fn validate_payment_method(&self, method: &str) -> Result<(), ValidationFailure> {
        match PaymentMethod::parse(method) {
            Some(_) => Ok(()),
            None => Err(ValidationFailure::UnsupportedPaymentMethod(
                method.to_string(),
            )),
        }
    }
}

/// Accepts a bare `local@domain` address that reads back identically once parsed.
///
/// Display-name forms, surrounding whitespace, comments and quoted local parts
/// are all rejected, because the parsed address would differ from the input.
fn is_valid_email(email: &str) -> bool {
    if email.trim().is_empty() || email.trim() != email {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') || local.is_empty() || domain.is_empty() {
        return false;
    }

    let valid_local = !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| !c.is_whitespace() && !c.is_control() && !EMAIL_SPECIALS.contains(&c));
    if !valid_local {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}
