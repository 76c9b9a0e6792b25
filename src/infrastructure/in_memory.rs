use crate::domain::customer::{Customer, CustomerId};
use crate::domain::order::{Order, OrderId};
use crate::domain::ports::{CustomerStore, OrderStore, TransactionLogEntry};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory customer directory.
///
/// Stands in for the customer database; `Clone` shares the same map.
#[derive(Default, Clone)]
pub struct InMemoryCustomerStore {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `customers`.
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let map = customers.into_iter().map(|c| (c.id(), c)).collect();
        Self {
            customers: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn store(&self, customer: Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id(), customer);
        Ok(())
    }

    async fn get(&self, customer_id: CustomerId) -> Result<Option<Customer>> {
        tracing::debug!(component = "store", stage = "customer", %customer_id, "retrieving customer");
        let customers = self.customers.read().await;
        Ok(customers.get(&customer_id).cloned())
    }
}

/// A thread-safe in-memory order table with its transaction log.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    transactions: Arc<RwLock<Vec<TransactionLogEntry>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        tracing::info!(
            component = "store",
            stage = "order",
            order_id = %order.id(),
            customer_id = %order.customer_id(),
            total = %order.total_amount(),
            items = order.items().len(),
            "saving order"
        );
        let mut orders = self.orders.write().await;
        orders.insert(order.id().clone(), order);
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }

    async fn log_transaction(&self, entry: TransactionLogEntry) -> Result<()> {
        tracing::info!(
            component = "store",
            stage = "transaction",
            order_id = %entry.order_id,
            kind = ?entry.kind,
            transaction_id = %entry.transaction_id,
            "logging transaction"
        );
        let mut transactions = self.transactions.write().await;
        transactions.push(entry);
        Ok(())
    }

    async fn transactions(&self, order_id: &OrderId) -> Result<Vec<TransactionLogEntry>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|entry| &entry.order_id == order_id)
            .cloned()
            .collect())
    }
}
