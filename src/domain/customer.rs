use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque customer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer as handed to the pipeline by the data-access layer.
///
/// The identifier and the creation timestamp are fixed at construction; the
/// type exposes no way to change any field afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
    phone: String,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl Customer {
    /// Creates a customer stamped with the current UTC time.
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        shipping_address: impl Into<String>,
    ) -> Self {
        Self::with_created_at(id, name, email, phone, shipping_address, Utc::now())
    }

    /// Rebuilds a customer whose creation time is already known, e.g. when loaded from a store.
    pub fn with_created_at(
        id: CustomerId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        shipping_address: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            shipping_address: shipping_address.into(),
            created_at,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
