//! Payment dispatch over the configured providers.

pub mod dispatcher;
pub mod providers;

pub use dispatcher::PaymentDispatcher;
