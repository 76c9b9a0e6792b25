//! Domain model: customers, orders and the ports the workflow talks through.

pub mod customer;
pub mod order;
pub mod ports;
