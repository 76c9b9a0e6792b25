//! Application layer: the validation-and-dispatch pipeline and the
//! fulfillment workflow that wires it to persistence and notifications.

pub mod pipeline;
pub mod workflow;
