//! Simulated collaborators: in-memory persistence and log-only notifications.

pub mod in_memory;
pub mod notifier;
