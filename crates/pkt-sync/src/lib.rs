//! External delivery boundary and the polling sync worker.
//!
//! The worker drains the durable queue on a fixed interval, decoupled from
//! the request paths that fill it: claiming a batch, loading each hand, and
//! pushing it across the [`Delivery`] boundary. Outcomes write back to both
//! the queue item and the hand's sync status; the original caller already
//! got its success response and never sees a delivery failure directly.
//!
//! ## Core Types
//!
//! - [`Delivery`] — the narrow outward contract: deliver, or say why not
//! - [`DeliveryError`] — retryable setback vs. permanent rejection
//! - [`Worker`] — claim, deliver, write back, repeat
mod delivery;
mod worker;

pub use delivery::*;
pub use worker::*;
