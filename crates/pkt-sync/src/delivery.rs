use pkt_core::Unique;
use pkt_records::HandRecord;

/// Why a delivery attempt did not land.
///
/// Retryable covers the transient world: network refusals, 5xx-class
/// responses, attempt timeouts. Fatal means the collaborator rejected the
/// payload permanently; retrying would burn budget on a lost cause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeliveryError {
    #[error("retryable: {0}")]
    Retryable(String),
    #[error("fatal: {0}")]
    Fatal(String),
}

/// The only boundary this workspace calls outward across.
///
/// Implementations wrap whatever transport reaches the external
/// record-keeper. Delivery is at-least-once: the remote side is assumed to
/// upsert idempotently, so a redelivered hand overwrites its prior copy.
#[allow(async_fn_in_trait)]
pub trait Delivery {
    async fn deliver(&self, hand: &HandRecord) -> Result<(), DeliveryError>;
}

/// Transport stand-in that records nothing: logs the hand and reports
/// success. Lets the daemon run end to end before a real collaborator is
/// wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct Devnull;

impl Delivery for Devnull {
    async fn deliver(&self, hand: &HandRecord) -> Result<(), DeliveryError> {
        log::info!(
            "[devnull] hand {} from {} ({} actions, result {})",
            hand.id(),
            hand.seat(),
            hand.actions().len(),
            hand.result(),
        );
        Ok(())
    }
}
