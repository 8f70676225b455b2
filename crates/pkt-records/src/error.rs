/// Failures surfaced by the hand record store and sync queue.
///
/// Absence and foreign ownership collapse into the same [`NotFound`] so a
/// caller can never learn whether someone else's hand exists.
///
/// [`NotFound`]: RecordError::NotFound
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("hand not found")]
    NotFound,
    #[cfg(feature = "database")]
    #[error(transparent)]
    Store(#[from] pkt_pg::PgErr),
}

impl RecordError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound)
    }
}
