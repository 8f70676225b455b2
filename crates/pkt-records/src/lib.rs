//! Hand records, betting sub-records, and sync queue entries.
//!
//! The persisted shape of a tracked session: a [`HandRecord`] owns its
//! ordered [`PlayerAction`] list (cascade on delete), while [`SyncItem`]
//! entries reference hands without owning them — one is enqueued for every
//! create or update, and only the newest matters for current sync state.
//!
//! ## Core Types
//!
//! - [`HandRecord`] — a recorded hand with cards, actions, result, notes
//! - [`HandDraft`] — validated input for create and update
//! - [`PlayerAction`] — one betting decision, ordered within its hand
//! - [`SyncItem`] — one unit of pending propagation work
//! - [`Stats`] — pure aggregate rollup over a hand list
mod draft;
mod error;
mod hand;
mod play;
mod stats;
mod sync;

pub use draft::*;
pub use error::*;
pub use hand::*;
pub use play::*;
pub use stats::*;
pub use sync::*;

/// Marker for hand owners. Authentication is out of scope here; callers
/// supply an already-resolved `ID<Owner>`.
#[derive(Debug, Clone, Copy)]
pub struct Owner;
