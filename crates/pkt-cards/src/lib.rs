//! Card value types and two-character notation parsing.
//!
//! Pure data: a [`Card`] is a rank and a suit, nothing more. Hands are stored
//! as opaque card lists; no evaluation or ranking happens in this workspace.
//!
//! ## Core Types
//!
//! - [`Suit`] — clubs, diamonds, hearts, spades
//! - [`Rank`] — two through ace
//! - [`Card`] — a (rank, suit) pair encoded as a single byte
mod card;
mod rank;
mod suit;

pub use card::*;
pub use rank::*;
pub use suit::*;
