//! Betting stages, player actions, and the pure pot accounting engine.
//!
//! Everything here is stateless value manipulation: given an ordered action
//! log, derive the pot, the outstanding bet, and the betting round, and gate
//! new actions against that state. No I/O, no clocks, no randomness — the
//! same log always derives the same state, whether during live entry or when
//! a stored hand is re-rendered.
//!
//! ## Core Types
//!
//! - [`Stage`] — the four betting rounds, floored by community-card count
//! - [`Seat`] — the recording player's table position
//! - [`Action`] — fold, check, call, bet, raise, shove
//! - [`Accounting`] — running pot / bet-to-call / stage state
mod accounting;
mod action;
mod seat;
mod stage;

pub use accounting::*;
pub use action::*;
pub use seat::*;
pub use stage::*;
