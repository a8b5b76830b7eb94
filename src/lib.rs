//! Bargain: mediated bilateral price negotiation
//!
//! A buyer and a seller exchange validated offers over a quantity of a
//! fungible resource. The engine records every offer, watches the recent
//! price window for a stalemate and, when asked, has a mediator propose a
//! split-the-difference compromise.
//! - [`Offer`]: validated proposal with a JSON wire form
//! - [`NegotiationTracker`]: append-only history and stalemate heuristic
//! - [`propose_compromise`]: the mediator's midpoint rule
//! - [`NegotiationSession`]: the round-by-round state machine
//!
//! Deciding which price to offer next is left to the caller.

pub mod cli;
pub mod config;
pub mod error;
pub mod negotiation;
pub mod types;

// Re-export commonly used types and functions
pub use config::SessionConfig;
pub use error::{BargainError, OfferError, Result};
pub use negotiation::{
    propose_compromise, Compromise, HistoryEntry, NegotiationOutcome, NegotiationSession,
    NegotiationState, NegotiationTracker, Offer, StalemateRule,
};
pub use types::{Party, Role, Zopa};
