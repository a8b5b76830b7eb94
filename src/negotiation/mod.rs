//! Negotiation module: offers, history, mediation and the session state machine

pub mod engine;
pub mod history;
pub mod session;
pub mod types;

pub use engine::{propose_compromise, Compromise};
pub use history::{HistoryEntry, NegotiationTracker, StalemateRule};
pub use session::NegotiationSession;
pub use types::{NegotiationOutcome, NegotiationState, Offer, OfferWire};
