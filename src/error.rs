//! Error types for bargain

use thiserror::Error;

/// Reasons an offer fails validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfferError {
    #[error("price must be positive, got {0}")]
    NonPositivePrice(f64),

    #[error("price must be a finite number, got {0}")]
    NonFinitePrice(f64),

    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(i64),

    #[error("malformed offer: {0}")]
    Malformed(String),
}

/// Main error type for bargain
#[derive(Error, Debug)]
pub enum BargainError {
    // Offer validation
    #[error("Invalid offer: {0}")]
    InvalidOffer(#[from] OfferError),

    // Session errors
    #[error("Negotiation session is closed (state: {state})")]
    SessionClosed { state: String },

    #[error("Invalid negotiation state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Invalid party: {0}")]
    InvalidParty(String),

    #[error("Invalid negotiation history: {0}")]
    InvalidHistory(String),

    // Configuration errors
    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BargainError {
    /// Offer validation failure, if this is one
    pub fn offer_error(&self) -> Option<&OfferError> {
        match self {
            BargainError::InvalidOffer(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Result type alias for bargain operations
pub type Result<T> = std::result::Result<T, BargainError>;
