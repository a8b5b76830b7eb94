//! Negotiation types and state machine

use crate::error::{OfferError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured wire form of an offer
///
/// Field names follow the JSON protocol agents speak. Unknown fields are
/// rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OfferWire {
    pub offer_price: f64,
    pub quantity: i64,
    pub reasoning: String,
    #[serde(default)]
    pub is_final_offer: bool,
}

/// A validated price proposal from one party
///
/// Fields are private so an `Offer` can only exist with a positive finite
/// price and a positive quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OfferWire", into = "OfferWire")]
pub struct Offer {
    price: f64,
    quantity: u32,
    rationale: String,
    is_final: bool,
}

impl Offer {
    /// Create a new (non-final) offer
    pub fn new(price: f64, quantity: u32, rationale: impl Into<String>) -> Result<Self> {
        Ok(Self::validated(price, i64::from(quantity), rationale.into(), false)?)
    }

    /// Mark this offer as the party's final offer
    pub fn into_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// Parse an offer from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: OfferWire =
            serde_json::from_str(json).map_err(|e| OfferError::Malformed(e.to_string()))?;
        Ok(Self::try_from(wire)?)
    }

    /// Serialize this offer to its JSON wire form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get the offered unit price
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Get the offered quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Get the reasoning given with the offer
    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Check if this is marked as a final offer
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Price multiplied by quantity
    pub fn total_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    fn validated(
        price: f64,
        quantity: i64,
        rationale: String,
        is_final: bool,
    ) -> std::result::Result<Self, OfferError> {
        check_price(price)?;
        if quantity <= 0 {
            return Err(OfferError::NonPositiveQuantity(quantity));
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| OfferError::Malformed(format!("quantity {} out of range", quantity)))?;

        Ok(Self {
            price,
            quantity,
            rationale,
            is_final,
        })
    }
}

/// A price is acceptable when it is finite and strictly positive
pub(crate) fn check_price(price: f64) -> std::result::Result<(), OfferError> {
    if price.is_nan() || price.is_infinite() {
        return Err(OfferError::NonFinitePrice(price));
    }
    if price <= 0.0 {
        return Err(OfferError::NonPositivePrice(price));
    }
    Ok(())
}

impl TryFrom<OfferWire> for Offer {
    type Error = OfferError;

    fn try_from(wire: OfferWire) -> std::result::Result<Self, Self::Error> {
        Self::validated(
            wire.offer_price,
            wire.quantity,
            wire.reasoning,
            wire.is_final_offer,
        )
    }
}

impl From<Offer> for OfferWire {
    fn from(offer: Offer) -> Self {
        Self {
            offer_price: offer.price,
            quantity: i64::from(offer.quantity),
            reasoning: offer.rationale,
            is_final_offer: offer.is_final,
        }
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} x {}", self.price, self.quantity)?;
        if self.is_final {
            write!(f, " (final)")?;
        }
        Ok(())
    }
}

/// Negotiation state machine
#[derive(Clone, Debug, PartialEq)]
pub enum NegotiationState {
    /// Parties are exchanging offers
    Open,
    /// Recent prices have stopped moving; a mediator may intervene
    StalemateDetected,
    /// Buyer and seller accepted the same price
    Agreed {
        price: f64,
        quantity: u32,
        total_cost: f64,
    },
    /// Round limit reached without agreement
    Exhausted,
}

impl NegotiationState {
    /// Check if negotiation is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NegotiationState::Agreed { .. } | NegotiationState::Exhausted
        )
    }

    /// Check if negotiation is active
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NegotiationState::Open => "OPEN",
            NegotiationState::StalemateDetected => "STALEMATE_DETECTED",
            NegotiationState::Agreed { .. } => "AGREED",
            NegotiationState::Exhausted => "EXHAUSTED",
        };
        write!(f, "{}", s)
    }
}

/// Result record of a negotiation, for reporting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    pub state: String,
    pub agreement_reached: bool,
    pub final_price: Option<f64>,
    pub quantity: Option<u32>,
    pub total_cost: Option<f64>,
    pub rounds: usize,
    pub mediator_intervened: bool,
    pub within_zopa: Option<bool>,
    pub pareto_optimal: bool,
    /// `(buyer_ceiling - price) * quantity`
    pub buyer_surplus: Option<f64>,
    /// `(price - seller_floor) * quantity`
    pub seller_surplus: Option<f64>,
}
