//! Core types used throughout bargain

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a party plays in the negotiation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Buyer,
    Seller,
    Mediator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Mediator => "mediator",
        };
        write!(f, "{}", s)
    }
}

/// A participant in the negotiation, labelled with its walk-away price
///
/// The engine never calls behavior on a party; it only tags offers with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Party {
    /// Buyer with the highest price it will pay per unit
    Buyer { ceiling: f64 },
    /// Seller with the lowest price it will take per unit
    Seller { floor: f64 },
    Mediator,
}

impl Party {
    pub fn role(&self) -> Role {
        match self {
            Party::Buyer { .. } => Role::Buyer,
            Party::Seller { .. } => Role::Seller,
            Party::Mediator => Role::Mediator,
        }
    }

    pub fn is_buyer(&self) -> bool {
        matches!(self, Party::Buyer { .. })
    }

    pub fn is_seller(&self) -> bool {
        matches!(self, Party::Seller { .. })
    }

    pub fn is_mediator(&self) -> bool {
        matches!(self, Party::Mediator)
    }

    /// Whether `price` respects this party's own walk-away limit
    pub fn accepts_price(&self, price: f64) -> bool {
        match self {
            Party::Buyer { ceiling } => price <= *ceiling,
            Party::Seller { floor } => price >= *floor,
            Party::Mediator => true,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.role())
    }
}

/// Zone of possible agreement: `[seller_floor, buyer_ceiling]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zopa {
    pub seller_floor: f64,
    pub buyer_ceiling: f64,
}

impl Zopa {
    pub fn new(seller_floor: f64, buyer_ceiling: f64) -> Self {
        Self {
            seller_floor,
            buyer_ceiling,
        }
    }

    /// True when the floor lies above the ceiling and no price can satisfy both
    pub fn is_empty(&self) -> bool {
        self.seller_floor > self.buyer_ceiling
    }

    pub fn contains(&self, price: f64) -> bool {
        self.seller_floor <= price && price <= self.buyer_ceiling
    }
}

impl fmt::Display for Zopa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}, {:.2}]", self.seller_floor, self.buyer_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_roles() {
        let buyer = Party::Buyer { ceiling: 500.0 };
        let seller = Party::Seller { floor: 350.0 };

        assert_eq!(buyer.role(), Role::Buyer);
        assert!(buyer.is_buyer());
        assert!(!buyer.is_seller());
        assert!(seller.is_seller());
        assert!(Party::Mediator.is_mediator());
        assert_eq!(Party::Mediator.to_string(), "mediator");
    }

    #[test]
    fn test_walk_away_limits() {
        let buyer = Party::Buyer { ceiling: 500.0 };
        assert!(buyer.accepts_price(500.0));
        assert!(!buyer.accepts_price(500.01));

        let seller = Party::Seller { floor: 350.0 };
        assert!(seller.accepts_price(350.0));
        assert!(!seller.accepts_price(349.99));

        assert!(Party::Mediator.accepts_price(1.0));
    }

    #[test]
    fn test_zopa_bounds_are_inclusive() {
        let zopa = Zopa::new(350.0, 500.0);
        assert!(!zopa.is_empty());
        assert!(zopa.contains(350.0));
        assert!(zopa.contains(500.0));
        assert!(zopa.contains(435.0));
        assert!(!zopa.contains(520.0));
        assert!(!zopa.contains(349.0));
    }

    #[test]
    fn test_empty_zopa_contains_nothing() {
        let zopa = Zopa::new(500.0, 350.0);
        assert!(zopa.is_empty());
        assert!(!zopa.contains(400.0));
        assert!(!zopa.contains(350.0));
        assert!(!zopa.contains(500.0));
    }

    #[test]
    fn test_party_serialization() {
        let buyer = Party::Buyer { ceiling: 500.0 };
        let serialized = serde_json::to_string(&buyer).unwrap();
        assert_eq!(serialized, r#"{"role":"buyer","ceiling":500.0}"#);

        let deserialized: Party = serde_json::from_str(&serialized).unwrap();
        assert_eq!(buyer, deserialized);

        let mediator: Party = serde_json::from_str(r#"{"role":"mediator"}"#).unwrap();
        assert_eq!(mediator, Party::Mediator);
    }
}
