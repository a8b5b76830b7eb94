//! Mediator compromise engine

use serde::{Deserialize, Serialize};

/// Split-the-difference: the arithmetic midpoint of two prices
///
/// Symmetric in its arguments and always within `[min(a, b), max(a, b)]`.
pub fn propose_compromise(price_a: f64, price_b: f64) -> f64 {
    let midpoint = (price_a + price_b) / 2.0;
    if midpoint.is_finite() {
        midpoint
    } else {
        // a + b overflowed
        price_a / 2.0 + price_b / 2.0
    }
}

/// A mediator proposal between the parties' last positions
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Compromise {
    pub buyer_price: f64,
    pub seller_price: f64,
    pub price: f64,
}

impl Compromise {
    pub fn between(buyer_price: f64, seller_price: f64) -> Self {
        Self {
            buyer_price,
            seller_price,
            price: propose_compromise(buyer_price, seller_price),
        }
    }

    /// Distance between the two positions
    pub fn gap(&self) -> f64 {
        (self.seller_price - self.buyer_price).abs()
    }

    /// Explanation attached to the mediator's offer
    pub fn rationale(&self, rounds: usize) -> String {
        format!(
            "Mediator intervention: after {} rounds price convergence has stalled. \
             Proposing split-the-difference at ${:.2}, exactly halfway between the \
             last buyer offer (${:.2}) and the last seller offer (${:.2}).",
            rounds, self.price, self.buyer_price, self.seller_price
        )
    }
}
