//! Negotiation session management

use crate::config::SessionConfig;
use crate::error::{BargainError, Result};
use crate::types::{Party, Role, Zopa};

use super::engine::Compromise;
use super::history::NegotiationTracker;
use super::types::{check_price, NegotiationOutcome, NegotiationState, Offer};

/// Prices each side has said it will accept
#[derive(Clone, Debug, Default)]
struct Acceptances {
    buyer: Option<f64>,
    seller: Option<f64>,
}

impl Acceptances {
    /// The price both sides accepted, if they agree
    fn agreed_price(&self) -> Option<f64> {
        match (self.buyer, self.seller) {
            (Some(buyer), Some(seller)) if buyer == seller => Some(buyer),
            _ => None,
        }
    }
}

/// A bilateral negotiation between a buyer and a seller, with a mediator
/// standing by to break stalemates
///
/// Offers come from outside; the session records them, watches for a
/// stalemate and decides when the negotiation is over. Once `Agreed` or
/// `Exhausted` every mutating call fails with [`BargainError::SessionClosed`].
///
/// The entry that fills the last round can still be accepted. The session
/// only becomes `Exhausted` when another offer or mediation is attempted.
#[derive(Clone, Debug)]
pub struct NegotiationSession {
    config: SessionConfig,
    tracker: NegotiationTracker,
    state: NegotiationState,
    acceptances: Acceptances,
}

impl NegotiationSession {
    /// Create a new session after validating its configuration
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            "Opening negotiation: ZOPA {}, max {} rounds",
            config.zopa(),
            config.max_rounds
        );

        Ok(Self {
            config,
            tracker: NegotiationTracker::new(),
            state: NegotiationState::Open,
            acceptances: Acceptances::default(),
        })
    }

    /// The buyer party as configured for this session
    pub fn buyer(&self) -> Party {
        self.config.buyer()
    }

    /// The seller party as configured for this session
    pub fn seller(&self) -> Party {
        self.config.seller()
    }

    /// Record an offer from the buyer or the seller
    ///
    /// Returns the state after the offer has been evaluated for stalemate.
    /// Fails without recording anything once `max_rounds` entries exist.
    pub fn receive_offer(&mut self, party: Party, offer: Offer) -> Result<NegotiationState> {
        self.ensure_open()?;

        if party.is_mediator() {
            return Err(BargainError::InvalidParty(
                "mediator offers are made through mediate()".to_string(),
            ));
        }

        self.ensure_rounds_left()?;

        if !party.accepts_price(offer.price()) {
            tracing::warn!(
                "{} offered {:.2}, beyond its own walk-away price",
                party,
                offer.price()
            );
        }

        self.tracker.add_offer(party, offer);

        if self.tracker.detect_stalemate(&self.config.stalemate) {
            tracing::info!(
                "Stalemate detected after {} rounds",
                self.tracker.round_count()
            );
            self.state = NegotiationState::StalemateDetected;

            // Skipped when no round is left for the mediator's entry
            if self.config.auto_mediate && self.rounds_left() > 0 {
                self.mediate()?;
            }
        } else {
            self.state = NegotiationState::Open;
        }

        Ok(self.state.clone())
    }

    /// Break a stalemate with a split-the-difference proposal
    ///
    /// The mediator's offer is recorded in the history and returned.
    pub fn mediate(&mut self) -> Result<Offer> {
        self.ensure_open()?;
        self.ensure_rounds_left()?;

        if self.state != NegotiationState::StalemateDetected {
            return Err(BargainError::InvalidStateTransition(format!(
                "cannot mediate in state {}",
                self.state
            )));
        }

        let quantity = self
            .tracker
            .latest()
            .map(|entry| entry.offer.quantity())
            .ok_or_else(|| {
                BargainError::InvalidStateTransition("no offers to mediate".to_string())
            })?;

        let buyer_price = self
            .tracker
            .last_offer_by(Party::is_buyer)
            .map_or(self.config.buyer_ceiling, Offer::price);
        let seller_price = self
            .tracker
            .last_offer_by(Party::is_seller)
            .map_or(self.config.seller_floor, Offer::price);

        let compromise = Compromise::between(buyer_price, seller_price);
        let offer = Offer::new(
            compromise.price,
            quantity,
            compromise.rationale(self.tracker.round_count()),
        )?;

        tracing::info!(
            "Mediator proposes {:.2} (buyer {:.2}, seller {:.2}, gap {:.2})",
            compromise.price,
            buyer_price,
            seller_price,
            compromise.gap()
        );

        self.tracker.add_offer(Party::Mediator, offer.clone());
        self.state = NegotiationState::Open;

        Ok(offer)
    }

    /// Signal that `party` accepts `price`
    ///
    /// The session is agreed once the buyer and the seller have both accepted
    /// the same price.
    pub fn accept(&mut self, party: &Party, price: f64) -> Result<NegotiationState> {
        self.ensure_open()?;
        check_price(price)?;

        if self.tracker.is_empty() {
            return Err(BargainError::InvalidStateTransition(
                "cannot accept before any offer is made".to_string(),
            ));
        }

        match party.role() {
            Role::Buyer => self.acceptances.buyer = Some(price),
            Role::Seller => self.acceptances.seller = Some(price),
            Role::Mediator => {
                return Err(BargainError::InvalidParty(
                    "only the buyer or the seller can accept".to_string(),
                ))
            }
        }
        tracing::info!("{} accepts {:.2}", party, price);

        if let Some(price) = self.acceptances.agreed_price() {
            self.agree(price);
        }

        Ok(self.state.clone())
    }

    /// Accept the price of the most recent offer
    pub fn accept_latest(&mut self, party: &Party) -> Result<NegotiationState> {
        self.ensure_open()?;
        let price = self
            .tracker
            .latest()
            .map(|entry| entry.offer.price())
            .ok_or_else(|| {
                BargainError::InvalidStateTransition(
                    "cannot accept before any offer is made".to_string(),
                )
            })?;
        self.accept(party, price)
    }

    /// Get current state
    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    /// Check if session is complete
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Get session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the offer history
    pub fn tracker(&self) -> &NegotiationTracker {
        &self.tracker
    }

    /// Number of entries recorded so far, mediator offers included
    pub fn round_count(&self) -> usize {
        self.tracker.round_count()
    }

    /// Rounds still available before the limit
    pub fn rounds_left(&self) -> usize {
        self.config.max_rounds.saturating_sub(self.round_count())
    }

    /// Get all prices in order
    pub fn price_series(&self) -> Vec<f64> {
        self.tracker.price_series()
    }

    /// Most recent offer from a party matching `predicate`
    pub fn last_offer_by<F>(&self, predicate: F) -> Option<&Offer>
    where
        F: Fn(&Party) -> bool,
    {
        self.tracker.last_offer_by(predicate)
    }

    pub fn zopa(&self) -> Zopa {
        self.config.zopa()
    }

    /// Agreed price, if the session reached agreement
    pub fn final_price(&self) -> Option<f64> {
        match self.state {
            NegotiationState::Agreed { price, .. } => Some(price),
            _ => None,
        }
    }

    /// Whether the agreed price lies in the ZOPA; `None` without agreement
    pub fn within_zopa(&self) -> Option<bool> {
        self.final_price().map(|price| self.zopa().contains(price))
    }

    /// Agreed and within the ZOPA
    pub fn is_pareto_optimal(&self) -> bool {
        self.within_zopa().unwrap_or(false)
    }

    pub fn mediator_intervened(&self) -> bool {
        self.tracker.last_offer_by(Party::is_mediator).is_some()
    }

    /// Summary record of the negotiation so far
    pub fn outcome(&self) -> NegotiationOutcome {
        let agreement = match self.state {
            NegotiationState::Agreed {
                price,
                quantity,
                total_cost,
            } => Some((price, quantity, total_cost)),
            _ => None,
        };

        NegotiationOutcome {
            state: self.state.to_string(),
            agreement_reached: agreement.is_some(),
            final_price: agreement.map(|(price, _, _)| price),
            quantity: agreement.map(|(_, quantity, _)| quantity),
            total_cost: agreement.map(|(_, _, total_cost)| total_cost),
            rounds: self.round_count(),
            mediator_intervened: self.mediator_intervened(),
            within_zopa: self.within_zopa(),
            pareto_optimal: self.is_pareto_optimal(),
            buyer_surplus: agreement.map(|(price, quantity, _)| {
                (self.config.buyer_ceiling - price) * f64::from(quantity)
            }),
            seller_surplus: agreement.map(|(price, quantity, _)| {
                (price - self.config.seller_floor) * f64::from(quantity)
            }),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state.is_terminal() {
            return Err(BargainError::SessionClosed {
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    /// Move to `Exhausted` when a new entry would exceed the round limit
    fn ensure_rounds_left(&mut self) -> Result<()> {
        if self.rounds_left() == 0 {
            tracing::warn!(
                "Negotiation exhausted after {} rounds without agreement",
                self.tracker.round_count()
            );
            self.state = NegotiationState::Exhausted;
            return Err(BargainError::SessionClosed {
                state: self.state.to_string(),
            });
        }
        Ok(())
    }

    fn agree(&mut self, price: f64) {
        let entries = self.tracker.entries();
        let quantity = entries
            .iter()
            .rev()
            .find(|entry| entry.offer.price() == price)
            .or_else(|| entries.last())
            .map_or(0, |entry| entry.offer.quantity());
        let total_cost = price * f64::from(quantity);

        tracing::info!(
            "Agreement reached at {:.2} x {} (total {:.2}), within ZOPA: {}",
            price,
            quantity,
            total_cost,
            self.zopa().contains(price)
        );

        self.state = NegotiationState::Agreed {
            price,
            quantity,
            total_cost,
        };
    }
}
