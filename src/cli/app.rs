//! Script-driven negotiation runner used by the CLI

use crate::config::SessionConfig;
use crate::error::{BargainError, Result};
use crate::negotiation::types::check_price;
use crate::negotiation::{
    propose_compromise, NegotiationOutcome, NegotiationSession, NegotiationState,
    NegotiationTracker, Offer, OfferWire, StalemateRule,
};
use crate::types::{Party, Role};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One step of a negotiation script
///
/// Scripts stand in for the agents' decision logic: they say who offers
/// what, who accepts and when the mediator is called.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Offer { party: Role, offer: OfferWire },
    Accept { party: Role, price: f64 },
    AcceptLatest { party: Role },
    Mediate,
}

/// Drives a [`NegotiationSession`] from a script
pub struct ScriptRunner {
    session: NegotiationSession,
}

impl ScriptRunner {
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self {
            session: NegotiationSession::new(config)?,
        })
    }

    pub fn session(&self) -> &NegotiationSession {
        &self.session
    }

    /// Apply a single step to the session
    pub fn apply(&mut self, step: &ScriptStep) -> Result<NegotiationState> {
        match step {
            ScriptStep::Offer { party, offer } => {
                let party = self.party(*party);
                let offer = Offer::try_from(offer.clone())?;
                self.session.receive_offer(party, offer)
            }
            ScriptStep::Accept { party, price } => {
                let party = self.party(*party);
                self.session.accept(&party, *price)
            }
            ScriptStep::AcceptLatest { party } => {
                let party = self.party(*party);
                self.session.accept_latest(&party)
            }
            ScriptStep::Mediate => {
                self.session.mediate()?;
                Ok(self.session.state().clone())
            }
        }
    }

    /// Apply steps until the script ends or the session closes
    pub fn run(&mut self, steps: &[ScriptStep]) -> Result<NegotiationOutcome> {
        for (index, step) in steps.iter().enumerate() {
            let state = self.apply(step)?;
            tracing::debug!("Step {}: {:?} -> {}", index + 1, step, state);

            if state.is_terminal() {
                let remaining = steps.len() - index - 1;
                if remaining > 0 {
                    tracing::warn!(
                        "Negotiation closed ({}); skipping {} remaining steps",
                        state,
                        remaining
                    );
                }
                break;
            }
        }

        Ok(self.session.outcome())
    }

    fn party(&self, role: Role) -> Party {
        match role {
            Role::Buyer => self.session.buyer(),
            Role::Seller => self.session.seller(),
            Role::Mediator => Party::Mediator,
        }
    }
}

/// Load the session configuration, defaults when no file is given
pub async fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path).await?;
            SessionConfig::from_toml_str(&content)
        }
        None => Ok(SessionConfig::default()),
    }
}

/// Apply command-line overrides on top of a loaded configuration
pub fn apply_overrides(
    mut config: SessionConfig,
    max_rounds: Option<usize>,
    auto_mediate: bool,
) -> Result<SessionConfig> {
    if let Some(max_rounds) = max_rounds {
        config.max_rounds = max_rounds;
    }
    if auto_mediate {
        config.auto_mediate = true;
    }
    config.validate()?;
    Ok(config)
}

pub async fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

pub async fn write_history(tracker: &NegotiationTracker, path: &Path) -> Result<()> {
    tokio::fs::write(path, tracker.to_json()?).await?;
    tracing::info!(
        "Wrote {} history entries to {}",
        tracker.round_count(),
        path.display()
    );
    Ok(())
}

/// Midpoint of two positive prices
pub fn compromise(buyer_price: f64, seller_price: f64) -> Result<f64> {
    check_price(buyer_price)?;
    check_price(seller_price)?;
    Ok(propose_compromise(buyer_price, seller_price))
}

/// Evaluate the stalemate rule over a bare price series
///
/// Prices are attributed alternately to buyer and seller; the rule ignores
/// who made an offer.
pub fn stalemate_check(prices: &[f64], rule: &StalemateRule) -> Result<bool> {
    if rule.window < 2 {
        return Err(BargainError::InvalidConfig(format!(
            "window must be at least 2, got {}",
            rule.window
        )));
    }

    let defaults = SessionConfig::default();
    let mut tracker = NegotiationTracker::new();
    for (i, &price) in prices.iter().enumerate() {
        let party = if i % 2 == 0 {
            defaults.buyer()
        } else {
            defaults.seller()
        };
        tracker.add_offer(party, Offer::new(price, 1, "")?);
    }
    Ok(tracker.detect_stalemate(rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_step(party: Role, price: f64) -> ScriptStep {
        ScriptStep::Offer {
            party,
            offer: OfferWire {
                offer_price: price,
                quantity: 100,
                reasoning: String::new(),
                is_final_offer: false,
            },
        }
    }

    #[test]
    fn test_parse_script() {
        let json = r#"[
            {"action": "offer", "party": "buyer",
             "offer": {"offer_price": 370.0, "quantity": 100, "reasoning": "Opening"}},
            {"action": "accept", "party": "seller", "price": 370.0},
            {"action": "accept_latest", "party": "buyer"},
            {"action": "mediate"}
        ]"#;

        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[0], ScriptStep::Offer { party: Role::Buyer, .. }));
        assert!(matches!(steps[3], ScriptStep::Mediate));
    }

    #[test]
    fn test_run_until_agreement() {
        let mut runner = ScriptRunner::new(SessionConfig::default()).unwrap();
        let steps = vec![
            offer_step(Role::Buyer, 425.0),
            offer_step(Role::Seller, 445.0),
            ScriptStep::Accept {
                party: Role::Buyer,
                price: 440.0,
            },
            ScriptStep::Accept {
                party: Role::Seller,
                price: 440.0,
            },
            // Ignored: session already closed
            offer_step(Role::Buyer, 300.0),
        ];

        let outcome = runner.run(&steps).unwrap();
        assert!(outcome.agreement_reached);
        assert_eq!(outcome.final_price, Some(440.0));
        assert_eq!(outcome.rounds, 2);
    }

    #[test]
    fn test_run_with_mediation_step() {
        let mut runner = ScriptRunner::new(SessionConfig::default()).unwrap();
        let mut steps: Vec<ScriptStep> = [428.0, 432.0, 429.0, 431.0, 429.5]
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                offer_step(if i % 2 == 0 { Role::Buyer } else { Role::Seller }, price)
            })
            .collect();
        steps.push(ScriptStep::Mediate);
        steps.push(ScriptStep::AcceptLatest { party: Role::Buyer });
        steps.push(ScriptStep::AcceptLatest { party: Role::Seller });

        let outcome = runner.run(&steps).unwrap();
        assert!(outcome.mediator_intervened);
        assert_eq!(outcome.final_price, Some(430.25));
        assert!(outcome.pareto_optimal);
    }

    #[test]
    fn test_invalid_offer_in_script() {
        let mut runner = ScriptRunner::new(SessionConfig::default()).unwrap();
        let result = runner.run(&[offer_step(Role::Buyer, -10.0)]);

        assert!(result.unwrap_err().offer_error().is_some());
        assert_eq!(runner.session().round_count(), 0);
    }

    #[test]
    fn test_overrides() {
        let config = apply_overrides(SessionConfig::default(), Some(20), true).unwrap();
        assert_eq!(config.max_rounds, 20);
        assert!(config.auto_mediate);

        let result = apply_overrides(SessionConfig::default(), Some(0), false);
        assert!(matches!(result, Err(BargainError::InvalidConfig(_))));
    }

    #[test]
    fn test_compromise_command() {
        assert_eq!(compromise(425.0, 445.0).unwrap(), 435.0);
        assert!(compromise(-5.0, 10.0).is_err());
    }

    #[test]
    fn test_stalemate_command() {
        let rule = StalemateRule::default();
        assert!(stalemate_check(&[428.0, 432.0, 429.0, 431.0, 429.5], &rule).unwrap());
        assert!(!stalemate_check(&[370.0, 485.0, 395.0, 465.0], &rule).unwrap());
        assert!(stalemate_check(&[0.0, 1.0], &StalemateRule::new(2, 0.5)).is_err());
        assert!(stalemate_check(&[1.0, 1.0], &StalemateRule::new(1, 0.5)).is_err());
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("bargain.toml");
        let script_path = dir.path().join("script.json");
        let history_path = dir.path().join("history.json");

        std::fs::write(&config_path, "max_rounds = 4\n").unwrap();
        std::fs::write(
            &script_path,
            r#"[{"action": "offer", "party": "seller",
                 "offer": {"offer_price": 485.0, "quantity": 100, "reasoning": ""}}]"#,
        )
        .unwrap();

        tokio_test::block_on(async {
            let config = load_config(Some(&config_path)).await.unwrap();
            assert_eq!(config.max_rounds, 4);
            assert_eq!(load_config(None).await.unwrap(), SessionConfig::default());

            let steps = load_script(&script_path).await.unwrap();
            let mut runner = ScriptRunner::new(config).unwrap();
            runner.run(&steps).unwrap();

            write_history(runner.session().tracker(), &history_path)
                .await
                .unwrap();
        });

        let restored =
            NegotiationTracker::from_json(&std::fs::read_to_string(&history_path).unwrap())
                .unwrap();
        assert_eq!(restored.price_series(), vec![485.0]);
    }
}
