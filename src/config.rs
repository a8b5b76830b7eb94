//! Session configuration

use crate::error::{BargainError, Result};
use crate::negotiation::StalemateRule;
use crate::types::{Party, Zopa};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one negotiation session
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration:
///
/// ```toml
/// max_rounds = 10
/// buyer_ceiling = 500.0
/// seller_floor = 350.0
/// auto_mediate = false
///
/// [stalemate]
/// window = 5
/// threshold = 0.02
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Entries recorded before the session is exhausted
    pub max_rounds: usize,
    /// Highest price the buyer will pay per unit
    pub buyer_ceiling: f64,
    /// Lowest price the seller will take per unit
    pub seller_floor: f64,
    /// Mediate as soon as a stalemate is detected
    pub auto_mediate: bool,
    pub stalemate: StalemateRule,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            buyer_ceiling: 500.0,
            seller_floor: 350.0,
            auto_mediate: false,
            stalemate: StalemateRule::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(BargainError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("buyer_ceiling", self.buyer_ceiling),
            ("seller_floor", self.seller_floor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BargainError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.stalemate.window < 2 {
            return Err(BargainError::InvalidConfig(format!(
                "stalemate.window must be at least 2, got {}",
                self.stalemate.window
            )));
        }
        if !self.stalemate.threshold.is_finite() || self.stalemate.threshold < 0.0 {
            return Err(BargainError::InvalidConfig(format!(
                "stalemate.threshold must be a non-negative number, got {}",
                self.stalemate.threshold
            )));
        }
        if self.seller_floor > self.buyer_ceiling {
            tracing::warn!(
                "Empty ZOPA: seller floor {} exceeds buyer ceiling {}",
                self.seller_floor,
                self.buyer_ceiling
            );
        }
        Ok(())
    }

    pub fn zopa(&self) -> Zopa {
        Zopa::new(self.seller_floor, self.buyer_ceiling)
    }

    pub fn buyer(&self) -> Party {
        Party::Buyer {
            ceiling: self.buyer_ceiling,
        }
    }

    pub fn seller(&self) -> Party {
        Party::Seller {
            floor: self.seller_floor,
        }
    }
}
