//! Append-only negotiation history and the stalemate heuristic

use crate::error::{BargainError, Result};
use crate::types::Party;
use serde::{Deserialize, Serialize};

use super::types::Offer;

/// One recorded offer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based, increases by one per entry
    pub round: usize,
    pub party: Party,
    pub offer: Offer,
}

/// Sliding-window stalemate test parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StalemateRule {
    /// Number of most recent entries examined
    pub window: usize,
    /// Maximum relative spread `(max - min) / max` counted as no progress
    pub threshold: f64,
}

impl StalemateRule {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self { window, threshold }
    }
}

impl Default for StalemateRule {
    fn default() -> Self {
        Self {
            window: 5,
            threshold: 0.02,
        }
    }
}

/// Ordered log of every offer made in a negotiation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NegotiationTracker {
    entries: Vec<HistoryEntry>,
}

impl NegotiationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from persisted entries
    ///
    /// Round numbers must run `1, 2, 3, ...` in order.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Result<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.round != index + 1 {
                return Err(BargainError::InvalidHistory(format!(
                    "entry {} has round {}, expected {}",
                    index,
                    entry.round,
                    index + 1
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a persisted history (JSON array of entries)
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Serialize the entries as a pretty-printed JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Record an offer under the next round number
    pub fn add_offer(&mut self, party: Party, offer: Offer) -> &HistoryEntry {
        let round = self.entries.len() + 1;
        tracing::debug!("Round {}: {} offers {}", round, party, offer);
        self.entries.push(HistoryEntry {
            round,
            party,
            offer,
        });
        &self.entries[round - 1]
    }

    /// Whether the last `rule.window` prices have stopped moving
    ///
    /// Always false until the window is full, and for windows shorter than
    /// two prices.
    pub fn detect_stalemate(&self, rule: &StalemateRule) -> bool {
        if rule.window < 2 || self.entries.len() < rule.window {
            return false;
        }

        let window = &self.entries[self.entries.len() - rule.window..];
        let (min, max) = window
            .iter()
            .map(|entry| entry.offer.price())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            });

        if max == 0.0 {
            return false;
        }

        let spread = (max - min).abs() / max;
        spread <= rule.threshold
    }

    /// Most recent offer from a party matching `predicate`
    pub fn last_offer_by<F>(&self, predicate: F) -> Option<&Offer>
    where
        F: Fn(&Party) -> bool,
    {
        self.entries
            .iter()
            .rev()
            .find(|entry| predicate(&entry.party))
            .map(|entry| &entry.offer)
    }

    /// The last `n` entries, or all of them if fewer exist
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Every recorded price in chronological order
    pub fn price_series(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.offer.price()).collect()
    }

    /// Number of entries recorded so far
    pub fn round_count(&self) -> usize {
        self.entries.len()
    }

    /// Get all entries
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Get the most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Check if no offer has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
