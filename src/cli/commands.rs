//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bargain")]
#[command(about = "Bargain - mediated bilateral price negotiation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a negotiation script and print the outcome
    Run {
        /// JSON script of offer / accept / mediate steps
        script: PathBuf,

        /// Session configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the round limit
        #[arg(short, long)]
        max_rounds: Option<usize>,

        /// Let the mediator step in automatically on stalemate
        #[arg(short, long)]
        auto_mediate: bool,

        /// Write the offer history to this file
        #[arg(long)]
        history_out: Option<PathBuf>,
    },

    /// Validate an offer given in its JSON wire form
    Offer {
        /// e.g. '{"offer_price": 420.5, "quantity": 100, "reasoning": "..."}'
        json: String,
    },

    /// Split the difference between two prices
    Compromise {
        #[arg(allow_negative_numbers = true)]
        buyer_price: f64,

        #[arg(allow_negative_numbers = true)]
        seller_price: f64,
    },

    /// Check a price series for stalemate
    Stalemate {
        /// Prices in chronological order
        #[arg(required = true, allow_negative_numbers = true)]
        prices: Vec<f64>,

        /// Number of most recent prices examined
        #[arg(short, long, default_value = "5")]
        window: usize,

        /// Maximum relative spread counted as stalled
        #[arg(short, long, default_value = "0.02")]
        threshold: f64,
    },
}
