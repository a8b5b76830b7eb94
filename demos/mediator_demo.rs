//! Mediator demo: a negotiation that stalls and is rescued by the mediator
//!
//! 1. Buyer and seller trade offers for 100 GPU compute hours
//! 2. Their concessions shrink until the price window stops moving
//! 3. The mediator proposes the midpoint of their last offers
//! 4. Both accept and the outcome is checked against the ZOPA
//!
//! Run with: cargo run --example mediator_demo

use bargain::{NegotiationSession, NegotiationState, Offer, Party, SessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,bargain=debug")
        .init();

    let mut session = NegotiationSession::new(SessionConfig::default())?;
    let buyer = session.buyer();
    let seller = session.seller();

    println!("\n=== Mediator intervention demo ===");
    println!("ZOPA: {}\n", session.zopa());

    let offers = [
        (&buyer, 428.0, "Initial offer near middle ground"),
        (&seller, 432.0, "Counter-offer with small gap"),
        (&buyer, 429.0, "Small increment"),
        (&seller, 431.0, "Small decrement"),
        (&buyer, 429.5, "Tiny increment"),
        (&seller, 430.5, "Tiny decrement"),
    ];

    for (party, price, reasoning) in offers {
        let state = session.receive_offer(party.clone(), Offer::new(price, 100, reasoning)?)?;
        println!("Round {}: {} offers ${:.2}", session.round_count(), party, price);

        if state == NegotiationState::StalemateDetected {
            println!("\n!! Stalemate detected: prices moved less than 2% over 5 rounds");
            let proposal = session.mediate()?;
            println!("Round {}: mediator proposes ${:.2}", session.round_count(), proposal.price());
            println!("  {}\n", proposal.rationale());

            session.accept_latest(&buyer)?;
            session.accept_latest(&seller)?;
            break;
        }
    }

    let outcome = session.outcome();
    println!("Agreement reached:   {}", outcome.agreement_reached);
    if let (Some(price), Some(total)) = (outcome.final_price, outcome.total_cost) {
        println!("Final price:         ${:.2} per hour", price);
        println!("Total cost:          ${:.2}", total);
    }
    println!("Rounds:              {}", outcome.rounds);
    println!("Within ZOPA:         {:?}", outcome.within_zopa);
    println!("Pareto optimal:      {}", outcome.pareto_optimal);

    if let Some(offer) = session.last_offer_by(Party::is_mediator) {
        println!("\nMediator's offer on the wire: {}", offer.to_json()?);
    }

    Ok(())
}
