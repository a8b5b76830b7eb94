//! Bargain CLI binary

use anyhow::Context;
use bargain::cli::{app, Cli, Commands, ScriptRunner};
use bargain::{Offer, StalemateRule};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            config,
            max_rounds,
            auto_mediate,
            history_out,
        } => {
            let config = app::load_config(config.as_deref())
                .await
                .context("Failed to load configuration")?;
            let config = app::apply_overrides(config, max_rounds, auto_mediate)?;

            let steps = app::load_script(&script)
                .await
                .with_context(|| format!("Failed to load script {}", script.display()))?;
            tracing::info!("Replaying {} steps from {}", steps.len(), script.display());

            let mut runner = ScriptRunner::new(config)?;
            let outcome = runner.run(&steps).context("Negotiation script failed")?;

            if let Some(path) = history_out {
                app::write_history(runner.session().tracker(), &path)
                    .await
                    .context("Failed to write history")?;
            }

            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Commands::Offer { json } => {
            let offer = Offer::from_json(&json)?;
            tracing::info!("Valid offer: {}", offer);
            println!("{}", offer.to_json()?);
        }

        Commands::Compromise {
            buyer_price,
            seller_price,
        } => {
            let price = app::compromise(buyer_price, seller_price)?;
            println!("{:.2}", price);
        }

        Commands::Stalemate {
            prices,
            window,
            threshold,
        } => {
            let rule = StalemateRule::new(window, threshold);
            let stalled = app::stalemate_check(&prices, &rule)?;
            tracing::info!(
                "Stalemate over last {} of {} prices: {}",
                window,
                prices.len(),
                stalled
            );
            println!("{}", stalled);
        }
    }

    Ok(())
}
