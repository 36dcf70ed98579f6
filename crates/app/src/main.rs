mod cli;

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;

use shelflife_core::{Clock, SystemClock};
use shelflife_products::ExpirationSummary;
use shelflife_infra::{
    CountdownScheduler, JsonFileProductStore, ProductCatalog, ProductFilter, ProductOverview,
    TrackerConfig,
};

use crate::cli::{Cli, Command, countdown_line, status_line};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    shelflife_observability::init();

    let cli = Cli::parse();
    let mut config = TrackerConfig::from_env().context("invalid configuration")?;
    if let Some(path) = cli.data_path {
        config.data_path = path;
    }
    tracing::debug!(path = %config.data_path.display(), "using product file");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let catalog = ProductCatalog::new(JsonFileProductStore::new(&config.data_path), clock.clone());

    match cli.command {
        Command::List {
            query,
            category,
            json,
        } => {
            let filter = ProductFilter { query, category };
            let overview = catalog.overview(&filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print_table(&overview);
            }
        }
        Command::Add(args) => {
            let details = args.into_details()?;
            let product = catalog.add(details)?;
            println!("{}", product.id_typed());
        }
        Command::Update(args) => {
            let current = catalog
                .get(args.id)?
                .with_context(|| format!("no product with id {}", args.id))?;
            let details = args.apply_to(current.details())?;
            catalog.update(args.id, details)?;
        }
        Command::Delete { id } => {
            catalog.delete(id)?;
        }
        Command::Watch { id } => {
            let Some(product) = catalog.get(id)? else {
                bail!("no product with id {id}");
            };
            let summary = ExpirationSummary::evaluate(&product, clock.now());
            println!("{}", status_line(&product, &summary));
            if !summary.is_tracked() {
                return Ok(());
            }

            let mut scheduler = CountdownScheduler::new(clock, config.tick_interval);
            let mut watch = scheduler.watch(&product);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    next = watch.changed() => match next {
                        Some(countdown) => println!("{}", countdown_line(&product, &countdown)),
                        None => break,
                    },
                }
            }
        }
        Command::Summary { json } => {
            let counts = catalog.tier_counts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
                return Ok(());
            }
            println!("FRESH        {}", counts.fresh);
            println!("EXPIRY SOON  {}", counts.expiry_soon);
            println!("EXPIRED      {}", counts.expired);
        }
    }

    Ok(())
}

fn print_table(rows: &[ProductOverview]) {
    if rows.is_empty() {
        println!("no products");
        return;
    }
    for row in rows {
        let expires = row
            .summary
            .governing_expiration
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36}  {:<12}  {:<5}  {:<24}  {:<10}  {}",
            row.product.id_typed(),
            row.summary.tier.label(),
            row.product.category(),
            row.product.display_name(),
            expires,
            row.summary.status_text(),
        );
    }
}
