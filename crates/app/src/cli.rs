//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use shelflife_core::{DomainResult, ProductId};
use shelflife_products::{
    Category, Countdown, ExpirationSummary, PaoMonths, Product, ProductDetails, parse_date_input,
};

#[derive(Debug, Parser)]
#[command(name = "shelflife", version, about = "Track cosmetic products and their remaining usable life")]
pub struct Cli {
    /// Product file (overrides SHELFLIFE_DATA_PATH).
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List products, most recently added first.
    List {
        /// Case-insensitive name filter.
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, short)]
        category: Option<Category>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Start tracking a product.
    Add(AddArgs),
    /// Edit a product's name, category or limits.
    Update(UpdateArgs),
    /// Stop tracking a product.
    Delete { id: ProductId },
    /// Follow a product's countdown until it expires or Ctrl-C.
    Watch { id: ProductId },
    /// Count products per freshness tier.
    Summary {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, short)]
    pub category: Category,
    /// Period after opening, e.g. `12` or `12M`.
    #[arg(long)]
    pub pao: Option<String>,
    /// Fixed expiry date, `YYYY-MM-DD`.
    #[arg(long)]
    pub expiry: Option<String>,
}

impl AddArgs {
    pub fn into_details(self) -> DomainResult<ProductDetails> {
        Ok(ProductDetails {
            name: self.name,
            category: self.category,
            pao_months: parse_optional(self.pao.as_deref(), PaoMonths::parse)?,
            expiry_date: parse_optional(self.expiry.as_deref(), parse_date_input)?,
        })
    }
}

/// Omitted flags keep the current value; an empty `--pao ""` or
/// `--expiry ""` clears it.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: ProductId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, short)]
    pub category: Option<Category>,
    #[arg(long)]
    pub pao: Option<String>,
    #[arg(long)]
    pub expiry: Option<String>,
}

impl UpdateArgs {
    pub fn apply_to(&self, mut details: ProductDetails) -> DomainResult<ProductDetails> {
        if let Some(name) = &self.name {
            details.name = name.clone();
        }
        if let Some(category) = self.category {
            details.category = category;
        }
        if let Some(pao) = &self.pao {
            details.pao_months = PaoMonths::parse(pao)?;
        }
        if let Some(expiry) = &self.expiry {
            details.expiry_date = parse_date_input(expiry)?;
        }
        Ok(details)
    }
}

/// First line printed by `watch`. Untracked products show their tracking
/// note rather than a countdown.
pub fn status_line(product: &Product, summary: &ExpirationSummary) -> String {
    format!("{}: {}", product.display_name(), summary.status_text())
}

/// Line printed by `watch` for each countdown update.
pub fn countdown_line(product: &Product, countdown: &Countdown) -> String {
    format!("{}: {countdown}", product.display_name())
}

fn parse_optional<T>(
    raw: Option<&str>,
    parse: impl Fn(&str) -> DomainResult<Option<T>>,
) -> DomainResult<Option<T>> {
    match raw {
        Some(raw) => parse(raw),
        None => Ok(None),
    }
}
