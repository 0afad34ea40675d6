mod args;
mod render;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sitebazaar_core::catalog::Catalog;
use sitebazaar_core::models::draft::ListingForm;
use sitebazaar_core::models::filter::{BrowseFilters, Selector, SortKey};
use sitebazaar_core::models::listing::{Category, Tech};
use sitebazaar_core::scheduler::TokioScheduler;
use sitebazaar_core::services::auction_service::{format_money, BidOutcome};
use sitebazaar_core::storage::file::FileStore;
use sitebazaar_core::storage::local::LocalStorage;
use sitebazaar_core::{SiteBazaar, SubmitOutcome};

use args::Args;

const DATA_DIR_ENV: &str = "SITEBAZAAR_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".sitebazaar";

/// Grace period after a counter-bid's delay before reporting the outcome.
const COUNTER_BID_GRACE: Duration = Duration::from_millis(150);

const USAGE: &str = "\
usage: sitebazaar <command> [args]

commands:
  browse [--query Q] [--category C|All] [--tech T|All] [--auction-only]
         [--min N] [--max N] [--sort price|endingSoon|newest|popular]
  show <id>                 view a listing (recorded in recents)
  fav <id>                  toggle a favorite
  favorites                 list favorites
  recent                    list recently viewed
  auction <id>              auction status and bid history
  bid <id> <amount>         place a bid
  buy <id>                  buy a listing now
  purchases                 list purchases
  sell --title T --category C --tech a,b --price P --pitch P --tags a,b
       [--screenshots u1,u2] [--auction --ends-at 2030-01-01T12:00]
  drafts                    list saved listing drafts
  reset                     delete all local data

env:
  SITEBAZAAR_DATA_DIR       data directory (default .sitebazaar)
  RUST_LOG                  log filter (default warn)";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let Some(command) = args.command.clone() else {
        println!("{USAGE}");
        return Ok(());
    };
    if args.flag("help") {
        println!("{USAGE}");
        return Ok(());
    }

    let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("opening data directory {data_dir}"))?;
    debug!(dir = %data_dir, "using file store");

    let now = Utc::now();
    let mut app = SiteBazaar::new(
        LocalStorage::new(Arc::new(store)),
        Catalog::seed(now),
        Arc::new(TokioScheduler::current()?),
    );

    match command.as_str() {
        "browse" => browse(&app, &args)?,
        "show" => {
            let id = args.positional(0, "id")?;
            match app.view_listing(id, now)? {
                Some(l) => println!("{}", render::listing_detail(l)),
                None => println!("Listing not found: {id}"),
            }
        }
        "fav" => {
            let id = args.positional(0, "id")?;
            let res = app.toggle_favorite(id)?;
            println!(
                "{} {id} ({} favorites)",
                if res.saved { "Saved" } else { "Removed" },
                res.ids.len()
            );
        }
        "favorites" => {
            for l in app.favorite_listings() {
                println!("{}", render::listing_row(l, now));
            }
        }
        "recent" => {
            for l in app.recent_listings() {
                println!("{}", render::listing_row(l, now));
            }
        }
        "auction" => {
            let session = app.open_auction(args.positional(0, "id")?, now)?;
            println!("{}", render::auction_summary(&session, now));
        }
        "bid" => bid(&app, &args).await?,
        "buy" => {
            let id = args.positional(0, "id")?;
            let quote = app.checkout_quote(id)?;
            let purchase = app.buy_now(id, now)?;
            println!(
                "Purchase complete (mock): {}: ${} + ${} fees = ${}",
                purchase.title,
                format_money(quote.price),
                format_money(quote.fees),
                format_money(quote.total)
            );
        }
        "purchases" => {
            for p in app.purchases() {
                println!(
                    "{}  {:<32} ${:>8}  {}",
                    p.id,
                    p.title,
                    format_money(p.price),
                    p.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        "sell" => sell(&app, &args)?,
        "drafts" => {
            for d in app.user_listings() {
                println!(
                    "{}  {:<32} {:<10} ${}{}",
                    d.id,
                    d.title,
                    d.category.to_string(),
                    format_money(d.price),
                    if d.is_auction { "  (auction)" } else { "" }
                );
            }
        }
        "reset" => {
            let removed = app.reset_all()?;
            println!("Removed {removed} stored keys");
        }
        other => bail!("unknown command '{other}'\n\n{USAGE}"),
    }

    Ok(())
}

fn browse(app: &SiteBazaar, args: &Args) -> Result<()> {
    let mut filters: BrowseFilters = app.load_filters();

    if let Some(q) = args.value("query") {
        filters.query = q.to_string();
    }
    if let Some(c) = args.parsed::<Selector<Category>>("category")? {
        filters.category = c;
    }
    if let Some(t) = args.parsed::<Selector<Tech>>("tech")? {
        filters.tech = t;
    }
    if args.flag("auction-only") {
        filters.auction_only = true;
    }
    if let Some(min) = args.parsed::<f64>("min")? {
        filters.price_min = min;
    }
    if let Some(max) = args.parsed::<f64>("max")? {
        filters.price_max = max;
    }
    if let Some(sort) = args.parsed::<SortKey>("sort")? {
        filters.sort = sort;
    }

    let filters = filters.sanitized();
    app.save_filters(&filters)?;

    let now = Utc::now();
    let result = app.browse(&filters);
    println!("{} results (sort: {})", result.total, filters.sort);
    for l in &result.items {
        println!("{}", render::listing_row(l, now));
    }
    Ok(())
}

async fn bid(app: &SiteBazaar, args: &Args) -> Result<()> {
    let id = args.positional(0, "id")?;
    let amount = args.positional(1, "amount")?;

    let mut session = app.open_auction(id, Utc::now())?;
    match session.place_bid(amount, Utc::now())? {
        BidOutcome::Rejected(reason) => println!("{reason}"),
        BidOutcome::Accepted { bid, counter_bid } => {
            println!("Bid placed: ${}", format_money(bid.amount));
            // Stay around long enough to see whether someone answers.
            if let Some(counter) = counter_bid {
                tokio::time::sleep(counter.delay + COUNTER_BID_GRACE).await;
            }
            println!("{}", render::auction_summary(&session, Utc::now()));
        }
    }
    Ok(())
}

fn sell(app: &SiteBazaar, args: &Args) -> Result<()> {
    let tech_stack = args
        .value("tech")
        .unwrap_or("")
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Tech>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(anyhow::Error::msg)?;

    let defaults = ListingForm::default();
    let form = ListingForm {
        title: args.value("title").unwrap_or_default().to_string(),
        category: args.parsed::<Category>("category")?,
        tech_stack: if tech_stack.is_empty() {
            defaults.tech_stack
        } else {
            tech_stack
        },
        price: args.value("price").map(str::to_string).unwrap_or(defaults.price),
        is_auction: args.flag("auction"),
        ends_at: args.value("ends-at").unwrap_or_default().to_string(),
        short_pitch: args.value("pitch").unwrap_or_default().to_string(),
        tags: args.value("tags").map(str::to_string).unwrap_or(defaults.tags),
        screenshots: args.value("screenshots").unwrap_or_default().to_string(),
    };

    match app.submit_listing(&form, Utc::now())? {
        SubmitOutcome::Saved(draft) => println!("Listing draft saved (local): {}", draft.id),
        SubmitOutcome::Invalid(errors) => {
            println!("Please fix the errors:");
            for (field, message) in errors.iter() {
                println!("  {field}: {message}");
            }
        }
    }
    Ok(())
}
