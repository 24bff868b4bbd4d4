//! Berita Portal CLI - query the news content API
//!
//! Runs one adapter per invocation and prints its view model as pretty JSON
//! on stdout. Logs go to stderr and are filtered with `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use beritaportal::cli::{parse_page_arg, Cli, Command};
use beritaportal::data::ListQuery;
use beritaportal::portal::{estimate_total, section_title};
use beritaportal::PortalClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("beritaportal=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(portal: &PortalClient, command: Command) -> Result<()> {
    match command {
        Command::Home => print_json(&portal.home_sections().await),
        Command::Category {
            slug,
            page,
            limit,
            start_date,
            end_date,
        } => {
            let query = ListQuery::new(page, limit).with_dates(start_date, end_date);
            let listing = portal.fetch_by_category(&slug, &query).await;
            let total = estimate_total(listing.pagination.as_ref(), page, limit, listing.articles.len());
            print_json(&json!({
                "title": section_title(&slug),
                "page": page,
                "total": total,
                "articles": listing.articles,
                "pagination": listing.pagination,
            }))
        }
        Command::Article { id, galeri: true } => match portal.album_by_id(&id).await {
            Some(album) => print_json(&album),
            None => bail!("Album {} not found", id),
        },
        Command::Article { id, galeri: false } => match portal.article_detail(&id).await {
            Some(detail) => print_json(&detail),
            None => bail!("Article {} not found", id),
        },
        Command::Search { query, page, limit } => {
            print_json(&portal.search(&query, &ListQuery::new(page, limit)).await)
        }
        Command::Banners { position: Some(position) } => {
            print_json(&portal.banners_by_position(&position).await)
        }
        Command::Banners { position: None } => print_json(&portal.banners().await),
        Command::Categories => print_json(&portal.categories().await),
        Command::Videos { page, limit } => print_json(&portal.videos(page, limit).await),
        Command::Page { slug } => {
            let page = parse_page_arg(&slug)?;
            match portal.static_page(page).await {
                Some(content) => print_json(&content),
                None => bail!("Page {} not found", page.slug()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli
        .portal_config(|name| std::env::var(name).ok())
        .context("Failed to resolve portal configuration")?;
    info!(api_url = %config.api_url, "Using content API");

    let portal = PortalClient::new(config)?;
    let outcome = run(&portal, cli.command.clone()).await;

    if cli.cache_stats {
        let stats = portal.cache_control().stats();
        eprintln!("{}", serde_json::to_string_pretty(&stats)?);
    }

    outcome
}
