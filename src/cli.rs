//! Command-line interface parsing for the portal client
//!
//! Each subcommand maps onto one adapter and prints its result as JSON.
//! Connection settings come from the environment and can be overridden
//! with global flags.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{self, ConfigError, PortalConfig, API_URL_VAR};
use crate::data::StaticPage;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The page slug is not one of the editorial pages
    #[error("Invalid page: '{0}'. Valid pages: tentang-kami, redaksi, pedoman, disclaimer, kontak")]
    InvalidPage(String),

    /// Connection settings could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Berita Portal - query the news content API through the response cache
#[derive(Parser, Debug)]
#[command(name = "beritaportal")]
#[command(about = "News portal content API client with a response cache")]
#[command(version)]
pub struct Cli {
    /// Content API base URL (overrides BERITA_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Image host base URL (overrides BERITA_IMAGE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub image_url: Option<String>,

    /// Request timeout in seconds (overrides BERITA_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print response cache statistics to stderr when done
    #[arg(long, global = true)]
    pub cache_stats: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Every front-page section, loaded concurrently
    Home,

    /// One page of a category or front-page section
    ///
    /// Examples:
    ///   beritaportal category riau
    ///   beritaportal category headline --limit 5
    ///   beritaportal category indeks-berita --start-date 2024-07-01
    Category {
        /// Category slug, e.g. riau, nasional, berita-terkini
        slug: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Earliest publication date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        start_date: Option<NaiveDate>,
        /// Latest publication date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        end_date: Option<NaiveDate>,
    },

    /// An article with its related and "Baca juga" articles
    Article {
        id: String,
        /// Treat the id as a gallery album
        #[arg(long)]
        galeri: bool,
    },

    /// Search articles by title
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Banners, optionally only those for one placement
    Banners {
        /// Placement, e.g. "di headline"
        #[arg(long)]
        position: Option<String>,
    },

    /// Navigation categories in display order
    Categories,

    /// One page of videos
    Videos {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// An editorial page such as tentang-kami or redaksi
    Page { slug: String },
}

/// Parses an editorial page slug argument
///
/// # Arguments
/// * `s` - The page slug from the command line
///
/// # Returns
/// * `Ok(StaticPage)` if the slug names an editorial page
/// * `Err(CliError::InvalidPage)` otherwise
pub fn parse_page_arg(s: &str) -> Result<StaticPage, CliError> {
    StaticPage::from_slug(s).ok_or_else(|| CliError::InvalidPage(s.to_string()))
}

impl Cli {
    /// Resolves connection settings from flags, falling back to `lookup`
    ///
    /// `lookup` maps an environment variable name to its value; flags win
    /// over the environment.
    pub fn portal_config<F>(&self, lookup: F) -> Result<PortalConfig, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = self.api_url.clone();
        let config = PortalConfig::from_lookup(|name| {
            if name == API_URL_VAR {
                if let Some(url) = &api_url {
                    return Some(url.clone());
                }
            }
            lookup(name)
        })?;

        let config = match &self.image_url {
            Some(image_url) => config.with_image_base(image_url.as_str()),
            None => config,
        };

        Ok(match self.timeout {
            Some(secs) => config.with_timeout(config::parse_timeout(&secs.to_string())?),
            None => config,
        })
    }
}
