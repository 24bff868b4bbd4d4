//! Portal client: the adapter layer over the fetch pipeline
//!
//! Adapters come in pairs. `try_*` methods surface every [`FetchError`];
//! their plain counterparts log the error and fall back to an empty value so
//! that a failing section renders empty instead of failing the page. Because
//! failures are never cached, the next request simply tries again.

use futures::future::join_all;
use tracing::warn;
use url::form_urlencoded;

use crate::cache::TtlCache;
use crate::config::{ConfigError, PortalConfig};
use crate::data::articles::{RELATED_LIMIT, RELATED_SHOWN};
use crate::data::{extract_baca_juga_ids, ArticleDetail, HomeSections, ListQuery, Pagination, Section};
use crate::fetch::{CacheControl, ContentFetcher, FetchError};

/// Client for the content API endpoints
#[derive(Debug, Clone)]
pub struct PortalClient {
    pub(crate) fetcher: ContentFetcher,
    pub(crate) config: PortalConfig,
}

impl PortalClient {
    /// Creates a client with its own HTTP client and a fresh response cache
    pub fn new(config: PortalConfig) -> Result<Self, ConfigError> {
        let client = config.http_client()?;
        Ok(Self::with_fetcher(
            config,
            ContentFetcher::with_cache(client, TtlCache::new()),
        ))
    }

    /// Creates a client over an existing fetcher, sharing its cache
    pub fn with_fetcher(config: PortalConfig, fetcher: ContentFetcher) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &ContentFetcher {
        &self.fetcher
    }

    /// Handle for inspecting and invalidating cached responses
    pub fn cache_control(&self) -> CacheControl {
        self.fetcher.cache_control()
    }

    /// Absolute URL for an API path
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    /// Absolute URL for an API path with an encoded query string
    pub(crate) fn endpoint_with_query(&self, path: &str, pairs: &[(&str, String)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
        format!("{}?{}", self.endpoint(path), query.finish())
    }

    /// Loads every front-page listing concurrently
    pub async fn home_sections(&self) -> HomeSections {
        let query = ListQuery::default();
        let (
            headlines,
            pilihan_editor,
            berita_terkini,
            terpopuler,
            gagasan,
            riau,
            nasional,
            tips_kesehatan,
            advertorial,
            galeri,
        ) = futures::join!(
            self.section(Section::Headline, &query),
            self.section(Section::PilihanEditor, &query),
            self.section(Section::BeritaTerkini, &query),
            self.section(Section::Terpopuler, &query),
            self.section(Section::Gagasan, &query),
            self.section(Section::Riau, &query),
            self.section(Section::Nasional, &query),
            self.section(Section::TipsKesehatan, &query),
            self.section(Section::Advertorial, &query),
            self.section(Section::Galeri, &query),
        );

        HomeSections {
            headlines,
            pilihan_editor,
            berita_terkini,
            terpopuler,
            gagasan,
            riau,
            nasional,
            tips_kesehatan,
            advertorial,
            galeri,
        }
    }

    /// Loads an article with its related and "Baca juga" articles
    ///
    /// Returns `None` when the article itself is unavailable. Related and
    /// linked articles that fail to load are left out.
    pub async fn article_detail(&self, id: &str) -> Option<ArticleDetail> {
        let article = self.article_by_id(id).await?;

        let linked_ids = extract_baca_juga_ids(&article.isi);
        let related = async {
            match article.id {
                Some(article_id) => self.related_articles(article_id, RELATED_LIMIT).await,
                None => Vec::new(),
            }
        };
        let linked = join_all(linked_ids.iter().map(|linked_id| self.article_by_id(linked_id)));

        let (mut related, linked) = futures::join!(related, linked);
        related.truncate(RELATED_SHOWN);

        Some(ArticleDetail {
            article,
            related,
            baca_juga: linked.into_iter().flatten().collect(),
        })
    }
}

/// Logs a failed adapter call and substitutes the empty value
pub(crate) fn degrade<T: Default>(what: &str, result: Result<T, FetchError>) -> T {
    result.unwrap_or_else(|error| {
        warn!(%error, "{} unavailable, showing empty result", what);
        T::default()
    })
}

/// Heading for a category route; unknown slugs are upper-cased
pub fn section_title(slug: &str) -> String {
    match slug {
        "zonariau" => Section::Riau.title().to_string(),
        "indeks-berita" => "INDEKS BERITA".to_string(),
        _ => match Section::from_slug(slug) {
            Some(section) => section.title().to_string(),
            None => slug.to_uppercase(),
        },
    }
}

/// Total item count for a category pager
///
/// Prefers the server's pagination. Without it, a full page implies at least
/// one more item beyond the current page.
pub fn estimate_total(
    pagination: Option<&Pagination>,
    page: u32,
    per_page: u32,
    returned: usize,
) -> u64 {
    let page = u64::from(page.max(1));
    let per_page = u64::from(per_page);

    match pagination {
        Some(p) if p.total_pages > 0 => {
            if p.total_items > 0 {
                u64::from(p.total_items)
            } else {
                u64::from(p.total_pages) * per_page
            }
        }
        _ if returned as u64 == per_page => page * per_page + 1,
        _ => (page - 1) * per_page + returned as u64,
    }
}
