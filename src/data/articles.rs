//! Article listings, search and detail adapters
//!
//! Builds content API URLs for each listing, sends them through the cached
//! fetch pipeline and shapes the records into [`Article`] view models.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::format::{self, image_or_placeholder};
use super::{lenient, Article, ArticlePage, Listing, OneOrMany};
use crate::cache::CacheParams;
use crate::fetch::{FetchError, FetchOptions};
use crate::portal::{degrade, PortalClient};

/// Cache lifetime for flag-filtered listings (headline, editor's picks, ...)
const FILTER_TTL_MINUTES: i64 = 3;

/// Cache lifetime for category listings
const CATEGORY_TTL_MINUTES: i64 = 5;

/// Cache lifetime for the latest-news listing
const LATEST_TTL_MINUTES: i64 = 2;

/// Cache lifetime for single articles
const ARTICLE_TTL_MINUTES: i64 = 5;

/// Cache lifetime for search results
const SEARCH_TTL_MINUTES: i64 = 5;

/// Related articles requested for a detail page
pub const RELATED_LIMIT: u32 = 5;

/// Related articles shown on a detail page
pub const RELATED_SHOWN: usize = 3;

static ARTICLE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*href\s*=\s*["']?([^"'\s>]*/article/(\d+)[^"'\s>]*)"#)
        .expect("valid article link regex")
});

/// Page, page size and optional date window for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            start_date: None,
            end_date: None,
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    fn page_pairs<'a>(&self) -> Vec<(&'a str, String)> {
        vec![
            ("halaman", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }

    fn date_pairs<'a>(&self) -> Vec<(&'a str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }
        pairs
    }

    fn cache_params(&self) -> CacheParams {
        CacheParams::new()
            .with("page", self.page)
            .with("limit", self.limit)
            .with_opt("startDate", self.start_date.map(|d| d.to_string()))
            .with_opt("endDate", self.end_date.map(|d| d.to_string()))
    }
}

/// Listings with a fixed place on the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Headline,
    PilihanEditor,
    BeritaTerkini,
    Terpopuler,
    Gagasan,
    Riau,
    Nasional,
    TipsKesehatan,
    Advertorial,
    Galeri,
}

/// Which endpoint family backs a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// `/berita` with `<flag>=1`
    Filter(&'static str),
    /// `/kategori/page/<slug>`
    Kategori(&'static str),
    /// `/berita` unfiltered
    Latest,
    /// `/albumgaleri`
    Gallery,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Headline,
        Section::PilihanEditor,
        Section::BeritaTerkini,
        Section::Terpopuler,
        Section::Gagasan,
        Section::Riau,
        Section::Nasional,
        Section::TipsKesehatan,
        Section::Advertorial,
        Section::Galeri,
    ];

    /// Maps a category route slug to its section
    ///
    /// `indeks-berita` is an alias for the latest-news listing.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "headline" => Some(Section::Headline),
            "pilihan-editor" => Some(Section::PilihanEditor),
            "berita-terkini" | "indeks-berita" => Some(Section::BeritaTerkini),
            "terpopuler" => Some(Section::Terpopuler),
            "gagasan" => Some(Section::Gagasan),
            "riau" => Some(Section::Riau),
            "nasional" => Some(Section::Nasional),
            "tips-kesehatan" => Some(Section::TipsKesehatan),
            "advertorial" => Some(Section::Advertorial),
            "galeri" => Some(Section::Galeri),
            _ => None,
        }
    }

    /// Route slug
    pub fn slug(self) -> &'static str {
        match self {
            Section::Headline => "headline",
            Section::PilihanEditor => "pilihan-editor",
            Section::BeritaTerkini => "berita-terkini",
            Section::Terpopuler => "terpopuler",
            Section::Gagasan => "gagasan",
            Section::Riau => "riau",
            Section::Nasional => "nasional",
            Section::TipsKesehatan => "tips-kesehatan",
            Section::Advertorial => "advertorial",
            Section::Galeri => "galeri",
        }
    }

    /// Heading shown above the listing
    pub fn title(self) -> &'static str {
        match self {
            Section::Headline => "HEADLINE",
            Section::PilihanEditor => "PILIHAN EDITOR",
            Section::BeritaTerkini => "BERITA TERKINI",
            Section::Terpopuler => "TERPOPULER",
            Section::Gagasan => "GAGASAN",
            Section::Riau => "RIAU",
            Section::Nasional => "NASIONAL",
            Section::TipsKesehatan => "TIPS & KESEHATAN",
            Section::Advertorial => "ADVERTORIAL",
            Section::Galeri => "GALERI",
        }
    }

    fn source(self) -> Source {
        match self {
            Section::Headline => Source::Filter("headline"),
            Section::PilihanEditor => Source::Filter("pilihaneditor"),
            Section::Terpopuler => Source::Filter("terpopuler"),
            Section::Advertorial => Source::Filter("advertorial"),
            Section::Gagasan => Source::Kategori("gagasan"),
            Section::Riau => Source::Kategori("zonariau"),
            Section::Nasional => Source::Kategori("nasional"),
            Section::TipsKesehatan => Source::Kategori("tips&kesehatan"),
            Section::BeritaTerkini => Source::Latest,
            Section::Galeri => Source::Gallery,
        }
    }
}

/// Article as sent by the content API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ArticleRecord {
    #[serde(deserialize_with = "lenient::id")]
    id_berita: Option<u64>,
    judul_berita: Option<String>,
    judul_khusus: Option<String>,
    nama_kategori: Option<String>,
    permalink: Option<String>,
    sumber: Option<String>,
    tanggal: Option<String>,
    waktu: Option<String>,
    isi: Option<String>,
    gambar: Option<String>,
    foto_kecil: Option<String>,
    ket_foto: Option<String>,
    reporter: Option<String>,
    penulis: Option<String>,
    warta: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    counter: u64,
    url: Option<String>,
    tags: Value,
}

impl Article {
    /// Shapes an API record for display
    pub(crate) fn from_record(record: ArticleRecord, image_base: &str, now: NaiveDateTime) -> Self {
        let tanggal_raw = record.tanggal.unwrap_or_default();
        let waktu = record.waktu.unwrap_or_default();
        let isi = record.isi.unwrap_or_default();
        let penulis = [record.penulis, record.warta]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Redaksi".to_string());
        let tags = match record.tags {
            Value::Array(tags) => tags,
            _ => Vec::new(),
        };

        Self {
            id: record.id_berita,
            judul: record.judul_berita.unwrap_or_default(),
            judul_khusus: record.judul_khusus.unwrap_or_default(),
            kategori: record.nama_kategori,
            permalink: record.permalink,
            sumber: record.sumber,
            tanggal: format::format_date(&tanggal_raw, &waktu),
            last_updated: format::last_updated_label(&tanggal_raw, Some(&waktu), now),
            description: format::summarize(&isi),
            gambar: image_or_placeholder(image_base, "berita/original", record.gambar.as_deref()),
            foto_kecil: image_or_placeholder(image_base, "berita/large", record.foto_kecil.as_deref()),
            ket_foto: record.ket_foto.unwrap_or_default(),
            reporter: record.reporter.unwrap_or_default(),
            penulis,
            counter: record.counter,
            url: record.url,
            isi,
            raw_gambar: record.gambar,
            tags,
        }
    }
}

/// Article ids referenced by `/article/<id>` links in body HTML, in order
pub fn extract_baca_juga_ids(html: &str) -> Vec<String> {
    ARTICLE_LINK_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(2).map(|id| id.as_str().to_string()))
        .collect()
}

impl PortalClient {
    /// Fetches one page of a fixed section
    pub async fn try_section(
        &self,
        section: Section,
        query: &ListQuery,
    ) -> Result<ArticlePage, FetchError> {
        match section.source() {
            Source::Filter(flag) => self.try_special_filter(flag, query).await,
            Source::Kategori(slug) => self.try_kategori(slug, query, true).await,
            Source::Latest => self.try_latest(query).await,
            Source::Gallery => self.try_galeri().await,
        }
    }

    /// Like [`PortalClient::try_section`], degrading to an empty page
    pub async fn section(&self, section: Section, query: &ListQuery) -> ArticlePage {
        degrade(section.slug(), self.try_section(section, query).await)
    }

    /// Fetches a category route, dispatching known slugs to their sections
    ///
    /// Unknown slugs go straight to the category endpoint without caching.
    pub async fn fetch_by_category(&self, slug: &str, query: &ListQuery) -> ArticlePage {
        match Section::from_slug(slug) {
            Some(section) => self.section(section, query).await,
            None => degrade(slug, self.try_kategori(slug, query, false).await),
        }
    }

    /// `/kategori/page/<slug>` listing
    pub async fn try_kategori(
        &self,
        slug: &str,
        query: &ListQuery,
        use_cache: bool,
    ) -> Result<ArticlePage, FetchError> {
        let mut pairs = query.page_pairs();
        pairs.extend(query.date_pairs());
        let url = self.endpoint_with_query(&format!("/kategori/page/{}", slug), &pairs);

        let mut options = FetchOptions::new()
            .with_ttl(Duration::minutes(CATEGORY_TTL_MINUTES))
            .with_params(query.cache_params().with("kategori", slug));
        if !use_cache {
            options = options.no_cache();
        }

        let listing: Listing<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(self.article_page(listing))
    }

    /// `/berita` listing restricted by a flag such as `headline=1`
    async fn try_special_filter(
        &self,
        flag: &str,
        query: &ListQuery,
    ) -> Result<ArticlePage, FetchError> {
        let mut pairs = query.page_pairs();
        pairs.push((flag, "1".to_string()));
        pairs.extend(query.date_pairs());
        let url = self.endpoint_with_query("/berita", &pairs);

        let options = FetchOptions::new()
            .with_ttl(Duration::minutes(FILTER_TTL_MINUTES))
            .with_params(
                query
                    .cache_params()
                    .with("filterName", flag)
                    .with("filterValue", 1),
            );

        let listing: Listing<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(self.article_page(listing))
    }

    /// Unfiltered `/berita` listing, newest first
    async fn try_latest(&self, query: &ListQuery) -> Result<ArticlePage, FetchError> {
        let mut pairs = query.page_pairs();
        pairs.extend(query.date_pairs());
        let url = self.endpoint_with_query("/berita", &pairs);

        let options = FetchOptions::new()
            .with_ttl(Duration::minutes(LATEST_TTL_MINUTES))
            .with_params(query.cache_params());

        let listing: Listing<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(self.article_page(listing))
    }

    /// Single article by numeric id
    pub async fn try_article_by_id(&self, id: &str) -> Result<Option<Article>, FetchError> {
        let url = self.endpoint(&format!("/berita/{}", id));
        let options = FetchOptions::new()
            .with_ttl(Duration::minutes(ARTICLE_TTL_MINUTES))
            .with_params(CacheParams::new().with("id", id));

        let found: OneOrMany<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(found.into_first().map(|record| self.to_article(record)))
    }

    pub async fn article_by_id(&self, id: &str) -> Option<Article> {
        degrade("article", self.try_article_by_id(id).await)
    }

    /// Single article by its slug path; never cached
    pub async fn try_article_by_url(&self, slug: &str) -> Result<Option<Article>, FetchError> {
        let url = self.endpoint(&format!("/{}", slug.trim_start_matches('/')));
        let options = FetchOptions::new().no_cache();

        let found: OneOrMany<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(found.into_first().map(|record| self.to_article(record)))
    }

    pub async fn article_by_url(&self, slug: &str) -> Option<Article> {
        degrade("article", self.try_article_by_url(slug).await)
    }

    /// Articles related to `id`; never cached
    pub async fn try_related_articles(&self, id: u64, limit: u32) -> Result<Vec<Article>, FetchError> {
        let url = self.endpoint_with_query(
            &format!("/artikel/{}/related", id),
            &[("limit", limit.to_string())],
        );
        let options = FetchOptions::new().no_cache();

        let listing: Listing<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        let (records, _) = listing.into_parts();
        Ok(self.to_articles(records))
    }

    pub async fn related_articles(&self, id: u64, limit: u32) -> Vec<Article> {
        degrade("related articles", self.try_related_articles(id, limit).await)
    }

    /// Title search
    pub async fn try_search(&self, term: &str, query: &ListQuery) -> Result<ArticlePage, FetchError> {
        let mut pairs = vec![("judul", term.to_string())];
        pairs.extend(query.page_pairs());
        pairs.extend(query.date_pairs());
        let url = self.endpoint_with_query("/search", &pairs);

        let options = FetchOptions::new()
            .with_ttl(Duration::minutes(SEARCH_TTL_MINUTES))
            .with_params(query.cache_params().with("query", term));

        let listing: Listing<ArticleRecord> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(self.article_page(listing))
    }

    pub async fn search(&self, term: &str, query: &ListQuery) -> ArticlePage {
        degrade("search", self.try_search(term, query).await)
    }

    fn article_page(&self, listing: Listing<ArticleRecord>) -> ArticlePage {
        let (records, pagination) = listing.into_parts();
        ArticlePage {
            articles: self.to_articles(records),
            pagination,
        }
    }

    fn to_articles(&self, records: Vec<ArticleRecord>) -> Vec<Article> {
        let now = format::wib_now();
        records
            .into_iter()
            .map(|record| Article::from_record(record, &self.config.image_base, now))
            .collect()
    }

    fn to_article(&self, record: ArticleRecord) -> Article {
        Article::from_record(record, &self.config.image_base, format::wib_now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ArticleRecord {
        serde_json::from_value(value).expect("valid article record")
    }

    fn noon() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-07-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_from_record_full() {
        let article = Article::from_record(
            record(json!({
                "id_berita": 101,
                "judul_berita": "Harga Sawit Naik",
                "nama_kategori": "Riau",
                "permalink": "zonariau",
                "tanggal": "2024-07-15",
                "waktu": "09:00:00",
                "isi": "<p>Harga <b>TBS</b> naik.</p>",
                "gambar": "sawit.jpg",
                "foto_kecil": "sawit-kecil.jpg",
                "penulis": "Andi",
                "counter": "250",
                "url": "harga-sawit-naik",
                "tags": ["sawit", "riau"]
            })),
            "https://img.example",
            noon(),
        );

        assert_eq!(article.id, Some(101));
        assert_eq!(article.judul, "Harga Sawit Naik");
        assert_eq!(article.kategori.as_deref(), Some("Riau"));
        assert_eq!(article.tanggal, "15 Juli 2024 pukul 09.00");
        assert_eq!(article.last_updated, "3 jam yang lalu");
        assert_eq!(article.description, "Harga TBS naik....");
        assert_eq!(article.gambar, "https://img.example/foto/berita/original/sawit.jpg");
        assert_eq!(article.foto_kecil, "https://img.example/foto/berita/large/sawit-kecil.jpg");
        assert_eq!(article.raw_gambar.as_deref(), Some("sawit.jpg"));
        assert_eq!(article.penulis, "Andi");
        assert_eq!(article.counter, 250);
        assert_eq!(article.tags, vec![json!("sawit"), json!("riau")]);
    }

    #[test]
    fn test_from_record_defaults() {
        let article = Article::from_record(record(json!({})), "", noon());

        assert_eq!(article.id, None);
        assert_eq!(article.judul, "");
        assert_eq!(article.gambar, format::PLACEHOLDER_IMAGE);
        assert_eq!(article.foto_kecil, format::PLACEHOLDER_IMAGE);
        assert_eq!(article.penulis, "Redaksi");
        assert_eq!(article.counter, 0);
        assert!(article.tags.is_empty());
        assert_eq!(article.description, "...");
    }

    #[test]
    fn test_penulis_falls_back_to_warta() {
        let article = Article::from_record(
            record(json!({"penulis": "", "warta": "Desk Nasional"})),
            "",
            noon(),
        );
        assert_eq!(article.penulis, "Desk Nasional");
    }

    #[test]
    fn test_section_slug_round_trip_and_alias() {
        for section in Section::ALL {
            assert_eq!(Section::from_slug(section.slug()), Some(section));
        }
        assert_eq!(Section::from_slug("indeks-berita"), Some(Section::BeritaTerkini));
        assert_eq!(Section::from_slug("olahraga"), None);
    }

    #[test]
    fn test_section_sources() {
        assert_eq!(Section::Riau.source(), Source::Kategori("zonariau"));
        assert_eq!(Section::TipsKesehatan.source(), Source::Kategori("tips&kesehatan"));
        assert_eq!(Section::PilihanEditor.source(), Source::Filter("pilihaneditor"));
        assert_eq!(Section::BeritaTerkini.source(), Source::Latest);
        assert_eq!(Section::Galeri.source(), Source::Gallery);
        assert_eq!(Section::TipsKesehatan.title(), "TIPS & KESEHATAN");
    }

    #[test]
    fn test_list_query_pairs() {
        let query = ListQuery::new(2, 20).with_dates(
            NaiveDate::from_ymd_opt(2024, 7, 1),
            NaiveDate::from_ymd_opt(2024, 7, 31),
        );
        assert_eq!(
            query.page_pairs(),
            vec![("halaman", "2".to_string()), ("limit", "20".to_string())]
        );
        assert_eq!(
            query.date_pairs(),
            vec![
                ("start_date", "2024-07-01".to_string()),
                ("end_date", "2024-07-31".to_string())
            ]
        );
        assert!(ListQuery::default().date_pairs().is_empty());
    }

    #[test]
    fn test_list_query_cache_params_distinguish_dates() {
        let plain = ListQuery::default().cache_params();
        let dated = ListQuery::default()
            .with_dates(NaiveDate::from_ymd_opt(2024, 7, 1), None)
            .cache_params();
        assert_ne!(plain.canonical(), dated.canonical());
        assert_eq!(
            plain.canonical(),
            r#"{"endDate":null,"limit":10,"page":1,"startDate":null}"#
        );
    }

    #[test]
    fn test_extract_baca_juga_ids() {
        let html = r#"
            <p>Baca juga: <a href="https://portal.example/article/123/banjir-pekanbaru">Banjir</a></p>
            <p><a class="x" href='/article/456'>Lainnya</a></p>
            <p><a href="/category/riau">Riau</a></p>
            <p><a href=/article/789/jalan-tol target=_blank>Tol</a></p>
        "#;
        assert_eq!(
            extract_baca_juga_ids(html),
            vec!["123".to_string(), "456".to_string(), "789".to_string()]
        );
        assert!(extract_baca_juga_ids("<p>tanpa tautan</p>").is_empty());
    }
}
