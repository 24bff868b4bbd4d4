//! Static pages, navigation categories and videos

use serde::Deserialize;
use serde_json::Value;

use super::format;
use super::{lenient, Category, Listing, OneOrMany, Video, VideoPage};
use crate::fetch::{FetchError, FetchOptions};
use crate::portal::{degrade, PortalClient};

/// Editorial pages served from `/pages/slug/<slug>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticPage {
    TentangKami,
    Redaksi,
    Pedoman,
    Disclaimer,
    Kontak,
}

impl StaticPage {
    pub const ALL: [StaticPage; 5] = [
        StaticPage::TentangKami,
        StaticPage::Redaksi,
        StaticPage::Pedoman,
        StaticPage::Disclaimer,
        StaticPage::Kontak,
    ];

    /// Slug on the content API
    pub fn slug(self) -> &'static str {
        match self {
            StaticPage::TentangKami => "tentang-kami",
            StaticPage::Redaksi => "redaksi",
            StaticPage::Pedoman => "pedoman-media-sibers",
            StaticPage::Disclaimer => "disclaimer",
            StaticPage::Kontak => "kontak",
        }
    }

    /// Looks a page up by API slug; `pedoman` is accepted as a short form
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "pedoman" => Some(StaticPage::Pedoman),
            _ => Self::ALL.into_iter().find(|page| page.slug() == slug),
        }
    }
}

/// Category as sent by the content API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CategoryRecord {
    #[serde(deserialize_with = "lenient::id")]
    id_kategori: Option<u64>,
    nama_kategori: Option<String>,
    permalink: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pin: bool,
    #[serde(deserialize_with = "lenient::int")]
    urutan: i64,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Self {
            id: record.id_kategori,
            nama: record.nama_kategori.unwrap_or_default(),
            permalink: record.permalink,
            pin: record.pin,
            urutan: record.urutan,
        }
    }
}

/// Video as sent by the content API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct VideoRecord {
    #[serde(deserialize_with = "lenient::id")]
    id_video: Option<u64>,
    url: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl From<VideoRecord> for Video {
    fn from(record: VideoRecord) -> Self {
        let tanggal = record
            .created_at
            .as_deref()
            .map(|created| {
                let mut parts = created.split(' ');
                let date = parts.next().unwrap_or_default();
                let time = parts.next().unwrap_or("00:00:00");
                format::format_date(date, time)
            })
            .unwrap_or_default();

        Self {
            id: record.id_video,
            url: record.url,
            created_at: record.created_at,
            updated_at: record.updated_at,
            tanggal,
        }
    }
}

/// Sorts categories by their configured position; ties keep API order
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by_key(|category| category.urutan);
}

impl PortalClient {
    /// Raw page object for an editorial page slug; never cached
    pub async fn try_page_content(&self, slug: &str) -> Result<Option<Value>, FetchError> {
        let url = self.endpoint(&format!("/pages/slug/{}", slug));
        let options = FetchOptions::new().no_cache();

        let found: OneOrMany<Value> = self.fetcher.fetch_json(&url, &options).await?;
        Ok(found.into_first().filter(|page| !page.is_null()))
    }

    pub async fn page_content(&self, slug: &str) -> Option<Value> {
        degrade("page content", self.try_page_content(slug).await)
    }

    pub async fn static_page(&self, page: StaticPage) -> Option<Value> {
        self.page_content(page.slug()).await
    }

    /// Navigation categories in display order; never cached
    pub async fn try_categories(&self) -> Result<Vec<Category>, FetchError> {
        let url = self.endpoint("/kategori");
        let options = FetchOptions::new().no_cache();

        let listing: Listing<CategoryRecord> = self.fetcher.fetch_json(&url, &options).await?;
        let (records, _) = listing.into_parts();
        let mut categories: Vec<Category> = records.into_iter().map(Category::from).collect();
        sort_categories(&mut categories);
        Ok(categories)
    }

    pub async fn categories(&self) -> Vec<Category> {
        degrade("categories", self.try_categories().await)
    }

    /// One page of videos; never cached
    pub async fn try_videos(&self, page: u32, limit: u32) -> Result<VideoPage, FetchError> {
        let url = self.endpoint_with_query(
            "/video",
            &[("halaman", page.to_string()), ("limit", limit.to_string())],
        );
        let options = FetchOptions::new().no_cache();

        let listing: Listing<VideoRecord> = self.fetcher.fetch_json(&url, &options).await?;
        let (records, pagination) = listing.into_parts();
        Ok(VideoPage {
            videos: records.into_iter().map(Video::from).collect(),
            pagination,
        })
    }

    pub async fn videos(&self, page: u32, limit: u32) -> VideoPage {
        degrade("videos", self.try_videos(page, limit).await)
    }
}
