//! View models for the news portal
//!
//! This module contains the data types handed to presentation code, the
//! lenient shapes used to decode the content API, and the endpoint adapters
//! that connect the two.

pub mod articles;
pub mod banners;
pub mod format;
pub mod gallery;
pub mod pages;

pub use articles::{extract_baca_juga_ids, ListQuery, Section};
pub use pages::StaticPage;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination metadata as reported by list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    #[serde(deserialize_with = "lenient::size")]
    pub current_page: u32,
    #[serde(deserialize_with = "lenient::size")]
    pub total_pages: u32,
    #[serde(deserialize_with = "lenient::size")]
    pub total_items: u32,
    #[serde(deserialize_with = "lenient::size")]
    pub items_per_page: u32,
}

/// A news article (or gallery album) shaped for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    pub id: Option<u64>,
    /// Headline
    pub judul: String,
    /// Alternate headline, empty when unset
    pub judul_khusus: String,
    /// Category display name
    pub kategori: Option<String>,
    /// Category slug
    pub permalink: Option<String>,
    pub sumber: Option<String>,
    /// Publication date, e.g. `15 Juli 2024 pukul 14.30`
    pub tanggal: String,
    /// Relative age, e.g. `3 jam yang lalu`
    pub last_updated: String,
    /// Plain-text summary of the body
    pub description: String,
    /// Full-size image URL, or the placeholder
    pub gambar: String,
    /// Thumbnail URL, or the placeholder
    pub foto_kecil: String,
    /// Image caption
    pub ket_foto: String,
    pub reporter: String,
    /// Author; falls back to the desk byline, then `Redaksi`
    pub penulis: String,
    /// Read count
    pub counter: u64,
    /// Article slug
    pub url: Option<String>,
    /// Body HTML, unsanitized
    pub isi: String,
    /// Image file name as sent by the API
    pub raw_gambar: Option<String>,
    pub tags: Vec<Value>,
}

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArticlePage {
    pub articles: Vec<Article>,
    pub pagination: Option<Pagination>,
}

/// Article detail view: the article plus the articles it links to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleDetail {
    pub article: Article,
    /// Up to three related articles
    pub related: Vec<Article>,
    /// Articles referenced by "Baca juga" links in the body
    pub baca_juga: Vec<Article>,
}

/// Promotional banner placement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub id: Option<u64>,
    pub id_posbanner: Option<u64>,
    /// Placement name, e.g. `Di Headline`
    pub posbanner: Option<String>,
    pub permalink: Option<String>,
    pub judul: Option<String>,
    pub keterangan: Option<String>,
    pub foto_besar: Option<String>,
    pub foto_kecil: Option<String>,
    pub status: Value,
    pub status2: Value,
    pub tanggal: Option<String>,
    pub waktu: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Navigation category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: Option<u64>,
    pub nama: String,
    pub permalink: Option<String>,
    /// Shown in the main navigation
    pub pin: bool,
    /// Sort position
    pub urutan: i64,
}

/// Embedded video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub id: Option<u64>,
    pub url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub tanggal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoPage {
    pub videos: Vec<Video>,
    pub pagination: Option<Pagination>,
}

/// Every listing shown on the front page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeSections {
    pub headlines: ArticlePage,
    pub pilihan_editor: ArticlePage,
    pub berita_terkini: ArticlePage,
    pub terpopuler: ArticlePage,
    pub gagasan: ArticlePage,
    pub riau: ArticlePage,
    pub nasional: ArticlePage,
    pub tips_kesehatan: ArticlePage,
    pub advertorial: ArticlePage,
    pub galeri: ArticlePage,
}

/// List endpoints answer either `{data, pagination}` or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Paged {
        data: Vec<T>,
        #[serde(default, deserialize_with = "lenient::pagination")]
        pagination: Option<Pagination>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_parts(self) -> (Vec<T>, Option<Pagination>) {
        match self {
            Listing::Paged { data, pagination } => (data, pagination),
            Listing::Bare(data) => (data, None),
        }
    }
}

/// Detail endpoints answer either an object or a one-element array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().next(),
            OneOrMany::One(item) => Some(item),
        }
    }
}

/// Decoders for fields the API sends with inconsistent types
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Number or numeric string; anything else is `None`
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Like [`id`], defaulting to zero
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        id(deserializer).map(|value| value.unwrap_or(0))
    }

    /// Like [`count`], saturating at `u32::MAX`
    pub fn size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        count(deserializer).map(|value| u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// Pagination block; anything that is not an object reads as absent
    pub fn pagination<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<super::Pagination>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .and_then(|value| serde_json::from_value(value).ok()))
    }

    /// Signed integer or numeric string, defaulting to zero
    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        })
    }

    /// `true`, `1`, `"1"` and `"true"` are set; everything else is unset
    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => s == "1" || s == "true",
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient::id")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "lenient::count")]
        counter: u64,
        #[serde(default, deserialize_with = "lenient::flag")]
        pin: bool,
        #[serde(default, deserialize_with = "lenient::int")]
        urutan: i64,
    }

    #[test]
    fn test_listing_paged_shape() {
        let listing: Listing<Value> = serde_json::from_value(json!({
            "data": [{"id_berita": 1}],
            "pagination": {"currentPage": 1, "totalPages": 3, "totalItems": 30, "itemsPerPage": 10}
        }))
        .unwrap();

        let (data, pagination) = listing.into_parts();
        assert_eq!(data.len(), 1);
        assert_eq!(
            pagination,
            Some(Pagination {
                current_page: 1,
                total_pages: 3,
                total_items: 30,
                items_per_page: 10,
            })
        );
    }

    #[test]
    fn test_listing_bare_array_shape() {
        let listing: Listing<Value> = serde_json::from_value(json!([{"a": 1}, {"a": 2}])).unwrap();
        let (data, pagination) = listing.into_parts();
        assert_eq!(data.len(), 2);
        assert!(pagination.is_none());
    }

    #[test]
    fn test_listing_rejects_object_without_data() {
        let listing: Result<Listing<Value>, _> = serde_json::from_value(json!({"message": "x"}));
        assert!(listing.is_err());
    }

    #[test]
    fn test_partial_pagination_uses_defaults() {
        let pagination: Pagination = serde_json::from_value(json!({"totalPages": 4})).unwrap();
        assert_eq!(pagination.total_pages, 4);
        assert_eq!(pagination.current_page, 0);
    }

    #[test]
    fn test_pagination_accepts_strings_and_nulls() {
        let pagination: Pagination = serde_json::from_value(json!({
            "currentPage": "2",
            "totalPages": "4",
            "totalItems": null,
            "itemsPerPage": 10
        }))
        .unwrap();
        assert_eq!(
            pagination,
            Pagination {
                current_page: 2,
                total_pages: 4,
                total_items: 0,
                items_per_page: 10,
            }
        );
    }

    #[test]
    fn test_listing_keeps_data_when_pagination_is_malformed() {
        let listing: Listing<Value> = serde_json::from_value(json!({
            "data": [{"id_berita": 1}, {"id_berita": 2}],
            "pagination": "n/a"
        }))
        .unwrap();
        let (data, pagination) = listing.into_parts();
        assert_eq!(data.len(), 2);
        assert!(pagination.is_none());

        let listing: Listing<Value> =
            serde_json::from_value(json!({"data": [], "pagination": null})).unwrap();
        assert!(listing.into_parts().1.is_none());
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<Value> = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(one.into_first(), Some(json!({"id": 1})));

        let many: OneOrMany<Value> = serde_json::from_value(json!([{"id": 2}, {"id": 3}])).unwrap();
        assert_eq!(many.into_first(), Some(json!({"id": 2})));

        let empty: OneOrMany<Value> = serde_json::from_value(json!([])).unwrap();
        assert_eq!(empty.into_first(), None);
    }

    #[test]
    fn test_lenient_decoders() {
        let probe: Probe =
            serde_json::from_value(json!({"id": "42", "counter": 7, "pin": 1, "urutan": "3"}))
                .unwrap();
        assert_eq!(probe.id, Some(42));
        assert_eq!(probe.counter, 7);
        assert!(probe.pin);
        assert_eq!(probe.urutan, 3);

        let probe: Probe =
            serde_json::from_value(json!({"id": null, "counter": "n/a", "pin": 0})).unwrap();
        assert_eq!(probe.id, None);
        assert_eq!(probe.counter, 0);
        assert!(!probe.pin);
        assert_eq!(probe.urutan, 0);

        let probe: Probe = serde_json::from_value(json!({"pin": true})).unwrap();
        assert!(probe.pin);
    }
}
