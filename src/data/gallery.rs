//! Photo gallery adapters
//!
//! Albums are shown with the same card layout as articles, so they are shaped
//! into [`Article`] values tagged `Galeri`.

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::format::{self, image_or_placeholder};
use super::{lenient, Article, ArticlePage, Listing, OneOrMany, Pagination};
use crate::fetch::{FetchError, FetchOptions};
use crate::portal::{degrade, PortalClient};

const GALLERY_TAG: &str = "Galeri";
const GALLERY_FOLDER: &str = "galeri";

/// Album as sent by the content API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AlbumRecord {
    #[serde(deserialize_with = "lenient::id")]
    id_album: Option<u64>,
    nama_album: Option<String>,
    tanggal_album: Option<String>,
    waktu: Option<String>,
    keterangan: Option<String>,
    gambar: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    counter: u64,
    permalink: Option<String>,
    updated_at: Option<String>,
}

impl AlbumRecord {
    /// Card for the gallery listing; the description is left empty
    fn into_card(self, image_base: &str) -> Article {
        let picture = image_or_placeholder(image_base, GALLERY_FOLDER, self.gambar.as_deref());
        let waktu = self.waktu.unwrap_or_else(|| "00:00:00".to_string());

        Article {
            id: self.id_album,
            judul: self.nama_album.unwrap_or_default(),
            judul_khusus: String::new(),
            kategori: Some(GALLERY_TAG.to_string()),
            permalink: None,
            sumber: None,
            tanggal: format::format_date(self.tanggal_album.as_deref().unwrap_or_default(), &waktu),
            last_updated: String::new(),
            description: String::new(),
            gambar: picture.clone(),
            foto_kecil: picture,
            ket_foto: String::new(),
            reporter: String::new(),
            penulis: String::new(),
            counter: self.counter,
            url: self.permalink,
            isi: String::new(),
            raw_gambar: self.gambar,
            tags: Vec::new(),
        }
    }

    /// Full album for the detail page, keeping the description as body
    fn into_detail(self, image_base: &str, now: NaiveDateTime) -> Article {
        let isi = self.keterangan.clone().unwrap_or_default();
        let last_updated = self
            .updated_at
            .as_deref()
            .map(|updated| format::last_updated_label(updated, None, now))
            .unwrap_or_default();

        let mut album = self.into_card(image_base);
        album.isi = isi;
        album.last_updated = last_updated;
        album.permalink = Some(GALLERY_FOLDER.to_string());
        album
    }
}

impl PortalClient {
    /// Gallery listing; never cached
    ///
    /// When the API omits pagination a single page holding every album is assumed.
    pub async fn try_galeri(&self) -> Result<ArticlePage, FetchError> {
        let url = self.endpoint("/albumgaleri");
        let options = FetchOptions::new().no_cache();

        let listing: Listing<AlbumRecord> = self.fetcher.fetch_json(&url, &options).await?;
        let (records, pagination) = listing.into_parts();
        let articles: Vec<Article> = records
            .into_iter()
            .map(|record| record.into_card(&self.config.image_base))
            .collect();

        let count = u32::try_from(articles.len()).unwrap_or(u32::MAX);
        let pagination = pagination.unwrap_or(Pagination {
            current_page: 1,
            total_pages: 1,
            total_items: count,
            items_per_page: count,
        });

        Ok(ArticlePage {
            articles,
            pagination: Some(pagination),
        })
    }

    pub async fn galeri(&self) -> ArticlePage {
        degrade("galeri", self.try_galeri().await)
    }

    /// Single album; never cached
    pub async fn try_album_by_id(&self, id: &str) -> Result<Option<Article>, FetchError> {
        let url = self.endpoint(&format!("/albumgaleri/{}", id));
        let options = FetchOptions::new().no_cache();

        let found: OneOrMany<AlbumRecord> = self.fetcher.fetch_json(&url, &options).await?;
        let now = format::wib_now();
        Ok(found
            .into_first()
            .map(|record| record.into_detail(&self.config.image_base, now)))
    }

    pub async fn album_by_id(&self, id: &str) -> Option<Article> {
        degrade("album", self.try_album_by_id(id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn album() -> AlbumRecord {
        serde_json::from_value(json!({
            "id_album": "12",
            "nama_album": "Festival Pacu Jalur",
            "tanggal_album": "2024-08-20",
            "keterangan": "<p>Dokumentasi</p>",
            "gambar": "pacu.jpg",
            "counter": 90,
            "permalink": "festival-pacu-jalur",
            "updated_at": "2024-08-21 10:00:00"
        }))
        .expect("valid album record")
    }

    #[test]
    fn test_album_card() {
        let card = album().into_card("https://img.example");

        assert_eq!(card.id, Some(12));
        assert_eq!(card.judul, "Festival Pacu Jalur");
        assert_eq!(card.kategori.as_deref(), Some("Galeri"));
        assert_eq!(card.tanggal, "20 Agustus 2024 pukul 00.00");
        assert_eq!(card.gambar, "https://img.example/foto/galeri/pacu.jpg");
        assert_eq!(card.foto_kecil, card.gambar);
        assert_eq!(card.description, "");
        assert_eq!(card.isi, "");
        assert_eq!(card.url.as_deref(), Some("festival-pacu-jalur"));
    }

    #[test]
    fn test_album_detail_keeps_body_and_age() {
        let now = NaiveDateTime::parse_from_str("2024-08-21 12:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let detail = album().into_detail("", now);

        assert_eq!(detail.isi, "<p>Dokumentasi</p>");
        assert_eq!(detail.last_updated, "2 jam yang lalu");
        assert_eq!(detail.permalink.as_deref(), Some("galeri"));
        assert_eq!(detail.ket_foto, "");
    }

    #[test]
    fn test_album_without_picture_uses_placeholder() {
        let card = AlbumRecord::default().into_card("https://img.example");
        assert_eq!(card.gambar, format::PLACEHOLDER_IMAGE);
        assert_eq!(card.counter, 0);
    }
}
