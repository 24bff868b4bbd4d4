//! Promotional banner adapters

use serde::Deserialize;
use serde_json::Value;

use super::format::image_url;
use super::{lenient, Banner, Listing};
use crate::fetch::{FetchError, FetchOptions};
use crate::portal::{degrade, PortalClient};

const BANNER_FOLDER: &str = "banner";

/// Banner as sent by the content API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct BannerRecord {
    #[serde(deserialize_with = "lenient::id")]
    id_banner: Option<u64>,
    #[serde(deserialize_with = "lenient::id")]
    id_posbanner: Option<u64>,
    posbanner: Option<String>,
    permalink: Option<String>,
    judul: Option<String>,
    keterangan: Option<String>,
    foto_besar: Option<String>,
    foto_kecil: Option<String>,
    status: Value,
    status2: Value,
    tanggal: Option<String>,
    waktu: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl Banner {
    pub(crate) fn from_record(record: BannerRecord, image_base: &str) -> Self {
        Self {
            id: record.id_banner,
            id_posbanner: record.id_posbanner,
            posbanner: record.posbanner,
            permalink: record.permalink,
            judul: record.judul,
            keterangan: record.keterangan,
            foto_besar: image_url(image_base, BANNER_FOLDER, record.foto_besar.as_deref()),
            foto_kecil: image_url(image_base, BANNER_FOLDER, record.foto_kecil.as_deref()),
            status: record.status,
            status2: record.status2,
            tanggal: record.tanggal,
            waktu: record.waktu,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    /// Whether this banner belongs to the placement `position`
    ///
    /// Matches the permalink exactly, or the placement name as a
    /// case-insensitive substring (`di headline` matches `Di Headline Atas`).
    pub fn is_at_position(&self, position: &str) -> bool {
        if self.permalink.as_deref() == Some(position) {
            return true;
        }
        let needle = position.to_lowercase();
        self.posbanner
            .as_deref()
            .map(|name| name.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

impl PortalClient {
    /// Every banner; never cached
    pub async fn try_banners(&self) -> Result<Vec<Banner>, FetchError> {
        let url = self.endpoint("/banner");
        let options = FetchOptions::new().no_cache();

        let listing: Listing<BannerRecord> = self.fetcher.fetch_json(&url, &options).await?;
        let (records, _) = listing.into_parts();
        Ok(records
            .into_iter()
            .map(|record| Banner::from_record(record, &self.config.image_base))
            .collect())
    }

    pub async fn banners(&self) -> Vec<Banner> {
        degrade("banners", self.try_banners().await)
    }

    /// Banners for one placement, e.g. `di headline` or `video 1`
    pub async fn banners_by_position(&self, position: &str) -> Vec<Banner> {
        self.banners()
            .await
            .into_iter()
            .filter(|banner| banner.is_at_position(position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn banner(value: Value) -> Banner {
        let record: BannerRecord = serde_json::from_value(value).expect("valid banner record");
        Banner::from_record(record, "https://img.example")
    }

    #[test]
    fn test_from_record_builds_image_urls() {
        let banner = banner(json!({
            "id_banner": 3,
            "id_posbanner": "7",
            "posbanner": "Di Headline",
            "foto_besar": "besar.jpg",
            "status": "Y"
        }));

        assert_eq!(banner.id, Some(3));
        assert_eq!(banner.id_posbanner, Some(7));
        assert_eq!(
            banner.foto_besar.as_deref(),
            Some("https://img.example/foto/banner/besar.jpg")
        );
        assert_eq!(banner.foto_kecil, None);
        assert_eq!(banner.status, json!("Y"));
        assert_eq!(banner.status2, Value::Null);
    }

    #[test]
    fn test_position_matches_permalink_exactly() {
        let banner = banner(json!({"permalink": "popup", "posbanner": "Pop Up"}));
        assert!(banner.is_at_position("popup"));
        assert!(!banner.is_at_position("Popup"));
    }

    #[test]
    fn test_position_matches_name_case_insensitively() {
        let banner = banner(json!({"posbanner": "Di Berita Terkini Atas"}));
        assert!(banner.is_at_position("di berita terkini"));
        assert!(banner.is_at_position("TERKINI"));
        assert!(!banner.is_at_position("di gagasan"));
    }

    #[test]
    fn test_position_without_name_or_permalink() {
        let banner = banner(json!({}));
        assert!(!banner.is_at_position("di headline"));
    }
}
