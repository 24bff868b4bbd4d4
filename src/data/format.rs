//! Display formatting for dates, summaries and image paths
//!
//! Dates from the content API are local Western Indonesian Time (UTC+7)
//! without an offset, so relative ages are computed against the current WIB
//! wall clock.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Image used when an item has no picture
pub const PLACEHOLDER_IMAGE: &str = "/image.png";

/// Number of characters kept in a listing summary
pub const DESCRIPTION_CHARS: usize = 200;

/// UTC offset of Western Indonesian Time
pub const WIB_OFFSET_SECS: i32 = 7 * 3600;

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

/// Current wall-clock time in WIB
pub fn wib_now() -> NaiveDateTime {
    let now = Utc::now();
    match FixedOffset::east_opt(WIB_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).naive_local(),
        None => now.naive_utc(),
    }
}

/// Parses an API date and optional time of day
///
/// With a time, `date` is `YYYY-MM-DD` and `time` is `HH:MM[:SS]`. Without
/// one, `date` may be a full `YYYY-MM-DD HH:MM:SS` timestamp, an RFC 3339
/// timestamp (converted to WIB), or a bare date at midnight.
pub fn parse_date_time(date: &str, time: Option<&str>) -> Option<NaiveDateTime> {
    let date = date.trim();
    match time.map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) => {
            let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
            let clock = NaiveTime::parse_from_str(time, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
                .ok()?;
            Some(day.and_time(clock))
        }
        None => NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                let offset = FixedOffset::east_opt(WIB_OFFSET_SECS)?;
                DateTime::parse_from_rfc3339(date)
                    .ok()
                    .map(|dt| dt.with_timezone(&offset).naive_local())
            })
            .or_else(|| {
                NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .ok()
                    .and_then(|day| day.and_hms_opt(0, 0, 0))
            }),
    }
}

/// Long Indonesian date with time, e.g. `15 Juli 2024 pukul 14.30`
///
/// Unparseable input is returned unchanged.
pub fn format_date(date: &str, time: &str) -> String {
    match parse_date_time(date, Some(time)) {
        Some(dt) => format!(
            "{} {} {} pukul {:02}.{:02}",
            dt.day(),
            MONTHS_LONG[dt.month0() as usize],
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => date.to_string(),
    }
}

/// Short Indonesian date, e.g. `15 Jul 2024`
pub fn format_short_date(dt: NaiveDateTime) -> String {
    format!("{} {} {}", dt.day(), MONTHS_SHORT[dt.month0() as usize], dt.year())
}

/// Relative age of `then` as seen at `now`
///
/// Under a minute (or in the future) is `Baru saja`; under a week is counted
/// in minutes, hours or days; anything older is a short date.
pub fn format_last_updated(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Baru saja".to_string()
    } else if minutes < 60 {
        format!("{} menit yang lalu", minutes)
    } else if hours < 24 {
        format!("{} jam yang lalu", hours)
    } else if days < 7 {
        format!("{} hari yang lalu", days)
    } else {
        format_short_date(then)
    }
}

/// Relative age label for raw API fields, or empty when they do not parse
pub fn last_updated_label(date: &str, time: Option<&str>, now: NaiveDateTime) -> String {
    parse_date_time(date, time)
        .map(|then| format_last_updated(then, now))
        .unwrap_or_default()
}

/// Removes markup and decodes the common entities
pub fn strip_html(html: &str) -> String {
    let text = TAG_RE.replace_all(html, "");
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// First [`DESCRIPTION_CHARS`] characters of the body text, followed by `...`
pub fn summarize(html: &str) -> String {
    let text: String = strip_html(html).chars().take(DESCRIPTION_CHARS).collect();
    format!("{}...", text)
}

/// `<base>/foto/<folder>/<file>`, or `None` when there is no file
pub fn image_url(base: &str, folder: &str, file: Option<&str>) -> Option<String> {
    file.filter(|name| !name.trim().is_empty())
        .map(|name| format!("{}/foto/{}/{}", base, folder, name))
}

/// Like [`image_url`], falling back to [`PLACEHOLDER_IMAGE`]
pub fn image_or_placeholder(base: &str, folder: &str, file: Option<&str>) -> String {
    image_url(base, folder, file).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}
