//! Recording metadata from a MusicBrainz-style search service
//!
//! The query is derived from the upload's file name. Every failure (network,
//! HTTP status, JSON shape) surfaces as `MetadataError`, which
//! `MetadataLookup::resolve` turns into an empty record.

use crate::analysis::traits::MetadataLookup;
use crate::config::MetadataConfig;
use crate::error::{MixprepError, Result};
use crate::types::TrackMeta;
use regex::Regex;
use reqwest::blocking::Client;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Removal patterns applied in order: characters illegal in file names, then
/// `(Official ...)` and `[Official ...]` markers up to the nearest close
const CLEANUP_PATTERNS: [&str; 3] = [
    r#"[\\/*?:"<>|]"#,
    r"(?i)\(official.*?\)",
    r"(?i)\[official.*?\]",
];

fn cleanup_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        CLEANUP_PATTERNS
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Skipping filename cleanup pattern {}: {}", pattern, e);
                    None
                }
            })
            .collect()
    })
}

/// Turn an upload file name into a search query
///
/// Drops the extension and characters that are illegal in file names,
/// removes `(Official ...)` / `[Official ...]` markers, and turns
/// underscores into spaces.
pub fn clean_filename(filename: &str) -> String {
    let mut sanitized = strip_extension(filename).to_string();
    for re in cleanup_patterns() {
        sanitized = re.replace_all(&sanitized, "").into_owned();
    }
    sanitized.replace('_', " ").trim().to_string()
}

/// Drop a trailing `.ext`; separators in the name are left for sanitizing
fn strip_extension(filename: &str) -> &str {
    let name_start = filename.rfind(['/', '\\']).map_or(0, |i| i + 1);
    match filename[name_start..].rfind('.') {
        Some(dot) if !filename[name_start..name_start + dot].trim_start_matches('.').is_empty() => {
            &filename[..name_start + dot]
        }
        _ => filename,
    }
}

/// Resolver backed by an HTTP recording-search endpoint
#[derive(Debug, Clone)]
pub struct MusicBrainzResolver {
    config: MetadataConfig,
    client: Client,
}

impl MusicBrainzResolver {
    pub fn new(config: MetadataConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| MixprepError::ConfigError(format!("metadata client: {e}")))?;
        Ok(Self { config, client })
    }
}

impl MetadataLookup for MusicBrainzResolver {
    fn lookup(&self, query: &str) -> Result<TrackMeta> {
        if !self.config.enabled {
            return Ok(TrackMeta::default());
        }

        debug!("Metadata query '{}' -> {}", query, self.config.endpoint);
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("query", query), ("fmt", "json"), ("limit", "1")])
            .send()
            .map_err(|e| MixprepError::MetadataError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MixprepError::MetadataError(format!("HTTP {status}")));
        }

        let payload: Value = response
            .json()
            .map_err(|e| MixprepError::MetadataError(format!("undecodable response: {e}")))?;

        Ok(parse_recordings(&payload, &self.config.cover_art_base))
    }

    fn name(&self) -> &'static str {
        "musicbrainz"
    }
}

/// Lookup that never leaves the machine
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

impl MetadataLookup for OfflineLookup {
    fn lookup(&self, _query: &str) -> Result<TrackMeta> {
        Ok(TrackMeta::default())
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}

/// Extract the first recording of a search response
pub fn parse_recordings(payload: &Value, cover_art_base: &str) -> TrackMeta {
    let Some(recording) = first_of(payload, "recordings", "recording-list") else {
        return TrackMeta::default();
    };

    let artist = recording
        .pointer("/artist-credit/0/artist/name")
        .or_else(|| recording.pointer("/artist-credit/0/name"))
        .map(value_text)
        .unwrap_or_default();
    let title = recording.get("title").map(value_text).unwrap_or_default();
    let year = recording
        .get("date")
        .and_then(Value::as_str)
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_default();

    let mut meta = TrackMeta {
        artist: Some(artist),
        title: Some(title),
        year: Some(year),
        ..TrackMeta::default()
    };

    let release_id = first_of(recording, "releases", "release-list")
        .and_then(|release| release.get("id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty());
    if let Some(id) = release_id {
        meta.cover_art_url = Some(format!("{}/{}/front", cover_art_base.trim_end_matches('/'), id));
        meta.release_id = Some(id.to_string());
    }

    meta
}

fn first_of<'a>(value: &'a Value, key: &str, alt_key: &str) -> Option<&'a Value> {
    value
        .get(key)
        .or_else(|| value.get(alt_key))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::COVER_ART_BASE;
    use serde_json::json;

    #[test]
    fn test_clean_filename_basic() {
        assert_eq!(clean_filename("Daft_Punk_-_One_More_Time.mp3"), "Daft Punk - One More Time");
    }

    #[test]
    fn test_clean_filename_strips_official_markers() {
        assert_eq!(
            clean_filename("Artist - Song (Official Video) [official audio].wav"),
            "Artist - Song"
        );
        assert_eq!(clean_filename("Artist - Song (Remix).mp3"), "Artist - Song (Remix)");
    }

    #[test]
    fn test_clean_filename_strips_illegal_chars() {
        assert_eq!(clean_filename("What?: \"Now\" <live> | x.flac"), "What Now live  x");
    }

    #[test]
    fn test_clean_filename_keeps_slashed_artist() {
        assert_eq!(clean_filename("AC/DC - Thunderstruck.mp3"), "ACDC - Thunderstruck");
        assert_eq!(clean_filename(".hidden"), ".hidden");
    }

    #[test]
    fn test_unclosed_marker_is_kept() {
        assert_eq!(clean_filename("Song (Official.mp3"), "Song (Official");
    }

    #[test]
    fn test_marker_ends_at_nearest_close() {
        assert_eq!(clean_filename("Song (OFFICIAL Video) Live).mp3"), "Song  Live)");
        assert_eq!(clean_filename("Song [Official] [Official HD].m4a"), "Song");
    }

    #[test]
    fn test_parse_full_recording() {
        let payload = json!({
            "recordings": [{
                "title": "One More Time",
                "date": "2000-11-13",
                "artist-credit": [{ "artist": { "name": "Daft Punk" } }],
                "releases": [{ "id": "abc-123" }]
            }]
        });
        let meta = parse_recordings(&payload, COVER_ART_BASE);
        assert_eq!(meta.artist.as_deref(), Some("Daft Punk"));
        assert_eq!(meta.title.as_deref(), Some("One More Time"));
        assert_eq!(meta.year.as_deref(), Some("2000"));
        assert_eq!(meta.release_id.as_deref(), Some("abc-123"));
        assert_eq!(
            meta.cover_art_url.as_deref(),
            Some("http://coverartarchive.org/release/abc-123/front")
        );
    }

    #[test]
    fn test_parse_alternate_shape_without_release() {
        let payload = json!({
            "recording-list": [{ "title": "Track", "artist-credit": [{ "name": "Someone" }] }]
        });
        let meta = parse_recordings(&payload, COVER_ART_BASE);
        assert_eq!(meta.artist.as_deref(), Some("Someone"));
        assert_eq!(meta.year.as_deref(), Some(""));
        assert!(meta.release_id.is_none());
        assert!(meta.cover_art_url.is_none());
    }

    #[test]
    fn test_parse_no_recordings() {
        assert!(parse_recordings(&json!({ "recordings": [] }), COVER_ART_BASE).is_empty());
        assert!(parse_recordings(&json!({}), COVER_ART_BASE).is_empty());
    }

    #[test]
    fn test_offline_resolve_is_empty() {
        assert!(OfflineLookup.resolve("Artist - Song.mp3").is_empty());
    }

    #[test]
    fn test_disabled_resolver_skips_network() {
        let config = MetadataConfig {
            endpoint: "http://127.0.0.1:1/unreachable".to_string(),
            enabled: false,
            ..MetadataConfig::default()
        };
        let resolver = MusicBrainzResolver::new(config).unwrap();
        assert!(resolver.lookup("anything").unwrap().is_empty());
    }
}
