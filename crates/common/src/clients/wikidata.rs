//! Wikidata lookup client (`wbgetentities` action)

use async_trait::async_trait;
use regex_lite::Regex;
use serde::Deserialize;
use std::collections::HashMap;

/// URL prefixes a curator may paste instead of a bare entity id
const WIKIDATA_URL_PREFIXES: [&str; 4] = [
    "https://www.wikidata.org/wiki/",
    "http://www.wikidata.org/wiki/",
    "https://www.wikidata.org/entity/",
    "http://www.wikidata.org/entity/",
];

/// Normalize a stored Wikidata id to the bare `Q…` form.
///
/// Strips any of the known URL prefixes and rejects anything that does
/// not look like an entity id afterwards.
pub fn normalize_wikidata_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let bare = WIKIDATA_URL_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .unwrap_or(trimmed);

    let pattern = Regex::new(r"^Q\d+$").expect("static pattern");
    if pattern.is_match(bare) {
        Some(bare.to_string())
    } else {
        None
    }
}

/// Alternate-title source backed by Wikidata
#[async_trait]
pub trait WikidataLookup: Send + Sync {
    /// English alias values for an entity; `None` when unknown
    async fn alternate_titles(&self, qid: &str) -> Option<Vec<String>>;
}

/// Wikidata API client
pub struct WikidataClient {
    client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, EntityRecord>,
}

#[derive(Deserialize)]
struct EntityRecord {
    #[serde(default)]
    aliases: HashMap<String, Vec<AliasRecord>>,
}

#[derive(Deserialize)]
struct AliasRecord {
    value: String,
}

impl WikidataClient {
    /// Create a new client against the given API endpoint
    pub fn new(api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }
}

#[async_trait]
impl WikidataLookup for WikidataClient {
    async fn alternate_titles(&self, qid: &str) -> Option<Vec<String>> {
        let response = self
            .client
            .get(&self.api_base)
            .query(&[
                ("action", "wbgetentities"),
                ("ids", qid),
                ("props", "aliases"),
                ("languages", "en"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| tracing::warn!(qid, error = %e, "Wikidata request failed"))
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!(qid, status = response.status().as_u16(), "Wikidata lookup failed");
            return None;
        }

        let body: EntitiesResponse = response
            .json()
            .await
            .map_err(|e| tracing::warn!(qid, error = %e, "Wikidata response unparseable"))
            .ok()?;

        let aliases = body.entities.get(qid)?.aliases.get("en")?;
        Some(aliases.iter().map(|a| a.value.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_wiki_prefix() {
        assert_eq!(
            normalize_wikidata_id("https://www.wikidata.org/wiki/Q12345").as_deref(),
            Some("Q12345")
        );
    }

    #[test]
    fn test_normalize_strips_entity_prefix() {
        assert_eq!(
            normalize_wikidata_id("http://www.wikidata.org/entity/Q7").as_deref(),
            Some("Q7")
        );
    }

    #[test]
    fn test_normalize_passes_bare_ids() {
        assert_eq!(normalize_wikidata_id("Q42").as_deref(), Some("Q42"));
        assert_eq!(normalize_wikidata_id("  Q42 ").as_deref(), Some("Q42"));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_wikidata_id(""), None);
        assert_eq!(normalize_wikidata_id("12345"), None);
        assert_eq!(normalize_wikidata_id("https://example.com/Q1"), None);
        assert_eq!(normalize_wikidata_id("Q12x"), None);
    }

    #[test]
    fn test_alias_response_shape() {
        let raw = r#"{
            "entities": {
                "Q42": {
                    "aliases": {
                        "en": [{"language": "en", "value": "Douglas Adams"}]
                    }
                }
            }
        }"#;
        let parsed: EntitiesResponse = serde_json::from_str(raw).unwrap();
        let aliases = &parsed.entities["Q42"].aliases["en"];
        assert_eq!(aliases[0].value, "Douglas Adams");
    }
}
