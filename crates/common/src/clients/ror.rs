//! Research Organization Registry (ROR) lookup client

use async_trait::async_trait;
use serde::Deserialize;

/// Registry organization record. Every field besides the id is decoded
/// independently; absence is not an error.
#[derive(Debug, Clone, Deserialize)]
pub struct RorRecord {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub labels: Vec<RorLabel>,

    #[serde(default)]
    pub acronyms: Vec<String>,

    #[serde(default)]
    pub country: Option<RorCountry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RorLabel {
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RorCountry {
    #[serde(default)]
    pub country_code: Option<String>,
}

impl RorRecord {
    /// Alternate names carried by the record: aliases, labels, acronyms
    pub fn alternate_names(&self) -> Vec<String> {
        self.aliases
            .iter()
            .cloned()
            .chain(self.labels.iter().map(|l| l.label.clone()))
            .chain(self.acronyms.iter().cloned())
            .collect()
    }

    /// Two-letter country code, when the record carries one
    pub fn country_code(&self) -> Option<String> {
        self.country.as_ref()?.country_code.clone()
    }
}

/// Registry lookup by id and by free-text query
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Fetch a single organization record; `None` when unknown
    async fn organization(&self, ror_id: &str) -> Option<RorRecord>;

    /// First hit of a free-text search; `None` when there are no hits
    async fn search_first(&self, query: &str) -> Option<RorRecord>;
}

/// ROR API client
pub struct RorClient {
    client: reqwest::Client,
    api_base: String,
}

#[derive(Deserialize)]
struct RorSearchResponse {
    #[serde(default)]
    items: Vec<RorRecord>,
}

impl RorClient {
    /// Create a new client against the given API base URL
    pub fn new(api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }
}

#[async_trait]
impl RegistryLookup for RorClient {
    async fn organization(&self, ror_id: &str) -> Option<RorRecord> {
        let url = format!("{}/organizations/{}", self.api_base, ror_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| tracing::warn!(ror_id, error = %e, "ROR request failed"))
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!(ror_id, status = response.status().as_u16(), "ROR lookup failed");
            return None;
        }

        response
            .json()
            .await
            .map_err(|e| tracing::warn!(ror_id, error = %e, "ROR response unparseable"))
            .ok()
    }

    async fn search_first(&self, query: &str) -> Option<RorRecord> {
        let url = format!("{}/organizations", self.api_base);

        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| tracing::warn!(query, error = %e, "ROR search failed"))
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!(query, status = response.status().as_u16(), "ROR search failed");
            return None;
        }

        let body: RorSearchResponse = response
            .json()
            .await
            .map_err(|e| tracing::warn!(query, error = %e, "ROR search response unparseable"))
            .ok()?;

        body.items.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_with_missing_fields() {
        let record: RorRecord = serde_json::from_str(r#"{"id": "https://ror.org/02mhbdp94"}"#).unwrap();
        assert_eq!(record.id, "https://ror.org/02mhbdp94");
        assert!(record.alternate_names().is_empty());
        assert_eq!(record.country_code(), None);
    }

    #[test]
    fn test_alternate_names_collects_all_shapes() {
        let raw = r#"{
            "id": "https://ror.org/05dxps055",
            "name": "California Institute of Technology",
            "aliases": ["CIT"],
            "labels": [{"label": "Caltech", "iso639": "en"}],
            "acronyms": ["CALTECH"],
            "country": {"country_name": "United States", "country_code": "US"}
        }"#;
        let record: RorRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.alternate_names(), vec!["CIT", "Caltech", "CALTECH"]);
        assert_eq!(record.country_code().as_deref(), Some("US"));
    }

    #[test]
    fn test_search_response_first_item() {
        let raw = r#"{"number_of_results": 2, "items": [{"id": "a"}, {"id": "b"}]}"#;
        let parsed: RorSearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.items.first().map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn test_search_response_empty() {
        let parsed: RorSearchResponse = serde_json::from_str(r#"{"number_of_results": 0}"#).unwrap();
        assert!(parsed.items.is_empty());
    }
}
