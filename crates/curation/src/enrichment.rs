//! Publisher enrichment from Wikidata and the research-organization
//! registry
//!
//! Runs on every publisher save. Derived fields are recomputed from the
//! external sources each time, overwriting whatever was stored before;
//! a failed lookup clears the field to unknown.

use backoffice_common::clients::{normalize_wikidata_id, RegistryLookup, WikidataLookup};
use backoffice_common::errors::Result;
use std::collections::HashSet;

/// Caller-supplied publisher fields that drive enrichment
#[derive(Debug, Clone)]
pub struct PublisherDraft {
    pub display_name: String,
    pub wikidata_id: Option<String>,
    pub ror_id: Option<String>,
    pub hierarchy_level: Option<i32>,
}

/// Derived fields produced by one enrichment pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPublisher {
    pub hierarchy_level: i32,

    /// Deduplicated alternate titles, serialized as JSON text
    pub alternate_titles: String,

    pub country_code: Option<String>,

    pub ror_id: Option<String>,
}

/// Union two title sequences, deduplicating with no order guarantee
pub fn union_titles(
    a: impl IntoIterator<Item = String>,
    b: impl IntoIterator<Item = String>,
) -> Vec<String> {
    let set: HashSet<String> = a.into_iter().chain(b).collect();
    set.into_iter().collect()
}

/// Publisher enrichment service over the two external lookups
pub struct PublisherEnricher<'a> {
    wikidata: &'a dyn WikidataLookup,
    registry: &'a dyn RegistryLookup,
}

impl<'a> PublisherEnricher<'a> {
    pub fn new(wikidata: &'a dyn WikidataLookup, registry: &'a dyn RegistryLookup) -> Self {
        Self { wikidata, registry }
    }

    /// One enrichment pass.
    ///
    /// Titles and country read the registry id already stored on the
    /// draft; resolution of a missing registry id runs afterwards, so a
    /// newly resolved id feeds them only on the next save. This matches
    /// the established save path and is deliberate.
    pub async fn enrich(&self, draft: &PublisherDraft) -> Result<EnrichedPublisher> {
        let hierarchy_level = draft.hierarchy_level.unwrap_or(0);

        let qid = draft.wikidata_id.as_deref().and_then(normalize_wikidata_id);

        let wikidata_titles = match qid.as_deref() {
            Some(qid) => self.wikidata.alternate_titles(qid).await,
            None => None,
        };

        let registry_record = match draft.ror_id.as_deref() {
            Some(ror_id) => self.registry.organization(ror_id).await,
            None => None,
        };

        let registry_names = registry_record
            .as_ref()
            .map(|record| record.alternate_names());

        let titles = union_titles(
            wikidata_titles.unwrap_or_default(),
            registry_names.unwrap_or_default(),
        );
        let alternate_titles = serde_json::to_string(&titles)?;

        // Overwrite: a failed lookup clears the stored value to unknown
        let country_code = registry_record.as_ref().and_then(|r| r.country_code());

        let ror_id = match draft.ror_id.clone() {
            Some(existing) => Some(existing),
            None => self.resolve_registry_id(qid.as_deref(), &draft.display_name).await,
        };

        if draft.ror_id.is_none() {
            match &ror_id {
                Some(resolved) => {
                    tracing::info!(publisher = %draft.display_name, ror_id = %resolved, "Resolved registry id")
                }
                None => {
                    tracing::debug!(publisher = %draft.display_name, "No registry match found")
                }
            }
        }

        Ok(EnrichedPublisher {
            hierarchy_level,
            alternate_titles,
            country_code,
            ror_id,
        })
    }

    /// First search hit by normalized Wikidata id, else by display name
    async fn resolve_registry_id(&self, qid: Option<&str>, display_name: &str) -> Option<String> {
        if let Some(qid) = qid {
            if let Some(record) = self.registry.search_first(qid).await {
                return Some(record.id);
            }
        }

        self.registry
            .search_first(display_name)
            .await
            .map(|record| record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backoffice_common::clients::{RorRecord, RorLabel, RorCountry};
    use std::collections::HashMap;

    struct MockWikidata {
        titles: HashMap<String, Vec<String>>,
    }

    #[async_trait]
    impl WikidataLookup for MockWikidata {
        async fn alternate_titles(&self, qid: &str) -> Option<Vec<String>> {
            self.titles.get(qid).cloned()
        }
    }

    struct MockRegistry {
        records: HashMap<String, RorRecord>,
        search_hits: HashMap<String, RorRecord>,
    }

    #[async_trait]
    impl RegistryLookup for MockRegistry {
        async fn organization(&self, ror_id: &str) -> Option<RorRecord> {
            self.records.get(ror_id).cloned()
        }

        async fn search_first(&self, query: &str) -> Option<RorRecord> {
            self.search_hits.get(query).cloned()
        }
    }

    fn record(id: &str, aliases: &[&str], country: Option<&str>) -> RorRecord {
        RorRecord {
            id: id.to_string(),
            name: None,
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            labels: vec![RorLabel {
                label: format!("{}-label", id),
            }],
            acronyms: Vec::new(),
            country: country.map(|code| RorCountry {
                country_code: Some(code.to_string()),
            }),
        }
    }

    fn empty_wikidata() -> MockWikidata {
        MockWikidata {
            titles: HashMap::new(),
        }
    }

    fn empty_registry() -> MockRegistry {
        MockRegistry {
            records: HashMap::new(),
            search_hits: HashMap::new(),
        }
    }

    fn draft(wikidata_id: Option<&str>, ror_id: Option<&str>) -> PublisherDraft {
        PublisherDraft {
            display_name: "Elsevier".to_string(),
            wikidata_id: wikidata_id.map(String::from),
            ror_id: ror_id.map(String::from),
            hierarchy_level: None,
        }
    }

    #[test]
    fn test_union_is_order_insensitive_as_set() {
        let a = vec!["Springer".to_string(), "Springer Nature".to_string()];
        let b = vec!["Springer Nature".to_string(), "SN".to_string()];

        let ab: HashSet<String> = union_titles(a.clone(), b.clone()).into_iter().collect();
        let ba: HashSet<String> = union_titles(b, a).into_iter().collect();
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 3);
    }

    #[tokio::test]
    async fn test_titles_unioned_from_both_sources() {
        let wikidata = MockWikidata {
            titles: HashMap::from([(
                "Q746413".to_string(),
                vec!["Elsevier BV".to_string(), "RELX".to_string()],
            )]),
        };
        let registry = MockRegistry {
            records: HashMap::from([(
                "https://ror.org/02scfj030".to_string(),
                record("https://ror.org/02scfj030", &["Elsevier BV"], Some("NL")),
            )]),
            search_hits: HashMap::new(),
        };

        let enricher = PublisherEnricher::new(&wikidata, &registry);
        let enriched = enricher
            .enrich(&draft(Some("Q746413"), Some("https://ror.org/02scfj030")))
            .await
            .unwrap();

        let titles: HashSet<String> =
            serde_json::from_str::<Vec<String>>(&enriched.alternate_titles)
                .unwrap()
                .into_iter()
                .collect();
        let expected: HashSet<String> = [
            "Elsevier BV",
            "RELX",
            "https://ror.org/02scfj030-label",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(titles, expected);
        assert_eq!(enriched.country_code.as_deref(), Some("NL"));
        assert_eq!(enriched.hierarchy_level, 0);
    }

    #[tokio::test]
    async fn test_failed_lookups_clear_derived_fields() {
        let wikidata = empty_wikidata();
        let registry = empty_registry();

        let enricher = PublisherEnricher::new(&wikidata, &registry);
        let enriched = enricher
            .enrich(&draft(Some("Q746413"), Some("https://ror.org/gone")))
            .await
            .unwrap();

        assert_eq!(enriched.alternate_titles, "[]");
        assert_eq!(enriched.country_code, None);
        // the stored registry id itself is kept
        assert_eq!(enriched.ror_id.as_deref(), Some("https://ror.org/gone"));
    }

    #[tokio::test]
    async fn test_registry_id_resolved_by_wikidata_id_first() {
        let wikidata = empty_wikidata();
        let registry = MockRegistry {
            records: HashMap::new(),
            search_hits: HashMap::from([
                ("Q746413".to_string(), record("https://ror.org/by-qid", &[], None)),
                ("Elsevier".to_string(), record("https://ror.org/by-name", &[], None)),
            ]),
        };

        let enricher = PublisherEnricher::new(&wikidata, &registry);
        let enriched = enricher
            .enrich(&draft(Some("https://www.wikidata.org/wiki/Q746413"), None))
            .await
            .unwrap();

        assert_eq!(enriched.ror_id.as_deref(), Some("https://ror.org/by-qid"));
    }

    #[tokio::test]
    async fn test_registry_id_resolution_falls_back_to_name() {
        let wikidata = empty_wikidata();
        let registry = MockRegistry {
            records: HashMap::new(),
            search_hits: HashMap::from([(
                "Elsevier".to_string(),
                record("https://ror.org/by-name", &[], None),
            )]),
        };

        let enricher = PublisherEnricher::new(&wikidata, &registry);
        let enriched = enricher.enrich(&draft(None, None)).await.unwrap();

        assert_eq!(enriched.ror_id.as_deref(), Some("https://ror.org/by-name"));
    }

    #[tokio::test]
    async fn test_no_hits_leaves_registry_id_unset() {
        let wikidata = empty_wikidata();
        let registry = empty_registry();

        let enricher = PublisherEnricher::new(&wikidata, &registry);
        let enriched = enricher.enrich(&draft(None, None)).await.unwrap();

        assert_eq!(enriched.ror_id, None);
    }

    #[tokio::test]
    async fn test_newly_resolved_id_does_not_feed_same_pass() {
        // titles/country read the stored id; resolution only fills the field
        let wikidata = empty_wikidata();
        let registry = MockRegistry {
            records: HashMap::from([(
                "https://ror.org/fresh".to_string(),
                record("https://ror.org/fresh", &["Fresh"], Some("US")),
            )]),
            search_hits: HashMap::from([(
                "Elsevier".to_string(),
                record("https://ror.org/fresh", &["Fresh"], Some("US")),
            )]),
        };

        let enricher = PublisherEnricher::new(&wikidata, &registry);
        let enriched = enricher.enrich(&draft(None, None)).await.unwrap();

        assert_eq!(enriched.ror_id.as_deref(), Some("https://ror.org/fresh"));
        assert_eq!(enriched.alternate_titles, "[]");
        assert_eq!(enriched.country_code, None);
    }

    #[tokio::test]
    async fn test_hierarchy_level_preserved_when_set() {
        let wikidata = empty_wikidata();
        let registry = empty_registry();
        let enricher = PublisherEnricher::new(&wikidata, &registry);

        let mut d = draft(None, None);
        d.hierarchy_level = Some(2);
        let enriched = enricher.enrich(&d).await.unwrap();
        assert_eq!(enriched.hierarchy_level, 2);
    }
}
