//! Concept entity
//!
//! Academic field-of-study reference data. Rows are read-mostly: the
//! cached Wikidata/Wikipedia JSON blobs are populated by an external
//! pipeline and are never editable here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "concept")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub field_of_study_id: i64,

    #[sea_orm(column_type = "Text")]
    pub display_name: String,

    /// Depth in the concept hierarchy (0 = root)
    pub level: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub wikidata_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub wikipedia_id: Option<String>,

    /// Cached raw Wikidata response
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub wikidata_json: Option<Json>,

    /// Cached raw Wikipedia response
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub wikipedia_json: Option<Json>,

    pub created_date: DateTimeWithTimeZone,

    pub updated_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Short description lazily parsed from the cached Wikipedia JSON.
    ///
    /// The cached payload nests it at `query.pages[0].terms.description[0]`;
    /// any missing step along the path yields `None`.
    pub fn description(&self) -> Option<String> {
        self.wikipedia_json
            .as_ref()?
            .get("query")?
            .get("pages")?
            .get(0)?
            .get("terms")?
            .get("description")?
            .get(0)?
            .as_str()
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn concept_with(wikipedia_json: Option<Json>) -> Model {
        Model {
            field_of_study_id: 1,
            display_name: "Biology".to_string(),
            level: 0,
            wikidata_id: Some("Q420".to_string()),
            wikipedia_id: None,
            wikidata_json: None,
            wikipedia_json,
            created_date: chrono::Utc::now().into(),
            updated_date: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_description_parsed() {
        let payload = json!({
            "query": {
                "pages": [
                    {"terms": {"description": ["study of life"]}}
                ]
            }
        });
        let concept = concept_with(Some(payload));
        assert_eq!(concept.description().as_deref(), Some("study of life"));
    }

    #[test]
    fn test_description_absent_when_no_cache() {
        assert_eq!(concept_with(None).description(), None);
    }

    #[test]
    fn test_description_absent_on_partial_payload() {
        let payload = json!({"query": {"pages": []}});
        assert_eq!(concept_with(Some(payload)).description(), None);

        let payload = json!({"query": {"pages": [{"terms": {"description": []}}]}});
        assert_eq!(concept_with(Some(payload)).description(), None);
    }
}
