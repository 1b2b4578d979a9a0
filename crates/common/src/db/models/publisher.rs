//! Publisher entity
//!
//! `alternate_titles` and `country_code` are derived from external
//! sources on every save and overwrite prior manual edits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publisher")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub publisher_id: i64,

    #[sea_orm(column_type = "Text")]
    pub display_name: String,

    /// Derived union of Wikidata aliases and registry names,
    /// stored as serialized JSON text
    #[sea_orm(column_type = "Text", nullable)]
    pub alternate_titles: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub wikidata_id: Option<String>,

    /// Derived from the registry record
    #[sea_orm(column_type = "Text", nullable)]
    pub country_code: Option<String>,

    pub parent_publisher_id: Option<i64>,

    /// Research Organization Registry identifier
    #[sea_orm(column_type = "Text", nullable)]
    pub ror_id: Option<String>,

    pub hierarchy_level: i32,

    pub is_approved: bool,

    pub created_date: DateTimeWithTimeZone,

    pub updated_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentPublisherId",
        to = "Column::PublisherId"
    )]
    ParentPublisher,

    #[sea_orm(has_many = "super::journal::Entity")]
    Journals,
}

impl Related<super::journal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
