//! Journal entity
//!
//! `apc_prices` is an ordered list of `{price, currency}` mappings in
//! minor units; `apc_usd` is derived from it on every save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub journal_id: i64,

    #[sea_orm(column_type = "Text")]
    pub display_name: String,

    pub publisher_id: Option<i64>,

    /// ISSNs as a JSON list of strings
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub issns: Option<Json>,

    #[sea_orm(column_type = "Text", nullable)]
    pub webpage: Option<String>,

    /// Ordered article-processing-charge list:
    /// `[{"price": <integer minor-units>, "currency": <3-letter code>}, ...]`
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub apc_prices: Option<Json>,

    /// Derived normalized USD amount
    pub apc_usd: Option<i64>,

    pub is_oa: bool,

    pub is_in_doaj: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub journal_type: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub wikidata_id: Option<String>,

    /// Cached count of works, sourced from the warehouse
    pub paper_count: Option<i64>,

    pub created_date: DateTimeWithTimeZone,

    pub updated_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::publisher::Entity",
        from = "Column::PublisherId",
        to = "super::publisher::Column::PublisherId"
    )]
    Publisher,
}

impl Related<super::publisher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Publisher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
