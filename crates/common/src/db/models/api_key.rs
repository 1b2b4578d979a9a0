//! API key entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "api_key")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "Text", unique)]
    pub email: String,

    #[sea_orm(column_type = "Text")]
    pub key: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub organization: Option<String>,

    pub created: DateTimeWithTimeZone,

    pub expires: Option<Date>,

    pub active: bool,

    pub is_demo: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Domain granted premium API treatment, if any
    #[sea_orm(column_type = "Text", nullable)]
    pub premium_domain: Option<String>,

    /// Support-desk organization id, once known
    pub zendesk_organization_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
