//! Rate-limit exemption entity
//!
//! The set of active rows is flattened into a single config var on the
//! API proxy app after every save.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ratelimit_exempt")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(column_type = "Text", unique)]
    pub email: String,

    pub active: bool,

    pub expires: Option<Date>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Support ticket that motivated the exemption
    #[sea_orm(column_type = "Text", nullable)]
    pub ticket: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
