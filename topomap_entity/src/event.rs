use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One polling cycle for one device. Rows confirmed by a cycle carry its id,
/// so current rows are distinguishable from rows last seen by an older cycle.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub event_id: i32,
    pub created: String,
    pub hostname: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
