use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Vendor registration for a 3-byte MAC prefix. Reference data shared by all
/// devices; the sentinel row (prefix `000000`) catches unknown vendors.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oui")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub oui_id: i32,
    pub prefix: String,
    pub vendor: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mac::Entity")]
    Mac,
}

impl Related<super::mac::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mac.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
