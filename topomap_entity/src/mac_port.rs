use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Observation of a MAC address on an interface, one row per (interface, mac).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mac_port")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub mac_port_id: i32,
    pub interface_id: i32,
    pub mac_id: i32,
    pub event_id: i32,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::interface::Entity",
        from = "Column::InterfaceId",
        to = "super::interface::Column::InterfaceId"
    )]
    Interface,
    #[sea_orm(
        belongs_to = "super::mac::Entity",
        from = "Column::MacId",
        to = "super::mac::Column::MacId"
    )]
    Mac,
}

impl Related<super::interface::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interface.def()
    }
}

impl Related<super::mac::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mac.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
