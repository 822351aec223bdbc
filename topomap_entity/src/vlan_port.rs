use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership of an interface in a VLAN, one row per (interface, vlan).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vlan_port")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub vlan_port_id: i32,
    pub interface_id: i32,
    pub vlan_id: i32,
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
        belongs_to = "super::vlan::Entity",
        from = "Column::VlanId",
        to = "super::vlan::Column::VlanId"
    )]
    Vlan,
}

impl Related<super::interface::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interface.def()
    }
}

impl Related<super::vlan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
