use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A polled network device, one row per hostname.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub device_id: i32,
    pub event_id: i32,
    pub hostname: String,
    pub name: String,
    pub sys_name: String,
    pub sys_description: String,
    pub sys_object_id: String,
    pub sys_uptime: i64,
    pub last_polled: i64,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::EventId"
    )]
    Event,
    #[sea_orm(has_many = "super::interface::Entity")]
    Interface,
    #[sea_orm(has_many = "super::vlan::Entity")]
    Vlan,
    #[sea_orm(has_many = "super::mac_ip::Entity")]
    MacIp,
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
