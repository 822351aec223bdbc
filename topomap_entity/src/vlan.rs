use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A VLAN referenced by at least one interface, one row per (device, number).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vlan")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub vlan_id: i32,
    pub device_id: i32,
    pub event_id: i32,
    pub number: i32,
    pub name: Option<String>,
    pub state: i32,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::DeviceId"
    )]
    Device,
    #[sea_orm(has_many = "super::vlan_port::Entity")]
    VlanPort,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
