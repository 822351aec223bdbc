use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A physical or logical port on a device, one row per (device, ifindex).
///
/// `idle_since` is 0 while the port is in use or administratively down;
/// otherwise it holds the poll timestamp of the cycle that first found the
/// port enabled without link.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interface")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub interface_id: i32,
    pub device_id: i32,
    pub event_id: i32,
    pub ifindex: i64,
    pub admin_status: i32,
    pub oper_status: i32,
    pub speed: Option<i64>,
    pub alias: Option<String>,
    pub description: Option<String>,
    pub duplex: Option<i32>,
    pub ethernet: bool,
    pub native_vlan: Option<i32>,
    pub trunk: bool,
    pub remote_device: Option<String>,
    pub remote_port: Option<String>,
    pub platform: Option<String>,
    pub remote_port_description: Option<String>,
    pub remote_capabilities: Option<String>,
    pub remote_system_description: Option<String>,
    pub remote_system_name: Option<String>,
    pub idle_since: i64,
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
    #[sea_orm(has_many = "super::mac_port::Entity")]
    MacPort,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
