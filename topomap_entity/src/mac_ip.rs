use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An IP-to-MAC binding learned from a device's neighbor tables, one row per
/// (device, mac, address). `hostname` is reverse-DNS enrichment and may be
/// absent; `version` is 4 or 6.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mac_ip")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub mac_ip_id: i32,
    pub device_id: i32,
    pub mac_id: i32,
    pub event_id: i32,
    pub address: String,
    pub hostname: Option<String>,
    pub version: i32,
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
    #[sea_orm(
        belongs_to = "super::mac::Entity",
        from = "Column::MacId",
        to = "super::mac::Column::MacId"
    )]
    Mac,
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl Related<super::mac::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mac.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
