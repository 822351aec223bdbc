use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A learned hardware address, globally unique across all devices. The
/// address is stored as 12 lowercase hex characters.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mac")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub mac_id: i32,
    pub oui_id: i32,
    pub event_id: i32,
    pub address: String,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::oui::Entity",
        from = "Column::OuiId",
        to = "super::oui::Column::OuiId"
    )]
    Oui,
    #[sea_orm(has_many = "super::mac_port::Entity")]
    MacPort,
    #[sea_orm(has_many = "super::mac_ip::Entity")]
    MacIp,
}

impl Related<super::oui::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Oui.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
