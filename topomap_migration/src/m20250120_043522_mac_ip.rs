use sea_orm_migration::prelude::*;

use super::m20250118_073012_event::Event;
use super::m20250118_074920_device::Device;
use super::m20250119_060010_mac::Mac;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MacIp::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MacIp::MacIpId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MacIp::DeviceId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-macip-deviceid")
                            .from(MacIp::Table, MacIp::DeviceId)
                            .to(Device::Table, Device::DeviceId),
                    )
                    .col(ColumnDef::new(MacIp::MacId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-macip-macid")
                            .from(MacIp::Table, MacIp::MacId)
                            .to(Mac::Table, Mac::MacId),
                    )
                    .col(ColumnDef::new(MacIp::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-macip-eventid")
                            .from(MacIp::Table, MacIp::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(MacIp::Address).string().not_null())
                    .col(ColumnDef::new(MacIp::Hostname).string())
                    .col(ColumnDef::new(MacIp::Version).integer().not_null())
                    .col(ColumnDef::new(MacIp::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-macip-device-mac-address")
                    .unique()
                    .table(MacIp::Table)
                    .col(MacIp::DeviceId)
                    .col(MacIp::MacId)
                    .col(MacIp::Address)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MacIp::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum MacIp {
    Table,
    MacIpId,
    DeviceId,
    MacId,
    EventId,
    Address,
    Hostname,
    Version,
    Enabled,
}
