use sea_orm_migration::prelude::*;

use super::m20250118_073012_event::Event;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Device::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Device::DeviceId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Device::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-device-eventid")
                            .from(Device::Table, Device::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(Device::Hostname).string().not_null())
                    .col(ColumnDef::new(Device::Name).string().not_null())
                    .col(ColumnDef::new(Device::SysName).string().not_null())
                    .col(ColumnDef::new(Device::SysDescription).string().not_null())
                    .col(ColumnDef::new(Device::SysObjectId).string().not_null())
                    .col(ColumnDef::new(Device::SysUptime).big_integer().not_null())
                    .col(ColumnDef::new(Device::LastPolled).big_integer().not_null())
                    .col(ColumnDef::new(Device::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-device-hostname")
                    .unique()
                    .table(Device::Table)
                    .col(Device::Hostname)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Device::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Device {
    Table,
    DeviceId,
    EventId,
    Hostname,
    Name,
    SysName,
    SysDescription,
    SysObjectId,
    SysUptime,
    LastPolled,
    Enabled,
}
