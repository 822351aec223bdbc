use sea_orm_migration::prelude::*;

use super::m20250118_073012_event::Event;
use super::m20250118_074920_device::Device;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vlan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vlan::VlanId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vlan::DeviceId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vlan-deviceid")
                            .from(Vlan::Table, Vlan::DeviceId)
                            .to(Device::Table, Device::DeviceId),
                    )
                    .col(ColumnDef::new(Vlan::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vlan-eventid")
                            .from(Vlan::Table, Vlan::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(Vlan::Number).integer().not_null())
                    .col(ColumnDef::new(Vlan::Name).string())
                    .col(ColumnDef::new(Vlan::State).integer().not_null())
                    .col(ColumnDef::new(Vlan::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-vlan-device-number")
                    .unique()
                    .table(Vlan::Table)
                    .col(Vlan::DeviceId)
                    .col(Vlan::Number)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vlan::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Vlan {
    Table,
    VlanId,
    DeviceId,
    EventId,
    Number,
    Name,
    State,
    Enabled,
}
