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
                    .table(Interface::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interface::InterfaceId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Interface::DeviceId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-interface-deviceid")
                            .from(Interface::Table, Interface::DeviceId)
                            .to(Device::Table, Device::DeviceId),
                    )
                    .col(ColumnDef::new(Interface::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-interface-eventid")
                            .from(Interface::Table, Interface::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(Interface::Ifindex).big_integer().not_null())
                    .col(ColumnDef::new(Interface::AdminStatus).integer().not_null())
                    .col(ColumnDef::new(Interface::OperStatus).integer().not_null())
                    .col(ColumnDef::new(Interface::Speed).big_integer())
                    .col(ColumnDef::new(Interface::Alias).string())
                    .col(ColumnDef::new(Interface::Description).string())
                    .col(ColumnDef::new(Interface::Duplex).integer())
                    .col(ColumnDef::new(Interface::Ethernet).boolean().not_null())
                    .col(ColumnDef::new(Interface::NativeVlan).integer())
                    .col(ColumnDef::new(Interface::Trunk).boolean().not_null())
                    .col(ColumnDef::new(Interface::RemoteDevice).string())
                    .col(ColumnDef::new(Interface::RemotePort).string())
                    .col(ColumnDef::new(Interface::Platform).string())
                    .col(ColumnDef::new(Interface::RemotePortDescription).string())
                    .col(ColumnDef::new(Interface::RemoteCapabilities).string())
                    .col(ColumnDef::new(Interface::RemoteSystemDescription).string())
                    .col(ColumnDef::new(Interface::RemoteSystemName).string())
                    .col(ColumnDef::new(Interface::IdleSince).big_integer().not_null())
                    .col(ColumnDef::new(Interface::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-interface-device-ifindex")
                    .unique()
                    .table(Interface::Table)
                    .col(Interface::DeviceId)
                    .col(Interface::Ifindex)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Interface::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Interface {
    Table,
    InterfaceId,
    DeviceId,
    EventId,
    Ifindex,
    AdminStatus,
    OperStatus,
    Speed,
    Alias,
    Description,
    Duplex,
    Ethernet,
    NativeVlan,
    Trunk,
    RemoteDevice,
    RemotePort,
    Platform,
    RemotePortDescription,
    RemoteCapabilities,
    RemoteSystemDescription,
    RemoteSystemName,
    IdleSince,
    Enabled,
}
