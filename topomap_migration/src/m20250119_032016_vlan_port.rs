use sea_orm_migration::prelude::*;

use super::m20250118_073012_event::Event;
use super::m20250118_082455_interface::Interface;
use super::m20250119_031208_vlan::Vlan;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VlanPort::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VlanPort::VlanPortId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VlanPort::InterfaceId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vlanport-interfaceid")
                            .from(VlanPort::Table, VlanPort::InterfaceId)
                            .to(Interface::Table, Interface::InterfaceId),
                    )
                    .col(ColumnDef::new(VlanPort::VlanId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vlanport-vlanid")
                            .from(VlanPort::Table, VlanPort::VlanId)
                            .to(Vlan::Table, Vlan::VlanId),
                    )
                    .col(ColumnDef::new(VlanPort::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vlanport-eventid")
                            .from(VlanPort::Table, VlanPort::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(VlanPort::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-vlanport-interface-vlan")
                    .unique()
                    .table(VlanPort::Table)
                    .col(VlanPort::InterfaceId)
                    .col(VlanPort::VlanId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VlanPort::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum VlanPort {
    Table,
    VlanPortId,
    InterfaceId,
    VlanId,
    EventId,
    Enabled,
}
