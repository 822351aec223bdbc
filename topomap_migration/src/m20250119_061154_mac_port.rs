use sea_orm_migration::prelude::*;

use super::m20250118_073012_event::Event;
use super::m20250118_082455_interface::Interface;
use super::m20250119_060010_mac::Mac;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MacPort::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MacPort::MacPortId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MacPort::InterfaceId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-macport-interfaceid")
                            .from(MacPort::Table, MacPort::InterfaceId)
                            .to(Interface::Table, Interface::InterfaceId),
                    )
                    .col(ColumnDef::new(MacPort::MacId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-macport-macid")
                            .from(MacPort::Table, MacPort::MacId)
                            .to(Mac::Table, Mac::MacId),
                    )
                    .col(ColumnDef::new(MacPort::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-macport-eventid")
                            .from(MacPort::Table, MacPort::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(MacPort::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-macport-interface-mac")
                    .unique()
                    .table(MacPort::Table)
                    .col(MacPort::InterfaceId)
                    .col(MacPort::MacId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MacPort::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum MacPort {
    Table,
    MacPortId,
    InterfaceId,
    MacId,
    EventId,
    Enabled,
}
