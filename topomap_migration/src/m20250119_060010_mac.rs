use sea_orm_migration::prelude::*;

use super::m20250118_073012_event::Event;
use super::m20250119_055321_oui::Oui;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mac::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mac::MacId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mac::OuiId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mac-ouiid")
                            .from(Mac::Table, Mac::OuiId)
                            .to(Oui::Table, Oui::OuiId),
                    )
                    .col(ColumnDef::new(Mac::EventId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mac-eventid")
                            .from(Mac::Table, Mac::EventId)
                            .to(Event::Table, Event::EventId),
                    )
                    .col(ColumnDef::new(Mac::Address).string().not_null())
                    .col(ColumnDef::new(Mac::Enabled).boolean().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-mac-address")
                    .unique()
                    .table(Mac::Table)
                    .col(Mac::Address)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mac::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Mac {
    Table,
    MacId,
    OuiId,
    EventId,
    Address,
    Enabled,
}
