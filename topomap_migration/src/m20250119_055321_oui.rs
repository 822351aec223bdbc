use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Oui::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Oui::OuiId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Oui::Prefix).string().not_null())
                    .col(ColumnDef::new(Oui::Vendor).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-oui-prefix")
                    .unique()
                    .table(Oui::Table)
                    .col(Oui::Prefix)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Oui::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(crate) enum Oui {
    Table,
    OuiId,
    Prefix,
    Vendor,
}
