use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Collection).string().not_null())
                    .col(ColumnDef::new(Documents::Key).string().not_null())
                    .col(ColumnDef::new(Documents::Body).text().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk-documents")
                            .col(Documents::Collection)
                            .col(Documents::Key),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await
    }
}

/// One JSON document per (collection, key).
#[derive(Iden)]
enum Documents {
    Table,
    Collection,
    Key,
    Body,
}
