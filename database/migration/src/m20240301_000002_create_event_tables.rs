use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Events::Chain).text().not_null())
                    .col(ColumnDef::new(Events::BlockHash).text().not_null())
                    .col(ColumnDef::new(Events::BlockHeight).big_integer().not_null())
                    .col(ColumnDef::new(Events::TxHash).text().not_null())
                    .col(
                        ColumnDef::new(Events::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::Scope).text().not_null())
                    .col(ColumnDef::new(Events::Type).text().not_null())
                    .col(ColumnDef::new(Events::ItemId).text().not_null())
                    .col(ColumnDef::new(Events::ItemType).text().not_null())
                    .col(
                        ColumnDef::new(Events::Data)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup of the previous event of an item
        manager
            .create_index(
                Index::create()
                    .name("events_item")
                    .table(Events::Table)
                    .col(Events::ItemId)
                    .col(Events::ItemType)
                    .col(Events::Type)
                    .col(Events::BlockHeight)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("events_timestamp")
                    .table(Events::Table)
                    .col(Events::Timestamp)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EvmReceipts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EvmReceipts::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(EvmReceipts::Type).small_integer().not_null())
                    .col(ColumnDef::new(EvmReceipts::Status).big_integer().not_null())
                    .col(ColumnDef::new(EvmReceipts::ContractAddress).text())
                    .col(
                        ColumnDef::new(EvmReceipts::Logs)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EvmTraces::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EvmTraces::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(EvmTraces::Data).json_binary().not_null())
                    .col(
                        ColumnDef::new(EvmTraces::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvmTraces::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EvmReceipts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Chain,
    BlockHash,
    BlockHeight,
    TxHash,
    Timestamp,
    Scope,
    Type,
    ItemId,
    ItemType,
    Data,
}

#[derive(DeriveIden)]
enum EvmReceipts {
    Table,
    Id,
    Type,
    Status,
    ContractAddress,
    Logs,
}

#[derive(DeriveIden)]
enum EvmTraces {
    Table,
    Id,
    Data,
    CreatedAt,
}
