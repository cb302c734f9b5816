use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncStatuses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SyncStatuses::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(SyncStatuses::IndexId).big_integer().not_null())
                    .col(
                        ColumnDef::new(SyncStatuses::IndexTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SyncStatuses::TipId).big_integer().not_null())
                    .col(
                        ColumnDef::new(SyncStatuses::TipTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SyncStatuses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SyncStatuses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chains::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Chains::ChainId).text().not_null().primary_key())
                    .col(ColumnDef::new(Chains::Name).text().not_null())
                    .col(ColumnDef::new(Chains::Vm).text().not_null())
                    .col(ColumnDef::new(Chains::Network).integer().not_null())
                    .col(ColumnDef::new(Chains::Subnet).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Assets::AssetId).text().not_null().primary_key())
                    .col(ColumnDef::new(Assets::Type).text().not_null())
                    .col(ColumnDef::new(Assets::Name).text().not_null())
                    .col(ColumnDef::new(Assets::Symbol).text().not_null())
                    .col(ColumnDef::new(Assets::Denomination).small_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Blocks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blocks::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Blocks::Parent).text().not_null())
                    .col(ColumnDef::new(Blocks::Chain).text().not_null())
                    .col(ColumnDef::new(Blocks::Type).text().not_null())
                    .col(ColumnDef::new(Blocks::Height).big_integer().not_null())
                    .col(
                        ColumnDef::new(Blocks::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("blocks_chain_height")
                    .table(Blocks::Table)
                    .col(Blocks::Chain)
                    .col(Blocks::Height)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("blocks_parent")
                    .table(Blocks::Table)
                    .col(Blocks::Parent)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transactions::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Transactions::ReferenceTxId).text())
                    .col(ColumnDef::new(Transactions::Chain).text().not_null())
                    .col(ColumnDef::new(Transactions::Type).text().not_null())
                    .col(ColumnDef::new(Transactions::Block).text())
                    .col(ColumnDef::new(Transactions::BlockHeight).big_integer())
                    .col(
                        ColumnDef::new(Transactions::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::Status).text().not_null())
                    .col(ColumnDef::new(Transactions::Memo).text())
                    .col(ColumnDef::new(Transactions::MemoText).text())
                    .col(ColumnDef::new(Transactions::Nonce).big_integer())
                    .col(
                        ColumnDef::new(Transactions::Fee)
                            .decimal_len(20, 0)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Transactions::SourceChain).text())
                    .col(ColumnDef::new(Transactions::DestinationChain).text())
                    .col(
                        ColumnDef::new(Transactions::Metadata)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Transactions::InputAmounts)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(Transactions::OutputAmounts)
                            .json_binary()
                            .not_null()
                            .default("{}"),
                    )
                    .to_owned(),
            )
            .await?;

        // Full-text search over the readable memo
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE transactions ADD COLUMN IF NOT EXISTS memo_tsv tsvector \
                 GENERATED ALWAYS AS (to_tsvector('english', coalesce(memo_text, ''))) STORED",
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS transactions_memo_tsv ON transactions USING GIN (memo_tsv)",
            )
            .await?;

        for (name, col) in [
            ("transactions_chain", Transactions::Chain),
            ("transactions_type", Transactions::Type),
            ("transactions_block", Transactions::Block),
            ("transactions_block_height", Transactions::BlockHeight),
            ("transactions_timestamp", Transactions::Timestamp),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Transactions::Table)
                        .col(col)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(TransactionOutputs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionOutputs::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransactionOutputs::TxId).text().not_null())
                    .col(ColumnDef::new(TransactionOutputs::Chain).text().not_null())
                    .col(ColumnDef::new(TransactionOutputs::Type).text())
                    .col(ColumnDef::new(TransactionOutputs::Asset).text().not_null())
                    .col(ColumnDef::new(TransactionOutputs::Index).big_integer().not_null())
                    .col(
                        ColumnDef::new(TransactionOutputs::Locktime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransactionOutputs::Threshold).integer().not_null())
                    .col(ColumnDef::new(TransactionOutputs::Amount).decimal_len(20, 0).not_null())
                    .col(ColumnDef::new(TransactionOutputs::Group).integer().not_null())
                    .col(
                        ColumnDef::new(TransactionOutputs::Addresses)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(TransactionOutputs::Stake)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TransactionOutputs::Reward)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TransactionOutputs::Spent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TransactionOutputs::SpentTxId).text())
                    .col(ColumnDef::new(TransactionOutputs::SpentAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(TransactionOutputs::Payload).text())
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("transaction_outputs_tx_id", TransactionOutputs::TxId),
            ("transaction_outputs_spent_tx_id", TransactionOutputs::SpentTxId),
            ("transaction_outputs_asset", TransactionOutputs::Asset),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(TransactionOutputs::Table)
                        .col(col)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS transaction_outputs_addresses \
                 ON transaction_outputs USING GIN (addresses)",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransactionInputs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransactionInputs::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransactionInputs::TxId).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("transaction_inputs_tx_id")
                    .table(TransactionInputs::Table)
                    .col(TransactionInputs::TxId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewardsOwners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RewardsOwners::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(RewardsOwners::Locktime).big_integer().not_null())
                    .col(ColumnDef::new(RewardsOwners::Threshold).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewardsOwnerAddresses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RewardsOwnerAddresses::Id).text().not_null())
                    .col(ColumnDef::new(RewardsOwnerAddresses::Address).text().not_null())
                    .col(ColumnDef::new(RewardsOwnerAddresses::Index).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(RewardsOwnerAddresses::Id)
                            .col(RewardsOwnerAddresses::Address),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RewardsOwnerOutputs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RewardsOwnerOutputs::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RewardsOwnerOutputs::TransactionId)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RewardsOwnerOutputs::Index).integer().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RewardsOwnerOutputs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RewardsOwnerAddresses::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RewardsOwners::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransactionInputs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransactionOutputs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blocks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assets::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chains::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SyncStatuses::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum SyncStatuses {
    Table,
    Id,
    IndexId,
    IndexTime,
    TipId,
    TipTime,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Chains {
    Table,
    ChainId,
    Name,
    Vm,
    Network,
    Subnet,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    AssetId,
    Type,
    Name,
    Symbol,
    Denomination,
}

#[derive(DeriveIden)]
enum Blocks {
    Table,
    Id,
    Parent,
    Chain,
    Type,
    Height,
    Timestamp,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    ReferenceTxId,
    Chain,
    Type,
    Block,
    BlockHeight,
    Timestamp,
    Status,
    Memo,
    MemoText,
    Nonce,
    Fee,
    SourceChain,
    DestinationChain,
    Metadata,
    InputAmounts,
    OutputAmounts,
}

#[derive(DeriveIden)]
enum TransactionOutputs {
    Table,
    Id,
    TxId,
    Chain,
    Type,
    Asset,
    Index,
    Locktime,
    Threshold,
    Amount,
    Group,
    Addresses,
    Stake,
    Reward,
    Spent,
    SpentTxId,
    SpentAt,
    Payload,
}

#[derive(DeriveIden)]
enum TransactionInputs {
    Table,
    Id,
    TxId,
}

#[derive(DeriveIden)]
enum RewardsOwners {
    Table,
    Id,
    Locktime,
    Threshold,
}

#[derive(DeriveIden)]
enum RewardsOwnerAddresses {
    Table,
    Id,
    Address,
    Index,
}

#[derive(DeriveIden)]
enum RewardsOwnerOutputs {
    Table,
    Id,
    TransactionId,
    Index,
}
