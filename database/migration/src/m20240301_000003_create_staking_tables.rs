use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn timestamptz(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn bigint(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).big_integer().not_null().default(0).to_owned()
}

fn int(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(0).to_owned()
}

fn double(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).double().not_null().default(0.0).to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Addresses::Value).text().not_null().primary_key())
                    .col(timestamptz(Addresses::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamptz(Addresses::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Validators::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Validators::NodeId).text().not_null().primary_key())
                    .col(&mut bigint(Validators::StakeAmount))
                    .col(&mut double(Validators::StakePercent))
                    .col(&mut bigint(Validators::PotentialReward))
                    .col(ColumnDef::new(Validators::RewardAddress).text().not_null())
                    .col(ColumnDef::new(Validators::Active).boolean().not_null())
                    .col(&mut timestamptz(Validators::ActiveStartTime))
                    .col(&mut timestamptz(Validators::ActiveEndTime))
                    .col(&mut double(Validators::ActiveProgressPercent))
                    .col(&mut double(Validators::Uptime))
                    .col(&mut int(Validators::DelegationsCount))
                    .col(&mut double(Validators::DelegationsPercent))
                    .col(&mut bigint(Validators::DelegatedAmount))
                    .col(&mut double(Validators::DelegatedAmountPercent))
                    .col(&mut double(Validators::DelegationFee))
                    .col(&mut bigint(Validators::Capacity))
                    .col(&mut double(Validators::CapacityPercent))
                    .col(&mut bigint(Validators::FirstHeight))
                    .col(&mut bigint(Validators::LastHeight))
                    .col(timestamptz(Validators::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamptz(Validators::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ValidatorSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ValidatorSequences::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(&mut timestamptz(ValidatorSequences::Time))
                    .col(&mut bigint(ValidatorSequences::Height))
                    .col(ColumnDef::new(ValidatorSequences::NodeId).text().not_null())
                    .col(&mut bigint(ValidatorSequences::StakeAmount))
                    .col(&mut double(ValidatorSequences::StakePercent))
                    .col(&mut bigint(ValidatorSequences::PotentialReward))
                    .col(ColumnDef::new(ValidatorSequences::RewardAddress).text().not_null())
                    .col(ColumnDef::new(ValidatorSequences::Active).boolean().not_null())
                    .col(&mut timestamptz(ValidatorSequences::ActiveStartTime))
                    .col(&mut timestamptz(ValidatorSequences::ActiveEndTime))
                    .col(&mut double(ValidatorSequences::ActiveProgressPercent))
                    .col(&mut int(ValidatorSequences::DelegationsCount))
                    .col(&mut double(ValidatorSequences::DelegationsPercent))
                    .col(&mut bigint(ValidatorSequences::DelegatedAmount))
                    .col(&mut double(ValidatorSequences::DelegatedAmountPercent))
                    .col(&mut double(ValidatorSequences::DelegationFee))
                    .col(&mut double(ValidatorSequences::Uptime))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("validator_sequences_time_node")
                    .table(ValidatorSequences::Table)
                    .col(ValidatorSequences::Time)
                    .col(ValidatorSequences::NodeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ValidatorStats::Table)
                    .if_not_exists()
                    .col(&mut timestamptz(ValidatorStats::Time))
                    .col(ColumnDef::new(ValidatorStats::Bucket).text().not_null())
                    .col(ColumnDef::new(ValidatorStats::NodeId).text().not_null())
                    .col(&mut double(ValidatorStats::UptimeMin))
                    .col(&mut double(ValidatorStats::UptimeMax))
                    .col(&mut double(ValidatorStats::UptimeAvg))
                    .col(&mut bigint(ValidatorStats::StakeAmount))
                    .col(&mut double(ValidatorStats::StakePercent))
                    .col(&mut int(ValidatorStats::DelegationsCount))
                    .col(&mut double(ValidatorStats::DelegationsPercent))
                    .col(&mut bigint(ValidatorStats::DelegatedAmount))
                    .col(&mut double(ValidatorStats::DelegatedAmountPercent))
                    .primary_key(
                        Index::create()
                            .col(ValidatorStats::Time)
                            .col(ValidatorStats::Bucket)
                            .col(ValidatorStats::NodeId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Delegations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Delegations::ReferenceId)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Delegations::NodeId).text().not_null())
                    .col(&mut bigint(Delegations::StakeAmount))
                    .col(&mut bigint(Delegations::PotentialReward))
                    .col(ColumnDef::new(Delegations::RewardAddress).text().not_null())
                    .col(ColumnDef::new(Delegations::Active).boolean().not_null())
                    .col(&mut timestamptz(Delegations::ActiveStartTime))
                    .col(&mut timestamptz(Delegations::ActiveEndTime))
                    .col(&mut bigint(Delegations::FirstHeight))
                    .col(&mut bigint(Delegations::LastHeight))
                    .col(timestamptz(Delegations::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamptz(Delegations::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("delegations_node_id")
                    .table(Delegations::Table)
                    .col(Delegations::NodeId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NetworkMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NetworkMetrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(&mut timestamptz(NetworkMetrics::Time))
                    .col(&mut bigint(NetworkMetrics::Height))
                    .col(&mut int(NetworkMetrics::PeersCount))
                    .col(&mut int(NetworkMetrics::BlockchainsCount))
                    .col(&mut int(NetworkMetrics::ActiveValidatorsCount))
                    .col(&mut int(NetworkMetrics::PendingValidatorsCount))
                    .col(&mut int(NetworkMetrics::ActiveDelegationsCount))
                    .col(&mut int(NetworkMetrics::PendingDelegationsCount))
                    .col(&mut bigint(NetworkMetrics::MinValidatorStake))
                    .col(&mut bigint(NetworkMetrics::MinDelegationStake))
                    .col(&mut bigint(NetworkMetrics::TxFee))
                    .col(&mut bigint(NetworkMetrics::CreationTxFee))
                    .col(&mut double(NetworkMetrics::Uptime))
                    .col(&mut double(NetworkMetrics::DelegationFee))
                    .col(&mut bigint(NetworkMetrics::TotalStaked))
                    .col(&mut bigint(NetworkMetrics::TotalDelegated))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("network_metrics_time")
                    .table(NetworkMetrics::Table)
                    .col(NetworkMetrics::Time)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NetworkStats::Table)
                    .if_not_exists()
                    .col(&mut timestamptz(NetworkStats::Time))
                    .col(ColumnDef::new(NetworkStats::Bucket).text().not_null())
                    .col(&mut bigint(NetworkStats::HeightChange))
                    .col(&mut int(NetworkStats::Peers))
                    .col(&mut int(NetworkStats::Blockchains))
                    .col(&mut int(NetworkStats::ActiveValidators))
                    .col(&mut int(NetworkStats::PendingValidators))
                    .col(&mut double(NetworkStats::ValidatorUptime))
                    .col(&mut int(NetworkStats::ActiveDelegations))
                    .col(&mut int(NetworkStats::PendingDelegations))
                    .col(&mut bigint(NetworkStats::MinValidatorStake))
                    .col(&mut bigint(NetworkStats::MinDelegationStake))
                    .col(&mut bigint(NetworkStats::TxFee))
                    .col(&mut bigint(NetworkStats::CreateTxFee))
                    .col(&mut bigint(NetworkStats::TotalStaked))
                    .col(&mut bigint(NetworkStats::TotalDelegated))
                    .primary_key(
                        Index::create()
                            .col(NetworkStats::Time)
                            .col(NetworkStats::Bucket),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NetworkStats::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(NetworkMetrics::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Delegations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ValidatorStats::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ValidatorSequences::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Validators::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Addresses {
    Table,
    Value,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Validators {
    Table,
    NodeId,
    StakeAmount,
    StakePercent,
    PotentialReward,
    RewardAddress,
    Active,
    ActiveStartTime,
    ActiveEndTime,
    ActiveProgressPercent,
    Uptime,
    DelegationsCount,
    DelegationsPercent,
    DelegatedAmount,
    DelegatedAmountPercent,
    DelegationFee,
    Capacity,
    CapacityPercent,
    FirstHeight,
    LastHeight,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ValidatorSequences {
    Table,
    Id,
    Time,
    Height,
    NodeId,
    StakeAmount,
    StakePercent,
    PotentialReward,
    RewardAddress,
    Active,
    ActiveStartTime,
    ActiveEndTime,
    ActiveProgressPercent,
    DelegationsCount,
    DelegationsPercent,
    DelegatedAmount,
    DelegatedAmountPercent,
    DelegationFee,
    Uptime,
}

#[derive(DeriveIden)]
enum ValidatorStats {
    Table,
    Time,
    Bucket,
    NodeId,
    UptimeMin,
    UptimeMax,
    UptimeAvg,
    StakeAmount,
    StakePercent,
    DelegationsCount,
    DelegationsPercent,
    DelegatedAmount,
    DelegatedAmountPercent,
}

#[derive(DeriveIden)]
enum Delegations {
    Table,
    ReferenceId,
    NodeId,
    StakeAmount,
    PotentialReward,
    RewardAddress,
    Active,
    ActiveStartTime,
    ActiveEndTime,
    FirstHeight,
    LastHeight,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum NetworkMetrics {
    Table,
    Id,
    Time,
    Height,
    PeersCount,
    BlockchainsCount,
    ActiveValidatorsCount,
    PendingValidatorsCount,
    ActiveDelegationsCount,
    PendingDelegationsCount,
    MinValidatorStake,
    MinDelegationStake,
    TxFee,
    CreationTxFee,
    Uptime,
    DelegationFee,
    TotalStaked,
    TotalDelegated,
}

#[derive(DeriveIden)]
enum NetworkStats {
    Table,
    Time,
    Bucket,
    HeightChange,
    Peers,
    Blockchains,
    ActiveValidators,
    PendingValidators,
    ValidatorUptime,
    ActiveDelegations,
    PendingDelegations,
    MinValidatorStake,
    MinDelegationStake,
    TxFee,
    CreateTxFee,
    TotalStaked,
    TotalDelegated,
}
