use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per tracked coin, refreshed on every load
        manager
            .create_table(
                Table::create()
                    .table(Cryptocurrencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cryptocurrencies::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(Cryptocurrencies::CoinId).string().not_null().unique_key())
                    .col(ColumnDef::new(Cryptocurrencies::Name).string().not_null())
                    .col(ColumnDef::new(Cryptocurrencies::Symbol).string().not_null())
                    .col(ColumnDef::new(Cryptocurrencies::MarketCapRank).integer().null())
                    .col(ColumnDef::new(Cryptocurrencies::CurrentPrice).decimal_len(30, 8).not_null())
                    .col(ColumnDef::new(Cryptocurrencies::MarketCap).decimal_len(30, 2).not_null())
                    .col(ColumnDef::new(Cryptocurrencies::TotalVolume).decimal_len(30, 2).not_null())
                    .col(ColumnDef::new(Cryptocurrencies::CirculatingSupply).decimal_len(30, 8).null())
                    .col(ColumnDef::new(Cryptocurrencies::TotalSupply).decimal_len(30, 8).null())
                    .col(ColumnDef::new(Cryptocurrencies::Ath).decimal_len(30, 8).not_null())
                    .col(ColumnDef::new(Cryptocurrencies::LastUpdated).timestamp().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cryptocurrencies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cryptocurrencies {
    Table,
    Id,
    CoinId,
    Name,
    Symbol,
    MarketCapRank,
    CurrentPrice,
    MarketCap,
    TotalVolume,
    CirculatingSupply,
    TotalSupply,
    Ath,
    LastUpdated,
}
