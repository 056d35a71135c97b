use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Daily close per coin. Reruns of the loader upsert on (coin_id, date).
        manager
            .create_table(
                Table::create()
                    .table(CryptoPrices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CryptoPrices::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(CryptoPrices::CoinId).string().not_null())
                    .col(ColumnDef::new(CryptoPrices::Date).date().not_null())
                    .col(ColumnDef::new(CryptoPrices::PriceUsd).decimal_len(20, 8).not_null())
                    .index(
                        Index::create()
                            .name("uniq_crypto_coin_date")
                            .table(CryptoPrices::Table)
                            .col(CryptoPrices::CoinId)
                            .col(CryptoPrices::Date)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Daily crude close, one row per date
        manager
            .create_table(
                Table::create()
                    .table(OilPrices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OilPrices::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(OilPrices::Date).date().not_null().unique_key())
                    .col(ColumnDef::new(OilPrices::PriceUsd).decimal_len(20, 8).not_null())
                    .to_owned(),
            )
            .await?;

        // Daily OHLCV per index ticker
        manager
            .create_table(
                Table::create()
                    .table(StockPrices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StockPrices::Id).big_unsigned().auto_increment().primary_key())
                    .col(ColumnDef::new(StockPrices::Ticker).string().not_null())
                    .col(ColumnDef::new(StockPrices::Date).date().not_null())
                    .col(ColumnDef::new(StockPrices::Open).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(StockPrices::High).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(StockPrices::Low).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(StockPrices::Close).decimal_len(20, 8).not_null())
                    .col(ColumnDef::new(StockPrices::Volume).big_integer().not_null().default(0))
                    .index(
                        Index::create()
                            .name("uniq_stock_ticker_date")
                            .table(StockPrices::Table)
                            .col(StockPrices::Ticker)
                            .col(StockPrices::Date)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockPrices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OilPrices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CryptoPrices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CryptoPrices {
    Table,
    Id,
    CoinId,
    Date,
    PriceUsd,
}

#[derive(DeriveIden)]
enum OilPrices {
    Table,
    Id,
    Date,
    PriceUsd,
}

#[derive(DeriveIden)]
enum StockPrices {
    Table,
    Id,
    Ticker,
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
}
