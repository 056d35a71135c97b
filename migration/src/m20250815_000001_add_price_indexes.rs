use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The dashboard join and the per-coin series both scan by date
        manager
            .create_index(
                Index::create()
                    .name("idx_crypto_prices_date")
                    .table(CryptoPrices::Table)
                    .col(CryptoPrices::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_prices_date")
                    .table(StockPrices::Table)
                    .col(StockPrices::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_stock_prices_date")
                    .table(StockPrices::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_crypto_prices_date")
                    .table(CryptoPrices::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum CryptoPrices {
    Table,
    Date,
}

#[derive(DeriveIden)]
enum StockPrices {
    Table,
    Date,
}
