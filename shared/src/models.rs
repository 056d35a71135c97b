use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::FromRow;

/// One joined row of the four tracked markets on a single date.
/// Equity legs are NULL on non-trading days until forward fill runs.
#[derive(Debug, Clone, FromRow)]
pub struct MarketSnapshotRow {
    pub entry_date: NaiveDate,
    pub btc: Option<Decimal>,
    pub oil: Option<Decimal>,
    pub sp500: Option<Decimal>,
    pub nifty: Option<Decimal>,
}

/// Daily close for a single coin.
#[derive(Debug, Clone, FromRow)]
pub struct CoinPricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Row feeding the correlation matrix (bitcoin vs oil vs stock close).
#[derive(Debug, Clone, FromRow)]
pub struct CorrelationRow {
    pub btc: Option<Decimal>,
    pub oil: Option<Decimal>,
    pub stock: Option<Decimal>,
}

/// Coin listing row for the asset picker.
#[derive(Debug, Clone, FromRow)]
pub struct CoinListing {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
}
