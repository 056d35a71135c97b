//! Staging -> MySQL load step: cleaning, currency conversion, upserts.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use shared::analytics::zscore_keep;
use shared::entity::{crypto_prices, cryptocurrencies, oil_prices, stock_prices};
use shared::DataError;
use std::collections::BTreeMap;

use crate::extract::{CoinMarket, QuoteBar};

/// Outlier rejection bound for daily price series.
pub const OUTLIER_Z: f64 = 3.0;

/// Convert a USD value to the reporting currency.
pub fn to_inr(usd: f64, rate: f64) -> f64 {
    usd * rate
}

fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(8))
        .ok_or_else(|| {
            DataError::Validation {
                message: format!("value {} is not representable as a decimal", value),
            }
            .into()
        })
}

/// Dedupe by date (last wins), drop non-positive prices, reject
/// z-score outliers. Input order does not matter; output is sorted.
pub fn clean_daily_series(points: Vec<(NaiveDate, f64)>) -> Vec<(NaiveDate, f64)> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, price) in points {
        if price > 0.0 {
            by_date.insert(date, price);
        }
    }
    let (dates, prices): (Vec<NaiveDate>, Vec<f64>) = by_date.into_iter().unzip();
    zscore_keep(&prices, OUTLIER_Z)
        .into_iter()
        .map(|i| (dates[i], prices[i]))
        .collect()
}

/// Refresh the snapshot row for one coin.
pub async fn upsert_coin(db: &DatabaseConnection, coin: &CoinMarket, rate: f64) -> Result<()> {
    let model = cryptocurrencies::ActiveModel {
        coin_id: Set(coin.id.clone()),
        name: Set(coin.name.clone()),
        symbol: Set(coin.symbol.clone()),
        market_cap_rank: Set(coin.market_cap_rank),
        current_price: Set(to_decimal(to_inr(coin.current_price.unwrap_or(0.0), rate))?),
        market_cap: Set(to_decimal(to_inr(coin.market_cap.unwrap_or(0.0), rate))?.round_dp(2)),
        total_volume: Set(to_decimal(to_inr(coin.total_volume.unwrap_or(0.0), rate))?.round_dp(2)),
        circulating_supply: Set(coin.circulating_supply.map(to_decimal).transpose()?),
        total_supply: Set(coin.total_supply.map(to_decimal).transpose()?),
        ath: Set(to_decimal(to_inr(coin.ath.unwrap_or(0.0), rate))?),
        last_updated: Set(coin.last_updated),
        ..Default::default()
    };

    cryptocurrencies::Entity::insert(model)
        .on_conflict(
            OnConflict::column(cryptocurrencies::Column::CoinId)
                .update_columns([
                    cryptocurrencies::Column::Name,
                    cryptocurrencies::Column::Symbol,
                    cryptocurrencies::Column::MarketCapRank,
                    cryptocurrencies::Column::CurrentPrice,
                    cryptocurrencies::Column::MarketCap,
                    cryptocurrencies::Column::TotalVolume,
                    cryptocurrencies::Column::CirculatingSupply,
                    cryptocurrencies::Column::TotalSupply,
                    cryptocurrencies::Column::Ath,
                    cryptocurrencies::Column::LastUpdated,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(())
}

/// Upsert a coin's cleaned daily series. Returns rows written.
pub async fn upsert_crypto_prices(
    db: &DatabaseConnection,
    coin_id: &str,
    points: &[(NaiveDate, f64)],
    rate: f64,
) -> Result<usize> {
    if points.is_empty() {
        return Ok(0);
    }
    let models = points
        .iter()
        .map(|(date, price)| {
            Ok(crypto_prices::ActiveModel {
                coin_id: Set(coin_id.to_string()),
                date: Set(*date),
                price_usd: Set(to_decimal(to_inr(*price, rate))?),
                ..Default::default()
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let written = models.len();

    crypto_prices::Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([crypto_prices::Column::CoinId, crypto_prices::Column::Date])
                .update_column(crypto_prices::Column::PriceUsd)
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(written)
}

/// Upsert the crude series from daily bars (close only). Returns rows written.
pub async fn upsert_oil_prices(
    db: &DatabaseConnection,
    bars: &[QuoteBar],
    rate: f64,
) -> Result<usize> {
    let cleaned = clean_daily_series(bars.iter().map(|b| (b.date, b.close)).collect());
    if cleaned.is_empty() {
        return Ok(0);
    }
    let models = cleaned
        .iter()
        .map(|(date, close)| {
            Ok(oil_prices::ActiveModel {
                date: Set(*date),
                price_usd: Set(to_decimal(to_inr(*close, rate))?),
                ..Default::default()
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let written = models.len();

    oil_prices::Entity::insert_many(models)
        .on_conflict(
            OnConflict::column(oil_prices::Column::Date)
                .update_column(oil_prices::Column::PriceUsd)
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(written)
}

/// Upsert full OHLCV for one index ticker. Returns rows written.
pub async fn upsert_stock_prices(
    db: &DatabaseConnection,
    ticker: &str,
    bars: &[QuoteBar],
    rate: f64,
) -> Result<usize> {
    // dedupe by date, last wins; outlier rejection keys off the close
    let mut by_date: BTreeMap<NaiveDate, &QuoteBar> = BTreeMap::new();
    for bar in bars {
        if bar.close > 0.0 {
            by_date.insert(bar.date, bar);
        }
    }
    let deduped: Vec<&QuoteBar> = by_date.into_values().collect();
    let closes: Vec<f64> = deduped.iter().map(|b| b.close).collect();
    let kept = zscore_keep(&closes, OUTLIER_Z);
    if kept.is_empty() {
        return Ok(0);
    }

    let models = kept
        .iter()
        .map(|&i| {
            let bar = deduped[i];
            Ok(stock_prices::ActiveModel {
                ticker: Set(ticker.to_string()),
                date: Set(bar.date),
                open: Set(to_decimal(to_inr(bar.open, rate))?),
                high: Set(to_decimal(to_inr(bar.high, rate))?),
                low: Set(to_decimal(to_inr(bar.low, rate))?),
                close: Set(to_decimal(to_inr(bar.close, rate))?),
                volume: Set(bar.volume.unwrap_or(0)),
                ..Default::default()
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let written = models.len();

    stock_prices::Entity::insert_many(models)
        .on_conflict(
            OnConflict::columns([stock_prices::Column::Ticker, stock_prices::Column::Date])
                .update_columns([
                    stock_prices::Column::Open,
                    stock_prices::Column::High,
                    stock_prices::Column::Low,
                    stock_prices::Column::Close,
                    stock_prices::Column::Volume,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_to_inr() {
        assert_eq!(to_inr(100.0, 83.0), 8300.0);
    }

    #[test]
    fn test_to_decimal_rounds() {
        let dec = to_decimal(1.123456789).unwrap();
        assert_eq!(dec.to_string(), "1.12345679");
    }

    #[test]
    fn test_clean_daily_series_dedupes_last_wins() {
        let points = vec![(d(1), 10.0), (d(2), 11.0), (d(1), 12.0)];
        let cleaned = clean_daily_series(points);
        assert_eq!(cleaned, vec![(d(1), 12.0), (d(2), 11.0)]);
    }

    #[test]
    fn test_clean_daily_series_drops_nonpositive() {
        let points = vec![(d(1), 10.0), (d(2), 0.0), (d(3), -4.0), (d(4), 11.0)];
        let cleaned = clean_daily_series(points);
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn test_clean_daily_series_rejects_outlier() {
        let mut points: Vec<(NaiveDate, f64)> = (1..=20).map(|i| (d(i), 100.0 + i as f64)).collect();
        points.push((d(21), 1_000_000.0));
        let cleaned = clean_daily_series(points);
        assert_eq!(cleaned.len(), 20);
        assert!(cleaned.iter().all(|(_, p)| *p < 1000.0));
    }
}
