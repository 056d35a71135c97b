//! The two ELT phases. Extract stages raw upstream payloads in Redis;
//! load migrates staged documents into MySQL. MySQL is never written
//! during extraction, so a failed fetch leaves the warehouse untouched.

use anyhow::Result;
use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::staging::{coin_key, prices_key, quotes_key, COINS_INDEX, PRICES_INDEX, QUOTES_INDEX};
use shared::{Config, DataError, StagingStore};
use tracing::info;

use crate::extract::{daily_closes, CoinGeckoClient, CoinMarket, QuoteBar, QuoteClient};
use crate::load;

#[derive(Debug, Default)]
pub struct ExtractReport {
    pub coins: usize,
    pub price_series: usize,
    pub quote_series: usize,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub coins: usize,
    pub crypto_rows: usize,
    pub oil_rows: usize,
    pub stock_rows: usize,
}

/// Staged price-history document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedPrices {
    pub coin_id: String,
    pub prices: Vec<(i64, f64)>,
}

/// Staged OHLCV-history document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedQuotes {
    pub symbol: String,
    pub bars: Vec<QuoteBar>,
}

fn parse_doc<T: DeserializeOwned>(key: &str, doc: serde_json::Value) -> Result<T> {
    serde_json::from_value(doc).map_err(|e| {
        DataError::MalformedDocument {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Fetch everything upstream and stage it as JSON documents.
pub async fn extract(config: &Config, store: &mut StagingStore) -> Result<ExtractReport> {
    let mut report = ExtractReport::default();

    let gecko = CoinGeckoClient::new(&config.crypto_api_url);
    info!(coins = config.coin_ids.len(), "Fetching coin market snapshots");
    let markets = gecko.markets(&config.coin_ids).await?;
    for market in &markets {
        store
            .put_document(COINS_INDEX, &coin_key(&market.id), &serde_json::to_value(market)?)
            .await?;
    }
    report.coins = markets.len();

    for coin_id in &config.coin_ids {
        info!(coin_id, days = config.history_days, "Fetching price history");
        let chart = gecko.market_chart(coin_id, config.history_days).await?;
        let staged = StagedPrices {
            coin_id: coin_id.clone(),
            prices: chart.prices,
        };
        store
            .put_document(PRICES_INDEX, &prices_key(coin_id), &serde_json::to_value(&staged)?)
            .await?;
        report.price_series += 1;
    }

    let quotes = QuoteClient::new(&config.quotes_api_url);
    let today = chrono::Utc::now().date_naive();
    let mut symbols = vec![config.oil_symbol.clone()];
    symbols.extend(config.stock_tickers.iter().cloned());
    for symbol in &symbols {
        info!(symbol, from = %config.quotes_start_date, "Fetching daily OHLCV history");
        let bars = quotes
            .daily_history(symbol, config.quotes_start_date, today)
            .await?;
        let staged = StagedQuotes {
            symbol: symbol.clone(),
            bars,
        };
        store
            .put_document(QUOTES_INDEX, &quotes_key(symbol), &serde_json::to_value(&staged)?)
            .await?;
        report.quote_series += 1;
    }

    Ok(report)
}

/// Migrate every staged document into MySQL. Idempotent: reruns
/// upsert on the natural keys.
pub async fn load(
    config: &Config,
    store: &mut StagingStore,
    db: &DatabaseConnection,
) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for key in store.keys(COINS_INDEX).await? {
        let doc = store
            .document(&key)
            .await?
            .ok_or_else(|| DataError::MissingDocument { key: key.clone() })?;
        let coin: CoinMarket = parse_doc(&key, doc)?;
        load::upsert_coin(db, &coin, config.usd_inr_rate).await?;
        report.coins += 1;
    }

    for key in store.keys(PRICES_INDEX).await? {
        let doc = store
            .document(&key)
            .await?
            .ok_or_else(|| DataError::MissingDocument { key: key.clone() })?;
        let staged: StagedPrices = parse_doc(&key, doc)?;
        let cleaned = load::clean_daily_series(daily_closes(&staged.prices));
        let written =
            load::upsert_crypto_prices(db, &staged.coin_id, &cleaned, config.usd_inr_rate).await?;
        info!(coin_id = %staged.coin_id, written, "Loaded crypto price series");
        report.crypto_rows += written;
    }

    for key in store.keys(QUOTES_INDEX).await? {
        let doc = store
            .document(&key)
            .await?
            .ok_or_else(|| DataError::MissingDocument { key: key.clone() })?;
        let staged: StagedQuotes = parse_doc(&key, doc)?;
        if staged.symbol == config.oil_symbol {
            let written = load::upsert_oil_prices(db, &staged.bars, config.usd_inr_rate).await?;
            info!(symbol = %staged.symbol, written, "Loaded oil price series");
            report.oil_rows += written;
        } else {
            let written =
                load::upsert_stock_prices(db, &staged.symbol, &staged.bars, config.usd_inr_rate)
                    .await?;
            info!(ticker = %staged.symbol, written, "Loaded stock price series");
            report.stock_rows += written;
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_prices_round_trip() {
        let staged = StagedPrices {
            coin_id: "bitcoin".to_string(),
            prices: vec![(1736899200000, 100.5)],
        };
        let doc = serde_json::to_value(&staged).unwrap();
        let back: StagedPrices = parse_doc("stage:prices:bitcoin", doc).unwrap();
        assert_eq!(back.coin_id, "bitcoin");
        assert_eq!(back.prices, staged.prices);
    }

    #[test]
    fn test_parse_doc_reports_key() {
        let err = parse_doc::<StagedPrices>("stage:prices:bogus", serde_json::json!({"nope": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("stage:prices:bogus"));
    }
}
