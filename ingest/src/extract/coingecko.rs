//! CoinGecko-compatible market data client.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::DataError;
use std::collections::BTreeMap;

/// Coin snapshot as returned by `/coins/markets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<i32>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub ath: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Price history as returned by `/coins/{id}/market_chart`.
/// Each entry is `[timestamp_ms, price_usd]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<(i64, f64)>,
}

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Current market snapshot for the given coin ids.
    pub async fn markets(&self, coin_ids: &[String]) -> Result<Vec<CoinMarket>> {
        let url = format!("{}/coins/markets", self.base_url);
        let ids = coin_ids.join(",");
        let response = self
            .http
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("ids", ids.as_str()),
                ("order", "market_cap_desc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::UpstreamStatus {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let markets: Vec<CoinMarket> = response.json().await?;
        Ok(markets)
    }

    /// Daily-granularity price history for one coin.
    pub async fn market_chart(&self, coin_id: &str, days: u32) -> Result<MarketChart> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let days = days.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "daily"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::UpstreamStatus {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let chart: MarketChart = response.json().await?;
        Ok(chart)
    }
}

/// Collapse a millisecond-timestamped series to one close per UTC day.
/// The API emits intraday samples near the range edges; the last sample
/// of each day wins.
pub fn daily_closes(prices: &[(i64, f64)]) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (ts_ms, price) in prices {
        if let Some(dt) = DateTime::from_timestamp_millis(*ts_ms) {
            by_day.insert(dt.date_naive(), *price);
        }
    }
    by_day.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markets_payload_parses() {
        let body = r#"[{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "market_cap_rank": 1,
            "current_price": 64000.12,
            "market_cap": 1260000000000.0,
            "total_volume": 35000000000.0,
            "circulating_supply": 19700000.0,
            "total_supply": 21000000.0,
            "ath": 73737.0,
            "last_updated": "2025-01-15T10:00:00.000Z",
            "image": "ignored",
            "price_change_24h": -120.5
        }]"#;
        let markets: Vec<CoinMarket> = serde_json::from_str(body).unwrap();
        assert_eq!(markets.len(), 1);
        let btc = &markets[0];
        assert_eq!(btc.id, "bitcoin");
        assert_eq!(btc.market_cap_rank, Some(1));
        assert_eq!(btc.ath, Some(73737.0));
    }

    #[test]
    fn test_markets_payload_tolerates_nulls() {
        let body = r#"[{
            "id": "tether",
            "symbol": "usdt",
            "name": "Tether",
            "market_cap_rank": null,
            "current_price": 1.0,
            "market_cap": null,
            "total_volume": null,
            "circulating_supply": null,
            "total_supply": null,
            "ath": null,
            "last_updated": null
        }]"#;
        let markets: Vec<CoinMarket> = serde_json::from_str(body).unwrap();
        assert_eq!(markets[0].total_supply, None);
    }

    #[test]
    fn test_market_chart_parses_pairs() {
        let body = r#"{"prices": [[1736899200000, 100.5], [1736985600000, 101.25]]}"#;
        let chart: MarketChart = serde_json::from_str(body).unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.prices[0].1, 100.5);
    }

    #[test]
    fn test_daily_closes_last_sample_wins() {
        // two samples on 2025-01-15, one on 2025-01-16
        let prices = vec![
            (1736899200000, 100.0), // 2025-01-15 00:00 UTC
            (1736942400000, 105.0), // 2025-01-15 12:00 UTC
            (1736985600000, 110.0), // 2025-01-16 00:00 UTC
        ];
        let closes = daily_closes(&prices);
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[0].0, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(closes[0].1, 105.0);
        assert_eq!(closes[1].1, 110.0);
    }
}
