//! Daily OHLCV history client for oil futures and stock indices,
//! speaking the Stooq CSV download format.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use shared::DataError;

/// One daily bar from the CSV download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBar {
    #[serde(rename = "Date", alias = "date")]
    pub date: NaiveDate,
    #[serde(rename = "Open", alias = "open")]
    pub open: f64,
    #[serde(rename = "High", alias = "high")]
    pub high: f64,
    #[serde(rename = "Low", alias = "low")]
    pub low: f64,
    #[serde(rename = "Close", alias = "close")]
    pub close: f64,
    // Index feeds report no volume ("N/D" or blank); treat as absent
    #[serde(rename = "Volume", alias = "volume", deserialize_with = "de_lenient_volume", default)]
    pub volume: Option<i64>,
}

fn de_lenient_volume<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<f64>().ok()).map(|v| v as i64))
}

#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Daily history for one symbol over `[from, to]` inclusive.
    pub async fn daily_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<QuoteBar>> {
        let url = format!("{}/q/d/l/", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&history_params(symbol, from, to))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DataError::UpstreamStatus {
                status: response.status().as_u16(),
                url,
            }
            .into());
        }

        let body = response.text().await?;
        parse_history_csv(&body)
    }
}

/// Query string for the download endpoint: symbol, date bounds in the
/// compact YYYYMMDD form the feed expects, daily interval.
fn history_params(symbol: &str, from: NaiveDate, to: NaiveDate) -> [(String, String); 4] {
    [
        ("s".to_string(), symbol.to_string()),
        ("d1".to_string(), from.format("%Y%m%d").to_string()),
        ("d2".to_string(), to.format("%Y%m%d").to_string()),
        ("i".to_string(), "d".to_string()),
    ]
}

/// Parse the `Date,Open,High,Low,Close,Volume` download body.
pub fn parse_history_csv(body: &str) -> Result<Vec<QuoteBar>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut bars = Vec::new();
    for record in reader.deserialize() {
        let bar: QuoteBar = record.map_err(|e| DataError::Validation {
            message: format!("bad CSV row: {}", e),
        })?;
        bars.push(bar);
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_params_date_bounds() {
        let params = history_params(
            "cl.f",
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        assert_eq!(params[0], ("s".to_string(), "cl.f".to_string()));
        assert_eq!(params[1], ("d1".to_string(), "20190101".to_string()));
        assert_eq!(params[2], ("d2".to_string(), "20250115".to_string()));
        assert_eq!(params[3], ("i".to_string(), "d".to_string()));
    }

    #[test]
    fn test_parse_history_csv() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    2025-01-14,78.2,79.5,77.8,79.1,351200\n\
                    2025-01-15,79.1,80.0,78.9,79.6,298400\n";
        let bars = parse_history_csv(body).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 1, 14).unwrap());
        assert_eq!(bars[0].close, 79.1);
        assert_eq!(bars[1].volume, Some(298400));
    }

    #[test]
    fn test_parse_history_csv_missing_volume() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    2025-01-14,23000.0,23150.0,22980.0,23100.0,N/D\n";
        let bars = parse_history_csv(body).unwrap();
        assert_eq!(bars[0].volume, None);
    }

    #[test]
    fn test_parse_history_csv_rejects_garbage() {
        let body = "Date,Open,High,Low,Close,Volume\n\
                    not-a-date,1,2,3,4,5\n";
        assert!(parse_history_csv(body).is_err());
    }
}
