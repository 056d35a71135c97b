//! Dashboard data access: the cross-market join, per-coin series and
//! the correlation matrix. Queries return raw rows; the pure builders
//! below apply forward fill and averaging so they stay testable.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use shared::analytics::{correlation_matrix, fill_series, mean};
use shared::{CoinListing, CoinPricePoint, CorrelationRow, DbPool, MarketSnapshotRow};

/// Display labels in dashboard column order.
pub const DASHBOARD_ASSETS: [&str; 4] = ["BTC_INR", "Oil_INR", "SP500_INR", "NIFTY_INR"];

/// Bitcoin joined against oil and the two index tickers on date.
/// LEFT JOINs keep the 24/7 crypto calendar; equity gaps surface as
/// NULL and are bridged by forward fill downstream.
const SNAPSHOT_SQL: &str = r#"
SELECT c.date AS entry_date,
       c.price_usd AS btc,
       o.price_usd AS oil,
       s.close AS sp500,
       n.close AS nifty
FROM crypto_prices c
LEFT JOIN oil_prices o ON c.date = o.date
LEFT JOIN stock_prices s ON c.date = s.date AND s.ticker = '^GSPC'
LEFT JOIN stock_prices n ON c.date = n.date AND n.ticker = '^NSEI'
WHERE c.coin_id = 'bitcoin'
ORDER BY c.date ASC
"#;

const CORRELATION_SQL: &str = r#"
SELECT c.price_usd AS btc,
       o.price_usd AS oil,
       s.close AS stock
FROM crypto_prices c
LEFT JOIN oil_prices o ON c.date = o.date
LEFT JOIN stock_prices s ON s.date = c.date AND s.ticker = '^GSPC'
WHERE c.coin_id = 'bitcoin'
ORDER BY c.date ASC
"#;

#[derive(Debug, Clone)]
pub struct MarketSummary {
    pub dates: Vec<NaiveDate>,
    /// (asset label, forward-filled values), in DASHBOARD_ASSETS order.
    pub series: Vec<(String, Vec<f64>)>,
    /// (asset label, mean of the filled values).
    pub averages: Vec<(String, f64)>,
}

fn dec_opt(value: &Option<Decimal>) -> Option<f64> {
    value.as_ref().and_then(|d| d.to_f64())
}

/// Forward fill and average the joined rows, optionally windowed.
/// Fill runs over the full history before the window is applied, so a
/// window starting on a non-trading day still carries the prior close.
pub fn build_summary(
    rows: &[MarketSnapshotRow],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> MarketSummary {
    let columns: [Vec<Option<f64>>; 4] = [
        rows.iter().map(|r| dec_opt(&r.btc)).collect(),
        rows.iter().map(|r| dec_opt(&r.oil)).collect(),
        rows.iter().map(|r| dec_opt(&r.sp500)).collect(),
        rows.iter().map(|r| dec_opt(&r.nifty)).collect(),
    ];

    let keep: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| start.map_or(true, |s| r.entry_date >= s))
        .filter(|(_, r)| end.map_or(true, |e| r.entry_date <= e))
        .map(|(i, _)| i)
        .collect();
    let dates: Vec<NaiveDate> = keep.iter().map(|&i| rows[i].entry_date).collect();

    let mut series = Vec::with_capacity(4);
    let mut averages = Vec::with_capacity(4);
    for (label, column) in DASHBOARD_ASSETS.iter().zip(columns.iter()) {
        let filled = fill_series(column);
        let windowed: Vec<f64> = keep.iter().map(|&i| filled[i]).collect();
        averages.push((label.to_string(), mean(&windowed).unwrap_or(0.0)));
        series.push((label.to_string(), windowed));
    }

    MarketSummary {
        dates,
        series,
        averages,
    }
}

pub async fn market_summary(
    pool: &DbPool,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<MarketSummary> {
    let rows: Vec<MarketSnapshotRow> = sqlx::query_as(SNAPSHOT_SQL).fetch_all(pool).await?;
    Ok(build_summary(&rows, start, end))
}

pub async fn coin_series(pool: &DbPool, coin_id: &str) -> Result<Vec<(NaiveDate, f64)>> {
    let points: Vec<CoinPricePoint> = sqlx::query_as(
        "SELECT date, price_usd AS price FROM crypto_prices WHERE coin_id = ? ORDER BY date ASC",
    )
    .bind(coin_id)
    .fetch_all(pool)
    .await?;
    Ok(points
        .iter()
        .map(|p| (p.date, p.price.to_f64().unwrap_or(0.0)))
        .collect())
}

pub async fn coin_listings(pool: &DbPool) -> Result<Vec<CoinListing>> {
    let coins: Vec<CoinListing> = sqlx::query_as(
        "SELECT coin_id, name, symbol FROM cryptocurrencies ORDER BY market_cap_rank ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(coins)
}

/// Labels and Pearson matrix for the correlation heatmap.
pub fn build_correlation(rows: &[CorrelationRow]) -> (Vec<String>, Vec<Vec<f64>>) {
    let labels = vec![
        "BTC_INR".to_string(),
        "Oil_INR".to_string(),
        "Stock_INR".to_string(),
    ];
    let series = vec![
        fill_series(&rows.iter().map(|r| dec_opt(&r.btc)).collect::<Vec<_>>()),
        fill_series(&rows.iter().map(|r| dec_opt(&r.oil)).collect::<Vec<_>>()),
        fill_series(&rows.iter().map(|r| dec_opt(&r.stock)).collect::<Vec<_>>()),
    ];
    (labels, correlation_matrix(&series))
}

pub async fn correlation(pool: &DbPool) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let rows: Vec<CorrelationRow> = sqlx::query_as(CORRELATION_SQL).fetch_all(pool).await?;
    Ok(build_correlation(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn dec(v: i64) -> Option<Decimal> {
        Some(Decimal::from(v))
    }

    fn row(day: u32, btc: Option<Decimal>, oil: Option<Decimal>) -> MarketSnapshotRow {
        MarketSnapshotRow {
            entry_date: d(day),
            btc,
            oil,
            sp500: dec(100),
            nifty: dec(200),
        }
    }

    #[test]
    fn test_build_summary_forward_fills_gaps() {
        // oil is missing on the weekend row
        let rows = vec![
            row(3, dec(5000), dec(80)),
            row(4, dec(5100), None),
            row(5, dec(5200), dec(82)),
        ];
        let summary = build_summary(&rows, None, None);
        assert_eq!(summary.dates.len(), 3);
        let oil = &summary.series[1].1;
        assert_eq!(oil, &vec![80.0, 80.0, 82.0]);
    }

    #[test]
    fn test_build_summary_averages() {
        let rows = vec![row(1, dec(4000), dec(80)), row(2, dec(6000), dec(80))];
        let summary = build_summary(&rows, None, None);
        let (label, avg) = &summary.averages[0];
        assert_eq!(label, "BTC_INR");
        assert_eq!(*avg, 5000.0);
    }

    #[test]
    fn test_build_summary_window_starting_on_gap_day_carries_prior_close() {
        // Friday has an oil close, Saturday does not; a window that
        // starts on Saturday must still see Friday's close, not zero.
        let rows = vec![row(3, dec(5000), dec(80)), row(4, dec(5100), None)];
        let summary = build_summary(&rows, Some(d(4)), None);
        assert_eq!(summary.dates, vec![d(4)]);
        let (label, oil) = &summary.series[1];
        assert_eq!(label, "Oil_INR");
        assert_eq!(oil, &vec![80.0]);
        assert_eq!(summary.averages[1].1, 80.0);
    }

    #[test]
    fn test_build_summary_date_window() {
        let rows = vec![
            row(1, dec(1), dec(1)),
            row(2, dec(2), dec(2)),
            row(3, dec(3), dec(3)),
        ];
        let summary = build_summary(&rows, Some(d(2)), Some(d(2)));
        assert_eq!(summary.dates, vec![d(2)]);
    }

    #[test]
    fn test_build_correlation_labels_and_diagonal() {
        let rows = vec![
            CorrelationRow {
                btc: dec(1),
                oil: dec(2),
                stock: dec(3),
            },
            CorrelationRow {
                btc: dec(2),
                oil: dec(4),
                stock: dec(6),
            },
            CorrelationRow {
                btc: dec(3),
                oil: dec(6),
                stock: dec(9),
            },
        ];
        let (labels, matrix) = build_correlation(&rows);
        assert_eq!(labels.len(), 3);
        assert_eq!(matrix[0][0], 1.0);
        assert!((matrix[0][1] - 1.0).abs() < 1e-12);
    }
}
