//! The analytics catalog: 30 canned SQL queries across 5 topics.
//! Only these run; there is no free-form SQL surface.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use shared::DbPool;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row};

#[derive(Debug, Clone)]
pub struct CannedQuery {
    pub id: &'static str,
    pub topic: &'static str,
    pub title: &'static str,
    pub sql: &'static str,
}

pub const TOPICS: [&str; 5] = [
    "Crypto Attributes",
    "Daily Trends",
    "Oil Analysis",
    "Stock Indices",
    "Join Queries",
];

pub static CATALOG: [CannedQuery; 30] = [
    CannedQuery { id: "q1", topic: "Crypto Attributes", title: "Top 3 by Market Cap",
        sql: "SELECT name, symbol, market_cap AS Market_Cap_INR FROM cryptocurrencies ORDER BY market_cap DESC LIMIT 3" },
    CannedQuery { id: "q2", topic: "Crypto Attributes", title: "Supply > 90%",
        sql: "SELECT name, symbol FROM cryptocurrencies WHERE total_supply IS NOT NULL AND total_supply > 0 AND (circulating_supply / total_supply) > 0.9" },
    CannedQuery { id: "q3", topic: "Crypto Attributes", title: "Within 10% of ATH",
        sql: "SELECT name, current_price AS Price_INR FROM cryptocurrencies WHERE current_price >= (ath * 0.9)" },
    CannedQuery { id: "q4", topic: "Crypto Attributes", title: "Avg Rank (High Volume)",
        sql: "SELECT AVG(market_cap_rank) AS Avg_Rank FROM cryptocurrencies WHERE total_volume > 1000000000" },
    CannedQuery { id: "q5", topic: "Crypto Attributes", title: "High Value Assets",
        sql: "SELECT name, current_price AS Price_INR FROM cryptocurrencies WHERE current_price > 1000" },
    CannedQuery { id: "q6", topic: "Crypto Attributes", title: "Most Recent Entry",
        sql: "SELECT name, symbol FROM cryptocurrencies ORDER BY id DESC LIMIT 1" },
    CannedQuery { id: "q7", topic: "Daily Trends", title: "Highest BTC (INR)",
        sql: "SELECT MAX(price_usd) AS Peak_Price_INR FROM crypto_prices WHERE coin_id = 'bitcoin'" },
    CannedQuery { id: "q8", topic: "Daily Trends", title: "ETH Average (INR)",
        sql: "SELECT AVG(price_usd) AS Avg_Price_INR FROM crypto_prices WHERE coin_id = 'ethereum'" },
    CannedQuery { id: "q9", topic: "Daily Trends", title: "BTC Jan 2025 Trend",
        sql: "SELECT date, price_usd AS Price_INR FROM crypto_prices WHERE coin_id = 'bitcoin' AND DATE_FORMAT(date, '%Y-%m') = '2025-01' ORDER BY date" },
    CannedQuery { id: "q10", topic: "Daily Trends", title: "BTC % Price Change",
        sql: "SELECT (MAX(price_usd) - MIN(price_usd)) / MIN(price_usd) * 100 AS Pct_Change FROM crypto_prices WHERE coin_id = 'bitcoin'" },
    CannedQuery { id: "q11", topic: "Daily Trends", title: "Price Extremes (INR)",
        sql: "SELECT coin_id, MIN(price_usd) AS Min_Price_INR, MAX(price_usd) AS Max_Price_INR FROM crypto_prices GROUP BY coin_id" },
    CannedQuery { id: "q12", topic: "Daily Trends", title: "Lowest Historical BTC",
        sql: "SELECT MIN(price_usd) AS Hist_Low_INR FROM crypto_prices WHERE coin_id = 'bitcoin'" },
    CannedQuery { id: "q13", topic: "Oil Analysis", title: "Highest Oil Peak",
        sql: "SELECT MAX(price_usd) AS Peak_Oil_INR FROM oil_prices" },
    CannedQuery { id: "q14", topic: "Oil Analysis", title: "Avg Oil Yearly",
        sql: "SELECT YEAR(date) AS Year, AVG(price_usd) AS Avg_Oil_INR FROM oil_prices GROUP BY YEAR(date) ORDER BY Year" },
    CannedQuery { id: "q15", topic: "Oil Analysis", title: "2020 Crash Trend",
        sql: "SELECT date, price_usd AS Price_INR FROM oil_prices WHERE date BETWEEN '2020-03-01' AND '2020-04-30' ORDER BY date" },
    CannedQuery { id: "q16", topic: "Oil Analysis", title: "Yearly Price Range",
        sql: "SELECT YEAR(date) AS Year, (MAX(price_usd) - MIN(price_usd)) AS Range_INR FROM oil_prices GROUP BY YEAR(date) ORDER BY Year" },
    CannedQuery { id: "q17", topic: "Oil Analysis", title: "High Price Days",
        sql: "SELECT COUNT(*) AS High_Price_Days FROM oil_prices WHERE price_usd > 80" },
    CannedQuery { id: "q18", topic: "Oil Analysis", title: "Q1 2025 Average",
        sql: "SELECT AVG(price_usd) AS Q1_Avg_INR FROM oil_prices WHERE date BETWEEN '2025-01-01' AND '2025-03-31'" },
    CannedQuery { id: "q19", topic: "Stock Indices", title: "NASDAQ Peak (INR)",
        sql: "SELECT MAX(close) AS Peak_INR FROM stock_prices WHERE ticker = '^IXIC'" },
    CannedQuery { id: "q20", topic: "Stock Indices", title: "Top 5 Volatility (S&P)",
        sql: "SELECT date, (high - low) AS Swing_INR FROM stock_prices WHERE ticker = '^GSPC' ORDER BY Swing_INR DESC LIMIT 5" },
    CannedQuery { id: "q21", topic: "Stock Indices", title: "Nifty Avg Vol 2024",
        sql: "SELECT AVG(volume) AS Avg_Vol FROM stock_prices WHERE ticker = '^NSEI' AND YEAR(date) = 2024" },
    CannedQuery { id: "q22", topic: "Stock Indices", title: "Monthly Index Price",
        sql: "SELECT ticker, MONTH(date) AS Month, AVG(close) AS Avg_Close_INR FROM stock_prices GROUP BY ticker, MONTH(date) ORDER BY ticker, Month" },
    CannedQuery { id: "q23", topic: "Stock Indices", title: "S&P Row Count",
        sql: "SELECT COUNT(*) AS Row_Count FROM stock_prices WHERE ticker = '^GSPC'" },
    CannedQuery { id: "q24", topic: "Stock Indices", title: "Index Historical Lows",
        sql: "SELECT ticker, MIN(low) AS Low_Price_INR FROM stock_prices GROUP BY ticker" },
    CannedQuery { id: "q25", topic: "Join Queries", title: "BTC vs Oil (2025)",
        sql: "SELECT AVG(c.price_usd) AS BTC_INR, AVG(o.price_usd) AS Oil_INR FROM crypto_prices c JOIN oil_prices o ON c.date = o.date WHERE c.coin_id = 'bitcoin' AND YEAR(c.date) = 2025" },
    CannedQuery { id: "q26", topic: "Join Queries", title: "BTC vs Nifty (Synced)",
        sql: "SELECT c.date, c.price_usd AS BTC_INR, s.close AS Nifty_INR FROM crypto_prices c JOIN stock_prices s ON c.date = s.date WHERE c.coin_id = 'bitcoin' AND s.ticker = '^NSEI' ORDER BY c.date DESC LIMIT 10" },
    CannedQuery { id: "q27", topic: "Join Queries", title: "Multi-Join Snapshot",
        sql: "SELECT c.date AS Entry_Date, c.price_usd AS BTC_Price_INR, o.price_usd AS Oil_Price_INR, s.close AS Stock_Price_INR FROM crypto_prices c JOIN oil_prices o ON c.date = o.date JOIN stock_prices s ON s.date = c.date AND s.ticker = '^GSPC' WHERE c.coin_id = 'bitcoin' ORDER BY c.date DESC LIMIT 10" },
    CannedQuery { id: "q28", topic: "Join Queries", title: "Oil Influence on Nifty",
        sql: "SELECT o.date, o.price_usd AS Oil_Price_INR, s.close AS Nifty_Price_INR FROM oil_prices o JOIN stock_prices s ON o.date = s.date WHERE s.ticker = '^NSEI' AND o.price_usd > 90 ORDER BY o.date DESC LIMIT 5" },
    CannedQuery { id: "q29", topic: "Join Queries", title: "BTC vs NASDAQ Correlation",
        sql: "SELECT c.date, c.price_usd AS BTC_Price_INR, s.close AS NASDAQ_Price_INR FROM crypto_prices c JOIN stock_prices s ON c.date = s.date WHERE c.coin_id = 'bitcoin' AND s.ticker = '^IXIC' ORDER BY c.date DESC LIMIT 5" },
    CannedQuery { id: "q30", topic: "Join Queries", title: "Global Market Extremes",
        sql: "SELECT MIN(c.price_usd) AS Min_BTC_INR, MAX(s.close) AS Max_Stock_INR FROM crypto_prices c JOIN stock_prices s ON c.date = s.date WHERE c.coin_id = 'bitcoin'" },
];

pub fn find(id: &str) -> Option<&'static CannedQuery> {
    CATALOG.iter().find(|q| q.id == id)
}

pub fn by_topic(topic: &str) -> Vec<&'static CannedQuery> {
    CATALOG.iter().filter(|q| q.topic == topic).collect()
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Stringify one field without knowing the column type up front.
/// Aggregates come back as DECIMAL, counts as BIGINT, YEAR()/MONTH()
/// as integers, so each decode is attempted in turn.
fn field_to_string(row: &MySqlRow, idx: usize) -> String {
    macro_rules! try_decode {
        ($ty:ty) => {
            if let Ok(v) = row.try_get::<Option<$ty>, _>(idx) {
                return v.map(|v| v.to_string()).unwrap_or_else(|| "NULL".to_string());
            }
        };
    }
    try_decode!(i64);
    try_decode!(u64);
    try_decode!(i32);
    try_decode!(u32);
    try_decode!(i16);
    try_decode!(u16);
    try_decode!(i8);
    try_decode!(u8);
    try_decode!(Decimal);
    try_decode!(f64);
    try_decode!(f32);
    try_decode!(NaiveDate);
    try_decode!(NaiveDateTime);
    try_decode!(DateTime<Utc>);
    try_decode!(String);
    "?".to_string()
}

/// Execute a catalog query and stringify the result grid.
pub async fn run(pool: &DbPool, query: &CannedQuery) -> Result<QueryResult> {
    let rows = sqlx::query(query.sql).fetch_all(pool).await?;

    let columns = rows
        .first()
        .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    let rows = rows
        .iter()
        .map(|row| (0..row.columns().len()).map(|i| field_to_string(row, i)).collect())
        .collect();

    Ok(QueryResult { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_thirty_unique_queries() {
        assert_eq!(CATALOG.len(), 30);
        let ids: HashSet<&str> = CATALOG.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn test_catalog_topics_balanced() {
        for topic in TOPICS {
            assert_eq!(by_topic(topic).len(), 6, "topic {}", topic);
        }
    }

    #[test]
    fn test_catalog_is_select_only() {
        for q in &CATALOG {
            assert!(q.sql.trim_start().to_uppercase().starts_with("SELECT"), "{}", q.id);
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("q20").unwrap().title, "Top 5 Volatility (S&P)");
        assert!(find("q31").is_none());
    }
}
