//! Redis-backed staging area for raw market documents.
//!
//! Extraction writes every upstream payload here as a JSON document
//! before anything touches MySQL. Each document class keeps an index
//! set of its keys so the loader can enumerate documents without SCAN.

use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::info;

pub const COINS_INDEX: &str = "stage:index:coins";
pub const PRICES_INDEX: &str = "stage:index:prices";
pub const QUOTES_INDEX: &str = "stage:index:quotes";

pub fn coin_key(coin_id: &str) -> String {
    format!("stage:coins:{}", coin_id)
}

pub fn prices_key(coin_id: &str) -> String {
    format!("stage:prices:{}", coin_id)
}

pub fn quotes_key(symbol: &str) -> String {
    format!("stage:quotes:{}", symbol)
}

pub struct StagingStore {
    conn: MultiplexedConnection,
}

impl StagingStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        info!("Connecting to staging store at: {}", redis_url);
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }

    /// Stage a document and register its key in the given index set.
    pub async fn put_document(
        &mut self,
        index: &str,
        key: &str,
        doc: &serde_json::Value,
    ) -> Result<()> {
        let body = serde_json::to_string(doc)?;
        let _: () = self.conn.set(key, body).await?;
        let _: () = self.conn.sadd(index, key).await?;
        Ok(())
    }

    /// Fetch a staged document. `None` when the key is absent.
    pub async fn document(&mut self, key: &str) -> Result<Option<serde_json::Value>> {
        let body: Option<String> = self.conn.get(key).await?;
        match body {
            Some(body) => {
                let doc = serde_json::from_str(&body)
                    .with_context(|| format!("staged document {} is not valid JSON", key))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// All keys registered under an index set, sorted for stable runs.
    pub async fn keys(&mut self, index: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.conn.smembers(index).await?;
        keys.sort();
        Ok(keys)
    }

    /// Drop every staged document and the index sets themselves.
    pub async fn clear(&mut self) -> Result<usize> {
        let mut removed = 0usize;
        for index in [COINS_INDEX, PRICES_INDEX, QUOTES_INDEX] {
            let keys: Vec<String> = self.conn.smembers(index).await?;
            for key in &keys {
                let _: () = self.conn.del(key).await?;
            }
            removed += keys.len();
            let _: () = self.conn.del(index).await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(coin_key("bitcoin"), "stage:coins:bitcoin");
        assert_eq!(prices_key("ethereum"), "stage:prices:ethereum");
        assert_eq!(quotes_key("^GSPC"), "stage:quotes:^GSPC");
    }
}
