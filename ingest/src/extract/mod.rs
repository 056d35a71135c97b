pub mod coingecko;
pub mod quotes;

pub use coingecko::{daily_closes, CoinGeckoClient, CoinMarket, MarketChart};
pub use quotes::{QuoteBar, QuoteClient};
