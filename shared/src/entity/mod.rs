pub mod crypto_prices;
pub mod cryptocurrencies;
pub mod oil_prices;
pub mod stock_prices;
