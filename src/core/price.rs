//! Quote provider abstraction

use crate::core::quote::CoinQuote;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, coin: &str, vs_currency: &str) -> Result<CoinQuote>;
}
