//! Quote model read out of the price API's key-value document.

use anyhow::{Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

/// `{ "<coin>": { "<vs>": price, "<vs>_24h_change": .., ... } }`; any field may be null.
pub type PriceDocument = HashMap<String, HashMap<String, Option<f64>>>;

#[derive(Debug, Clone, PartialEq)]
pub struct CoinQuote {
    pub coin: String,
    pub vs_currency: String,
    pub price: f64,
    pub change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
    pub market_cap: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl CoinQuote {
    pub fn from_document(doc: &PriceDocument, coin: &str, vs_currency: &str) -> Result<Self> {
        let record = doc
            .get(coin)
            .ok_or_else(|| anyhow!("No price data found for coin: {}", coin))?;

        let field = |suffix: &str| record.get(&format!("{vs_currency}{suffix}")).copied().flatten();

        let price = field("").ok_or_else(|| {
            anyhow!(
                "No {} price found for coin: {}",
                vs_currency.to_uppercase(),
                coin
            )
        })?;

        let last_updated = record
            .get("last_updated_at")
            .copied()
            .flatten()
            .and_then(|ts| Utc.timestamp_opt(ts as i64, 0).single());

        Ok(CoinQuote {
            coin: coin.to_string(),
            vs_currency: vs_currency.to_string(),
            price,
            change_24h: field("_24h_change"),
            volume_24h: field("_24h_vol"),
            market_cap: field("_market_cap"),
            last_updated,
        })
    }

    /// Price 24 hours ago implied by the current price and the relative change.
    pub fn previous_price(&self) -> Option<f64> {
        self.change_24h
            .map(|change| self.price / (1.0 + change / 100.0))
            .filter(|p| p.is_finite())
    }
}
