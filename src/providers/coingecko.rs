use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::core::config::CoinGeckoProviderConfig;
use crate::core::{CoinQuote, PriceDocument, QuoteProvider, RemoteResource, RequestSpec};

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

// CoinGeckoProvider implementation for QuoteProvider
pub struct CoinGeckoProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("coinprice/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    pub fn from_config(config: &CoinGeckoProviderConfig) -> Result<Self> {
        Self::new(&config.base_url, config.api_key.clone())
    }

    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }

    /// Builds the `simple/price` request for one coin quoted in each of `vs_currencies`.
    pub fn price_spec(&self, coin: &str, vs_currencies: &[&str]) -> Result<RequestSpec> {
        if vs_currencies.is_empty() {
            bail!("At least one quote currency is required");
        }
        let endpoint = format!("{}/api/v3/simple/price", self.base_url);
        let vs = vs_currencies.join(",");
        let url = Url::parse_with_params(
            &endpoint,
            &[
                ("ids", coin),
                ("vs_currencies", vs.as_str()),
                ("include_24hr_change", "true"),
                ("include_24hr_vol", "true"),
                ("include_market_cap", "true"),
                ("include_last_updated_at", "true"),
            ],
        )
        .with_context(|| format!("Invalid price endpoint: {endpoint}"))?;

        let mut spec = RequestSpec::get(url.to_string()).with_header("accept", "application/json");
        if let Some(key) = &self.api_key {
            spec = spec.with_header(API_KEY_HEADER, key.as_str());
        }
        Ok(spec)
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoQuoteFetch",
        skip(self),
        fields(coin = %coin, vs = %vs_currency)
    )]
    async fn fetch_quote(&self, coin: &str, vs_currency: &str) -> Result<CoinQuote> {
        let spec = self.price_spec(coin, &[vs_currency])?;
        debug!("Requesting quote from {}", spec.url);

        let mut resource = RemoteResource::<PriceDocument>::new(self.client());
        resource.observe(spec);

        match resource.settled().await.into_result() {
            Some(Ok(doc)) => CoinQuote::from_document(&doc, coin, vs_currency),
            Some(Err(e)) => Err(anyhow!("{} for coin: {} in {}", e, coin, vs_currency)),
            None => Err(anyhow!("Request for coin: {} was cancelled", coin)),
        }
    }
}
