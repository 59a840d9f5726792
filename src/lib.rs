pub mod cli;
pub mod core;
pub mod providers;

use crate::core::Coin;
use crate::core::coins::{find_coin, find_vs_currency};
use crate::core::config::AppConfig;
use crate::providers::CoinGeckoProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Coins,
    Price {
        from: Option<String>,
        to: Vec<String>,
    },
    Watch,
}

fn resolve_currencies(keys: &[String], default: &str) -> Result<Vec<&'static Coin>> {
    if keys.is_empty() {
        return Ok(vec![find_vs_currency(default)?]);
    }
    let mut currencies: Vec<&'static Coin> = Vec::with_capacity(keys.len());
    for key in keys {
        let currency = find_vs_currency(key)?;
        if !currencies.contains(&currency) {
            currencies.push(currency);
        }
    }
    Ok(currencies)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinprice starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Coins => {
            cli::coins::run();
            Ok(())
        }
        AppCommand::Price { from, to } => {
            let provider = CoinGeckoProvider::from_config(&config.providers.coingecko)?;
            let coin = find_coin(from.as_deref().unwrap_or(&config.defaults.from))?;
            let currencies = resolve_currencies(&to, &config.defaults.to)?;
            cli::price::run(&provider, coin, &currencies).await
        }
        AppCommand::Watch => {
            let provider = CoinGeckoProvider::from_config(&config.providers.coingecko)?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            cli::watch::run(&provider, &config.defaults, input, &mut std::io::stdout()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_currencies() {
        let ids = |coins: Vec<&Coin>| coins.iter().map(|c| c.id).collect::<Vec<_>>();

        assert_eq!(ids(resolve_currencies(&[], "eur").unwrap()), vec!["eur"]);

        let keys = vec!["USD".to_string(), "inr".to_string(), "usd".to_string()];
        assert_eq!(ids(resolve_currencies(&keys, "eur").unwrap()), vec!["usd", "inr"]);

        assert!(resolve_currencies(&["jpy".to_string()], "usd").is_err());
    }
}
