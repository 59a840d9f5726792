//! Supported source coins and quote ("vs") currencies.

use anyhow::{Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

const fn coin(id: &'static str, symbol: &'static str, name: &'static str) -> Coin {
    Coin { id, symbol, name }
}

pub const COINS: &[Coin] = &[
    coin("bitcoin", "btc", "Bitcoin"),
    coin("ethereum", "eth", "Ethereum"),
    coin("binancecoin", "bnb", "BNB"),
    coin("ripple", "xrp", "XRP"),
    coin("cardano", "ada", "Cardano"),
    coin("matic-network", "matic", "Polygon"),
    coin("binance-usd", "busd", "Binance USD"),
    coin("okb", "okb", "OKB"),
    coin("dogecoin", "doge", "Dogecoin"),
    coin("solana", "sol", "Solana"),
    coin("polkadot", "dot", "Polkadot"),
    coin("staked-ether", "steth", "Lido Staked Ether"),
    coin("shiba-inu", "shib", "Shiba Inu"),
    coin("litecoin", "ltc", "Litecoin"),
    coin("avalanche-2", "avax", "Avalanche"),
    coin("tron", "trx", "TRON"),
    coin("uniswap", "uni", "Uniswap"),
    coin("dai", "dai", "Dai"),
    coin("wrapped-bitcoin", "wbtc", "Wrapped Bitcoin"),
    coin("cosmos", "atom", "Cosmos Hub"),
    coin("chainlink", "link", "Chainlink"),
    coin("the-open-network", "ton", "Toncoin"),
    coin("filecoin", "fil", "Filecoin"),
    coin("ethereum-classic", "etc", "Ethereum Classic"),
    coin("leo", "leo", "Leo"),
    coin("monero", "xmr", "Monero"),
    coin("bitcoin-cash", "bch", "Bitcoin Cash"),
    coin("stellar", "xlm", "Stellar"),
];

pub const VS_COINS: &[Coin] = &[
    coin("usd", "usd", "United States Dollar"),
    coin("inr", "inr", "Indian Rupee"),
    coin("eur", "eur", "Euro"),
];

fn lookup<'a>(table: &'a [Coin], key: &str) -> Option<&'a Coin> {
    let key = key.trim();
    table
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(key))
        .or_else(|| table.iter().find(|c| c.symbol.eq_ignore_ascii_case(key)))
}

/// Resolves a source coin by id or ticker symbol, case-insensitively.
pub fn find_coin(key: &str) -> Result<&'static Coin> {
    lookup(COINS, key).ok_or_else(|| anyhow!("Unsupported coin: {}", key))
}

pub fn find_vs_currency(key: &str) -> Result<&'static Coin> {
    lookup(VS_COINS, key).ok_or_else(|| anyhow!("Unsupported currency: {}", key))
}

impl Coin {
    /// Symbol shown before an amount quoted in this currency, when it has one.
    pub fn currency_sign(&self) -> Option<&'static str> {
        match self.id {
            "usd" => Some("$"),
            "inr" => Some("₹"),
            "eur" => Some("€"),
            _ => None,
        }
    }
}
