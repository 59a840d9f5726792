//! Core business logic abstractions

pub mod coins;
pub mod config;
pub mod fetch;
pub mod log;
pub mod price;
pub mod quote;
pub mod resource;

// Re-export main types for cleaner imports
pub use coins::{COINS, Coin, VS_COINS};
pub use fetch::{FetchError, FetchState, RequestOptions, RequestSpec};
pub use price::QuoteProvider;
pub use quote::{CoinQuote, PriceDocument};
pub use resource::RemoteResource;
