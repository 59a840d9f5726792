//! Interactive price lookup.
//!
//! Every input line selects a coin (and optionally a quote currency). A new
//! selection replaces the request still in flight for the previous one, so only
//! the latest selection is ever rendered.

use super::price::quote_row;
use super::ui;
use crate::core::coins::{find_coin, find_vs_currency};
use crate::core::config::DefaultsConfig;
use crate::core::{Coin, CoinQuote, FetchState, PriceDocument, RemoteResource};
use crate::providers::coingecko::CoinGeckoProvider;
use anyhow::{Context, Result, bail};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub coin: &'static Coin,
    pub currency: &'static Coin,
}

/// Parses `<coin> [currency]`; the currency defaults to the current one.
pub fn parse_selection(line: &str, current_currency: &'static Coin) -> Result<Selection> {
    let mut parts = line.split_whitespace();
    let Some(coin) = parts.next() else {
        bail!("Expected a coin, e.g. `btc usd`");
    };
    let coin = find_coin(coin)?;
    let currency = match parts.next() {
        Some(key) => find_vs_currency(key)?,
        None => current_currency,
    };
    if parts.next().is_some() {
        bail!("Expected `<coin> [currency]`, got: {}", line);
    }
    Ok(Selection { coin, currency })
}

/// Describes one state of the current selection as shown to the user.
pub fn describe_state(state: &FetchState<PriceDocument>, selection: &Selection) -> String {
    let pair = format!(
        "{} → {}",
        selection.coin.symbol.to_uppercase(),
        selection.currency.symbol.to_uppercase()
    );
    match state {
        FetchState::Loading => {
            ui::style_text(&format!("Fetching {pair}..."), ui::StyleType::Subtle)
        }
        FetchState::Failure(err) => ui::style_text(
            &format!("Could not load {pair}: {err}"),
            ui::StyleType::Error,
        ),
        FetchState::Success(doc) => {
            let quote = CoinQuote::from_document(doc, selection.coin.id, selection.currency.id);
            if let Err(e) = &quote {
                return ui::style_text(
                    &format!("Could not load {pair}: {e}"),
                    ui::StyleType::Error,
                );
            }
            let mut table = ui::new_styled_table();
            table.set_header(vec![
                ui::header_cell(&pair),
                ui::header_cell("Price"),
                ui::header_cell("24h Change"),
                ui::header_cell("24h Volume"),
                ui::header_cell("Market Cap"),
                ui::header_cell("Updated"),
            ]);
            table.add_row(quote_row(selection.currency, quote.as_ref()));
            table.to_string()
        }
    }
}

/// Runs the session until `quit`, end of input or Ctrl-C.
pub async fn run<R, W>(
    provider: &CoinGeckoProvider,
    defaults: &DefaultsConfig,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler; only `quit` or end of input can stop the session.
            std::future::pending::<()>().await;
        }
    };
    run_until(provider, defaults, input, out, interrupted).await
}

/// Runs the session until `quit`, end of input or `shutdown` resolves.
///
/// `shutdown` also cuts short the wait for the last selection after end of input.
pub async fn run_until<R, W, S>(
    provider: &CoinGeckoProvider,
    defaults: &DefaultsConfig,
    input: R,
    out: &mut W,
    shutdown: S,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    let mut selection = Selection {
        coin: find_coin(&defaults.from).context("Invalid default coin")?,
        currency: find_vs_currency(&defaults.to).context("Invalid default currency")?,
    };

    let mut resource = RemoteResource::<PriceDocument>::new(provider.client());
    let mut rx = resource.subscribe();
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    writeln!(
        out,
        "{}",
        ui::style_text(
            "Enter `<coin> [currency]` to switch, `quit` to exit.",
            ui::StyleType::Subtle
        )
    )?;
    resource.observe(provider.price_spec(selection.coin.id, &[selection.currency.id])?);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    // Let the last selection finish before leaving.
                    tokio::select! {
                        _ = resource.settled() => {
                            if rx.has_changed().unwrap_or(false) {
                                let state = rx.borrow_and_update().clone();
                                writeln!(out, "{}", describe_state(&state, &selection))?;
                            }
                        }
                        _ = &mut shutdown => info!("Interrupted"),
                    }
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                    break;
                }
                match parse_selection(line, selection.currency) {
                    Ok(next) => {
                        debug!(
                            coin = next.coin.id,
                            currency = next.currency.id,
                            "Selection changed"
                        );
                        selection = next;
                        let spec =
                            provider.price_spec(selection.coin.id, &[selection.currency.id])?;
                        if !resource.observe(spec) {
                            writeln!(out, "{}", describe_state(&resource.state(), &selection))?;
                        }
                    }
                    Err(e) => writeln!(
                        out,
                        "{}",
                        ui::style_text(&e.to_string(), ui::StyleType::Error)
                    )?,
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                writeln!(out, "{}", describe_state(&state, &selection))?;
            }
            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }
    }

    resource.cancel();
    Ok(())
}
