use super::ui;
use crate::core::{Coin, CoinQuote, QuoteProvider};
use anyhow::{Result, bail};
use comfy_table::Cell;
use futures::future::join_all;

pub(crate) fn quote_row(currency: &Coin, quote: Result<&CoinQuote, &anyhow::Error>) -> Vec<Cell> {
    match quote {
        Ok(q) => vec![
            Cell::new(currency.symbol.to_uppercase()),
            ui::format_optional_cell(Some(q.price), |p| ui::format_money(p, currency)),
            q.change_24h.map_or(ui::na_cell(false), ui::change_cell),
            ui::format_optional_cell(q.volume_24h, ui::format_compact),
            ui::format_optional_cell(q.market_cap, ui::format_compact),
            ui::format_optional_cell(q.last_updated, |ts| {
                ts.format("%Y-%m-%d %H:%M UTC").to_string()
            }),
        ],
        Err(_) => {
            let mut row = vec![Cell::new(currency.symbol.to_uppercase())];
            row.extend((0..5).map(|_| ui::na_cell(true)));
            row
        }
    }
}

/// Renders one row per quote currency, followed by any fetch errors.
pub fn render_quotes(coin: &Coin, quotes: &[(&Coin, Result<CoinQuote>)]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Price"),
        ui::header_cell("24h Change"),
        ui::header_cell("24h Volume"),
        ui::header_cell("Market Cap"),
        ui::header_cell("Updated"),
    ]);
    for (currency, quote) in quotes {
        table.add_row(quote_row(currency, quote.as_ref()));
    }

    let title = format!("{} ({})", coin.name, coin.symbol.to_uppercase());
    let mut output = format!(
        "Coin: {}\n\n{table}",
        ui::style_text(&title, ui::StyleType::Title)
    );

    for (currency, quote) in quotes {
        if let Err(e) = quote {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!("{}: {e}", currency.symbol.to_uppercase()),
                    ui::StyleType::Error
                )
            ));
        }
    }
    output
}

pub async fn run(
    provider: &(dyn QuoteProvider + Send + Sync),
    coin: &Coin,
    currencies: &[&Coin],
) -> Result<()> {
    let pb = ui::new_spinner(format!("Fetching {} price...", coin.name));

    let quote_futures = currencies.iter().map(|currency| async move {
        let quote = provider.fetch_quote(coin.id, currency.id).await;
        (*currency, quote)
    });
    let quotes: Vec<(&Coin, Result<CoinQuote>)> = join_all(quote_futures).await;
    pb.finish_and_clear();

    println!("{}", render_quotes(coin, &quotes));

    if quotes.iter().all(|(_, q)| q.is_err()) {
        bail!("Could not fetch any price for {}", coin.id);
    }
    Ok(())
}
