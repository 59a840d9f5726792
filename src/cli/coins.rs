use super::ui;
use crate::core::{COINS, Coin, VS_COINS};
use comfy_table::Cell;

fn reference_table(title: &str, entries: &[Coin]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
    ]);
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.symbol.to_uppercase()),
            Cell::new(entry.name),
        ]);
    }
    format!("{}\n\n{table}", ui::style_text(title, ui::StyleType::Title))
}

/// Renders the supported source coins followed by the supported quote currencies.
pub fn render() -> String {
    format!(
        "{}\n\n{}",
        reference_table("Coins", COINS),
        reference_table("Currencies", VS_COINS)
    )
}

pub fn run() {
    println!("{}", render());
}
