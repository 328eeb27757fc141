use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::{
    core::{
        hour::Hour,
        point::DailyPriceSet,
        stats::{PriceFact, PriceStats},
        summary::DashboardStats,
    },
    dashboard::DashboardSnapshot,
    quantity::{percent::Percent, price::KilowattHourPrice},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Current, cheapest and most expensive price cards.
#[must_use]
pub fn build_price_cards_table(snapshot: &DashboardSnapshot) -> Table {
    let PriceStats { current, lowest, highest, .. } = snapshot.stats;
    let mut table = new_table();
    table.set_header(vec!["", "Hour", "Price", "Change"]);
    table.add_row(fact_row(
        if snapshot.is_stale { "Live price (stale)" } else { "Live price" },
        current,
        snapshot.stats.next_hour_percent,
        Color::Cyan,
    ));
    table.add_row(fact_row("Cheapest", lowest, snapshot.stats.lowest_highest_percent, Color::Green));
    table.add_row(fact_row(
        "Most expensive",
        highest,
        snapshot.stats.highest_current_percent,
        Color::Red,
    ));
    table
}

fn fact_row(title: &str, fact: PriceFact, percent: Option<Percent>, color: Color) -> Vec<Cell> {
    let price_cell = fact.price().map_or_else(
        || Cell::new("n/a").add_attribute(Attribute::Dim),
        |price| Cell::new(price).fg(color).add_attribute(Attribute::Bold),
    );
    vec![
        Cell::new(title),
        Cell::new(fact.hour),
        price_cell.set_alignment(CellAlignment::Right),
        // Absent percent renders as no badge at all:
        Cell::new(percent.map(|percent| percent.to_string()).unwrap_or_default())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
    ]
}

/// Every hour of the day against the median price.
///
/// Highlights `current_hour` and dims the past ones, if the day is today.
#[must_use]
pub fn build_hourly_table(price_set: &DailyPriceSet, current_hour: Option<Hour>) -> Table {
    let median_price = price_set
        .points()
        .iter()
        .map(|point| point.price)
        .sorted()
        .nth(price_set.len() / 2)
        .unwrap_or(KilowattHourPrice::ZERO);

    let mut table = new_table();
    table.set_header(vec!["Hour", "Price"]);
    for point in price_set.points() {
        let mut hour_cell = Cell::new(point.hour);
        if current_hour == Some(point.hour) {
            hour_cell = hour_cell.add_attribute(Attribute::Bold);
        } else if current_hour.is_some_and(|current_hour| point.hour < current_hour) {
            hour_cell = hour_cell.add_attribute(Attribute::Dim);
        }
        table.add_row(vec![
            hour_cell,
            Cell::new(point.price).set_alignment(CellAlignment::Right).fg(
                if point.price >= median_price { Color::Red } else { Color::Green },
            ),
        ]);
    }
    table
}

#[must_use]
pub fn build_summary_table(stats: &DashboardStats) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Hours", "Average", "Minimum", "Maximum"]);
    table.add_row(vec![
        Cell::new(stats.date),
        Cell::new(stats.n_hours).set_alignment(CellAlignment::Right),
        Cell::new(stats.average).set_alignment(CellAlignment::Right),
        Cell::new(stats.minimum).set_alignment(CellAlignment::Right).fg(Color::Green),
        Cell::new(stats.maximum).set_alignment(CellAlignment::Right).fg(Color::Red),
    ]);
    table
}
