use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::{
    api::source::PriceSource,
    cli::ReeArgs,
    core::hour::Hour,
    dashboard::DashboardSnapshot,
    prelude::*,
    tables::{build_hourly_table, build_price_cards_table},
};

#[derive(Parser)]
pub struct ShowArgs {
    #[clap(flatten)]
    ree: ReeArgs,

    /// Day to show, today by default.
    #[clap(long)]
    date: Option<NaiveDate>,

    /// Print the derived facts as JSON instead of the tables.
    #[clap(long)]
    json: bool,
}

impl ShowArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let now = Local::now();
        let date = self.date.unwrap_or_else(|| now.date_naive());
        let price_set = self.ree.new_client()?.get_daily_prices(date).await?;

        let snapshot = DashboardSnapshot::new(&price_set, now);
        let current_hour = (!snapshot.is_stale).then(|| Hour::of(&now));

        if self.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("{}", build_hourly_table(&price_set, current_hour));
            println!("{}", build_price_cards_table(&snapshot));
        }
        Ok(())
    }
}
