use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tokio::{signal::ctrl_c, time::sleep};

use crate::{
    api::source::PriceSource,
    cli::ReeArgs,
    dashboard::Dashboard,
    prelude::*,
    tables::{build_price_cards_table, build_summary_table},
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    ree: ReeArgs,

    /// How often to check the wall clock for the hour change.
    #[clap(long, env = "CHECK_INTERVAL", default_value = "1min")]
    check_interval: humantime::Duration,

    /// Delay before the price cards get revealed, and the prices fetched.
    #[clap(long, env = "REVEAL_AFTER", default_value = "0s")]
    reveal_after: humantime::Duration,
}

impl WatchArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let source: Arc<dyn PriceSource> = Arc::new(self.ree.new_client()?);

        match source.get_dashboard_stats(Local::now().date_naive()).await {
            Ok(stats) => println!("{}", build_summary_table(&stats)),
            Err(error) => {
                warn!(error = format!("{error:#}"), "failed to fetch the dashboard stats");
            }
        }

        let dashboard = Dashboard::builder()
            .source(source)
            .check_interval(self.check_interval)
            .build()
            .spawn();
        let mut snapshots = dashboard.subscribe();

        sleep(self.reveal_after.into()).await;
        dashboard.set_in_viewport(true).await?;

        loop {
            tokio::select! {
                result = snapshots.changed() => {
                    result.context("the dashboard stopped")?;
                    if let Some(snapshot) = snapshots.borrow_and_update().as_ref() {
                        println!("{}", build_price_cards_table(snapshot));
                    }
                }
                result = ctrl_c() => {
                    result?;
                    info!("interrupted");
                    break;
                }
            }
        }

        dashboard.teardown().await;
        Ok(())
    }
}
