use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    core::{point::DailyPriceSet, summary::DashboardStats},
    prelude::*,
};

/// Supplier of the hourly prices.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Get all hourly prices on the specified day.
    async fn get_daily_prices(&self, on: NaiveDate) -> Result<DailyPriceSet>;

    /// Get the aggregate summary of the specified day.
    #[instrument(skip_all, fields(on = %on))]
    async fn get_dashboard_stats(&self, on: NaiveDate) -> Result<DashboardStats> {
        DashboardStats::try_from(&self.get_daily_prices(on).await?)
    }
}
