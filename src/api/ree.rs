//! [Red Eléctrica](https://www.ree.es/es/datos/apidatos) client.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    api::{client, source::PriceSource},
    core::{
        hour::Hour,
        point::{DailyPriceSet, PricePoint},
    },
    prelude::*,
    quantity::price::KilowattHourPrice,
};

/// Indicator ID of the regulated consumer price (PVPC).
const PVPC_INDICATOR_ID: &str = "1001";

pub struct Api {
    client: Client,
    geo: Geo,
}

/// Electrical system to fetch the prices for.
#[derive(Clone, Debug)]
pub struct Geo {
    /// For example, `peninsular`, `canarias`, `baleares`, `ceuta`, or `melilla`.
    pub limit: String,

    /// For example, `8741` for the peninsula.
    pub id: u32,
}

impl Api {
    pub fn new(geo: Geo) -> Result<Self> {
        Ok(Self { client: client::try_new()?, geo })
    }
}

#[async_trait]
impl PriceSource for Api {
    #[instrument(skip_all, fields(on = %on, geo_id = self.geo.id))]
    async fn get_daily_prices(&self, on: NaiveDate) -> Result<DailyPriceSet> {
        info!("fetching…");
        let response = self
            .client
            .get("https://apidatos.ree.es/es/datos/mercados/precios-mercados-tiempo-real")
            .query(&[
                ("start_date", format!("{on}T00:00")),
                ("end_date", format!("{on}T23:59")),
                ("time_trunc", "hour".to_string()),
                ("geo_limit", self.geo.limit.clone()),
                ("geo_ids", self.geo.id.to_string()),
            ])
            .send()
            .await
            .context("failed to call")?
            .error_for_status()
            .context("request failed")?
            .json::<Response>()
            .await
            .context("failed to deserialize the response")?;
        let price_set = response.try_into_price_set(on, Local::now())?;
        if price_set.is_empty() {
            warn!("no prices published yet");
        }
        info!(n_points = price_set.len(), "fetched");
        Ok(price_set)
    }
}

#[derive(Deserialize)]
struct Response {
    included: Vec<Indicator>,
}

impl Response {
    fn try_into_price_set(
        self,
        on: NaiveDate,
        fetched_at: DateTime<Local>,
    ) -> Result<DailyPriceSet> {
        let indicator = self
            .included
            .into_iter()
            .find(|indicator| indicator.id == PVPC_INDICATOR_ID)
            .context("no PVPC indicator in the response")?;
        let points = indicator
            .attributes
            .values
            .into_iter()
            .filter(|value| {
                let is_on_date = value.datetime.date_naive() == on;
                if !is_on_date {
                    warn!(datetime = %value.datetime, "skipped a value outside of the day");
                }
                is_on_date
            })
            .map(|value| {
                let price = KilowattHourPrice::from_megawatt_hour(value.value);
                PricePoint::new(Hour::of(&value.datetime), price)
            });
        DailyPriceSet::try_new(on, points, fetched_at)
    }
}

#[derive(Deserialize)]
struct Indicator {
    id: String,
    attributes: Attributes,
}

#[derive(Deserialize)]
struct Attributes {
    values: Vec<Value>,
}

#[derive(Deserialize)]
struct Value {
    /// Euro per megawatt-hour.
    value: f64,

    /// Start of the hour in the local time of the system.
    datetime: DateTime<FixedOffset>,
}
