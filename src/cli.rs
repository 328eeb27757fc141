mod show;
mod watch;

use clap::{Parser, Subcommand};

pub use self::{show::ShowArgs, watch::WatchArgs};
use crate::{api::ree, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: keep showing the live, cheapest and most expensive prices of today.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),

    /// Fetch and show the prices of a single day.
    #[clap(name = "show")]
    Show(Box<ShowArgs>),
}

#[derive(Parser)]
pub struct ReeArgs {
    /// Electrical system: `peninsular`, `canarias`, `baleares`, `ceuta`, or `melilla`.
    #[clap(long = "geo-limit", default_value = "peninsular", env = "REE_GEO_LIMIT")]
    pub geo_limit: String,

    /// Red Eléctrica ID of the electrical system.
    #[clap(long = "geo-id", default_value = "8741", env = "REE_GEO_ID")]
    pub geo_id: u32,
}

impl ReeArgs {
    pub fn new_client(&self) -> Result<ree::Api> {
        ree::Api::new(ree::Geo { limit: self.geo_limit.clone(), id: self.geo_id })
    }
}
