pub mod details;
pub mod index;
pub mod prices;

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Steam application ID.
pub type AppId = i64;

/// Per-app outcomes of one batch lookup.
pub type Lookup = BTreeMap<AppId, Outcome>;

/// What a single app ID's lookup came back with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// `success: true` with a formatted price.
    Fetched(String),

    /// `success: false`.
    Unsuccessful,

    /// `success: true`, but no price overview (free, unreleased, delisted).
    Empty,
}

/// One row of `steam.app_prices`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRecord {
    pub app_id: AppId,
    pub date: NaiveDate,
    pub price: String,
}
