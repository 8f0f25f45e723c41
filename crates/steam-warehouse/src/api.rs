use crate::schema::app::{AppId, Lookup, PriceRecord};
use anyhow::Result;
use async_trait::async_trait;

pub use reqwest::Client as HttpClient;
pub use tokio_postgres::Client as PgClient;

/// ETL framework.
///
/// The price sync is split into three parts, one per external collaborator, so that each can be
/// swapped out on its own (a mock server, an in-memory table, ...);
///
/// 1. [`AppIndex`] - where the app IDs are **extracted** from.
/// 2. [`PriceApi`] - how a batch of app IDs is looked up and **transformed** into outcomes.
/// 3. [`PriceStore`] - how the collected prices are **loaded**.
#[async_trait]
pub trait AppIndex: Send {
    /// Highest surrogate key (`entry_id`) in the index; `0` when the index is empty.
    async fn top_entry_id(&mut self) -> Result<i64>;

    /// Up to `limit` app IDs whose `entry_id` is at most `cursor`, ordered by `entry_id`
    /// descending.
    async fn app_ids(&mut self, cursor: i64, limit: i64) -> Result<Vec<AppId>>;
}

/// API to the HTTP endpoint serving current prices.
#[async_trait]
pub trait PriceApi: Send + Sync {
    /// Look up a single batch of app IDs, with one request.
    async fn fetch(&self, app_ids: &[AppId]) -> Result<Lookup>;
}

/// API to the price history table, in which the dated prices are appended.
#[async_trait]
pub trait PriceStore: Send {
    /// Append every record in one bulk insert, returning the number of rows written.
    async fn insert(&mut self, records: Vec<PriceRecord>) -> Result<u64>;
}
