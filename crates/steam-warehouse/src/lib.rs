pub mod api;
pub mod client_ext;
pub mod error;
pub mod fetch;
pub mod schema;
pub mod sync;
pub mod warehouse;

pub use crate::error::FetchError;
pub use crate::fetch::{fetch_prices, PriceMap, Tally, BATCH_SIZE};
pub use crate::schema::app::{AppId, Lookup, Outcome, PriceRecord};
pub use crate::schema::app::details::Steam;
pub use crate::sync::{SyncJob, SyncReport};
pub use crate::warehouse::Warehouse;
