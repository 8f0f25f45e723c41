use super::AppId;
use crate::api::AppIndex;
use crate::warehouse::Warehouse;
use async_trait::async_trait;
use tracing::{error, trace};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// steam.app_ids; the app IDs to price, keyed by insertion order
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub static TOP_ENTRY_QUERY: &str = "
    SELECT COALESCE(MAX(entry_id), 0)
    FROM steam.app_ids
";

pub static APP_IDS_QUERY: &str = "
    SELECT app_id
    FROM steam.app_ids
    WHERE entry_id <= $1
    ORDER BY entry_id DESC
    LIMIT $2
";

#[async_trait]
impl AppIndex for Warehouse {
    async fn top_entry_id(&mut self) -> anyhow::Result<i64> {
        let row = self
            .pg_client
            .query_one(TOP_ENTRY_QUERY, &[])
            .await
            .map_err(|e| {
                error!("failed to read the top entry_id from steam.app_ids");
                e
            })?;
        let top: i64 = row.try_get(0)?;
        trace!("top entry_id: {top}");
        Ok(top)
    }

    async fn app_ids(&mut self, cursor: i64, limit: i64) -> anyhow::Result<Vec<AppId>> {
        let rows = self
            .pg_client
            .query(APP_IDS_QUERY, &[&cursor, &limit])
            .await
            .map_err(|e| {
                error!("failed to read app IDs at or below entry_id {cursor}");
                e
            })?;

        let app_ids = rows
            .iter()
            .map(|row| row.try_get::<_, AppId>(0))
            .collect::<Result<Vec<_>, _>>()?;
        trace!("{} app IDs read at or below entry_id {cursor}", app_ids.len());
        Ok(app_ids)
    }
}
