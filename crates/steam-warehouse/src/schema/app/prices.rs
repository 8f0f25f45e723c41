use super::{AppId, PriceRecord};
use crate::api::PriceStore;
use crate::warehouse::Warehouse;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, error};

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// steam.app_prices; append-only price history
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub static PRICE_QUERY: &str = "
    INSERT INTO steam.app_prices (app_id, date, price)
    SELECT * FROM UNNEST($1::BIGINT[], $2::DATE[], $3::TEXT[])
";

#[async_trait]
impl PriceStore for Warehouse {
    async fn insert(&mut self, records: Vec<PriceRecord>) -> anyhow::Result<u64> {
        let time = std::time::Instant::now();
        let (app_ids, dates, prices) = columns(records);

        // preprocess pg query as transaction
        let query = self.pg_client.prepare(PRICE_QUERY).await?;
        let transaction = self.pg_client.transaction().await?;

        let rows = transaction
            .execute(&query, &[&app_ids, &dates, &prices])
            .await
            .map_err(|e| {
                error!("failed to insert {} rows into steam.app_prices", app_ids.len());
                e
            })?;

        // a failed commit, or an early return above, leaves the table untouched
        transaction.commit().await.map_err(|e| {
            error!("failed to commit transaction for steam.app_prices");
            e
        })?;

        debug!(
            "{rows} prices inserted. Elapsed time: {} ms",
            time.elapsed().as_millis()
        );

        Ok(rows)
    }
}

// Split the rows into one array per column, for UNNEST.
fn columns(records: Vec<PriceRecord>) -> (Vec<AppId>, Vec<NaiveDate>, Vec<String>) {
    let mut app_ids = Vec::with_capacity(records.len());
    let mut dates = Vec::with_capacity(records.len());
    let mut prices = Vec::with_capacity(records.len());
    for record in records {
        app_ids.push(record.app_id);
        dates.push(record.date);
        prices.push(record.price);
    }
    (app_ids, dates, prices)
}
