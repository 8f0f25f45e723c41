use crate::api::PgClient;
use crate::schema::SCHEMA_QUERY;
use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_postgres::{self as pg, NoTls};
use tracing::{debug, error};

/// A PostgreSQL connection held for the length of one sync run.
///
/// The connection task is spawned on [`Warehouse::connect()`] and torn down when the
/// `Warehouse` is dropped, so every exit path (including `?` on an error) releases it. Any
/// transaction still open at that point is rolled back by the server.
pub struct Warehouse {
    pub(crate) pg_client: PgClient,
    conn: JoinHandle<()>,
}

impl Warehouse {
    pub async fn connect(url: &str) -> Result<Self> {
        debug!("Establishing PostgreSQL connection");
        let (pg_client, pg_conn) = pg::connect(url, NoTls).await.map_err(|e| {
            error!("failed to connect to PostgreSQL: {e}");
            e
        })?;
        let conn = tokio::spawn(async move {
            if let Err(e) = pg_conn.await {
                error!("connection error: {}", e);
            }
        });
        debug!("PostgreSQL connection established");

        Ok(Self { pg_client, conn })
    }

    /// Create the `steam` schema and its tables, if they do not exist yet.
    pub async fn init(&self) -> Result<()> {
        self.pg_client.batch_execute(SCHEMA_QUERY).await?;
        debug!("steam schema initialised");
        Ok(())
    }
}

impl Drop for Warehouse {
    fn drop(&mut self) {
        self.conn.abort();
        debug!("PostgreSQL connection closed");
    }
}
