pub mod app;

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Tables used by the price sync
//
////////////////////////////////////////////////////////////////////////////////////////////////////

pub static SCHEMA_QUERY: &str = "
    CREATE SCHEMA IF NOT EXISTS steam;

    CREATE TABLE IF NOT EXISTS steam.app_ids (
        entry_id    BIGSERIAL PRIMARY KEY,
        app_id      BIGINT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS steam.app_prices (
        app_id      BIGINT NOT NULL,
        date        DATE NOT NULL,
        price       TEXT NOT NULL
    );
";
