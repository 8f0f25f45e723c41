use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, TraceLevel};
use config::Config;
use dotenv::dotenv;
use steam_warehouse::api::HttpClient;
use steam_warehouse::{Steam, SyncJob, Warehouse};
use tracing::{debug, error, info, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod config;
mod ui;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    let config = Config::from_env()?;
    debug!("Configuration loaded: {} ({})", config.steam_api_url, config.country);

    // open pg connection; closed whenever `warehouse` goes out of scope
    let mut warehouse = Warehouse::connect(&config.postgres_url).await?;

    ////////////////////////////////////////////////////////////////////////////////////////////////////

    // cli framework:
    // "> steam-sync [COMMAND]"
    match cli.command.unwrap_or(Commands::Sync { dry_run: false }) {
        // "> steam-sync init"
        // create the tables
        Commands::Init => {
            info!("Initialising steam schema");
            warehouse.init().await.map_err(|e| {
                error!("steam schema initialisation failed: {e}");
                e
            })?;
        }

        // "> steam-sync [sync [--dry-run]]"
        // fetch today's prices and append them to the price history
        Commands::Sync { dry_run } => {
            let http_client = HttpClient::builder()
                .user_agent(&config.user_agent)
                .build()?;
            let steam = Steam::new(http_client)
                .with_base_url(&config.steam_api_url)
                .with_country(&config.country);

            info!("Syncing Steam prices");
            let today = chrono::Local::now().date_naive();
            let report = SyncJob::new(steam)
                .dry_run(dry_run)
                .with_progress(ui::single_pb())
                .run(&mut warehouse, today)
                .await
                .map_err(|e| {
                    error!("Steam price sync failed: {e}");
                    e
                })?;
            trace!("Sync report: {report:#?}");
        }
    }

    Ok(())
}
