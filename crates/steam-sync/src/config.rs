use anyhow::{Context, Result};
use dotenv::var;
use steam_warehouse::schema::app::details::STEAM_API_URL;

/// Settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub postgres_url: String,
    pub user_agent: String,
    pub steam_api_url: String,
    pub country: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let postgres_url = lookup("POSTGRES_URL").context("POSTGRES_URL is not set")?;
        Ok(Self {
            postgres_url,
            user_agent: lookup("USER_AGENT")
                .unwrap_or_else(|| format!("steam-sync/{}", env!("CARGO_PKG_VERSION"))),
            steam_api_url: lookup("STEAM_API_URL").unwrap_or_else(|| STEAM_API_URL.to_string()),
            country: lookup("STEAM_COUNTRY").unwrap_or_else(|| "us".to_string()),
        })
    }
}
