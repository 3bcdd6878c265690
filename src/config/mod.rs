use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8000"). Optional for the alert run.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Redis connection string for job state
    pub redis_url: String,

    /// PostgreSQL connection string (event snapshots and subscribers)
    pub database_url: String,

    /// Base URL of the coin market site
    #[serde(default = "default_coinmarket_url")]
    pub coinmarket_url: String,

    /// URL of the ticket shop page to watch
    #[serde(default = "default_ticket_shop_url")]
    pub ticket_shop_url: String,

    /// Mail relay API endpoint for alert delivery
    pub mail_api_url: String,

    /// Mail relay API token
    pub mail_api_token: String,

    /// From header for alert mail
    #[serde(default = "default_mail_from")]
    pub mail_from: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_coinmarket_url() -> String {
    "https://coinmarketcap.com".to_string()
}

fn default_ticket_shop_url() -> String {
    "https://shop.royalchallengers.com/ticket".to_string()
}

fn default_mail_from() -> String {
    "Ticket Alert".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}
