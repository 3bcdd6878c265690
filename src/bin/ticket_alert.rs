//! One-shot ticket availability alert run.
//!
//! Scrapes the shop's ticket page, compares against the stored snapshot,
//! mails subscribers about newly active events and persists the new
//! snapshot. Intended to run from cron.

use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use scrapewatch::config::AppConfig;
use scrapewatch::db::{self, queries};
use scrapewatch::services::{alerts, mailer::MailerClient, tickets::TicketShopClient};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting ticket alert run");

    // Load configuration
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize database
    tracing::info!("Connecting to PostgreSQL");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize clients
    let shop =
        TicketShopClient::new(&config.ticket_shop_url).expect("Failed to initialize shop client");
    let mailer = MailerClient::new(&config.mail_api_url, &config.mail_api_token, &config.mail_from);

    if let Err(e) = run(&db_pool, &shop, &mailer, &config.ticket_shop_url).await {
        tracing::error!(error = %e, "ticket alert run failed");
        std::process::exit(1);
    }
}

async fn run(
    pool: &PgPool,
    shop: &TicketShopClient,
    mailer: &MailerClient,
    shop_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let events = shop.fetch_events().await?;
    tracing::info!(count = events.len(), "scraped ticket events");

    let held = queries::load_held_events(pool).await?;
    let fresh = alerts::find_new_status_events(&events, &held);

    if fresh.is_empty() {
        tracing::info!("no new ticket sales detected");
    } else {
        tracing::info!(count = fresh.len(), "new events with active tickets detected");
        queries::record_held_events(pool, &fresh).await?;

        let recipients = queries::subscriber_emails(pool).await?;
        if recipients.is_empty() {
            tracing::warn!("no subscribers registered, skipping alert mail");
        } else {
            let body = alerts::render_alert_email(&fresh, shop_url);
            // The snapshot is saved even when delivery fails.
            match mailer.send(&recipients, alerts::ALERT_SUBJECT, &body).await {
                Ok(()) => {
                    tracing::info!(recipients = recipients.len(), "alert mail sent")
                }
                Err(e) => tracing::error!(error = %e, "failed to send alert mail"),
            }
        }
    }

    queries::save_current_events(pool, &events).await?;
    tracing::info!("event snapshot saved");

    Ok(())
}
