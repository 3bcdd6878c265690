use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::{PgPool, Row};

use crate::models::event::{TicketEvent, EVENT_DATE_FORMAT};

/// Load the stored event snapshot, keyed by formatted event date.
/// The value is the row id plus the last stored status.
pub async fn load_previous_events(
    pool: &PgPool,
) -> Result<HashMap<String, (i32, String)>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, event_date, status FROM events")
        .fetch_all(pool)
        .await?;

    let mut previous = HashMap::new();
    for row in rows {
        let id: i32 = row.try_get("id")?;
        let event_date: NaiveDateTime = row.try_get("event_date")?;
        let status: String = row.try_get("status")?;
        previous.insert(event_date.format(EVENT_DATE_FORMAT).to_string(), (id, status));
    }

    Ok(previous)
}

/// Upsert the scraped snapshot: update the status when an event for the same
/// formatted date already exists with a different one, insert otherwise.
/// Events with unparseable dates are skipped.
pub async fn save_current_events(pool: &PgPool, events: &[TicketEvent]) -> Result<(), sqlx::Error> {
    if events.is_empty() {
        tracing::info!("no event data to save");
        return Ok(());
    }

    let previous = load_previous_events(pool).await?;

    for event in events {
        let Some(event_date) = event.parsed_date() else {
            tracing::warn!(date = %event.date, "could not parse event date, skipping");
            continue;
        };
        let formatted = event_date.format(EVENT_DATE_FORMAT).to_string();

        match previous.get(&formatted) {
            Some((id, status)) if status != &event.status => {
                sqlx::query("UPDATE events SET status = $1 WHERE id = $2")
                    .bind(&event.status)
                    .bind(*id)
                    .execute(pool)
                    .await?;
                tracing::info!(date = %formatted, status = %event.status, "event status updated");
            }
            Some(_) => {}
            None => {
                sqlx::query("INSERT INTO events (event_date, teams, status) VALUES ($1, $2, $3)")
                    .bind(event_date)
                    .bind(&event.teams)
                    .bind(&event.status)
                    .execute(pool)
                    .await?;
                tracing::info!(date = %formatted, "event inserted");
            }
        }
    }

    Ok(())
}

/// Load the events we have already alerted subscribers about.
pub async fn load_held_events(pool: &PgPool) -> Result<Vec<TicketEvent>, sqlx::Error> {
    let rows = sqlx::query("SELECT event_date, teams, status FROM events_held")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            let event_date: NaiveDateTime = row.try_get("event_date")?;
            Ok(TicketEvent {
                date: event_date.format(EVENT_DATE_FORMAT).to_string(),
                teams: row.try_get("teams")?,
                status: row.try_get("status")?,
            })
        })
        .collect()
}

/// Record freshly alerted events so the same signature stays quiet next run.
pub async fn record_held_events(pool: &PgPool, events: &[TicketEvent]) -> Result<(), sqlx::Error> {
    for event in events {
        let Some(event_date) = event.parsed_date() else {
            tracing::warn!(date = %event.date, "could not parse event date, skipping");
            continue;
        };

        sqlx::query("INSERT INTO events_held (event_date, teams, status) VALUES ($1, $2, $3)")
            .bind(event_date)
            .bind(&event.teams)
            .bind(&event.status)
            .execute(pool)
            .await?;
        tracing::info!(date = %event.date, "event recorded as alerted");
    }

    Ok(())
}

/// Alert recipient addresses.
pub async fn subscriber_emails(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query("SELECT email FROM subscribers")
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(|row| row.try_get("email")).collect()
}
