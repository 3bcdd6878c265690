use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Canonical date format shared by the scraper output and the event tables.
pub const EVENT_DATE_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Date formats the shop page has been observed to serve.
const PAGE_DATE_FORMATS: [&str; 2] = ["%a, %b %d, %Y %I:%M %p", "%b %d, %Y %I:%M %p"];

/// One event block scraped off the ticket shop page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketEvent {
    pub date: String,
    pub teams: Vec<String>,
    pub status: String,
}

impl TicketEvent {
    /// Parse the scraped date string, trying both page formats.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_event_date(&self.date)
    }
}

/// Parse a shop page date string. Returns `None` when neither format matches.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    PAGE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
