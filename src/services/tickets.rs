//! Ticket Shop Page Client
//!
//! Fetches the team shop's ticket page and parses its event blocks into
//! [`TicketEvent`]s. Selectors track the CSS class names the shop currently
//! serves.

use scraper::{ElementRef, Html, Selector};

use crate::models::event::TicketEvent;

const EVENT_BLOCK: &str = "div.css-q38j1a";
const DATE_BLOCK: &str = "div.css-b2t39r";
const TEAM_TEXT: &str = "p.chakra-text.css-10rvbm3";
const SPECIAL_EVENT_TEXT: &str = "p.chakra-text.css-vahgqk";

/// Error type for ticket shop fetching.
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ticket shop returned HTTP {0}")]
    Upstream(reqwest::StatusCode),
}

/// Client for the ticket shop page.
pub struct TicketShopClient {
    http: reqwest::Client,
    page_url: String,
}

impl TicketShopClient {
    pub fn new(page_url: &str) -> Result<Self, TicketError> {
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; ScrapewatchBot/1.0)")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            page_url: page_url.to_string(),
        })
    }

    /// Fetch the shop page and parse every event block on it.
    pub async fn fetch_events(&self) -> Result<Vec<TicketEvent>, TicketError> {
        let response = self.http.get(&self.page_url).send().await?;

        if !response.status().is_success() {
            return Err(TicketError::Upstream(response.status()));
        }

        let html = response.text().await?;
        Ok(parse_events(&html))
    }
}

/// Parse event blocks out of the shop page.
///
/// Each block yields a date, the competing teams and a status button label;
/// any piece that is missing falls back to `"N/A"`. Single-title events
/// (merchandise drops and the like) carry their name in a separate paragraph
/// instead of team entries.
pub fn parse_events(html: &str) -> Vec<TicketEvent> {
    let document = Html::parse_document(html);

    let block_sel = Selector::parse(EVENT_BLOCK).expect("valid selector");
    let date_sel = Selector::parse(DATE_BLOCK).expect("valid selector");
    let team_sel = Selector::parse(TEAM_TEXT).expect("valid selector");
    let special_sel = Selector::parse(SPECIAL_EVENT_TEXT).expect("valid selector");
    let p_sel = Selector::parse("p").expect("valid selector");
    let button_sel = Selector::parse("button").expect("valid selector");

    document
        .select(&block_sel)
        .map(|block| {
            let date = block
                .select(&date_sel)
                .next()
                .and_then(|div| div.select(&p_sel).next())
                .map(element_text)
                .unwrap_or_else(|| "N/A".to_string());

            let mut teams: Vec<String> = block.select(&team_sel).map(element_text).collect();
            if teams.is_empty() {
                if let Some(special) = block.select(&special_sel).next() {
                    teams.push(element_text(special));
                }
            }
            if teams.is_empty() {
                teams.push("N/A".to_string());
            }

            let status = block
                .select(&button_sel)
                .next()
                .map(element_text)
                .unwrap_or_else(|| "N/A".to_string());

            TicketEvent { date, teams, status }
        })
        .collect()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP_PAGE: &str = r#"
    <html><body>
    <div class="css-q38j1a">
        <div class="css-b2t39r"><p>Sat, Apr 12, 2025 07:30 PM</p></div>
        <p class="chakra-text css-10rvbm3">Royal Challengers</p>
        <p class="chakra-text css-10rvbm3">Chennai Kings</p>
        <button>BUY NOW</button>
    </div>
    <div class="css-q38j1a">
        <div class="css-b2t39r"><p>Sun, May 04, 2025 03:30 PM</p></div>
        <p class="chakra-text css-vahgqk">FAN UNBOX</p>
        <button>COMING SOON</button>
    </div>
    <div class="css-q38j1a"></div>
    </body></html>
    "#;

    #[test]
    fn test_parse_match_event() {
        let events = parse_events(SHOP_PAGE);
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].date, "Sat, Apr 12, 2025 07:30 PM");
        assert_eq!(events[0].teams, vec!["Royal Challengers", "Chennai Kings"]);
        assert_eq!(events[0].status, "BUY NOW");
    }

    #[test]
    fn test_parse_single_title_event() {
        let events = parse_events(SHOP_PAGE);
        assert_eq!(events[1].teams, vec!["FAN UNBOX"]);
        assert_eq!(events[1].status, "COMING SOON");
    }

    #[test]
    fn test_empty_block_falls_back_to_na() {
        let events = parse_events(SHOP_PAGE);
        assert_eq!(events[2].date, "N/A");
        assert_eq!(events[2].teams, vec!["N/A"]);
        assert_eq!(events[2].status, "N/A");
    }

    #[test]
    fn test_no_blocks() {
        assert!(parse_events("<html><body></body></html>").is_empty());
    }
}
