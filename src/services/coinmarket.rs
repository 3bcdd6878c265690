//! Coin Market Page Client
//!
//! Fetches a single coin's page from the market site and extracts the price
//! and statistics blocks into a [`CoinOutput`]. Extraction is best-effort per
//! field: a missing or reshaped element drops that field, never the record.

use scraper::{ElementRef, Html, Selector};
use uuid::Uuid;

use crate::models::coin::{CoinOutput, Contract, OfficialLink, OutputRecord, SocialLink};
use crate::services::store::{JobStore, StoreError};

/// Error type for coin page fetching.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("coin page returned HTTP {0}")]
    Upstream(reqwest::StatusCode),
}

/// Client for fetching coin pages from the market site.
pub struct CoinMarketClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinMarketClient {
    pub fn new(base_url: &str) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; ScrapewatchBot/1.0)")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Scrape one coin and append the resulting record to the job's list.
    ///
    /// Never fails the caller on fetch or parse problems: those degrade to an
    /// empty output mapping so the orchestrator's loop keeps going. Only a
    /// store write failure propagates.
    pub async fn scrape(
        &self,
        coin: &str,
        job_id: Uuid,
        store: &JobStore,
    ) -> Result<OutputRecord, StoreError> {
        let output = match self.fetch_page(coin).await {
            Ok(html) => parse_coin_page(&html),
            Err(e) => {
                tracing::warn!(coin, error = %e, "coin page fetch failed, recording empty output");
                CoinOutput::default()
            }
        };

        let record = OutputRecord {
            coin: coin.to_string(),
            output,
        };
        store.push_record(job_id, &record).await?;
        Ok(record)
    }

    async fn fetch_page(&self, coin: &str) -> Result<String, ScrapeError> {
        let url = format!("{}/currencies/{}/", self.base_url, coin.to_lowercase());
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ScrapeError::Upstream(response.status()));
        }

        Ok(response.text().await?)
    }
}

/// Parse a coin page into its output fields.
///
/// The market site renders statistics as `dd` cells whose text embeds a
/// percent-change prefix before the dollar value; market cap and volume take
/// the text after the `%` separator. Cell 5 is skipped: cell 6 carries the
/// diluted market cap.
pub fn parse_coin_page(html: &str) -> CoinOutput {
    let document = Html::parse_document(html);

    let price_sel =
        Selector::parse("span.sc-d1ede7e3-0.fsQm.base-text").expect("valid selector");
    let change_block_sel = Selector::parse("div.sc-d1ede7e3-0.kzFEmO").expect("valid selector");
    let change_p_sel = Selector::parse(r#"p[class*="sc-71024e3e-0"]"#).expect("valid selector");
    let stat_sel =
        Selector::parse("dd.sc-d1ede7e3-0.hPHvUM.base-text").expect("valid selector");
    let rank_sel = Selector::parse("span.text.slider-value.rank-value").expect("valid selector");
    let contract_sel = Selector::parse(
        "div.sc-d1ede7e3-0.sc-7f0f401-0.sc-96368265-0.bwRagp.gQoblf.eBvtSa.flexStart",
    )
    .expect("valid selector");
    let contract_name_sel = Selector::parse("span.sc-71024e3e-0.dEZnuB").expect("valid selector");
    let link_div_sel =
        Selector::parse("div.sc-d1ede7e3-0.sc-7f0f401-0.gRSwoF.gQoblf").expect("valid selector");
    let social_group_sel =
        Selector::parse("div.sc-d1ede7e3-0.sc-7f0f401-2.bwRagp.kXjUeJ").expect("valid selector");
    let a_sel = Selector::parse("a").expect("valid selector");

    let price = document
        .select(&price_sel)
        .next()
        .and_then(|el| clean_number(&element_text(el)));

    // Sign comes from the element's color attribute: red means a drop.
    let price_change = document
        .select(&change_block_sel)
        .next()
        .and_then(|block| block.select(&change_p_sel).next())
        .and_then(|p| {
            let magnitude: f64 = element_text(p).split('%').next()?.trim().parse().ok()?;
            Some(if p.value().attr("color") == Some("red") {
                -magnitude.abs()
            } else {
                magnitude
            })
        });

    let stat_cells: Vec<String> = document.select(&stat_sel).map(element_text).collect();
    let after_percent = |idx: usize| -> Option<f64> {
        stat_cells
            .get(idx)
            .and_then(|text| clean_number(text.split('%').nth(1)?))
    };

    let market_cap = after_percent(0);
    let volume = after_percent(1);
    let volume_change = stat_cells.get(2).and_then(|text| clean_number(text));
    let circulating_supply = stat_cells.get(3).and_then(|text| clean_number(text));
    let total_supply = stat_cells.get(4).and_then(|text| clean_number(text));
    let diluted_market_cap = stat_cells.get(6).and_then(|text| clean_number(text));

    let mut ranks = document.select(&rank_sel);
    let market_cap_rank = ranks.next().and_then(parse_rank);
    let volume_rank = ranks.next().and_then(parse_rank);

    let contracts = document
        .select(&contract_sel)
        .map(|block| {
            let name = block
                .select(&contract_name_sel)
                .next()
                .map(|el| element_text(el).replace(':', "").trim().to_string())
                .unwrap_or_default();
            let address = block
                .select(&a_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| href.rsplit('/').next())
                .unwrap_or_default()
                .to_string();
            Contract { name, address }
        })
        .collect();

    // The first link div on the page is the official website entry; the same
    // class also styles the per-channel social links further down.
    let website = document
        .select(&link_div_sel)
        .next()
        .and_then(|div| div.select(&a_sel).next())
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);
    let official_links = vec![OfficialLink {
        name: "website".to_string(),
        link: website,
    }];

    let mut socials: Vec<SocialLink> = Vec::new();
    for group in document.select(&social_group_sel) {
        for link_div in group.select(&link_div_sel) {
            let anchor = link_div.select(&a_sel).next();
            let name = anchor
                .map(element_text)
                .and_then(|text| text.split_whitespace().last().map(str::to_lowercase))
                .unwrap_or_default();
            let url = anchor
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            socials.push(SocialLink { name, url });
        }
    }
    // The first parsed social entry is always dropped.
    if !socials.is_empty() {
        socials.remove(0);
    }

    CoinOutput {
        price,
        price_change,
        market_cap,
        market_cap_rank,
        volume,
        volume_rank,
        volume_change,
        circulating_supply,
        total_supply,
        diluted_market_cap,
        contracts,
        official_links,
        socials,
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Strip everything but digits and dots, then parse. The site embeds currency
/// symbols, separators and unit suffixes in its numbers.
fn clean_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn parse_rank(el: ElementRef<'_>) -> Option<u32> {
    element_text(el).replace('#', "").trim().parse().ok()
}
