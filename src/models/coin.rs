use serde::{Deserialize, Serialize};

/// A contract listing on the coin page (chain name plus address).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    pub address: String,
}

/// An official project link. The coin page exposes a single website entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialLink {
    pub name: String,
    pub link: Option<String>,
}

/// A social channel link parsed off the coin page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: Option<String>,
}

/// Scraped output fields for one coin.
///
/// Every field is optional: extraction failures degrade per field, never the
/// whole record. A coin whose page could not be fetched at all carries the
/// default value, which serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap_rank: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_rank: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_change: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circulating_supply: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_supply: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diluted_market_cap: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contracts: Vec<Contract>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub official_links: Vec<OfficialLink>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub socials: Vec<SocialLink>,
}

/// A scraped record as appended to a job's record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub coin: String,
    pub output: CoinOutput,
}
