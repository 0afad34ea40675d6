use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of website being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Portfolio,
    Ecommerce,
    SaaS,
    Blog,
    Agency,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Portfolio,
        Category::Ecommerce,
        Category::SaaS,
        Category::Blog,
        Category::Agency,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Portfolio => write!(f, "Portfolio"),
            Category::Ecommerce => write!(f, "Ecommerce"),
            Category::SaaS => write!(f, "SaaS"),
            Category::Blog => write!(f, "Blog"),
            Category::Agency => write!(f, "Agency"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-insensitive, so CLI input like `saas` works.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown category '{s}'"))
    }
}

/// Fixed tech-stack vocabulary a listing can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tech {
    #[serde(rename = "Next.js")]
    NextJs,
    React,
    Vue,
    #[serde(rename = "HTML")]
    Html,
}

impl Tech {
    pub const ALL: [Tech; 4] = [Tech::NextJs, Tech::React, Tech::Vue, Tech::Html];
}

impl std::fmt::Display for Tech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tech::NextJs => write!(f, "Next.js"),
            Tech::React => write!(f, "React"),
            Tech::Vue => write!(f, "Vue"),
            Tech::Html => write!(f, "HTML"),
        }
    }
}

impl FromStr for Tech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Tech::ALL
            .into_iter()
            .find(|t| {
                let name = t.to_string();
                name.eq_ignore_ascii_case(needle)
                    || name.replace('.', "").eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("Unknown tech '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    /// 0.0 to 5.0
    pub rating: f32,
}

/// A website for sale, either Buy Now (fixed price) or auction.
///
/// Listings are seed data: nothing in the library mutates one after the
/// catalog is built. Auction state that changes (bids) lives in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub short_pitch: String,
    pub category: Category,
    pub tech_stack: Vec<Tech>,
    pub tags: Vec<String>,

    /// Buy Now price
    pub price: f64,

    pub is_auction: bool,
    /// Opening/current bid as seeded; 0 for Buy Now listings
    pub current_bid: f64,
    pub bid_count: u32,

    /// Auction end; `None` for listings that never end
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,

    pub views: u64,
    pub seller: Seller,
}

impl Listing {
    /// Current bid for auctions, fixed price otherwise.
    pub fn effective_price(&self) -> f64 {
        if self.is_auction {
            self.current_bid
        } else {
            self.price
        }
    }

    pub fn has_tech(&self, tech: Tech) -> bool {
        self.tech_stack.contains(&tech)
    }

    /// Lowercased text the browse query is matched against.
    pub(crate) fn search_haystack(&self) -> String {
        format!("{} {} {}", self.title, self.short_pitch, self.tags.join(" ")).to_lowercase()
    }
}
