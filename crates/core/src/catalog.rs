use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::models::listing::{Category, Listing, Seller, Tech};

/// Immutable, in-memory collection of listings with id lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    listings: Vec<Listing>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog. Later duplicates of an id are unreachable through
    /// [`get`](Self::get) but still appear in [`listings`](Self::listings).
    pub fn new(listings: Vec<Listing>) -> Self {
        let mut by_id = HashMap::with_capacity(listings.len());
        for (i, l) in listings.iter().enumerate() {
            by_id.entry(l.id.clone()).or_insert(i);
        }
        Self { listings, by_id }
    }

    /// The demo seed catalog, with auction end times laid out around `now`.
    pub fn seed(now: DateTime<Utc>) -> Self {
        Self::new(seed_listings(now))
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.by_id.get(id).map(|&i| &self.listings[i])
    }

    /// Resolve ids in the given order, skipping ones that aren't in the catalog.
    pub fn resolve_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Listing> {
        ids.iter().filter_map(|id| self.get(id.as_ref())).collect()
    }

    /// Auction listings only, in catalog order.
    pub fn auctions(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter().filter(|l| l.is_auction)
    }
}

struct Seed {
    id: &'static str,
    title: &'static str,
    pitch: &'static str,
    category: Category,
    tech: &'static [Tech],
    tags: &'static [&'static str],
    price: f64,
    /// `Some((opening bid, bid count, hours until end))` for auctions
    auction: Option<(f64, u32, i64)>,
    age_days: i64,
    views: u64,
    seller: (&'static str, f32),
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "sb-1001",
        title: "Minimal Developer Portfolio",
        pitch: "Clean single-page portfolio with project grid and dark mode.",
        category: Category::Portfolio,
        tech: &[Tech::NextJs, Tech::React],
        tags: &["portfolio", "dark-mode", "tailwind"],
        price: 149.0,
        auction: None,
        age_days: 3,
        views: 1240,
        seller: ("Ana Studio", 4.8),
    },
    Seed {
        id: "sb-1002",
        title: "Headless Storefront Starter",
        pitch: "Ecommerce starter with cart, product filters and checkout flow.",
        category: Category::Ecommerce,
        tech: &[Tech::NextJs, Tech::React],
        tags: &["shop", "cart", "stripe-ready"],
        price: 420.0,
        auction: Some((260.0, 7, 5)),
        age_days: 9,
        views: 2210,
        seller: ("Cartwright Labs", 4.6),
    },
    Seed {
        id: "sb-1003",
        title: "SaaS Landing Kit",
        pitch: "Conversion-focused landing page with pricing tables and FAQ.",
        category: Category::SaaS,
        tech: &[Tech::NextJs, Tech::React],
        tags: &["landing", "pricing", "seo"],
        price: 299.0,
        auction: None,
        age_days: 1,
        views: 3180,
        seller: ("Orbit UI", 4.9),
    },
    Seed {
        id: "sb-1004",
        title: "Indie Blog Theme",
        pitch: "Markdown-powered blog with tags, RSS and reading time.",
        category: Category::Blog,
        tech: &[Tech::Vue],
        tags: &["blog", "markdown", "rss"],
        price: 89.0,
        auction: Some((60.0, 3, 30)),
        age_days: 14,
        views: 640,
        seller: ("Quill & Co", 4.4),
    },
    Seed {
        id: "sb-1005",
        title: "Creative Agency One-Pager",
        pitch: "Bold agency site with case studies, team and contact form.",
        category: Category::Agency,
        tech: &[Tech::Html],
        tags: &["agency", "animation", "responsive"],
        price: 199.0,
        auction: None,
        age_days: 21,
        views: 980,
        seller: ("Studio North", 4.2),
    },
    Seed {
        id: "sb-1006",
        title: "Analytics Dashboard Template",
        pitch: "Admin dashboard with charts, tables and role-based navigation.",
        category: Category::SaaS,
        tech: &[Tech::React],
        tags: &["dashboard", "charts", "admin"],
        price: 650.0,
        auction: Some((480.0, 12, 2)),
        age_days: 6,
        views: 4120,
        seller: ("Metricly", 4.7),
    },
    Seed {
        id: "sb-1007",
        title: "Photography Portfolio",
        pitch: "Full-bleed gallery portfolio with lightbox and lazy loading.",
        category: Category::Portfolio,
        tech: &[Tech::Vue, Tech::Html],
        tags: &["gallery", "photography", "lightbox"],
        price: 129.0,
        auction: None,
        age_days: 30,
        views: 560,
        seller: ("Lens Works", 4.5),
    },
    Seed {
        id: "sb-1008",
        title: "Boutique Fashion Shop",
        pitch: "Elegant storefront with lookbook, size guide and wishlist.",
        category: Category::Ecommerce,
        tech: &[Tech::Vue],
        tags: &["fashion", "lookbook", "wishlist"],
        price: 1200.0,
        auction: Some((950.0, 18, 72)),
        age_days: 4,
        views: 2890,
        seller: ("Maison Web", 4.9),
    },
    Seed {
        id: "sb-1009",
        title: "Tech Newsletter Blog",
        pitch: "Newsletter-first blog with subscriber capture and archives.",
        category: Category::Blog,
        tech: &[Tech::NextJs],
        tags: &["newsletter", "email", "blog"],
        price: 179.0,
        auction: None,
        age_days: 2,
        views: 1460,
        seller: ("Inkwell", 4.3),
    },
    Seed {
        id: "sb-1010",
        title: "Digital Agency Suite",
        pitch: "Multi-page agency site with services, blog and careers pages.",
        category: Category::Agency,
        tech: &[Tech::NextJs, Tech::React],
        tags: &["agency", "multi-page", "careers"],
        price: 880.0,
        auction: Some((540.0, 9, 12)),
        age_days: 11,
        views: 1730,
        seller: ("Northwind Digital", 4.6),
    },
    Seed {
        id: "sb-1011",
        title: "Static Resume Page",
        pitch: "Lightweight resume page that prints cleanly to PDF.",
        category: Category::Portfolio,
        tech: &[Tech::Html],
        tags: &["resume", "print", "lightweight"],
        price: 39.0,
        auction: None,
        age_days: 45,
        views: 310,
        seller: ("Plain Pages", 4.1),
    },
    Seed {
        id: "sb-1012",
        title: "Subscription Box Store",
        pitch: "Recurring-order storefront with plans, add-ons and account area.",
        category: Category::Ecommerce,
        tech: &[Tech::React],
        tags: &["subscriptions", "shop", "accounts"],
        price: 560.0,
        auction: Some((150.0, 4, -1)),
        age_days: 20,
        views: 870,
        seller: ("Boxed", 4.0),
    },
];

fn seed_listings(now: DateTime<Utc>) -> Vec<Listing> {
    SEEDS
        .iter()
        .map(|s| {
            let (is_auction, current_bid, bid_count, ends_at) = match s.auction {
                Some((bid, count, hours)) => (true, bid, count, Some(now + Duration::hours(hours))),
                None => (false, 0.0, 0, None),
            };
            Listing {
                id: s.id.to_string(),
                title: s.title.to_string(),
                short_pitch: s.pitch.to_string(),
                category: s.category,
                tech_stack: s.tech.to_vec(),
                tags: s.tags.iter().map(|t| t.to_string()).collect(),
                price: s.price,
                is_auction,
                current_bid,
                bid_count,
                ends_at,
                created_at: now - Duration::days(s.age_days),
                views: s.views,
                seller: Seller {
                    name: s.seller.0.to_string(),
                    rating: s.seller.1,
                },
            }
        })
        .collect()
}
