// ═══════════════════════════════════════════════════════════════════
// Model Tests — listings, filters, bids, drafts, settings, checkout
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::time::Duration as StdDuration;

use sitebazaar_core::models::bid::{sort_newest_first, Bid, Bidder};
use sitebazaar_core::models::draft::{parse_end_time, DraftField, ListingForm};
use sitebazaar_core::models::filter::{BrowseFilters, Selector, SortKey};
use sitebazaar_core::models::listing::{Category, Listing, Seller, Tech};
use sitebazaar_core::models::records::{CheckoutQuote, MAX_RECENT};
use sitebazaar_core::models::settings::Settings;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn listing(is_auction: bool) -> Listing {
    Listing {
        id: "x1".into(),
        title: "Test Site".into(),
        short_pitch: "A pitch".into(),
        category: Category::Blog,
        tech_stack: vec![Tech::Vue],
        tags: vec!["blog".into()],
        price: 300.0,
        is_auction,
        current_bid: 120.0,
        bid_count: 2,
        ends_at: Some(now() + Duration::hours(1)),
        created_at: now() - Duration::days(1),
        views: 10,
        seller: Seller {
            name: "Someone".into(),
            rating: 4.5,
        },
    }
}

// ═══════════════════════════════════════════════════════════════════
// Listing
// ═══════════════════════════════════════════════════════════════════

mod listing_model {
    use super::*;

    #[test]
    fn effective_price_is_current_bid_for_auctions() {
        assert_eq!(listing(true).effective_price(), 120.0);
    }

    #[test]
    fn effective_price_is_fixed_price_otherwise() {
        assert_eq!(listing(false).effective_price(), 300.0);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("saas".parse::<Category>().unwrap(), Category::SaaS);
        assert_eq!(" Agency ".parse::<Category>().unwrap(), Category::Agency);
        assert!("Shop".parse::<Category>().is_err());
    }

    #[test]
    fn tech_parses_with_or_without_dot() {
        assert_eq!("Next.js".parse::<Tech>().unwrap(), Tech::NextJs);
        assert_eq!("nextjs".parse::<Tech>().unwrap(), Tech::NextJs);
        assert_eq!("html".parse::<Tech>().unwrap(), Tech::Html);
        assert!("Svelte".parse::<Tech>().is_err());
    }

    #[test]
    fn tech_serializes_with_display_names() {
        assert_eq!(serde_json::to_value(Tech::NextJs).unwrap(), json!("Next.js"));
        assert_eq!(serde_json::to_value(Tech::Html).unwrap(), json!("HTML"));
    }

    #[test]
    fn listing_json_uses_camel_case() {
        let v = serde_json::to_value(listing(true)).unwrap();
        assert!(v.get("shortPitch").is_some());
        assert!(v.get("isAuction").is_some());
        assert!(v.get("currentBid").is_some());
        assert!(v.get("techStack").is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Browse filters
// ═══════════════════════════════════════════════════════════════════

mod filters {
    use super::*;

    #[test]
    fn defaults() {
        let f = BrowseFilters::default();
        assert_eq!(f.query, "");
        assert_eq!(f.category, Selector::All);
        assert_eq!(f.tech, Selector::All);
        assert!(!f.auction_only);
        assert_eq!(f.price_min, 0.0);
        assert_eq!(f.price_max, 500.0);
        assert_eq!(f.sort, SortKey::Popular);
    }

    #[test]
    fn persisted_shape() {
        let f = BrowseFilters {
            query: "shop".into(),
            category: Selector::Only(Category::Ecommerce),
            tech: Selector::Only(Tech::NextJs),
            auction_only: true,
            price_min: 10.0,
            price_max: 900.0,
            sort: SortKey::EndingSoon,
        };
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(
            v,
            json!({
                "query": "shop",
                "category": "Ecommerce",
                "tech": "Next.js",
                "auctionOnly": true,
                "priceMin": 10.0,
                "priceMax": 900.0,
                "sort": "endingSoon"
            })
        );
        let back: BrowseFilters = serde_json::from_value(v).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn all_selector_round_trips_as_string() {
        let v = serde_json::to_value(BrowseFilters::default()).unwrap();
        assert_eq!(v["category"], json!("All"));
        assert_eq!(v["tech"], json!("All"));
    }

    #[test]
    fn unknown_selector_value_fails_to_parse() {
        let v = json!({
            "query": "", "category": "Forum", "tech": "All", "auctionOnly": false,
            "priceMin": 0, "priceMax": 500, "sort": "popular"
        });
        assert!(serde_json::from_value::<BrowseFilters>(v).is_err());
    }

    #[test]
    fn selector_matches() {
        assert!(Selector::<Category>::All.matches(&Category::Blog));
        assert!(Selector::Only(Category::Blog).matches(&Category::Blog));
        assert!(!Selector::Only(Category::SaaS).matches(&Category::Blog));
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("endingSoon".parse::<SortKey>().unwrap(), SortKey::EndingSoon);
        assert_eq!("ending-soon".parse::<SortKey>().unwrap(), SortKey::EndingSoon);
        assert_eq!("PRICE".parse::<SortKey>().unwrap(), SortKey::Price);
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn sanitized_replaces_non_finite_bounds() {
        let f = BrowseFilters {
            price_min: f64::NAN,
            price_max: f64::INFINITY,
            ..BrowseFilters::default()
        }
        .sanitized();
        assert_eq!(f.price_min, 0.0);
        assert_eq!(f.price_max, 500.0);
    }

    #[test]
    fn sanitized_swaps_inverted_bounds() {
        let f = BrowseFilters {
            price_min: 800.0,
            price_max: 100.0,
            ..BrowseFilters::default()
        }
        .sanitized();
        assert_eq!((f.price_min, f.price_max), (100.0, 800.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Bids
// ═══════════════════════════════════════════════════════════════════

mod bids {
    use super::*;

    fn bid(id: &str, minutes_ago: i64) -> Bid {
        Bid {
            id: id.into(),
            listing_id: "x1".into(),
            amount: 100.0,
            created_at: now() - Duration::minutes(minutes_ago),
            bidder: Bidder::Other,
        }
    }

    #[test]
    fn bid_json_shape() {
        let v = serde_json::to_value(Bid {
            bidder: Bidder::You,
            ..bid("b1", 0)
        })
        .unwrap();
        assert_eq!(v["listingId"], json!("x1"));
        assert_eq!(v["bidder"], json!("You"));
        assert!(v.get("createdAt").is_some());
    }

    #[test]
    fn newest_first_is_stable() {
        let mut bids = vec![bid("old", 30), bid("tie-a", 5), bid("new", 1), bid("tie-b", 5)];
        sort_newest_first(&mut bids);
        let ids: Vec<&str> = bids.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "tie-a", "tie-b", "old"]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sell form
// ═══════════════════════════════════════════════════════════════════

mod listing_form {
    use super::*;

    fn valid_form() -> ListingForm {
        ListingForm {
            title: "Portfolio Starter".into(),
            category: Some(Category::Portfolio),
            short_pitch: "A clean portfolio for designers.".into(),
            ..ListingForm::default()
        }
    }

    #[test]
    fn default_form_has_sensible_prefill() {
        let f = ListingForm::default();
        assert_eq!(f.price, "199");
        assert_eq!(f.tech_stack, vec![Tech::NextJs, Tech::React]);
        assert_eq!(f.tags, "clean, responsive, modern");
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(valid_form().validate(now()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let form = ListingForm {
            title: String::new(),
            category: None,
            tech_stack: vec![],
            price: "".into(),
            is_auction: true,
            ends_at: String::new(),
            short_pitch: String::new(),
            tags: " , ".into(),
            screenshots: String::new(),
        };
        let e = form.validate(now());
        for field in [
            DraftField::Title,
            DraftField::Category,
            DraftField::Price,
            DraftField::TechStack,
            DraftField::ShortPitch,
            DraftField::Tags,
            DraftField::EndsAt,
        ] {
            assert!(e.get(field).is_some(), "missing error for {field}");
        }
        assert!(e.get(DraftField::Screenshots).is_none());
        assert_eq!(e.get(DraftField::EndsAt), Some("Choose an auction end date/time."));
    }

    #[test]
    fn title_length_counts_trimmed_text() {
        let form = ListingForm {
            title: "  abcde  ".into(),
            ..valid_form()
        };
        assert_eq!(
            form.validate(now()).get(DraftField::Title),
            Some("Title must be at least 6 characters.")
        );
    }

    #[test]
    fn price_must_be_positive_number() {
        for bad in ["0", "-5", "abc", "NaN"] {
            let form = ListingForm {
                price: bad.into(),
                ..valid_form()
            };
            assert_eq!(
                form.validate(now()).get(DraftField::Price),
                Some("Enter a valid price."),
                "price {bad:?}"
            );
        }
    }

    #[test]
    fn screenshots_must_be_http_urls() {
        let form = ListingForm {
            screenshots: "https://ok.example/a.png, ftp://bad".into(),
            ..valid_form()
        };
        assert!(form.validate(now()).get(DraftField::Screenshots).is_some());
    }

    #[test]
    fn auction_end_must_be_ten_minutes_out() {
        let too_soon = (now() + Duration::minutes(9)).to_rfc3339();
        let form = ListingForm {
            is_auction: true,
            ends_at: too_soon,
            ..valid_form()
        };
        assert_eq!(
            form.validate(now()).get(DraftField::EndsAt),
            Some("End time must be at least 10 minutes from now.")
        );

        let ok = ListingForm {
            is_auction: true,
            ends_at: "2025-06-01T12:10".into(),
            ..valid_form()
        };
        assert!(ok.validate(now()).is_empty());
    }

    #[test]
    fn unparsable_end_time_is_rejected() {
        let form = ListingForm {
            is_auction: true,
            ends_at: "next tuesday".into(),
            ..valid_form()
        };
        assert!(form.validate(now()).get(DraftField::EndsAt).is_some());
    }

    #[test]
    fn end_time_ignored_for_buy_now() {
        let form = ListingForm {
            ends_at: "garbage".into(),
            ..valid_form()
        };
        assert!(form.validate(now()).is_empty());
        assert_eq!(form.into_draft_input(now()).unwrap().ends_at, None);
    }

    #[test]
    fn draft_input_trims_and_caps_lists() {
        let form = ListingForm {
            title: "  Portfolio Starter  ".into(),
            tags: "a,b,c,d,e,f,g,h,i,j".into(),
            screenshots: (1..=8)
                .map(|i| format!("https://img.example/{i}.png"))
                .collect::<Vec<_>>()
                .join(","),
            ..valid_form()
        };
        let input = form.into_draft_input(now()).unwrap();
        assert_eq!(input.title, "Portfolio Starter");
        assert_eq!(input.tags.len(), 8);
        assert_eq!(input.screenshots.len(), 6);
        assert_eq!(input.price, 199.0);
    }

    #[test]
    fn draft_input_returns_errors_for_invalid_form() {
        let form = ListingForm {
            category: None,
            ..valid_form()
        };
        let errors = form.into_draft_input(now()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(DraftField::Category), Some("Pick a category."));
    }

    #[test]
    fn parse_end_time_formats() {
        let expected = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 0).unwrap();
        assert_eq!(parse_end_time("2030-01-02T03:04"), Some(expected));
        assert_eq!(parse_end_time("2030-01-02T03:04:00Z"), Some(expected));
        assert_eq!(parse_end_time("2030-01-02T05:04:00+02:00"), Some(expected));
        assert_eq!(parse_end_time(""), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.outbid_probability, 0.45);
        assert_eq!(s.counter_bid_min_delay_ms, 1200);
        assert_eq!(s.counter_bid_max_delay_ms, 3000);
        assert_eq!(s.recent_limit, 8);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn delay_window_bounds() {
        let s = Settings::default();
        assert_eq!(s.counter_bid_delay(0.0), StdDuration::from_millis(1200));
        assert_eq!(s.counter_bid_delay(0.5), StdDuration::from_millis(2100));
        assert_eq!(s.counter_bid_delay(0.999_999), StdDuration::from_millis(2999));
        assert_eq!(s.counter_bid_delay(1.0), StdDuration::from_millis(2999));
    }

    #[test]
    fn rejects_bad_probability() {
        let s = Settings {
            outbid_probability: 1.5,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_inverted_window() {
        let s = Settings {
            counter_bid_min_delay_ms: 5000,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_zero_recent_limit() {
        let s = Settings {
            recent_limit: 0,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn rejects_recent_limit_above_cap() {
        let s = Settings {
            recent_limit: MAX_RECENT + 1,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
        let s = Settings {
            recent_limit: MAX_RECENT,
            ..Settings::default()
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: Settings = serde_json::from_value(json!({ "recentLimit": 3 })).unwrap();
        assert_eq!(s.recent_limit, 3);
        assert_eq!(s.outbid_probability, 0.45);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Checkout
// ═══════════════════════════════════════════════════════════════════

mod checkout {
    use super::*;

    #[test]
    fn three_percent_fee_rounded() {
        let q = CheckoutQuote::for_price(199.0);
        assert_eq!(q.fees, 6.0); // 5.97
        assert_eq!(q.total, 205.0);
    }

    #[test]
    fn half_rounds_up() {
        let q = CheckoutQuote::for_price(150.0); // 4.5
        assert_eq!(q.fees, 5.0);
    }

    #[test]
    fn free_listing_has_no_fee() {
        let q = CheckoutQuote::for_price(0.0);
        assert_eq!((q.fees, q.total), (0.0, 0.0));
    }
}
