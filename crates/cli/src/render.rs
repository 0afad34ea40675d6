use chrono::{DateTime, Utc};
use sitebazaar_core::models::bid::Bid;
use sitebazaar_core::models::listing::Listing;
use sitebazaar_core::services::auction_service::{format_money, format_time_left, AuctionSession};

pub fn listing_row(l: &Listing, now: DateTime<Utc>) -> String {
    let kind = if l.is_auction {
        let left = l
            .ends_at
            .map(|end| format_time_left((end - now).num_milliseconds()))
            .unwrap_or_else(|| "open".to_string());
        format!("auction ${} ({left})", format_money(l.effective_price()))
    } else {
        format!("buy now ${}", format_money(l.price))
    };
    format!(
        "{:<8} {:<32} {:<10} {:<28} {:>6} views",
        l.id,
        l.title,
        l.category.to_string(),
        kind,
        l.views
    )
}

pub fn listing_detail(l: &Listing) -> String {
    let tech: Vec<String> = l.tech_stack.iter().map(|t| t.to_string()).collect();
    format!(
        "{}\n  {}\n  category: {}  tech: {}\n  tags: {}\n  seller: {} ({:.1})\n  price: ${}{}",
        l.title,
        l.short_pitch,
        l.category,
        tech.join(", "),
        l.tags.join(", "),
        l.seller.name,
        l.seller.rating,
        format_money(l.price),
        if l.is_auction {
            format!("  current bid: ${} ({} bids)", format_money(l.current_bid), l.bid_count)
        } else {
            String::new()
        }
    )
}

pub fn bid_row(b: &Bid) -> String {
    format!(
        "  {:<6} ${:>10}  {}",
        b.bidder.to_string(),
        format_money(b.amount),
        b.created_at.format("%H:%M:%S")
    )
}

pub fn auction_summary(session: &AuctionSession, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{} [{}]\n  current bid: ${}  min increment: +${}  minimum bid: ${}\n  time left: {}\n  history:",
        session.listing().title,
        session.status(),
        format_money(session.current_bid()),
        format_money(session.increment()),
        format_money(session.min_allowed()),
        session.time_left_label(now),
    );
    // Only the newest 8, like the bid history table
    for b in session.history().iter().take(8) {
        out.push('\n');
        out.push_str(&bid_row(b));
    }
    out
}
