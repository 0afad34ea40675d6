use chrono::{DateTime, Duration as TimeDelta, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::errors::CoreError;
use crate::models::bid::{sort_newest_first, Bid, Bidder};
use crate::models::listing::Listing;
use crate::models::settings::Settings;
use crate::random::RandomSource;
use crate::scheduler::{Scheduler, TaskHandle};

use super::bid_service::BidLedger;

// ── Pure helpers ────────────────────────────────────────────────────

/// Smallest raise allowed over `current`: +10 below 200, +20 below 500,
/// +50 below 1000, +100 from there on.
pub fn min_increment(current: f64) -> f64 {
    if current < 200.0 {
        10.0
    } else if current < 500.0 {
        20.0
    } else if current < 1000.0 {
        50.0
    } else {
        100.0
    }
}

/// Countdown label, e.g. `"1d 2h 3m 4s"`, `"2h 0m 5s"`, `"2m 5s"`, or `"Ended"`.
///
/// Leading zero units are dropped; seconds are always shown.
pub fn format_time_left(ms: i64) -> String {
    if ms <= 0 {
        return "Ended".to_string();
    }

    let total_seconds = ms / 1000;
    let d = total_seconds / 86_400;
    let h = (total_seconds % 86_400) / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;

    if d > 0 {
        format!("{d}d {h}h {m}m {s}s")
    } else if h > 0 {
        format!("{h}h {m}m {s}s")
    } else {
        format!("{m}m {s}s")
    }
}

/// en-US style amount: thousands separators, up to 3 decimals, no trailing zeros.
pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if amount < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Synthetic earlier bids so a fresh auction doesn't look empty.
///
/// Three competitor bids at 40, 20 and 10 below the base (current bid, else
/// price, else 100), placed 6h, 4h and 2h before `now`. Non-positive amounts
/// are dropped.
pub fn mock_history(listing: &Listing, now: DateTime<Utc>) -> Vec<Bid> {
    let base = [listing.current_bid, listing.price]
        .into_iter()
        .find(|v| *v != 0.0 && v.is_finite())
        .unwrap_or(100.0);

    [("m1", 40.0, 6), ("m2", 20.0, 4), ("m3", 10.0, 2)]
        .into_iter()
        .map(|(id, below, hours_ago)| Bid {
            id: id.to_string(),
            listing_id: listing.id.clone(),
            amount: base - below,
            created_at: now - TimeDelta::hours(hours_ago),
            bidder: Bidder::Other,
        })
        .filter(|b| b.amount > 0.0)
        .collect()
}

// ── Session types ───────────────────────────────────────────────────

/// Where the local user stands in an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    /// Newest bid is ours
    Winning,
    /// Newest bid is someone else's
    Outbid,
    /// No bids at all
    Idle,
}

impl AuctionStatus {
    fn from_history(history: &[Bid]) -> Self {
        match history.first().map(|b| b.bidder) {
            Some(Bidder::You) => AuctionStatus::Winning,
            Some(Bidder::Other) => AuctionStatus::Outbid,
            None => AuctionStatus::Idle,
        }
    }
}

impl std::fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuctionStatus::Winning => write!(f, "You are winning"),
            AuctionStatus::Outbid => write!(f, "Outbid"),
            AuctionStatus::Idle => write!(f, "Auction"),
        }
    }
}

/// Why a bid was not accepted. Advisory: shown to the user, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum BidRejection {
    AuctionEnded,
    /// Not a positive, finite number
    InvalidAmount,
    BelowMinimum { min_allowed: f64, increment: f64 },
}

impl std::fmt::Display for BidRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BidRejection::AuctionEnded => write!(f, "Auction ended"),
            BidRejection::InvalidAmount => write!(f, "Enter a valid amount"),
            BidRejection::BelowMinimum {
                min_allowed,
                increment,
            } => write!(
                f,
                "Minimum bid is ${} (increment +${})",
                format_money(*min_allowed),
                format_money(*increment)
            ),
        }
    }
}

/// A competitor bid that will be written when its timer fires.
#[derive(Debug, Clone)]
pub struct ScheduledCounterBid {
    pub amount: f64,
    pub delay: Duration,
    pub handle: TaskHandle,
}

#[derive(Debug, Clone)]
pub enum BidOutcome {
    Accepted {
        bid: Bid,
        counter_bid: Option<ScheduledCounterBid>,
    },
    Rejected(BidRejection),
}

impl BidOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BidOutcome::Accepted { .. })
    }
}

/// State shared between the session and its scheduled counter-bids.
#[derive(Debug)]
struct SessionState {
    /// Newest first
    history: Vec<Bid>,
    status: AuctionStatus,
}

impl SessionState {
    fn record(&mut self, bid: Bid) {
        self.history.insert(0, bid);
        sort_newest_first(&mut self.history);
    }
}

// ── Session ─────────────────────────────────────────────────────────

/// One user's view of one auction: countdown, merged bid history, status,
/// bid entry, and the simulated competitor.
///
/// Dropping the session cancels any counter-bid that hasn't fired yet.
pub struct AuctionSession {
    listing: Listing,
    ledger: BidLedger,
    scheduler: Arc<dyn Scheduler>,
    random: Arc<dyn RandomSource>,
    settings: Settings,
    state: Arc<Mutex<SessionState>>,
    input: String,
    pending: Vec<TaskHandle>,
}

impl std::fmt::Debug for AuctionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AuctionSession")
            .field("listing", &self.listing.id)
            .field("bids", &state.history.len())
            .field("status", &state.status)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl AuctionSession {
    /// Open a session, merging stored bids with the synthetic history.
    pub fn open(
        listing: &Listing,
        ledger: BidLedger,
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
        settings: Settings,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if !listing.is_auction {
            return Err(CoreError::NotAnAuction(listing.id.clone()));
        }

        let mut history = ledger.get_for_listing(&listing.id);
        history.extend(mock_history(listing, now));
        sort_newest_first(&mut history);
        let status = AuctionStatus::from_history(&history);

        debug!(listing_id = %listing.id, bids = history.len(), ?status, "auction opened");

        Ok(Self {
            listing: listing.clone(),
            ledger,
            scheduler,
            random,
            settings,
            state: Arc::new(Mutex::new(SessionState { history, status })),
            input: String::new(),
            pending: Vec::new(),
        })
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    // ── Countdown ───────────────────────────────────────────────────

    /// Milliseconds until the end; non-positive once ended. Auctions
    /// without an end time never end.
    pub fn time_left_ms(&self, now: DateTime<Utc>) -> i64 {
        match self.listing.ends_at {
            Some(end) => (end - now).num_milliseconds(),
            None => i64::MAX,
        }
    }

    pub fn is_ended(&self, now: DateTime<Utc>) -> bool {
        self.time_left_ms(now) <= 0
    }

    pub fn time_left_label(&self, now: DateTime<Utc>) -> String {
        format_time_left(self.time_left_ms(now))
    }

    // ── Bids ────────────────────────────────────────────────────────

    /// Highest of the listing's seeded bid and every bid in the history.
    pub fn current_bid(&self) -> f64 {
        let state = self.state.lock();
        state
            .history
            .iter()
            .map(|b| b.amount)
            .fold(self.listing.current_bid.max(0.0), f64::max)
    }

    pub fn increment(&self) -> f64 {
        min_increment(self.current_bid())
    }

    /// Smallest amount the next bid may be.
    pub fn min_allowed(&self) -> f64 {
        let current = self.current_bid();
        current + min_increment(current)
    }

    pub fn status(&self) -> AuctionStatus {
        self.state.lock().status
    }

    /// Snapshot of the bid history, newest first.
    pub fn history(&self) -> Vec<Bid> {
        self.state.lock().history.clone()
    }

    pub fn bid_input(&self) -> &str {
        &self.input
    }

    pub fn set_bid_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Counter-bids scheduled by this session that haven't fired or been canceled.
    pub fn pending_counter_bids(&self) -> usize {
        self.pending.iter().filter(|h| h.is_pending()).count()
    }

    /// Shorthand for [`set_bid_input`](Self::set_bid_input) then
    /// [`submit_bid`](Self::submit_bid).
    pub fn place_bid(
        &mut self,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<BidOutcome, CoreError> {
        self.set_bid_input(text);
        self.submit_bid(now)
    }

    /// Try to place a bid for the current input.
    ///
    /// Rejections come back as [`BidOutcome::Rejected`] and leave the input as
    /// typed. On acceptance the bid is written to the ledger, the input is
    /// cleared, and a competitor may be scheduled to answer. `Err` only for
    /// storage failures.
    pub fn submit_bid(&mut self, now: DateTime<Utc>) -> Result<BidOutcome, CoreError> {
        if self.is_ended(now) {
            return Ok(BidOutcome::Rejected(BidRejection::AuctionEnded));
        }

        let amount = match self.input.trim().parse::<f64>() {
            Ok(a) if a.is_finite() && a > 0.0 => a,
            _ => return Ok(BidOutcome::Rejected(BidRejection::InvalidAmount)),
        };

        let current = self.current_bid();
        let increment = min_increment(current);
        let min_allowed = current + increment;
        if amount < min_allowed {
            debug!(listing_id = %self.listing.id, amount, min_allowed, "bid below minimum");
            return Ok(BidOutcome::Rejected(BidRejection::BelowMinimum {
                min_allowed,
                increment,
            }));
        }

        let bid = self
            .ledger
            .add(&self.listing.id, amount, Bidder::You, now)?;
        {
            let mut state = self.state.lock();
            state.record(bid.clone());
            state.status = AuctionStatus::Winning;
        }
        self.input.clear();

        let counter_bid = self.maybe_schedule_counter_bid(amount + increment);
        Ok(BidOutcome::Accepted { bid, counter_bid })
    }

    /// Roll for a competitor. The ledger is only touched when the timer fires.
    fn maybe_schedule_counter_bid(&mut self, amount: f64) -> Option<ScheduledCounterBid> {
        if self.random.next_f64() >= self.settings.outbid_probability {
            return None;
        }
        let delay = self.settings.counter_bid_delay(self.random.next_f64());

        let ledger = self.ledger.clone();
        let state = Arc::clone(&self.state);
        let listing_id = self.listing.id.clone();

        let handle = self.scheduler.schedule(
            delay,
            Box::new(move |fired_at| {
                match ledger.add(&listing_id, amount, Bidder::Other, fired_at) {
                    Ok(bid) => {
                        let mut state = state.lock();
                        state.record(bid);
                        state.status = AuctionStatus::Outbid;
                        info!(%listing_id, amount, "outbid by simulated bidder");
                    }
                    Err(e) => {
                        error!(%listing_id, amount, error = %e, "counter-bid could not be recorded");
                    }
                }
            }),
        );

        debug!(listing_id = %self.listing.id, amount, ?delay, "counter-bid scheduled");
        self.pending.retain(TaskHandle::is_pending);
        self.pending.push(handle.clone());
        Some(ScheduledCounterBid {
            amount,
            delay,
            handle,
        })
    }

    /// End the session, canceling counter-bids that haven't fired.
    pub fn close(self) {}
}

impl Drop for AuctionSession {
    fn drop(&mut self) {
        for handle in &self.pending {
            handle.cancel();
        }
    }
}
