pub mod catalog;
pub mod errors;
pub mod ids;
pub mod models;
pub mod random;
pub mod scheduler;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use catalog::Catalog;
use errors::CoreError;
use models::{
    bid::Bid,
    draft::{FieldErrors, ListingForm, UserListingDraft},
    filter::{BrowseFilters, BrowseResult},
    listing::Listing,
    records::{CheckoutQuote, Purchase, PurchaseInput, RecentItem, ToggleResult},
    settings::Settings,
};
use random::{OsRandom, RandomSource};
use scheduler::Scheduler;
use services::{
    auction_service::AuctionSession, bid_service::BidLedger, browse_service::BrowseService,
    favorites_service::FavoritesService, listing_service::UserListingsService,
    purchase_service::PurchasesService, recents_service::RecentsService,
};
use storage::{keys, local::LocalStorage};

/// Result of submitting the Sell form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(UserListingDraft),
    Invalid(FieldErrors),
}

/// Main entry point for the SiteBazaar core library.
///
/// Owns the store handle, the catalog, settings and the simulation plumbing,
/// and exposes every user-facing operation. Time is always passed in, so the
/// same instance works for wall-clock front ends and for tests.
#[must_use]
pub struct SiteBazaar {
    storage: LocalStorage,
    catalog: Catalog,
    settings: Settings,
    scheduler: Arc<dyn Scheduler>,
    random: Arc<dyn RandomSource>,
    browse_service: BrowseService,
    bids: BidLedger,
    favorites: FavoritesService,
    recents: RecentsService,
    user_listings: UserListingsService,
    purchases: PurchasesService,
}

impl std::fmt::Debug for SiteBazaar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteBazaar")
            .field("listings", &self.catalog.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl SiteBazaar {
    /// Build over an existing store. Persisted settings are loaded; invalid
    /// ones are ignored in favour of the defaults.
    pub fn new(storage: LocalStorage, catalog: Catalog, scheduler: Arc<dyn Scheduler>) -> Self {
        let stored: Settings = storage.read(keys::SETTINGS, Settings::default());
        let settings = match stored.validate() {
            Ok(()) => stored,
            Err(e) => {
                warn!(error = %e, "stored settings rejected, using defaults");
                Settings::default()
            }
        };
        Self::build(storage, catalog, scheduler, Arc::new(OsRandom), settings)
    }

    /// Replace the random source (deterministic simulations, tests).
    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    // ── Catalog ─────────────────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Look up a listing. `None` is the "not found" view state.
    #[must_use]
    pub fn get_listing(&self, id: &str) -> Option<&Listing> {
        self.catalog.get(id)
    }

    /// Open a listing page: returns the listing and records the view.
    pub fn view_listing(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<&Listing>, CoreError> {
        let Some(listing) = self.catalog.get(id) else {
            return Ok(None);
        };
        self.recents.push(&listing.id, now)?;
        Ok(Some(listing))
    }

    // ── Browse ──────────────────────────────────────────────────────

    #[must_use]
    pub fn browse(&self, filters: &BrowseFilters) -> BrowseResult {
        self.browse_service.apply(self.catalog.listings(), filters)
    }

    /// Filters from the last session, or the configured defaults.
    #[must_use]
    pub fn load_filters(&self) -> BrowseFilters {
        self.storage
            .read(keys::BROWSE_FILTERS, self.settings.default_filters.clone())
            .sanitized()
    }

    pub fn save_filters(&self, filters: &BrowseFilters) -> Result<(), CoreError> {
        self.storage.write(keys::BROWSE_FILTERS, filters)
    }

    /// Persist and return the default filters.
    pub fn reset_filters(&self) -> Result<BrowseFilters, CoreError> {
        let defaults = self.settings.default_filters.clone();
        self.save_filters(&defaults)?;
        Ok(defaults)
    }

    // ── Favorites & Recents ─────────────────────────────────────────

    /// Toggle a catalog listing in favorites.
    pub fn toggle_favorite(&self, id: &str) -> Result<ToggleResult, CoreError> {
        if self.catalog.get(id).is_none() {
            return Err(CoreError::ListingNotFound(id.to_string()));
        }
        self.favorites.toggle(id)
    }

    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    #[must_use]
    pub fn favorite_ids(&self) -> Vec<String> {
        self.favorites.get_all()
    }

    /// Favorite listings in saved order; ids no longer in the catalog are skipped.
    #[must_use]
    pub fn favorite_listings(&self) -> Vec<&Listing> {
        self.catalog.resolve_ids(&self.favorites.get_all())
    }

    #[must_use]
    pub fn recent_items(&self) -> Vec<RecentItem> {
        self.recents.get_all()
    }

    /// Recently viewed listings, most recent first.
    #[must_use]
    pub fn recent_listings(&self) -> Vec<&Listing> {
        let ids: Vec<String> = self.recents.get_all().into_iter().map(|r| r.id).collect();
        self.catalog.resolve_ids(&ids)
    }

    // ── Auctions ────────────────────────────────────────────────────

    /// Start an auction view for a listing.
    pub fn open_auction(&self, id: &str, now: DateTime<Utc>) -> Result<AuctionSession, CoreError> {
        let listing = self
            .catalog
            .get(id)
            .ok_or_else(|| CoreError::ListingNotFound(id.to_string()))?;
        AuctionSession::open(
            listing,
            self.bids.clone(),
            Arc::clone(&self.scheduler),
            Arc::clone(&self.random),
            self.settings.clone(),
            now,
        )
    }

    /// Persisted bids for a listing, newest first (no synthetic history).
    #[must_use]
    pub fn bids_for_listing(&self, id: &str) -> Vec<Bid> {
        self.bids.get_for_listing(id)
    }

    // ── Checkout ────────────────────────────────────────────────────

    /// Price breakdown for buying a listing at its fixed price.
    pub fn checkout_quote(&self, id: &str) -> Result<CheckoutQuote, CoreError> {
        let listing = self.buy_now_listing(id)?;
        Ok(CheckoutQuote::for_price(listing.price))
    }

    /// Record a mock Buy Now purchase.
    pub fn buy_now(&self, id: &str, now: DateTime<Utc>) -> Result<Purchase, CoreError> {
        let listing = self.buy_now_listing(id)?;
        self.purchases.add(
            PurchaseInput {
                listing_id: listing.id.clone(),
                title: listing.title.clone(),
                price: listing.price,
            },
            now,
        )
    }

    #[must_use]
    pub fn purchases(&self) -> Vec<Purchase> {
        self.purchases.get_all()
    }

    fn buy_now_listing(&self, id: &str) -> Result<&Listing, CoreError> {
        let listing = self
            .catalog
            .get(id)
            .ok_or_else(|| CoreError::ListingNotFound(id.to_string()))?;
        if listing.is_auction {
            return Err(CoreError::Validation(format!(
                "Listing {id} is an auction and can't be bought now"
            )));
        }
        Ok(listing)
    }

    // ── Sell ────────────────────────────────────────────────────────

    #[must_use]
    pub fn validate_listing_form(&self, form: &ListingForm, now: DateTime<Utc>) -> FieldErrors {
        form.validate(now)
    }

    /// Validate the Sell form and save it as a draft if it passes.
    pub fn submit_listing(
        &self,
        form: &ListingForm,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, CoreError> {
        match form.into_draft_input(now) {
            Ok(input) => Ok(SubmitOutcome::Saved(self.user_listings.add(input, now)?)),
            Err(errors) => Ok(SubmitOutcome::Invalid(errors)),
        }
    }

    #[must_use]
    pub fn user_listings(&self) -> Vec<UserListingDraft> {
        self.user_listings.get_all()
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate, persist and apply new settings.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.storage.write(keys::SETTINGS, &settings)?;
        self.recents = RecentsService::new(self.storage.clone(), settings.recent_limit);
        self.settings = settings;
        Ok(())
    }

    /// Wipe every persisted SiteBazaar key and fall back to default settings.
    /// Returns how many keys were removed.
    pub fn reset_all(&mut self) -> Result<usize, CoreError> {
        let removed = self.storage.clear_namespace()?;
        self.settings = Settings::default();
        self.recents = RecentsService::new(self.storage.clone(), self.settings.recent_limit);
        info!(removed, "local data reset");
        Ok(removed)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(
        storage: LocalStorage,
        catalog: Catalog,
        scheduler: Arc<dyn Scheduler>,
        random: Arc<dyn RandomSource>,
        settings: Settings,
    ) -> Self {
        Self {
            browse_service: BrowseService::new(),
            bids: BidLedger::new(storage.clone()),
            favorites: FavoritesService::new(storage.clone()),
            recents: RecentsService::new(storage.clone(), settings.recent_limit),
            user_listings: UserListingsService::new(storage.clone()),
            purchases: PurchasesService::new(storage.clone()),
            storage,
            catalog,
            settings,
            scheduler,
            random,
        }
    }
}
