use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::listing::{Category, Tech};

/// Tags beyond this many are dropped on submit.
pub const MAX_TAGS: usize = 8;
/// Screenshot URLs beyond this many are dropped on submit.
pub const MAX_SCREENSHOTS: usize = 6;
/// An auction must end at least this far in the future.
pub const MIN_AUCTION_LEAD_MINUTES: i64 = 10;

/// A listing draft saved from the Sell form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListingDraft {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub tech_stack: Vec<Tech>,
    pub price: f64,
    pub is_auction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub short_pitch: String,
    pub tags: Vec<String>,
    /// Mock URLs
    pub screenshots: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Everything in a draft except the generated id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftInput {
    pub title: String,
    pub category: Category,
    pub tech_stack: Vec<Tech>,
    pub price: f64,
    pub is_auction: bool,
    pub ends_at: Option<DateTime<Utc>>,
    pub short_pitch: String,
    pub tags: Vec<String>,
    pub screenshots: Vec<String>,
}

/// Sell form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    Title,
    Category,
    Price,
    TechStack,
    ShortPitch,
    Tags,
    Screenshots,
    EndsAt,
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DraftField::Title => "title",
            DraftField::Category => "category",
            DraftField::Price => "price",
            DraftField::TechStack => "techStack",
            DraftField::ShortPitch => "shortPitch",
            DraftField::Tags => "tags",
            DraftField::Screenshots => "screenshots",
            DraftField::EndsAt => "endsAt",
        };
        write!(f, "{name}")
    }
}

/// Field-level validation messages. Empty means the form can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<DraftField, String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: DraftField, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Raw Sell form state. Text fields hold exactly what the user typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingForm {
    pub title: String,
    pub category: Option<Category>,
    pub tech_stack: Vec<Tech>,
    pub price: String,
    pub is_auction: bool,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM` (taken as UTC)
    pub ends_at: String,
    pub short_pitch: String,
    /// Comma separated
    pub tags: String,
    /// Comma separated URLs
    pub screenshots: String,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: None,
            tech_stack: vec![Tech::NextJs, Tech::React],
            price: "199".to_string(),
            is_auction: false,
            ends_at: String::new(),
            short_pitch: String::new(),
            tags: "clean, responsive, modern".to_string(),
            screenshots: String::new(),
        }
    }
}

impl ListingForm {
    /// Check every field and collect one message per failing field.
    pub fn validate(&self, now: DateTime<Utc>) -> FieldErrors {
        let mut e = FieldErrors::default();

        if self.title.trim().chars().count() < 6 {
            e.insert(DraftField::Title, "Title must be at least 6 characters.");
        }
        if self.category.is_none() {
            e.insert(DraftField::Category, "Pick a category.");
        }
        if parse_price(&self.price).is_none() {
            e.insert(DraftField::Price, "Enter a valid price.");
        }
        if self.tech_stack.is_empty() {
            e.insert(DraftField::TechStack, "Pick at least 1 tech stack item.");
        }
        if self.short_pitch.trim().chars().count() < 10 {
            e.insert(
                DraftField::ShortPitch,
                "Short pitch must be at least 10 characters.",
            );
        }
        if split_list(&self.tags).is_empty() {
            e.insert(DraftField::Tags, "Add at least 1 tag.");
        }
        if split_list(&self.screenshots).iter().any(|u| !is_http_url(u)) {
            e.insert(
                DraftField::Screenshots,
                "Screenshot URLs must start with http(s):// (mock).",
            );
        }

        if self.is_auction {
            if self.ends_at.trim().is_empty() {
                e.insert(DraftField::EndsAt, "Choose an auction end date/time.");
            } else {
                let earliest = now + Duration::minutes(MIN_AUCTION_LEAD_MINUTES);
                match parse_end_time(&self.ends_at) {
                    Some(end) if end >= earliest => {}
                    _ => e.insert(
                        DraftField::EndsAt,
                        "End time must be at least 10 minutes from now.",
                    ),
                }
            }
        }

        e
    }

    /// Validate and normalize into a draft input.
    ///
    /// Trims text, keeps at most [`MAX_TAGS`] tags and [`MAX_SCREENSHOTS`]
    /// screenshots, and drops the end time for Buy Now listings.
    pub fn into_draft_input(&self, now: DateTime<Utc>) -> Result<DraftInput, FieldErrors> {
        let errors = self.validate(now);
        let (category, price) = match (self.category, parse_price(&self.price)) {
            (Some(c), Some(p)) if errors.is_empty() => (c, p),
            _ => return Err(errors),
        };

        let mut tags = split_list(&self.tags);
        tags.truncate(MAX_TAGS);
        let mut screenshots = split_list(&self.screenshots);
        screenshots.truncate(MAX_SCREENSHOTS);

        Ok(DraftInput {
            title: self.title.trim().to_string(),
            category,
            tech_stack: self.tech_stack.clone(),
            price,
            is_auction: self.is_auction,
            ends_at: if self.is_auction {
                parse_end_time(&self.ends_at)
            } else {
                None
            },
            short_pitch: self.short_pitch.trim().to_string(),
            tags,
            screenshots,
        })
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_http_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

/// Parse an end time given either as RFC 3339 or as a `datetime-local` value.
pub fn parse_end_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
