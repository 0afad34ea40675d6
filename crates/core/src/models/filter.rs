use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::str::FromStr;

use super::listing::{Category, Listing, Tech};

/// Either "any value" or one specific value.
///
/// Serialized as the string `"All"` or the value's display name, matching the
/// shape browse filters have always been persisted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Selector<T> {
    /// `All` matches everything; `Only(v)` matches `v`.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(v) => v == value,
        }
    }
}

impl<T: Display> Serialize for Selector<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selector::All => serializer.serialize_str("All"),
            Selector::Only(v) => serializer.collect_str(v),
        }
    }
}

impl<'de, T> Deserialize<'de> for Selector<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == "All" {
            return Ok(Selector::All);
        }
        raw.parse::<T>()
            .map(Selector::Only)
            .map_err(serde::de::Error::custom)
    }
}

impl<T: FromStr> FromStr for Selector<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Selector::All)
        } else {
            s.parse().map(Selector::Only)
        }
    }
}

/// Result ordering for the browse view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Ascending effective price
    Price,
    /// Ascending end time; listings without one go last
    EndingSoon,
    /// Descending creation time
    Newest,
    /// Descending view count
    #[default]
    Popular,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Price => write!(f, "price"),
            SortKey::EndingSoon => write!(f, "endingSoon"),
            SortKey::Newest => write!(f, "newest"),
            SortKey::Popular => write!(f, "popular"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "endingsoon" | "ending-soon" | "ending_soon" => Ok(SortKey::EndingSoon),
            "newest" => Ok(SortKey::Newest),
            "popular" => Ok(SortKey::Popular),
            _ => Err(format!("Unknown sort key '{s}'")),
        }
    }
}

pub const DEFAULT_PRICE_MIN: f64 = 0.0;
pub const DEFAULT_PRICE_MAX: f64 = 500.0;

/// User-controlled criteria driving the catalog view. Persisted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseFilters {
    pub query: String,
    pub category: Selector<Category>,
    pub tech: Selector<Tech>,
    pub auction_only: bool,
    pub price_min: f64,
    pub price_max: f64,
    pub sort: SortKey,
}

impl Default for BrowseFilters {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: Selector::All,
            tech: Selector::All,
            auction_only: false,
            price_min: DEFAULT_PRICE_MIN,
            price_max: DEFAULT_PRICE_MAX,
            sort: SortKey::Popular,
        }
    }
}

impl BrowseFilters {
    /// Replace non-finite price bounds with the defaults and swap inverted ones.
    ///
    /// The pipeline itself assumes well-formed bounds; anything read back from
    /// storage goes through here first.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.price_min.is_finite() {
            self.price_min = DEFAULT_PRICE_MIN;
        }
        if !self.price_max.is_finite() {
            self.price_max = DEFAULT_PRICE_MAX;
        }
        if self.price_min > self.price_max {
            std::mem::swap(&mut self.price_min, &mut self.price_max);
        }
        self
    }
}

/// Output of the browse pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowseResult {
    pub items: Vec<Listing>,
    pub total: usize,
}
