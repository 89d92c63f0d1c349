//! Listing records as scraped for restaurants and farms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single restaurant or farm record.
///
/// Field names follow the scraped JSON: `reviews` and `cuisine` are the
/// canonical keys, with `review_count` / `category` accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, rename = "reviews", alias = "review_count", alias = "reviewCount")]
    pub review_count: Option<u64>,
    #[serde(default, rename = "cuisine", alias = "category")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Listing {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_reviews(mut self, reviews: u64) -> Self {
        self.review_count = Some(reviews);
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_price_level(mut self, price_level: &str) -> Self {
        self.price_level = Some(price_level.to_string());
        self
    }

    /// Rating if present and finite. NaN or infinite ratings count as absent.
    pub fn rating_value(&self) -> Option<f64> {
        self.rating.filter(|r| r.is_finite())
    }

    /// Price tier 1 (`€`) to 4 (`€€€€`). Any other price level counts as absent.
    pub fn price_tier(&self) -> Option<u8> {
        match self.price_level.as_deref().map(str::trim)? {
            "€" => Some(1),
            "€€" => Some(2),
            "€€€" => Some(3),
            "€€€€" => Some(4),
            _ => None,
        }
    }

    /// Category trimmed of whitespace; empty categories count as absent.
    pub fn category_name(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Which dataset a set of listings came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ListingKind {
    #[default]
    Restaurants,
    Farms,
}

impl ListingKind {
    /// Key of the listing array in the backend's response envelope.
    pub fn envelope_key(self) -> &'static str {
        match self {
            ListingKind::Restaurants => "restaurants",
            ListingKind::Farms => "farms",
        }
    }

    /// GeoJSON property name the map reads the top categories from.
    pub fn top_categories_property(self) -> &'static str {
        match self {
            ListingKind::Restaurants => "top_cuisines",
            ListingKind::Farms => "top_types",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.envelope_key())
    }
}
