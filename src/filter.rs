//! Listing search, rating and category filters.

use crate::listing::Listing;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortBy {
    /// Highest rating first; unrated listings sort as 0.
    #[default]
    Rating,
    /// Most reviews first; listings without a review count sort as 0.
    Reviews,
    /// Case-insensitive by name.
    Name,
}

/// Current filter selection of the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub category: Option<String>,
    pub sort_by: SortBy,
    pub limit: Option<usize>,
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.min_rating.is_none()
            && self.max_rating.is_none()
            && self.category.is_none()
            && self.limit.is_none()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            let hit = contains_ci(&listing.name, &needle)
                || listing.address.as_deref().is_some_and(|a| contains_ci(a, &needle))
                || listing.category.as_deref().is_some_and(|c| contains_ci(c, &needle));
            if !hit {
                return false;
            }
        }

        if self.min_rating.is_some() || self.max_rating.is_some() {
            let Some(rating) = listing.rating_value() else {
                return false;
            };
            if self.min_rating.is_some_and(|min| rating < min) {
                return false;
            }
            if self.max_rating.is_some_and(|max| rating > max) {
                return false;
            }
        }

        if let Some(category) = non_blank(&self.category) {
            let needle = category.to_lowercase();
            if !listing.category.as_deref().is_some_and(|c| contains_ci(c, &needle)) {
                return false;
            }
        }

        true
    }

    /// Filters, sorts and truncates `listings` without copying them.
    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        let mut selected: Vec<&Listing> = listings.iter().filter(|l| self.matches(l)).collect();

        match self.sort_by {
            SortBy::Rating => selected.sort_by(|a, b| {
                let (a, b) = (a.rating_value().unwrap_or(0.0), b.rating_value().unwrap_or(0.0));
                b.partial_cmp(&a).unwrap_or(Ordering::Equal)
            }),
            SortBy::Reviews => {
                selected.sort_by_key(|l| std::cmp::Reverse(l.review_count.unwrap_or(0)))
            }
            SortBy::Name => selected.sort_by_cached_key(|l| l.name.to_lowercase()),
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
