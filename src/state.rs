//! Dashboard state: the loaded dataset and the active filter selection.

use std::collections::BTreeMap;

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::types::DistrictStats;
use crate::filter::ListingFilter;
use crate::listing::{Listing, ListingKind};
use crate::stats::CatalogStats;

/// Everything the views need, passed explicitly instead of held in globals.
///
/// The district mapping is always computed from the full dataset; the filter
/// only narrows [`DashboardState::visible`].
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub kind: ListingKind,
    pub listings: Vec<Listing>,
    pub filter: ListingFilter,
}

impl DashboardState {
    pub fn new(kind: ListingKind, listings: Vec<Listing>) -> Self {
        Self {
            kind,
            listings,
            filter: ListingFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ListingFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn visible(&self) -> Vec<&Listing> {
        self.filter.apply(&self.listings)
    }

    pub fn districts(&self) -> BTreeMap<String, DistrictStats> {
        aggregate(&self.listings)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_listings(&self.listings)
    }

    /// Replaces the dataset, keeping the current filter. Returns the new size.
    pub fn reload(&mut self, listings: Vec<Listing>) -> usize {
        self.listings = listings;
        self.listings.len()
    }

    pub fn reset_filter(&mut self) {
        self.filter = ListingFilter::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listings() -> Vec<Listing> {
        vec![
            Listing::new("a").with_address("1012 AB").with_rating(4.0),
            Listing::new("b").with_address("1012 AB").with_rating(2.0),
            Listing::new("c").with_address("1072 XY").with_rating(5.0),
        ]
    }

    #[test]
    fn test_filter_does_not_affect_districts() {
        let state = DashboardState::new(ListingKind::Restaurants, listings()).with_filter(
            ListingFilter {
                min_rating: Some(4.5),
                ..Default::default()
            },
        );

        assert_eq!(state.visible().len(), 1);
        assert_eq!(state.districts()["1012"].count, 2);
        assert_eq!(state.stats().total, 3);
    }

    #[test]
    fn test_reload_and_reset() {
        let mut state = DashboardState::new(ListingKind::Farms, listings()).with_filter(
            ListingFilter {
                limit: Some(1),
                ..Default::default()
            },
        );

        assert_eq!(state.reload(vec![Listing::new("only")]), 1);
        assert_eq!(state.visible().len(), 1);
        assert!(state.districts().is_empty());

        state.reset_filter();
        assert!(state.filter.is_empty());
    }
}
