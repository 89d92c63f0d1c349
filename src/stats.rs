use serde::Serialize;

use crate::analyzers::aggregate::rank_categories;
use crate::analyzers::utility::{mean, round_to};
use crate::listing::Listing;

/// Number of categories reported in [`CatalogStats::categories`].
pub const TOP_CATALOG_CATEGORIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Listings per star band, over listings that carry a rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingBands {
    // >= 4.5
    pub five_stars: usize,
    // [3.5, 4.5)
    pub four_stars: usize,
    // [2.5, 3.5)
    pub three_stars: usize,
    pub below_three: usize,
}

/// Catalog-wide figures for a whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub categories: Vec<CategoryCount>,
    pub rating_distribution: RatingBands,
}

impl CatalogStats {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut s = CatalogStats {
            total: listings.len(),
            ..Default::default()
        };

        let mut ratings = Vec::new();

        for l in listings {
            if let Some(r) = l.rating_value() {
                ratings.push(r);

                match r {
                    r if r >= 4.5 => s.rating_distribution.five_stars += 1,
                    r if r >= 3.5 => s.rating_distribution.four_stars += 1,
                    r if r >= 2.5 => s.rating_distribution.three_stars += 1,
                    _ => s.rating_distribution.below_three += 1,
                }
            }

            if let Some(reviews) = l.review_count {
                s.total_reviews += reviews;
            }
        }

        s.average_rating = round_to(mean(&ratings), 2);
        s.categories = rank_categories(listings)
            .into_iter()
            .take(TOP_CATALOG_CATEGORIES)
            .map(|(name, count)| CategoryCount {
                name: name.to_string(),
                count,
            })
            .collect();

        s
    }

    pub fn rated(&self) -> usize {
        let b = &self.rating_distribution;
        b.five_stars + b.four_stars + b.three_stars + b.below_three
    }
}

/// Sorted, de-duplicated category names across the dataset.
pub fn distinct_categories(listings: &[Listing]) -> Vec<String> {
    let mut names: Vec<String> = listings
        .iter()
        .filter_map(|l| l.category_name())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}
