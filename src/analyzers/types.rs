//! Data types produced by the district analyzers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-district aggregate keyed by PC4 prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictStats {
    pub postal_prefix: String,
    pub count: usize,
    pub average_rating: f64,
    pub top_categories: Vec<String>,
}

/// District mapping plus bookkeeping, written as the `districts` JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct DistrictReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub total_listings: usize,
    /// Listings without a recognisable postcode.
    pub skipped: usize,
    pub districts: BTreeMap<String, DistrictStats>,
}

/// One row of the district summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub pc4: String,
    pub count: usize,
    pub average_rating: f64,
    pub total_reviews: u64,
    pub category_diversity: usize,
    pub saturation: &'static str,
}

/// Spread of ratings within a district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistribution {
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewVolume {
    pub total: u64,
    pub mean: f64,
    pub median: f64,
    /// Listings with at least 100 reviews.
    pub high_engagement: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryConcentration {
    /// Percentage of categorised listings in the three largest categories.
    pub top_3_share: f64,
    /// The largest category holds more than 30% of categorised listings.
    pub is_concentrated: bool,
}

/// Listings per price tier (`€` to `€€€€`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceTiers {
    pub budget: usize,
    pub moderate: usize,
    pub upscale: usize,
    pub fine_dining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAnalysis {
    pub average_price_level: f64,
    pub median_price_level: u8,
    pub distribution: PriceTiers,
    /// `(5 - average) * 2`; higher is cheaper.
    pub affordability_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionMetrics {
    pub saturation: &'static str,
    /// `count / 10`, capped at 10.
    pub saturation_score: f64,
    pub avg_competitors_per_category: f64,
    pub competitive_intensity: &'static str,
    pub entry_barriers: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPositioning {
    pub positioning: &'static str,
    pub avg_rating: f64,
    pub avg_price_level: f64,
    pub quality_price_ratio: f64,
}

/// District figures relative to every loaded listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityBenchmarks {
    pub rating_diff: f64,
    pub reviews_diff: f64,
    /// Percentile rank of the district's mean rating among all ratings.
    pub rating_percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnderservedCategory {
    pub category: String,
    pub city_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthOpportunities {
    pub underserved_categories: Vec<UnderservedCategory>,
    pub quality_gap: f64,
    pub has_quality_gap: bool,
    /// 0-10; higher for small, lower-rated, less diverse districts.
    pub market_potential: f64,
}

/// Detailed quality and category profile of a single district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictProfile {
    pub pc4: String,
    pub count: usize,
    pub ratings: Option<RatingDistribution>,
    pub high_rated: usize,
    pub low_rated: usize,
    pub reviews: ReviewVolume,
    pub top_categories: Vec<CategoryShare>,
    pub diversity_index: f64,
    pub concentration: Option<CategoryConcentration>,
    pub prices: Option<PriceAnalysis>,
    pub competition: CompetitionMetrics,
    pub positioning: Option<MarketPositioning>,
    pub benchmarks: CityBenchmarks,
    pub opportunities: GrowthOpportunities,
}
