use crate::analyzers::aggregate::{group_by_pc4, rank_categories};
use crate::analyzers::density::{
    competitive_intensity, entry_barriers, market_positioning, saturation,
};
use crate::analyzers::types::{
    CategoryConcentration, CategoryShare, CityBenchmarks, CompetitionMetrics, DistrictProfile,
    DistrictSummary, GrowthOpportunities, MarketPositioning, PriceAnalysis, PriceTiers,
    RatingDistribution, ReviewVolume, UnderservedCategory,
};
use crate::analyzers::utility::{
    mean, median, pct, percentile, percentile_of_score, round_to, stddev,
};
use crate::listing::Listing;
use std::collections::HashSet;

/// Districts with fewer listings than this are left out of summaries.
pub const DEFAULT_MIN_LISTINGS: usize = 3;

const HIGH_RATED: f64 = 4.5;
const LOW_RATED: f64 = 3.5;
const HIGH_ENGAGEMENT_REVIEWS: u64 = 100;
const PROFILE_TOP_CATEGORIES: usize = 10;
const CONCENTRATED_SHARE: f64 = 0.3;
const QUALITY_TARGET: f64 = 4.5;
const QUALITY_GAP_THRESHOLD: f64 = 0.3;
const UNDERSERVED_MIN_CITY_COUNT: usize = 10;
const UNDERSERVED_CATEGORIES: usize = 5;

/// Builds one summary row per district holding at least `min_listings` listings,
/// largest districts first.
pub fn district_summaries(listings: &[Listing], min_listings: usize) -> Vec<DistrictSummary> {
    let mut summaries: Vec<DistrictSummary> = group_by_pc4(listings)
        .into_iter()
        .filter(|(_, group)| group.len() >= min_listings)
        .map(|(pc4, group)| {
            let ratings = ratings_of(&group);
            DistrictSummary {
                pc4: pc4.to_string(),
                count: group.len(),
                average_rating: round_to(mean(&ratings), 2),
                total_reviews: group.iter().filter_map(|l| l.review_count).sum(),
                category_diversity: distinct_categories(&group),
                saturation: saturation(group.len()),
            }
        })
        .collect();

    // groups come out of a BTreeMap, so equal counts are already in prefix order
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

/// Detailed quality, price and competition profile for one district.
///
/// `listings` is the whole loaded catalog: benchmarks and growth
/// opportunities compare the district against it. Returns `None` when the
/// district is unknown or has fewer than `min_listings` listings.
pub fn district_profile(
    listings: &[Listing],
    pc4: &str,
    min_listings: usize,
) -> Option<DistrictProfile> {
    let groups = group_by_pc4(listings);
    let group = groups.get(pc4)?;
    if group.len() < min_listings {
        return None;
    }

    let ratings = ratings_of(group);
    let distribution = if ratings.is_empty() {
        None
    } else {
        let avg = mean(&ratings);
        Some(RatingDistribution {
            mean: round_to(avg, 2),
            median: round_to(median(&ratings), 2),
            stddev: round_to(stddev(&ratings, avg), 2),
            min: round_to(ratings.iter().copied().fold(f64::INFINITY, f64::min), 2),
            max: round_to(ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max), 2),
            p25: round_to(percentile(&ratings, 25.0), 2),
            p75: round_to(percentile(&ratings, 75.0), 2),
            p90: round_to(percentile(&ratings, 90.0), 2),
        })
    };

    let review_counts: Vec<u64> = group.iter().filter_map(|l| l.review_count).collect();
    let review_values: Vec<f64> = review_counts.iter().map(|&r| r as f64).collect();

    let ranked = rank_categories(group.iter().copied());
    let categorised: usize = ranked.iter().map(|(_, n)| n).sum();

    let tiers: Vec<u8> = group.iter().filter_map(|l| l.price_tier()).collect();

    Some(DistrictProfile {
        pc4: pc4.to_string(),
        count: group.len(),
        ratings: distribution,
        high_rated: ratings.iter().filter(|&&r| r >= HIGH_RATED).count(),
        low_rated: ratings.iter().filter(|&&r| r < LOW_RATED).count(),
        reviews: ReviewVolume {
            total: review_counts.iter().sum(),
            mean: round_to(mean(&review_values), 1),
            median: round_to(median(&review_values), 1),
            high_engagement: review_counts
                .iter()
                .filter(|&&r| r >= HIGH_ENGAGEMENT_REVIEWS)
                .count(),
        },
        top_categories: ranked
            .iter()
            .take(PROFILE_TOP_CATEGORIES)
            .map(|&(category, count)| CategoryShare {
                category: category.to_string(),
                count,
                percentage: round_to(pct(count, categorised), 1),
            })
            .collect(),
        diversity_index: round_to(shannon_index(&ranked, categorised), 2),
        concentration: concentration(&ranked, categorised),
        prices: price_analysis(&tiers),
        competition: competition(group),
        positioning: positioning(&ratings, &tiers),
        benchmarks: benchmarks(listings, group),
        opportunities: opportunities(listings, group),
    })
}

fn ratings_of(group: &[&Listing]) -> Vec<f64> {
    group.iter().filter_map(|l| l.rating_value()).collect()
}

fn distinct_categories(group: &[&Listing]) -> usize {
    group
        .iter()
        .filter_map(|l| l.category_name())
        .collect::<HashSet<_>>()
        .len()
}

fn concentration(ranked: &[(&str, usize)], categorised: usize) -> Option<CategoryConcentration> {
    let &(_, largest) = ranked.first()?;
    let top_3: usize = ranked.iter().take(3).map(|(_, n)| n).sum();

    Some(CategoryConcentration {
        top_3_share: round_to(pct(top_3, categorised), 1),
        is_concentrated: largest as f64 / categorised as f64 > CONCENTRATED_SHARE,
    })
}

fn price_analysis(tiers: &[u8]) -> Option<PriceAnalysis> {
    if tiers.is_empty() {
        return None;
    }
    let values: Vec<f64> = tiers.iter().map(|&t| f64::from(t)).collect();
    let avg = mean(&values);

    let mut distribution = PriceTiers::default();
    for &tier in tiers {
        match tier {
            1 => distribution.budget += 1,
            2 => distribution.moderate += 1,
            3 => distribution.upscale += 1,
            _ => distribution.fine_dining += 1,
        }
    }

    Some(PriceAnalysis {
        average_price_level: round_to(avg, 1),
        // truncated: a median between two tiers reports the lower one
        median_price_level: median(&values) as u8,
        distribution,
        affordability_score: round_to((5.0 - avg) * 2.0, 1),
    })
}

fn competition(group: &[&Listing]) -> CompetitionMetrics {
    let count = group.len();
    let categories = distinct_categories(group);
    let per_category = if categories == 0 {
        0.0
    } else {
        count as f64 / categories as f64
    };

    CompetitionMetrics {
        saturation: saturation(count),
        saturation_score: (count as f64 / 10.0).min(10.0),
        avg_competitors_per_category: round_to(per_category, 1),
        competitive_intensity: competitive_intensity(per_category),
        entry_barriers: entry_barriers(count, per_category),
    }
}

fn positioning(ratings: &[f64], tiers: &[u8]) -> Option<MarketPositioning> {
    if ratings.is_empty() || tiers.is_empty() {
        return None;
    }
    let avg_rating = mean(ratings);
    let avg_price = tiers.iter().map(|&t| f64::from(t)).sum::<f64>() / tiers.len() as f64;

    Some(MarketPositioning {
        positioning: market_positioning(avg_rating, avg_price),
        avg_rating: round_to(avg_rating, 2),
        avg_price_level: round_to(avg_price, 1),
        quality_price_ratio: round_to(avg_rating / avg_price, 2),
    })
}

fn benchmarks(city: &[Listing], group: &[&Listing]) -> CityBenchmarks {
    let city_ratings: Vec<f64> = city.iter().filter_map(Listing::rating_value).collect();
    let city_reviews: Vec<f64> = city
        .iter()
        .filter_map(|l| l.review_count)
        .map(|r| r as f64)
        .collect();
    let ratings = ratings_of(group);
    let reviews: Vec<f64> = group
        .iter()
        .filter_map(|l| l.review_count)
        .map(|r| r as f64)
        .collect();

    let has_ratings = !ratings.is_empty() && !city_ratings.is_empty();
    let has_reviews = !reviews.is_empty() && !city_reviews.is_empty();

    CityBenchmarks {
        rating_diff: if has_ratings {
            round_to(mean(&ratings) - mean(&city_ratings), 2)
        } else {
            0.0
        },
        reviews_diff: if has_reviews {
            round_to(mean(&reviews) - mean(&city_reviews), 1)
        } else {
            0.0
        },
        rating_percentile: if has_ratings {
            percentile_of_score(&city_ratings, mean(&ratings)).round()
        } else {
            50.0
        },
    }
}

fn opportunities(city: &[Listing], group: &[&Listing]) -> GrowthOpportunities {
    let present: HashSet<&str> = group.iter().filter_map(|l| l.category_name()).collect();

    let underserved_categories = rank_categories(city)
        .into_iter()
        .filter(|&(category, n)| n >= UNDERSERVED_MIN_CITY_COUNT && !present.contains(category))
        .take(UNDERSERVED_CATEGORIES)
        .map(|(category, city_count)| UnderservedCategory {
            category: category.to_string(),
            city_count,
        })
        .collect();

    let avg_rating = round_to(mean(&ratings_of(group)), 2);
    let quality_gap = (QUALITY_TARGET - avg_rating).max(0.0);

    let saturation_factor = (10.0 - group.len() as f64 / 5.0).max(0.0);
    let quality_factor = (quality_gap * 2.0).max(0.0);
    let diversity_factor = (10.0 - distinct_categories(group) as f64).max(0.0);
    let potential = (saturation_factor + quality_factor + diversity_factor) / 3.0;

    GrowthOpportunities {
        underserved_categories,
        quality_gap: round_to(quality_gap, 2),
        has_quality_gap: quality_gap > QUALITY_GAP_THRESHOLD,
        market_potential: round_to(potential.min(10.0), 1),
    }
}

/// Shannon diversity index `-Σ p·ln(p)` over category shares.
fn shannon_index(ranked: &[(&str, usize)], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let weighted: f64 = ranked
        .iter()
        .map(|&(_, n)| {
            let p = n as f64 / total as f64;
            p * p.ln()
        })
        .sum();
    0.0 - weighted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(pc4: &str, rating: Option<f64>, reviews: Option<u64>, category: &str) -> Listing {
        let mut l = Listing::new("x").with_address(&format!("Straat 1, {pc4} AB Amsterdam"));
        l.rating = rating;
        l.review_count = reviews;
        if !category.is_empty() {
            l = l.with_category(category);
        }
        l
    }

    fn sample() -> Vec<Listing> {
        vec![
            listing("1012", Some(4.0), Some(120), "Bar"),
            listing("1012", Some(5.0), Some(30), "Cafe"),
            listing("1012", None, None, "Bar"),
            listing("1012", Some(3.0), Some(10), ""),
            listing("1072", Some(4.6), Some(200), "Thai"),
            listing("1072", Some(4.4), Some(80), "Thai"),
            listing("1072", Some(4.2), None, "Pizza"),
            listing("1091", Some(4.9), Some(5), "Sushi"),
        ]
    }

    #[test]
    fn test_summaries_respect_threshold_and_order() {
        let rows = district_summaries(&sample(), DEFAULT_MIN_LISTINGS);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pc4, "1012");
        assert_eq!(rows[0].count, 4);
        assert_eq!(rows[0].average_rating, 4.0);
        assert_eq!(rows[0].total_reviews, 160);
        assert_eq!(rows[0].category_diversity, 2);
        assert_eq!(rows[0].saturation, "Low");
        assert_eq!(rows[1].pc4, "1072");
        assert_eq!(rows[1].average_rating, 4.4);
    }

    #[test]
    fn test_summaries_tie_on_count_sorted_by_prefix() {
        let rows = district_summaries(&sample(), 1);
        let order: Vec<_> = rows.iter().map(|r| r.pc4.as_str()).collect();
        assert_eq!(order, vec!["1012", "1072", "1091"]);
    }

    #[test]
    fn test_profile_unknown_or_small_district() {
        assert!(district_profile(&sample(), "9999", 3).is_none());
        assert!(district_profile(&sample(), "1091", 3).is_none());
        assert!(district_profile(&sample(), "1091", 1).is_some());
    }

    #[test]
    fn test_profile_metrics() {
        let profile = district_profile(&sample(), "1012", 3).unwrap();

        assert_eq!(profile.count, 4);
        let ratings = profile.ratings.unwrap();
        assert_eq!(ratings.mean, 4.0);
        assert_eq!(ratings.median, 4.0);
        assert_eq!(ratings.min, 3.0);
        assert_eq!(ratings.max, 5.0);
        assert_eq!(profile.high_rated, 1);
        assert_eq!(profile.low_rated, 1);
        assert_eq!(profile.reviews.total, 160);
        assert_eq!(profile.reviews.high_engagement, 1);

        assert_eq!(profile.top_categories[0].category, "Bar");
        assert_eq!(profile.top_categories[0].count, 2);
        assert_eq!(profile.top_categories[0].percentage, 66.7);
        assert_eq!(profile.top_categories[1].category, "Cafe");
    }

    #[test]
    fn test_profile_percentiles_and_competition() {
        let profile = district_profile(&sample(), "1012", 3).unwrap();

        let ratings = profile.ratings.unwrap();
        assert_eq!(ratings.p25, 3.5);
        assert_eq!(ratings.p75, 4.5);
        assert_eq!(ratings.p90, 4.8);

        let concentration = profile.concentration.unwrap();
        assert_eq!(concentration.top_3_share, 100.0);
        assert!(concentration.is_concentrated);

        assert_eq!(profile.competition.saturation, "Low");
        assert_eq!(profile.competition.saturation_score, 0.4);
        assert_eq!(profile.competition.avg_competitors_per_category, 2.0);
        assert_eq!(profile.competition.competitive_intensity, "Low");
        assert_eq!(profile.competition.entry_barriers, "Low");

        // no price levels in the sample
        assert!(profile.prices.is_none());
        assert!(profile.positioning.is_none());
    }

    #[test]
    fn test_profile_benchmarks_against_city() {
        let profile = district_profile(&sample(), "1012", 3).unwrap();

        // district mean 4.0 vs city mean 4.3
        assert_eq!(profile.benchmarks.rating_diff, -0.3);
        assert_eq!(profile.benchmarks.reviews_diff, -20.8);
        assert_eq!(profile.benchmarks.rating_percentile, 29.0);

        let opportunities = &profile.opportunities;
        assert!(opportunities.underserved_categories.is_empty());
        assert_eq!(opportunities.quality_gap, 0.5);
        assert!(opportunities.has_quality_gap);
        assert_eq!(opportunities.market_potential, 6.1);
    }

    #[test]
    fn test_profile_prices_and_positioning() {
        let at = |rating: Option<f64>, price: &str| {
            let mut l = listing("1017", rating, Some(50), "Restaurant");
            l.price_level = Some(price.to_string());
            l
        };
        let listings = vec![
            at(Some(4.5), "€€€"),
            at(Some(4.4), "€€€€"),
            at(Some(4.3), "€€"),
            at(None, "$$"),
        ];

        let profile = district_profile(&listings, "1017", 3).unwrap();

        let prices = profile.prices.unwrap();
        assert_eq!(prices.average_price_level, 3.0);
        assert_eq!(prices.median_price_level, 3);
        assert_eq!(
            prices.distribution,
            PriceTiers {
                budget: 0,
                moderate: 1,
                upscale: 1,
                fine_dining: 1,
            }
        );
        assert_eq!(prices.affordability_score, 4.0);

        let positioning = profile.positioning.unwrap();
        assert_eq!(positioning.positioning, "Premium");
        assert_eq!(positioning.avg_rating, 4.4);
        assert_eq!(positioning.avg_price_level, 3.0);
        assert_eq!(positioning.quality_price_ratio, 1.47);

        // single category holding every listing
        assert_eq!(profile.competition.avg_competitors_per_category, 4.0);
        assert_eq!(profile.competition.competitive_intensity, "Medium");
        assert_eq!(profile.competition.entry_barriers, "Medium");
    }

    #[test]
    fn test_profile_underserved_categories() {
        let mut listings = vec![
            listing("1012", None, None, "Bar"),
            listing("1012", None, None, "Bar"),
            listing("1012", None, None, "Pizza"),
        ];
        listings.extend((0..10).map(|_| listing("1072", Some(4.0), None, "Thai")));
        listings.extend((0..10).map(|_| listing("1073", Some(4.0), None, "Pizza")));
        listings.extend((0..9).map(|_| listing("1074", Some(4.0), None, "Sushi")));

        let profile = district_profile(&listings, "1012", 3).unwrap();
        let opportunities = &profile.opportunities;

        assert_eq!(
            opportunities.underserved_categories,
            vec![UnderservedCategory {
                category: "Thai".to_string(),
                city_count: 10,
            }]
        );
        assert_eq!(opportunities.quality_gap, 4.5);
        assert_eq!(opportunities.market_potential, 8.8);

        // no ratings in the district
        assert_eq!(profile.benchmarks.rating_diff, 0.0);
        assert_eq!(profile.benchmarks.rating_percentile, 50.0);
    }

    #[test]
    fn test_profile_without_ratings() {
        let listings = vec![
            listing("1012", None, None, "Bar"),
            listing("1012", None, None, "Bar"),
            listing("1012", None, None, "Bar"),
        ];
        let profile = district_profile(&listings, "1012", 3).unwrap();
        assert!(profile.ratings.is_none());
        assert_eq!(profile.diversity_index, 0.0);
    }

    #[test]
    fn test_shannon_index_even_split() {
        let ranked = [("A", 1), ("B", 1)];
        assert_eq!(round_to(shannon_index(&ranked, 2), 2), 0.69);
    }
}
