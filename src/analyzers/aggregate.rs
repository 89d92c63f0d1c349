use crate::analyzers::types::{DistrictReport, DistrictStats};
use crate::analyzers::utility::{mean, round_to};
use crate::listing::Listing;
use crate::postcode::extract_pc4;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

/// Number of categories kept per district.
pub const TOP_CATEGORIES: usize = 3;

/// Groups listings by the PC4 prefix in their address and summarises each group.
///
/// Listings without an address or without a recognisable postcode are skipped.
/// The average rating only covers listings that carry a rating and is 0 when
/// none do. Category ties keep the order in which categories were first seen.
pub fn aggregate(listings: &[Listing]) -> BTreeMap<String, DistrictStats> {
    group_by_pc4(listings)
        .into_iter()
        .map(|(pc4, group)| {
            let stats = district_stats(pc4, &group);
            (pc4.to_string(), stats)
        })
        .collect()
}

/// Aggregates `listings` and wraps the result with generation metadata.
pub fn district_report(listings: &[Listing]) -> DistrictReport {
    let districts = aggregate(listings);
    let counted: usize = districts.values().map(|d| d.count).sum();

    DistrictReport {
        schema_version: 1,
        generated_at: Utc::now(),
        total_listings: listings.len(),
        skipped: listings.len() - counted,
        districts,
    }
}

/// Partitions listings by PC4 prefix, dropping those without one.
pub fn group_by_pc4(listings: &[Listing]) -> BTreeMap<&str, Vec<&Listing>> {
    let mut groups: BTreeMap<&str, Vec<&Listing>> = BTreeMap::new();

    for listing in listings {
        let Some(pc4) = listing.address.as_deref().and_then(extract_pc4) else {
            continue;
        };
        groups.entry(pc4).or_default().push(listing);
    }

    groups
}

fn district_stats(pc4: &str, group: &[&Listing]) -> DistrictStats {
    let ratings: Vec<f64> = group.iter().filter_map(|l| l.rating_value()).collect();

    let top_categories = rank_categories(group.iter().copied())
        .into_iter()
        .take(TOP_CATEGORIES)
        .map(|(name, _)| name.to_string())
        .collect();

    DistrictStats {
        postal_prefix: pc4.to_string(),
        count: group.len(),
        average_rating: round_to(mean(&ratings), 2),
        top_categories,
    }
}

/// Counts categories and orders them by descending frequency.
///
/// Equal counts keep first-encountered order; listings without a category
/// are not counted.
pub fn rank_categories<'a>(listings: impl IntoIterator<Item = &'a Listing>) -> Vec<(&'a str, usize)> {
    let mut tally: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for category in listings.into_iter().filter_map(Listing::category_name) {
        match index.get(category) {
            Some(&i) => tally[i].1 += 1,
            None => {
                index.insert(category, tally.len());
                tally.push((category, 1));
            }
        }
    }

    // stable sort: ties stay in first-seen order
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}
