//! Merges district statistics into a PC4 GeoJSON FeatureCollection.

use anyhow::{Result, bail};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::density::density_bucket;
use crate::analyzers::types::DistrictStats;
use crate::listing::ListingKind;
use crate::postcode::is_amsterdam;

/// Reads the PC4 code of a feature; accepts the normalised `pc4` property or
/// the `pc4_code` name used by the upstream dataset, as string or number.
fn feature_pc4(properties: &Map<String, Value>) -> Option<String> {
    let raw = properties.get("pc4").or_else(|| properties.get("pc4_code"))?;
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .map(|code| format!("{code:04}")),
        _ => None,
    }
}

/// Adds `count`, `avg_rating`, the kind-specific top-categories property and
/// `fill_color` to every kept feature.
///
/// For restaurants only Amsterdam districts (and features carrying a PC4) are
/// kept; farms keep every feature. Districts without listings get zero stats.
pub fn enrich_feature_collection(
    mut geojson: Value,
    stats: &BTreeMap<String, DistrictStats>,
    kind: ListingKind,
) -> Result<Value> {
    if geojson.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        bail!("GeoJSON input is not a FeatureCollection");
    }
    let Some(features) = geojson.get_mut("features").and_then(Value::as_array_mut) else {
        bail!("FeatureCollection has no features array");
    };

    let before = features.len();
    let top_key = kind.top_categories_property();

    features.retain_mut(|feature| {
        let Some(properties) = feature
            .as_object_mut()
            .map(|f| f.entry("properties").or_insert_with(|| json!({})))
            .and_then(Value::as_object_mut)
        else {
            return false;
        };

        let pc4 = feature_pc4(properties);
        if kind == ListingKind::Restaurants && !pc4.as_deref().is_some_and(is_amsterdam) {
            return false;
        }

        let district = pc4.as_deref().and_then(|pc4| stats.get(pc4));
        let (count, avg_rating, top) = match district {
            Some(d) => (d.count, d.average_rating, d.top_categories.clone()),
            None => (0, 0.0, Vec::new()),
        };

        if let Some(pc4) = pc4 {
            properties.insert("pc4".into(), Value::String(pc4));
        }
        properties.insert("count".into(), json!(count));
        properties.insert("avg_rating".into(), json!(avg_rating));
        properties.insert(top_key.into(), json!(top));
        properties.insert("fill_color".into(), json!(density_bucket(count).fill_color()));
        true
    });

    debug!(kind = %kind, before, after = features.len(), "GeoJSON features enriched");
    Ok(geojson)
}
