//! District aggregation and summary analytics.
//!
//! This module groups listings by the PC4 prefix of their address, computes
//! per-district counts, ratings and category rankings, and maps counts onto
//! the choropleth legend used by the map.

pub mod aggregate;
pub mod density;
pub mod summary;
pub mod types;
pub mod utility;
