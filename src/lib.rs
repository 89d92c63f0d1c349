pub mod analyzers;
pub mod fetch;
pub mod filter;
pub mod geo;
pub mod listing;
pub mod output;
pub mod parser;
pub mod postcode;
pub mod state;
pub mod stats;

pub use analyzers::aggregate::aggregate;
pub use analyzers::types::DistrictStats;
pub use listing::{Listing, ListingKind};
