use serde::Serialize;

/// Choropleth legend bucket for the number of listings in a district.
///
/// | Count   | Bucket    | Fill      |
/// |---------|-----------|-----------|
/// | > 50    | VeryHigh  | `#800026` |
/// | > 20    | High      | `#BD0026` |
/// | > 10    | Elevated  | `#E31A1C` |
/// | > 5     | Moderate  | `#FC4E2A` |
/// | > 2     | Low       | `#FD8D3C` |
/// | > 0     | Sparse    | `#FEB24C` |
/// | 0       | Empty     | `#FFEDA0` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityBucket {
    VeryHigh,
    High,
    Elevated,
    Moderate,
    Low,
    Sparse,
    Empty,
}

impl DensityBucket {
    pub fn fill_color(self) -> &'static str {
        match self {
            DensityBucket::VeryHigh => "#800026",
            DensityBucket::High => "#BD0026",
            DensityBucket::Elevated => "#E31A1C",
            DensityBucket::Moderate => "#FC4E2A",
            DensityBucket::Low => "#FD8D3C",
            DensityBucket::Sparse => "#FEB24C",
            DensityBucket::Empty => "#FFEDA0",
        }
    }
}

pub fn density_bucket(count: usize) -> DensityBucket {
    match count {
        c if c > 50 => DensityBucket::VeryHigh,
        c if c > 20 => DensityBucket::High,
        c if c > 10 => DensityBucket::Elevated,
        c if c > 5 => DensityBucket::Moderate,
        c if c > 2 => DensityBucket::Low,
        c if c > 0 => DensityBucket::Sparse,
        _ => DensityBucket::Empty,
    }
}

/// Market saturation label used by the district summary.
pub fn saturation(count: usize) -> &'static str {
    match count {
        c if c > 50 => "High",
        c if c > 20 => "Medium",
        _ => "Low",
    }
}

/// Competition label from the average number of listings per category.
pub fn competitive_intensity(per_category: f64) -> &'static str {
    match per_category {
        c if c > 5.0 => "High",
        c if c > 2.0 => "Medium",
        _ => "Low",
    }
}

/// How hard it is for a new listing to enter the district.
pub fn entry_barriers(count: usize, per_category: f64) -> &'static str {
    if count > 50 || per_category > 5.0 {
        "High"
    } else if count > 20 || per_category > 3.0 {
        "Medium"
    } else {
        "Low"
    }
}

/// Quality versus price label; `avg_price` is on the 1 (`€`) to 4 (`€€€€`) scale.
pub fn market_positioning(avg_rating: f64, avg_price: f64) -> &'static str {
    match (avg_rating, avg_price) {
        (r, p) if r >= 4.3 && p >= 2.5 => "Premium",
        (r, _) if r >= 4.3 => "Value Premium",
        (r, p) if r < 4.0 && p >= 2.5 => "Overpriced",
        _ => "Budget Casual",
    }
}
