//! Price bucket table for the bar-chart histogram
//!
//! Ten fixed, contiguous buckets covering `[0, ∞)`. Each label names the
//! integer range it covers ("101-200"); the effective interval is
//! `[lower, next lower)`, so fractional prices such as 100.5 stay in the
//! lower bucket and no price between two labels is dropped.

use crate::storage::PriceRange;

/// Upper edge of a price bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpperBound {
    /// Prices strictly below this value belong to the bucket
    Exclusive(f64),
    /// No upper edge
    Unbounded,
}

/// One histogram bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    /// Display label, also the `range` field of the response
    pub label: &'static str,
    /// Inclusive lower edge
    pub lower: f64,
    /// Upper edge (exclusive or unbounded)
    pub upper: UpperBound,
}

impl PriceBucket {
    const fn bounded(label: &'static str, lower: f64, next_lower: f64) -> Self {
        Self {
            label,
            lower,
            upper: UpperBound::Exclusive(next_lower),
        }
    }

    /// Check if a price falls in this bucket
    pub fn contains(&self, price: f64) -> bool {
        self.price_range().contains(price)
    }

    /// As a store price filter
    pub fn price_range(&self) -> PriceRange {
        match self.upper {
            UpperBound::Exclusive(max) => PriceRange::new(self.lower, Some(max)),
            UpperBound::Unbounded => PriceRange::new(self.lower, None),
        }
    }
}

/// The fixed bucket table, in response order
pub static PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket::bounded("0-100", 0.0, 101.0),
    PriceBucket::bounded("101-200", 101.0, 201.0),
    PriceBucket::bounded("201-300", 201.0, 301.0),
    PriceBucket::bounded("301-400", 301.0, 401.0),
    PriceBucket::bounded("401-500", 401.0, 501.0),
    PriceBucket::bounded("501-600", 501.0, 601.0),
    PriceBucket::bounded("601-700", 601.0, 701.0),
    PriceBucket::bounded("701-800", 701.0, 801.0),
    PriceBucket::bounded("801-900", 801.0, 901.0),
    PriceBucket {
        label: "901-above",
        lower: 901.0,
        upper: UpperBound::Unbounded,
    },
];

/// The bucket a price belongs to; None only for negative or NaN prices
pub fn bucket_for(price: f64) -> Option<&'static PriceBucket> {
    PRICE_BUCKETS.iter().find(|b| b.contains(price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_contiguous() {
        assert_eq!(PRICE_BUCKETS[0].lower, 0.0);

        for pair in PRICE_BUCKETS.windows(2) {
            assert_eq!(pair[0].upper, UpperBound::Exclusive(pair[1].lower));
        }

        assert_eq!(PRICE_BUCKETS[9].upper, UpperBound::Unbounded);
    }

    #[test]
    fn test_boundary_prices_land_in_exactly_one_bucket() {
        let edges = [
            0.0, 100.0, 100.5, 101.0, 200.0, 201.0, 300.99, 400.0, 500.0, 600.0, 700.0, 800.0,
            900.0, 900.5, 901.0, 999.0, 1e12,
        ];

        for price in edges {
            let hits = PRICE_BUCKETS.iter().filter(|b| b.contains(price)).count();
            assert_eq!(hits, 1, "price {} matched {} buckets", price, hits);
        }
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(bucket_for(100.0).unwrap().label, "0-100");
        assert_eq!(bucket_for(101.0).unwrap().label, "101-200");
        assert_eq!(bucket_for(900.0).unwrap().label, "801-900");
        assert_eq!(bucket_for(901.0).unwrap().label, "901-above");
        assert_eq!(bucket_for(100.5).unwrap().label, "0-100");
    }

    #[test]
    fn test_negative_and_nan_prices_have_no_bucket() {
        assert!(bucket_for(-0.01).is_none());
        assert!(bucket_for(f64::NAN).is_none());
    }
}
