//! Core data types for the sale record store
//!
//! - `SaleRecord`: One product transaction entry
//! - `DateRange`: Half-open instant interval used for sale-date matching
//! - `PriceRange`: Half-open price interval used for bucket counting
//! - `RecordFilter`: Conjunction of the above plus text and sold-flag matching

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single product sale record
///
/// Created in bulk by the seed import and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Identifier assigned by the upstream catalog
    pub id: String,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    /// Low-cardinality category label (e.g. "electronics")
    #[serde(default)]
    pub category: String,
    /// Image URI
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sold: bool,
    /// Sale instant; `None` when the source date was missing or unparseable
    #[serde(default)]
    pub date_of_sale: Option<DateTime<Utc>>,
}

impl SaleRecord {
    /// Create a record with required fields; everything else is empty/unsold/undated
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            sold: false,
            date_of_sale: None,
        }
    }

    /// Builder: set description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: set image URI
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Builder: set sold flag
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Builder: set sale date
    pub fn sold_on(mut self, date: DateTime<Utc>) -> Self {
        self.date_of_sale = Some(date);
        self
    }

    /// Textual form of the price as matched by text search
    ///
    /// Shortest decimal that round-trips: `100.0` renders as `100`,
    /// `329.85` as `329.85`.
    pub fn price_text(&self) -> String {
        price_text(self.price)
    }

    /// Case-insensitive substring match over title, description and price text.
    ///
    /// `needle` must already be lowercased. An empty needle matches everything.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.price_text().contains(needle)
    }
}

/// Render a price the way text search sees it
pub fn price_text(price: f64) -> String {
    format!("{}", price)
}

/// Instant range for sale-date queries (half-open interval: [start, end))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Start instant (inclusive)
    pub start: DateTime<Utc>,
    /// End instant (exclusive)
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, returning None if start >= end
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Check if an instant falls within this range
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Start as epoch milliseconds
    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    /// End as epoch milliseconds
    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }
}

/// Price interval: [min, max), or [min, ∞) when `max` is None
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: f64, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price < max)
    }
}

/// Record filter; every populated part must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Case-insensitive substring over title, description, price text
    pub text: Option<String>,
    /// Sale date window; undated records never match
    pub sold_within: Option<DateRange>,
    /// Price interval
    pub price: Option<PriceRange>,
    /// Sold flag
    pub sold: Option<bool>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by search text. Empty text is treated as no filter.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = if text.is_empty() { None } else { Some(text) };
        self
    }

    pub fn sold_within(mut self, range: DateRange) -> Self {
        self.sold_within = Some(range);
        self
    }

    pub fn price(mut self, range: PriceRange) -> Self {
        self.price = Some(range);
        self
    }

    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    /// Lowercased search needle, if any
    pub fn needle(&self) -> Option<String> {
        self.text.as_ref().map(|t| t.to_lowercase())
    }

    /// Check if a record matches this filter
    pub fn matches(&self, record: &SaleRecord) -> bool {
        if let Some(needle) = self.needle() {
            if !record.matches_text(&needle) {
                return false;
            }
        }

        if let Some(range) = self.sold_within {
            match record.date_of_sale {
                Some(date) if range.contains(date) => {}
                _ => return false,
            }
        }

        if let Some(range) = self.price {
            if !range.contains(record.price) {
                return false;
            }
        }

        if let Some(sold) = self.sold {
            if record.sold != sold {
                return false;
            }
        }

        true
    }
}

/// Number of records sharing one category value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}
