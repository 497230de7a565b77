//! Raw seed records and their conversion into `SaleRecord`s
//!
//! The seed feed is loosely typed: ids arrive as strings or numbers and
//! `dateOfSale` may be a string, epoch milliseconds, missing, null or
//! garbage of any JSON type. Anything that does not
//! parse as a date becomes `None` rather than failing the import.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::storage::SaleRecord;

/// One element of the seed JSON array, as received
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSaleRecord {
    pub id: Value,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    pub sold: bool,
    pub date_of_sale: Value,
}

impl RawSaleRecord {
    /// Convert into a stored record; `position` stands in for a missing id
    pub fn into_record(self, position: usize) -> SaleRecord {
        let id = normalize_id(&self.id).unwrap_or_else(|| position.to_string());
        let date_of_sale = sale_date_value(&self.date_of_sale);

        let mut record = SaleRecord::new(id, self.title, self.price)
            .description(self.description)
            .category(self.category)
            .image(self.image)
            .sold(self.sold);
        record.date_of_sale = date_of_sale;
        record
    }
}

/// Ids may be strings or numbers; anything else counts as missing
pub fn normalize_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a `dateOfSale` of any JSON type
///
/// Strings go through [`parse_sale_date`], numbers are epoch milliseconds.
pub fn sale_date_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_sale_date(s),
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => ms,
                None => {
                    let ms = n.as_f64().filter(|f| f.is_finite())?;
                    if ms < i64::MIN as f64 || ms > i64::MAX as f64 {
                        return None;
                    }
                    ms as i64
                }
            };
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

/// Parse a sale date, returning None for anything unrecognized
///
/// Accepts RFC 3339, ISO 8601 without offset (read as UTC), a
/// space-separated date-time, and a bare date (midnight UTC).
pub fn parse_sale_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a seed payload into raw records
pub fn parse_payload(bytes: &[u8]) -> Result<Vec<RawSaleRecord>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 11, 27, 20, 29, 54).unwrap();

        assert_eq!(
            parse_sale_date("2021-11-27T20:29:54+05:30").unwrap(),
            Utc.with_ymd_and_hms(2021, 11, 27, 14, 59, 54).unwrap()
        );
        assert_eq!(parse_sale_date("2021-11-27T20:29:54Z").unwrap(), expected);
        assert_eq!(parse_sale_date("2021-11-27T20:29:54").unwrap(), expected);
        assert_eq!(parse_sale_date("2021-11-27 20:29:54").unwrap(), expected);
        assert_eq!(parse_sale_date("2021-11-27T20:29:54.000").unwrap(), expected);
        assert_eq!(
            parse_sale_date("2021-11-27").unwrap(),
            Utc.with_ymd_and_hms(2021, 11, 27, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unparseable_dates_become_none() {
        for raw in ["", "   ", "not a date", "2021-13-45", "27/11/2021"] {
            assert!(parse_sale_date(raw).is_none(), "{:?} parsed", raw);
        }
    }

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        assert_eq!(normalize_id(&Value::from(7)), Some("7".to_string()));
        assert_eq!(normalize_id(&Value::from("abc")), Some("abc".to_string()));
        assert_eq!(normalize_id(&Value::Null), None);
        assert_eq!(normalize_id(&Value::from("")), None);
    }

    #[test]
    fn test_payload_conversion() {
        let payload = br#"[
            {"id": 1, "title": "Fjallraven Backpack", "price": 329.85,
             "description": "Your perfect pack", "category": "men's clothing",
             "image": "https://example.com/1.jpg", "sold": false,
             "dateOfSale": "2021-11-27T20:29:54+05:30"},
            {"title": "Mystery Box", "price": 12, "dateOfSale": null},
            {"id": "x-3", "title": "Broken Date", "price": 5, "sold": true,
             "dateOfSale": "yesterday"}
        ]"#;

        let records: Vec<SaleRecord> = parse_payload(payload)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_record(i + 1))
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].category, "men's clothing");
        assert!(records[0].date_of_sale.is_some());

        assert_eq!(records[1].id, "2");
        assert_eq!(records[1].price, 12.0);
        assert!(!records[1].sold);
        assert!(records[1].date_of_sale.is_none());

        assert_eq!(records[2].id, "x-3");
        assert!(records[2].sold);
        assert!(records[2].date_of_sale.is_none());
    }

    #[test]
    fn test_sale_date_of_any_json_type() {
        let april = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap();

        assert_eq!(sale_date_value(&Value::from("2023-04-01")), Some(april));
        assert_eq!(sale_date_value(&Value::from(1_680_307_200_000_i64)), Some(april));
        assert_eq!(sale_date_value(&Value::from(1_680_307_200_000.0)), Some(april));
        assert_eq!(sale_date_value(&Value::from(true)), None);
        assert_eq!(sale_date_value(&Value::Null), None);
        assert_eq!(sale_date_value(&serde_json::json!({"$date": "2023-04-01"})), None);
        assert_eq!(sale_date_value(&serde_json::json!(["2023-04-01"])), None);
        assert_eq!(sale_date_value(&Value::from(u64::MAX)), None);
    }

    #[test]
    fn test_mixed_date_types_do_not_fail_the_payload() {
        let payload = br#"[
            {"id": 1, "title": "A", "price": 1, "dateOfSale": "2023-04-01"},
            {"id": 2, "title": "B", "price": 2, "dateOfSale": 1680307200000},
            {"id": 3, "title": "C", "price": 3, "dateOfSale": {"when": "soon"}},
            {"id": 4, "title": "D", "price": 4, "dateOfSale": false}
        ]"#;

        let records: Vec<SaleRecord> = parse_payload(payload)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_record(i + 1))
            .collect();

        let april = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].date_of_sale, Some(april));
        assert_eq!(records[1].date_of_sale, Some(april));
        assert!(records[2].date_of_sale.is_none());
        assert!(records[3].date_of_sale.is_none());
    }

    #[test]
    fn test_payload_must_be_an_array() {
        assert!(parse_payload(br#"{"id": 1}"#).is_err());
    }
}
