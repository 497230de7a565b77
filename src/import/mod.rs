//! Seed import
//!
//! Loads the public sale-record feed into the record store, replacing
//! whatever was there. Used by the `/api/transactions/seed` endpoint, the
//! server's optional seed-on-empty startup step and `salesboard-cli`.

pub mod error;
pub mod record;
pub mod seed;

pub use error::{ImportError, ImportResult};
pub use record::{parse_sale_date, sale_date_value, RawSaleRecord};
pub use seed::{import_file, store_records, ImportReport, SeedImporter};
