// Adapters layer: concrete implementations for external systems (workbook decoding, embedded store, http).

pub mod http;
pub mod spreadsheet;
pub mod store;
