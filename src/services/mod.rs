// Service exports
pub mod export;
pub mod store;

pub use export::{export_rows, to_csv, to_json, ExportError, ExportRow};
pub use store::{DocumentStore, StoreDocument, StoreError, StoredSettings};
