//! CSV loading and export of feedback datasets, plus the cache that memoizes loads.

pub mod cache;
pub mod csv_io;

mod error;

pub use cache::{DatasetCache, SourceKey};
pub use csv_io::{Schema, UTF8_BOM, load_bytes, load_path, load_reader, write_csv, write_csv_bytes};
pub use error::{Error, Result};
