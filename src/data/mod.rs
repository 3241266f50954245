//! Data module - CSV loading and schema normalization

mod loader;
mod normalizer;
mod table;

pub use loader::{DataLoader, LoaderError};
pub use normalizer::{
    parse_count, parse_date, Canonical, ColumnMapping, MappingEntry, NormalizeError,
    SchemaNormalizer,
};
pub use table::{CountrySeries, Metric, Ranking, RawRecord, Record, Snapshot, Table, View};
