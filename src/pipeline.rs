//! Load and normalize in one step.

use crate::data::{ColumnMapping, DataLoader, LoaderError, NormalizeError, SchemaNormalizer, Table};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl PipelineError {
    /// Missing required columns, as opposed to IO or parse failures.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, PipelineError::Normalize(NormalizeError::MissingColumns(_)))
    }
}

/// Read the source file and build the canonical table.
pub fn load_table(path: impl AsRef<Path>, mapping: &ColumnMapping) -> Result<Table, PipelineError> {
    let raw = DataLoader::load_csv(path)?;
    let table = SchemaNormalizer::normalize(raw, mapping)?;
    Ok(table)
}
