//! Tabular input port trait.

use crate::domain::error::EtlError;

/// A source of import rows. Each row is a list of cell texts in file
/// column order; the header row is not included.
pub trait RowSourcePort {
    fn read_rows(&self) -> Result<Vec<Vec<String>>, EtlError>;
}
