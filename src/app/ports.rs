use std::path::Path;

use crate::domain::ConsolidatedSet;
use crate::error::Result;
use crate::pipeline::processing::serialize::SerializeOutcome;

/// Supplies the raw text of a source document
pub trait DocumentStorePort: Send + Sync {
    fn read_document(&self, location: &Path) -> Result<String>;
}

/// Receives the finished consolidated set
pub trait ConsolidationOutputPort: Send + Sync {
    fn write_consolidated(&self, records: &ConsolidatedSet) -> SerializeOutcome;
}
