use std::path::PathBuf;

use crate::app::ports::ConsolidationOutputPort;
use crate::domain::ConsolidatedSet;
use crate::pipeline::processing::serialize::{serialize, SerializeOutcome};

/// Writes the consolidated set as an XML document to a fixed destination.
/// Without a destination every write is a no-op.
pub struct XmlFileOutputAdapter {
    destination: Option<PathBuf>,
}

impl XmlFileOutputAdapter {
    pub fn new(destination: Option<PathBuf>) -> Self {
        Self { destination }
    }
}

impl ConsolidationOutputPort for XmlFileOutputAdapter {
    fn write_consolidated(&self, records: &ConsolidatedSet) -> SerializeOutcome {
        serialize(records, self.destination.as_deref())
    }
}
