use std::fs;
use std::path::Path;
use tracing::debug;

use crate::app::ports::DocumentStorePort;
use crate::error::Result;

/// File-based implementation of DocumentStorePort
pub struct FsDocumentStore;

impl FsDocumentStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStorePort for FsDocumentStore {
    fn read_document(&self, location: &Path) -> Result<String> {
        let raw = fs::read_to_string(location)?;
        debug!("Read {} bytes from {}", raw.len(), location.display());
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.txt");
        fs::write(&path, "1;2\n").unwrap();

        assert_eq!(FsDocumentStore::new().read_document(&path).unwrap(), "1;2\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsDocumentStore::new().read_document(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(crate::error::ConsolidatorError::Io(_))));
    }
}
