// Data processing pipeline: decoded documents in, consolidated document out

pub mod processing;

// Re-export key types and functions from each stage
pub use processing::{consolidation, normalize, serialize};
