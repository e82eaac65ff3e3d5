// Pipeline processing: format normalization, consolidation and serialization

pub mod normalize;
pub mod consolidation;
pub mod serialize;

// Re-export key types and functions
pub use consolidation::{Consolidator, RunningAverageConsolidator};
pub use normalize::{NormalizationRegistry, NormalizeOutcome, SourceDocument, SourceFormat};
pub use serialize::{render_document, serialize, SerializeOutcome};
