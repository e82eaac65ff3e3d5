// Application layer: the run use case and the ports it drives

pub mod consolidation_use_case;
pub mod ports;

pub use consolidation_use_case::{ConsolidationUseCase, RunReport, SourceReport, SourceStatus};
