pub mod app;
pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;
pub mod logging;
pub mod observability;
pub mod pipeline;

pub use domain::{ConsolidatedRecord, ConsolidatedSet, NormalizedRecord, SourceBatch, SourceGroup, TitleLookup};
pub use error::{ConsolidatorError, Result};
