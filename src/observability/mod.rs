// Observability: metrics recording per pipeline phase

pub mod metrics;
