//! Critique Core Library
//!
//! Single-image quality assessment: statistical metrics over a decoded
//! raster, tier classification against configurable thresholds, weighted
//! overall scoring, and natural-language report generation.

pub mod config;
pub mod decoders;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod raster;
pub mod recommend;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use config::{
    load_assessment_config, AssessmentConfig, AssessmentConfigHandle, ThresholdTable, WeightTable,
};
pub use error::{AssessError, Result};
pub use models::{
    AssessmentReport, MetricKind, MetricResult, OverallResult, ResolutionResult, Tier,
    METRIC_ORDER,
};
pub use pipeline::Assessor;
pub use raster::Raster;
pub use report::{render_json, render_text};
