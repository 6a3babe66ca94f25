//! Analysis pipeline.
//!
//! Scoring and grouping helpers, per-dimension analysis, ROI projection,
//! result assembly and the orchestrator that runs them in order.

pub mod aggregator;
pub mod assembler;
pub mod dimension;
pub mod orchestrator;
pub mod roi;
pub mod scoring;

pub use orchestrator::AssessmentOrchestrator;
