//! Application use cases

pub mod boq_service;

pub use boq_service::{AnalysisOptions, BoqService};
