//! Domain module containing the brick constants and the BOQ calculator

pub mod model;
pub mod service;

pub use model::*;
pub use service::{compute, validate_input};
