//! Domain model types

pub mod boq_input;
pub mod brick_constants;

pub use boq_input::BoqInput;
pub use brick_constants::BrickConstants;
