//! Domain services

pub mod boq_calculator;

#[cfg(test)]
mod proptest_boq;

pub use boq_calculator::{
    compute, round_to, validate_input, MaterialKind, MAX_FLOORS, MAX_LINEAR_M, MAX_WALL_HEIGHT_M,
};
