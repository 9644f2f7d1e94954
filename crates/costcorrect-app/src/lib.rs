//! Application service layer - config, plan validation, access gate, export, BOQ use cases

pub mod access;
pub mod app;
pub mod config;
pub mod export;
pub mod scanner;
