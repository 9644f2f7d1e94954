//! AI backends and prompts

pub mod gemini;
pub mod prompts;
