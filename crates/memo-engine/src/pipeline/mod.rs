//! Deliberation pipelines and the consistency gate

pub mod advanced;
pub mod basic;
pub mod engine;
pub mod validate;

pub use advanced::AdvancedPipeline;
pub use basic::{BasicPipeline, DEFAULT_CONFIDENCE, DEFAULT_POSITION_SIZE};
pub use engine::DeliberationEngine;
pub use validate::validate_memo;
