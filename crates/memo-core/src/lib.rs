//! Core abstractions for memo-rs
//!
//! This crate defines the fundamental traits and types shared by the
//! deliberation pipeline: the `Persona` trait, the additive `ContextBundle`,
//! and the core error type.

pub mod bundle;
pub mod error;
pub mod persona;

pub use bundle::ContextBundle;
pub use error::{Error, Result};
pub use persona::Persona;
