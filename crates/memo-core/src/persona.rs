//! Core Persona trait definition

use crate::{ContextBundle, Result};
use async_trait::async_trait;

/// Core trait that all personas implement
///
/// A persona is a named analytical role (bull researcher, chief strategist,
/// conservative risk analyst, ...) invoked against a text-generation service.
/// Its output is untrusted natural language with no guaranteed structure;
/// any structure is recovered downstream by the extraction engine.
#[async_trait]
pub trait Persona: Send + Sync {
    /// Produce free-form analysis text for the given context bundle
    ///
    /// The bundle carries every named fact the persona may use (ticker,
    /// snapshots, upstream analyses, counter-arguments). Implementations
    /// must not mutate it; stages derive extended bundles instead.
    async fn analyze(&self, context: &ContextBundle) -> Result<String>;

    /// Get the persona's name
    fn name(&self) -> &str;
}
