//! Memory insight persona

use super::PersonaClient;
use crate::prompts::system;
use memo_core::Result;

/// Persona that turns retrieved precedents into guidance text
///
/// Unlike the pipeline personas, the memory subsystem builds its prompts
/// itself (one per insight mode), so this persona exposes the raw prompt
/// surface instead of implementing `Persona` over a bundle.
pub struct MemoryAnalyst {
    client: PersonaClient,
}

impl MemoryAnalyst {
    /// Create a new memory analyst
    pub fn new(client: PersonaClient) -> Self {
        Self { client }
    }

    /// Generate insight text for a fully rendered prompt
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate("MemoryAnalyst", system::MEMORY_ANALYST, prompt)
            .await
    }
}
