//! Prompt templates for deliberation personas
//!
//! System instructions are fixed per persona; user prompts are minijinja
//! templates rendered from the current context bundle. Rendering is the only
//! fallible step and surfaces as a template error, never a panic.

pub mod system;
pub mod user;

use crate::error::Result;
use minijinja::Environment;

/// Render a template source against a context value
pub(crate) fn render(source: &str, ctx: minijinja::Value) -> Result<String> {
    let env = Environment::new();
    Ok(env.render_str(source, ctx)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_render_interpolates() {
        let out = render("Analyze {{ ticker }}", context! { ticker => "AAPL" }).expect("render");
        assert_eq!(out, "Analyze AAPL");
    }

    #[test]
    fn test_render_conditional_block() {
        let src = "base{% if extra %} plus {{ extra }}{% endif %}";
        let with = render(src, context! { extra => "more" }).expect("render");
        let without = render(src, context! {}).expect("render");
        assert_eq!(with, "base plus more");
        assert_eq!(without, "base");
    }
}
