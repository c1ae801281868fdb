//! Style synthesis for a component.

use tracing::debug;

use crate::FxIndexMap;
use crate::engine::{EngineError, GenerateOptions, Shortcut, ShortcutsGuard, StyleEngine};

mod style_block;
mod wrap_global;

pub use style_block::{add_generated_styles, style_insertion};
pub use wrap_global::wrap_selectors_with_global;

/// Generate the CSS for a component's generated class names and referenced shortcuts.
///
/// Each generated name is registered as a shortcut expanding to its tokens
/// for the duration of the call. The engine's shortcuts table is identical
/// before and after, whether generation succeeds or not.
pub fn generate_styles<E: StyleEngine + ?Sized>(
    engine: &mut E,
    rules_to_generate: &FxIndexMap<String, Vec<String>>,
    shortcuts: &[String],
) -> Result<String, EngineError> {
    let component_shortcuts = rules_to_generate
        .iter()
        .map(|(name, tokens)| Shortcut::new(name.clone(), tokens.iter().cloned()));
    let guard = ShortcutsGuard::extend(engine, component_shortcuts);

    let selectors: Vec<String> = rules_to_generate.keys().chain(shortcuts).cloned().collect();
    debug!(selectors = selectors.len(), "generating component styles");

    guard.engine().generate(&selectors, &GenerateOptions::component())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::mock_engine;
    use crate::engine::{ParsedUtil, StaticEngine};

    fn rules(entries: &[(&str, &[&str])]) -> FxIndexMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, tokens)| (name.to_string(), tokens.iter().map(ToString::to_string).collect()))
            .collect()
    }

    #[test]
    fn test_generates_combined_rule() {
        let mut engine = mock_engine();
        let css = generate_styles(&mut engine, &rules(&[("uno-07jvco", &["mb-1", "mr-1"])]), &[]).unwrap();
        assert_eq!(css, ".uno-07jvco{margin-bottom:0.25rem;margin-right:0.25rem;}");
    }

    #[test]
    fn test_generates_referenced_shortcuts() {
        let mut engine = StaticEngine::new()
            .with_utility("mb-1", "margin-bottom:0.25rem")
            .with_utility("px-1", "padding-left:0.25rem;padding-right:0.25rem")
            .with_shortcut("btn", ["px-1"]);
        let css = generate_styles(&mut engine, &rules(&[("_mb-1_7dkb0w", &["mb-1"])]), &["btn".to_string()]).unwrap();
        assert_eq!(
            css,
            "._mb-1_7dkb0w{margin-bottom:0.25rem;}.btn{padding-left:0.25rem;padding-right:0.25rem;}"
        );
    }

    #[test]
    fn test_shortcuts_table_is_restored() {
        let mut engine = mock_engine();
        let before = engine.shortcuts().to_vec();
        generate_styles(&mut engine, &rules(&[("uno-07jvco", &["mb-1", "mr-1"])]), &[]).unwrap();
        assert_eq!(engine.shortcuts(), before.as_slice());
    }

    /// Delegates to [`StaticEngine`] but fails every generation.
    struct BrokenGenerator(StaticEngine);

    impl StyleEngine for BrokenGenerator {
        fn resolve_token(&self, token: &str) -> Result<Option<Vec<ParsedUtil>>, EngineError> {
            self.0.resolve_token(token)
        }

        fn shortcuts(&self) -> &[Shortcut] {
            self.0.shortcuts()
        }

        fn shortcuts_mut(&mut self) -> &mut Vec<Shortcut> {
            self.0.shortcuts_mut()
        }

        fn generate(&self, _: &[String], _: &GenerateOptions) -> Result<String, EngineError> {
            assert!(self.is_shortcut("uno-07jvco"), "component shortcut is registered during generation");
            Err(EngineError::new("generation failed"))
        }
    }

    #[test]
    fn test_shortcuts_table_is_restored_after_failure() {
        let mut engine = BrokenGenerator(mock_engine());
        let before = engine.shortcuts().to_vec();
        let err = generate_styles(&mut engine, &rules(&[("uno-07jvco", &["mb-1", "mr-1"])]), &[]).unwrap_err();
        assert_eq!(err.message(), "generation failed");
        assert_eq!(engine.shortcuts(), before.as_slice());
    }
}
