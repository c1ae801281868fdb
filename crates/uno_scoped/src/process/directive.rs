use tracing::trace;

use super::{ProcessResult, TokenClass, classify};
use crate::engine::StyleEngine;
use crate::finder::{ClassKind, FoundClass};
use crate::naming::generate_class_name;
use crate::rewrite::Patch;
use crate::{FxIndexMap, TransformClassesOptions};

/// Rewrite the name of a `class:name` directive.
///
/// `class:mb-1={on}` becomes `class:{generated}={on}`. The shorthand
/// `class:active` binds a variable of the same name, so it becomes
/// `class:{generated}={active}`. Names that are neither a utility nor a
/// shortcut are left alone.
pub fn process_directive<E: StyleEngine + ?Sized>(
    found: &FoundClass,
    options: &TransformClassesOptions,
    engine: &E,
    filename: &str,
) -> ProcessResult {
    let name = found.body.as_str();
    let class = classify(engine, name);
    trace!(directive = name, ?class, "classified directive");
    if class == TokenClass::Unresolved {
        return ProcessResult::default();
    }

    let generated = generate_class_name(name, options, filename);
    let content = if found.kind == ClassKind::DirectiveShorthand {
        format!("{generated}={{{name}}}")
    } else {
        generated.clone()
    };

    let mut rules_to_generate = FxIndexMap::default();
    rules_to_generate.insert(generated, vec![name.to_string()]);

    ProcessResult {
        rules_to_generate,
        code_update: Some(Patch::new(found.span, content)),
        shortcuts: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::mock_engine;
    use crate::find_classes;

    fn process(source: &str, options: &TransformClassesOptions) -> ProcessResult {
        let found = find_classes(source);
        assert_eq!(found.len(), 1, "{found:?}");
        process_directive(&found[0], options, &mock_engine(), "Foo.svelte")
    }

    #[test]
    fn test_directive_with_expression() {
        let result = process(r"<div class:mb-1={open}></div>", &TransformClassesOptions::new());
        assert_eq!(result.rules_to_generate["uno-2se4c1"], ["mb-1"]);
        let update = result.code_update.unwrap();
        assert_eq!(update.content, "uno-2se4c1");
        assert_eq!((update.span.start, update.span.end), (11, 15));
    }

    #[test]
    fn test_shorthand_keeps_bound_variable() {
        let result = process(r"<div class:mb-1></div>", &TransformClassesOptions::new().with_combine(false));
        assert_eq!(result.rules_to_generate["_mb-1_7dkb0w"], ["mb-1"]);
        assert_eq!(result.code_update.unwrap().content, "_mb-1_7dkb0w={mb-1}");
    }

    #[test]
    fn test_shortcut_directive_is_rewritten() {
        let result = process(r"<div class:my-shortcut={on}></div>", &TransformClassesOptions::new());
        assert_eq!(result.rules_to_generate["uno-jryqbp"], ["my-shortcut"]);
        assert_eq!(result.code_update.unwrap().content, "uno-jryqbp");
    }

    #[test]
    fn test_unknown_directive_is_ignored() {
        let result = process(r"<div class:active={on}></div>", &TransformClassesOptions::new());
        assert!(result.is_empty());
    }
}
