use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::{ProcessResult, TokenClass, classify};
use crate::engine::StyleEngine;
use crate::finder::FoundClass;
use crate::naming::{TOKEN_SEPARATOR, combined_body, generate_class_name};
use crate::rewrite::Patch;
use crate::{FxIndexMap, TransformClassesOptions};

/// Resolve the tokens of a class list and rewrite it.
///
/// Utility tokens are replaced with generated names: one per token, or, when
/// `options.combine` is set, a single name for all of them placed where the
/// first one was. Unknown tokens and shortcut references stay where they are.
pub fn process_class_body<E: StyleEngine + ?Sized>(
    found: &FoundClass,
    options: &TransformClassesOptions,
    engine: &E,
    filename: &str,
) -> ProcessResult {
    let tokens: Vec<&str> = found.body.split_whitespace().collect();

    let mut classes: FxHashMap<&str, TokenClass> = FxHashMap::default();
    let mut utilities: Vec<&str> = Vec::new();
    let mut shortcuts: Vec<String> = Vec::new();

    for &token in &tokens {
        if classes.contains_key(token) {
            continue;
        }
        let class = classify(engine, token);
        trace!(token, ?class, "classified token");
        classes.insert(token, class);
        match class {
            TokenClass::Utility => utilities.push(token),
            TokenClass::Shortcut => shortcuts.push(token.to_string()),
            TokenClass::Unresolved => {}
        }
    }

    if utilities.is_empty() {
        return ProcessResult {
            shortcuts,
            ..ProcessResult::default()
        };
    }

    let mut rules_to_generate = FxIndexMap::default();
    let mut names: FxHashMap<&str, String> = FxHashMap::default();
    if options.combine {
        let name = generate_class_name(&combined_body(&utilities), options, filename);
        for &token in &utilities {
            names.insert(token, name.clone());
        }
        rules_to_generate.insert(name, utilities.iter().map(ToString::to_string).collect());
    } else {
        for &token in &utilities {
            let name = generate_class_name(token, options, filename);
            rules_to_generate.insert(name.clone(), vec![token.to_string()]);
            names.insert(token, name);
        }
    }

    let mut emitted: FxHashSet<&str> = FxHashSet::default();
    let mut rewritten: Vec<&str> = Vec::with_capacity(tokens.len());
    for &token in &tokens {
        match names.get(token) {
            Some(name) if options.combine => {
                if emitted.insert(name.as_str()) {
                    rewritten.push(name);
                }
            }
            Some(name) => rewritten.push(name),
            None => rewritten.push(token),
        }
    }

    ProcessResult {
        rules_to_generate,
        code_update: Some(Patch::new(found.span, rewritten.join(TOKEN_SEPARATOR))),
        shortcuts,
    }
}
