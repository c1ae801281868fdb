//! Class resolution.
//!
//! Turns the spans found in a component into generated class names, the
//! rules those names stand for, and the patches that put them in the markup.

use rustc_hash::FxHashSet;
use tracing::warn;

use crate::engine::StyleEngine;
use crate::finder::{ClassKind, FoundClass};
use crate::rewrite::Patch;
use crate::{FxIndexMap, TransformClassesOptions};

mod class_body;
mod directive;

pub use class_body::process_class_body;
pub use directive::process_directive;

/// Resolution of a single class span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Generated class name → the tokens it expands to.
    pub rules_to_generate: FxIndexMap<String, Vec<String>>,
    pub code_update: Option<Patch>,
    /// Shortcut names referenced as-is.
    pub shortcuts: Vec<String>,
}

impl ProcessResult {
    /// An empty result means the span is left alone.
    pub fn is_empty(&self) -> bool {
        self.rules_to_generate.is_empty() && self.code_update.is_none() && self.shortcuts.is_empty()
    }
}

/// Resolution of every class span in a component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedClasses {
    /// Unique per component, in first-seen order.
    pub rules_to_generate: FxIndexMap<String, Vec<String>>,
    /// Ascending by start offset.
    pub code_updates: Vec<Patch>,
    /// Deduplicated, in first-seen order.
    pub shortcuts: Vec<String>,
}

impl ProcessedClasses {
    /// Nothing to generate: no rules and no shortcuts.
    pub fn is_empty(&self) -> bool {
        self.rules_to_generate.is_empty() && self.shortcuts.is_empty()
    }
}

/// Resolve every found span and merge the results.
pub fn process_classes<E: StyleEngine + ?Sized>(
    found: &[FoundClass],
    options: &TransformClassesOptions,
    engine: &E,
    filename: &str,
) -> ProcessedClasses {
    let mut processed = ProcessedClasses::default();
    let mut seen_shortcuts = FxHashSet::default();

    for class in found {
        let result = match class.kind {
            ClassKind::Regular | ClassKind::Expression => process_class_body(class, options, engine, filename),
            ClassKind::Directive | ClassKind::DirectiveShorthand => {
                process_directive(class, options, engine, filename)
            }
        };
        if result.is_empty() {
            continue;
        }

        for (name, tokens) in result.rules_to_generate {
            processed.rules_to_generate.entry(name).or_insert(tokens);
        }
        for shortcut in result.shortcuts {
            if seen_shortcuts.insert(shortcut.clone()) {
                processed.shortcuts.push(shortcut);
            }
        }
        processed.code_updates.extend(result.code_update);
    }

    processed.code_updates.sort_by_key(|patch| patch.span.start);
    processed
}

/// How the engine sees a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenClass {
    Unresolved,
    /// Names an entry of the engine's shortcuts table.
    Shortcut,
    Utility,
}

pub(crate) fn classify<E: StyleEngine + ?Sized>(engine: &E, token: &str) -> TokenClass {
    if engine.is_shortcut(token) {
        return TokenClass::Shortcut;
    }
    match engine.resolve_token(token) {
        Ok(Some(utils)) if !utils.is_empty() => TokenClass::Utility,
        Ok(_) => TokenClass::Unresolved,
        Err(err) => {
            warn!(token, error = %err, "failed to resolve token, leaving it unchanged");
            TokenClass::Unresolved
        }
    }
}
