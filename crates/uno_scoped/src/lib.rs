//! Scoped utility classes
//!
//! Rewrites the utility classes used in a component's markup into
//! component-scoped class names and merges the CSS for those names into the
//! component's `<style>` block.
//!
//! ## Pipeline
//!
//! ```text
//! find_classes ─▶ process_classes ─▶ generate_styles ─▶ wrap_selectors_with_global
//!                        │                                        │
//!                        └── code updates ──▶ apply_patches ◀── style insertion
//! ```
//!
//! With the default options, `<div class="mb-1 mr-1 foo">` in `Foo.svelte`
//! becomes `<div class="uno-07jvco foo">` plus
//! `:global(.uno-07jvco){margin-bottom:0.25rem;margin-right:0.25rem;}`.
//!
//! The style-rule engine is abstracted by [`StyleEngine`]; [`StaticEngine`]
//! is a table-driven implementation.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

mod diagnostic;
mod engine;
mod error;
mod escape;
mod finder;
mod naming;
mod options;
mod process;
mod rewrite;
mod styles;
mod transform;

pub use diagnostic::{Diagnostic, DiagnosticLabel, DiagnosticSeverity};
pub use engine::{
    EngineError, GenerateOptions, ParsedUtil, SharedEngine, Shortcut, ShortcutsGuard, StaticEngine, StyleEngine,
};
pub use error::TransformError;
pub use escape::escape_selector;
pub use finder::{ClassKind, FoundClass, find_classes};
pub use naming::{generate_class_name, hash};
pub use options::{DEFAULT_CLASS_PREFIX, HashFn, TransformClassesOptions};
pub use process::{ProcessResult, ProcessedClasses, process_class_body, process_classes, process_directive};
pub use rewrite::{Patch, RewriteResult, apply_patches};
pub use styles::{add_generated_styles, generate_styles, style_insertion, wrap_selectors_with_global};
pub use transform::{TransformOutput, transform_classes};

/// Insertion-ordered map with the fast non-cryptographic hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
