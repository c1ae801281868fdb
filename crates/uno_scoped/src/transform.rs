//! The per-component pipeline.

use tracing::debug;

use crate::engine::StyleEngine;
use crate::finder::find_classes;
use crate::process::process_classes;
use crate::rewrite::apply_patches;
use crate::styles::{generate_styles, style_insertion, wrap_selectors_with_global};
use crate::{TransformClassesOptions, TransformError};

/// Output of [`transform_classes`].
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// The component source with scoped class names and generated styles.
    pub code: String,
    /// Source map JSON string mapping `code` back to the input.
    pub map: String,
    /// The generated CSS as merged into the style block.
    pub css: String,
}

/// Rewrite the utility classes of one component into scoped classes.
///
/// Returns `Ok(None)` when the component needs no change: it has no class
/// spans, or none of them resolve to a utility or shortcut.
///
/// The engine's shortcuts table is extended while the component's CSS is
/// generated and restored before this returns, including on error.
#[tracing::instrument(level = "debug", skip_all, fields(filename = %filename))]
pub fn transform_classes<E: StyleEngine + ?Sized>(
    source_text: &str,
    filename: &str,
    engine: &mut E,
    options: &TransformClassesOptions,
) -> Result<Option<TransformOutput>, TransformError> {
    let found = find_classes(source_text);
    if found.is_empty() {
        debug!("no class attributes");
        return Ok(None);
    }
    debug!(spans = found.len(), "found class spans");

    let processed = process_classes(&found, options, engine, filename);
    if processed.is_empty() {
        debug!("no utilities or shortcuts");
        return Ok(None);
    }
    debug!(
        rules = processed.rules_to_generate.len(),
        shortcuts = processed.shortcuts.len(),
        updates = processed.code_updates.len(),
        "resolved classes"
    );

    let css = generate_styles(engine, &processed.rules_to_generate, &processed.shortcuts).map_err(|source| {
        TransformError::Generation {
            filename: filename.to_string(),
            source,
        }
    })?;
    let css = wrap_selectors_with_global(&css);

    let mut patches = processed.code_updates;
    patches.push(style_insertion(source_text, &css));
    let rewritten = apply_patches(source_text, &patches, filename)?;

    Ok(Some(TransformOutput {
        code: rewritten.code,
        map: rewritten.map.map(|map| map.to_json_string()).unwrap_or_default(),
        css,
    }))
}
