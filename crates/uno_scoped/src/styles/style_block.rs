//! Merge generated CSS into a component's `<style>` block.

use std::sync::LazyLock;

use cow_utils::CowUtils;
use regex::Regex;

use crate::finder::{comment_and_script_regions, is_ignored};
use crate::rewrite::Patch;

/// A complete `<style …>…</style>` element; group 1 is the opening tag.
static STYLE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<style(?:\s[^>]*)?>).*?</style\s*>").expect("style element pattern is valid")
});

/// The patch that adds `css` to the component.
///
/// The CSS goes right after the opening tag of the first `<style>` element
/// outside HTML comments and `<script>` elements. Without one, a new `<style>` element is appended.
#[expect(clippy::cast_possible_truncation)]
pub fn style_insertion(source: &str, css: &str) -> Patch {
    let css = css.cow_replace("</style", "<\\/style");
    let skipped = comment_and_script_regions(source);

    let opening_tag = STYLE_ELEMENT
        .captures_iter(source)
        .filter_map(|captures| captures.get(1))
        .find(|tag| !is_ignored(&skipped, tag.start()));

    match opening_tag {
        Some(tag) => Patch::insert(tag.end() as u32, css.into_owned()),
        None => Patch::insert(source.len() as u32, format!("\n<style>{css}</style>")),
    }
}

/// Add `css` to the component's style block, creating one if needed.
pub fn add_generated_styles(source: &str, css: &str) -> String {
    let patch = style_insertion(source, css);
    let at = patch.span.start as usize;
    let mut code = String::with_capacity(source.len() + patch.content.len());
    code.push_str(&source[..at]);
    code.push_str(&patch.content);
    code.push_str(&source[at..]);
    code
}
