//! Code rewriter.
//!
//! Applies a list of patches to the original source in one pass. Every patch
//! addresses original-source offsets, and patches are sorted before they are
//! applied, so the result does not depend on the order they were produced in.

use oxc_sourcemap::SourceMap;
use oxc_span::Span;

use crate::TransformError;

mod sourcemap_builder;

use sourcemap_builder::PatchMapBuilder;

/// Replace `span` of the original source with `content`.
///
/// An empty span inserts `content` at `span.start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub span: Span,
    pub content: String,
}

impl Patch {
    pub fn new(span: Span, content: impl Into<String>) -> Self {
        Self {
            span,
            content: content.into(),
        }
    }

    /// Insert `content` before the byte at `position`.
    pub fn insert(position: u32, content: impl Into<String>) -> Self {
        Self::new(Span::new(position, position), content)
    }
}

/// Output of [`apply_patches`].
#[derive(Debug)]
pub struct RewriteResult {
    pub code: String,
    /// `None` when there was nothing to patch.
    pub map: Option<SourceMap>,
}

/// Apply `patches` to `source`, producing the new text and a hires sourcemap.
///
/// With no patches the source is returned unchanged and no map is built.
/// Overlapping patches (including two insertions at the same position, whose
/// relative order would be ambiguous) are rejected.
#[expect(clippy::cast_possible_truncation)]
pub fn apply_patches(
    source: &str,
    patches: &[Patch],
    filename: &str,
) -> Result<RewriteResult, TransformError> {
    if patches.is_empty() {
        return Ok(RewriteResult {
            code: source.to_string(),
            map: None,
        });
    }

    let source_len = source.len() as u32;
    let mut ordered: Vec<&Patch> = patches.iter().collect();
    ordered.sort_by_key(|patch| (patch.span.start, patch.span.end));

    for patch in &ordered {
        let span = patch.span;
        let in_bounds = span.start <= span.end
            && span.end <= source_len
            && source.is_char_boundary(span.start as usize)
            && source.is_char_boundary(span.end as usize);
        if !in_bounds {
            return Err(TransformError::PatchOutOfBounds {
                filename: filename.to_string(),
                span,
            });
        }
    }

    for pair in ordered.windows(2) {
        let (first, second) = (pair[0].span, pair[1].span);
        if first.end > second.start || first == second {
            return Err(TransformError::OverlappingUpdates {
                filename: filename.to_string(),
                first,
                second,
            });
        }
    }

    let mut builder = PatchMapBuilder::new(filename, source);
    let mut code = String::with_capacity(source.len() + ordered.iter().map(|p| p.content.len()).sum::<usize>());
    let mut cursor = 0;

    for patch in ordered {
        builder.push_original(&mut code, cursor, patch.span.start);
        builder.push_replacement(&mut code, patch.span.start, &patch.content);
        cursor = patch.span.end;
    }
    builder.push_original(&mut code, cursor, source_len);

    Ok(RewriteResult {
        code,
        map: Some(builder.into_sourcemap()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(start: u32, end: u32, content: &str) -> Patch {
        Patch::new(Span::new(start, end), content)
    }

    /// Apply patches back to front with plain string splicing.
    fn splice_manually(source: &str, patches: &[Patch]) -> String {
        let mut sorted = patches.to_vec();
        sorted.sort_by_key(|p| std::cmp::Reverse(p.span.start));
        let mut text = source.to_string();
        for p in sorted {
            text.replace_range(p.span.start as usize..p.span.end as usize, &p.content);
        }
        text
    }

    #[test]
    fn test_no_patches_returns_source_without_map() {
        let result = apply_patches("<div class=\"mb-1\">", &[], "Foo.svelte").unwrap();
        assert_eq!(result.code, "<div class=\"mb-1\">");
        assert!(result.map.is_none());
    }

    #[test]
    fn test_matches_manual_application() {
        let source = "<div class=\"mb-1 mr-1 foo\"><p class=\"p-2\">x</p></div>";
        let patches = vec![
            patch(12, 21, "uno-07jvco"),
            patch(37, 40, "uno-abcdef"),
            Patch::insert(source.len() as u32, "\n<style></style>"),
        ];
        let result = apply_patches(source, &patches, "Foo.svelte").unwrap();
        assert_eq!(result.code, splice_manually(source, &patches));
        assert_eq!(
            result.code,
            "<div class=\"uno-07jvco foo\"><p class=\"uno-abcdef\">x</p></div>\n<style></style>"
        );
    }

    #[test]
    fn test_patch_order_does_not_matter() {
        let source = "a bb ccc dddd";
        let patches = [patch(0, 1, "A"), patch(2, 4, "B"), patch(5, 8, "C"), Patch::insert(13, "!")];
        let expected = apply_patches(source, &patches, "f").unwrap().code;

        let permutations = [[3, 2, 1, 0], [1, 3, 0, 2], [2, 0, 3, 1]];
        for order in permutations {
            let shuffled: Vec<Patch> = order.iter().map(|&i| patches[i].clone()).collect();
            let result = apply_patches(source, &shuffled, "f").unwrap();
            assert_eq!(result.code, expected);
            assert_eq!(
                result.map.unwrap().to_json_string(),
                apply_patches(source, &patches, "f").unwrap().map.unwrap().to_json_string()
            );
        }
    }

    #[test]
    fn test_overlap_is_rejected() {
        let err = apply_patches("abcdef", &[patch(0, 3, "x"), patch(2, 4, "y")], "Foo.svelte").unwrap_err();
        assert!(matches!(
            err,
            TransformError::OverlappingUpdates { first, second, .. }
                if first == Span::new(0, 3) && second == Span::new(2, 4)
        ));
    }

    #[test]
    fn test_adjacent_patches_are_allowed() {
        let result = apply_patches("abcdef", &[patch(0, 3, "x"), patch(3, 6, "y")], "f").unwrap();
        assert_eq!(result.code, "xy");
    }

    #[test]
    fn test_duplicate_insertions_are_rejected() {
        let err = apply_patches("abc", &[Patch::insert(1, "x"), Patch::insert(1, "y")], "f").unwrap_err();
        assert!(matches!(err, TransformError::OverlappingUpdates { .. }));
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let err = apply_patches("abc", &[patch(2, 9, "x")], "f").unwrap_err();
        assert!(matches!(err, TransformError::PatchOutOfBounds { .. }));

        let err = apply_patches("é", &[patch(1, 2, "x")], "f").unwrap_err();
        assert!(matches!(err, TransformError::PatchOutOfBounds { .. }));
    }

    #[test]
    fn test_unmodified_regions_map_to_original_offsets() {
        let source = "<div class=\"mb-1 mr-1\">\n  <span>hi</span>\n</div>";
        let result = apply_patches(source, &[patch(12, 21, "uno-x")], "Foo.svelte").unwrap();
        assert_eq!(result.code, "<div class=\"uno-x\">\n  <span>hi</span>\n</div>");

        let map = result.map.unwrap();
        let lookup = map.generate_lookup_table();

        // `<span>` is on line 1 in both; the patch only touched line 0.
        let token = map.lookup_token(&lookup, 1, 2).unwrap();
        assert_eq!((token.get_src_line(), token.get_src_col()), (1, 2));

        // The closing quote after the replacement maps back to its original column.
        let token = map.lookup_token(&lookup, 0, 17).unwrap();
        assert_eq!((token.get_src_line(), token.get_src_col()), (0, 21));

        // The replacement itself maps to the start of the replaced range.
        let token = map.lookup_token(&lookup, 0, 12).unwrap();
        assert_eq!((token.get_src_line(), token.get_src_col()), (0, 12));
    }

    #[test]
    fn test_map_json_names_source() {
        let source = "<p class=\"mb-1\"></p>";
        let result = apply_patches(source, &[patch(10, 14, "uno-x")], "src/Foo.svelte").unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.map.unwrap().to_json_string()).unwrap();
        assert_eq!(json["version"], 3);
        assert_eq!(json["sources"][0], "src/Foo.svelte");
        assert_eq!(json["sourcesContent"][0], source);
    }
}
