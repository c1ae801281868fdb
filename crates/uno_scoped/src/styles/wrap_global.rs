//! Wrap generated selectors in `:global(…)`.
//!
//! Component styles are scoped by the framework compiler, which would
//! otherwise rename or drop selectors that do not match elements in the
//! component's own markup. Generated selectors already carry a per-component
//! hash, so they are marked global instead.
//!
//! This is a small scanner over the CSS text rather than a full parser: it
//! only needs rule boundaries, top-level selector commas, and at-rule names.
//! Strings, comments, escapes and parenthesized arguments are skipped so their
//! contents are never mistaken for structure.

/// At-rules whose block contains ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "document", "scope", "starting-style"];

const GLOBAL_PREFIX: &str = ":global(";

/// Wrap every selector of every style rule in `:global(…)`.
///
/// Rules nested in grouping at-rules such as `@media` are wrapped too. Other
/// at-rule blocks (`@keyframes`, `@font-face`, …) and at-rule statements
/// (`@import …;`) are copied unchanged, as are selectors that already start
/// with `:global(`.
///
/// ```
/// use uno_scoped::wrap_selectors_with_global;
///
/// assert_eq!(
///     wrap_selectors_with_global(".a,.b{color:red}"),
///     ":global(.a),:global(.b){color:red}"
/// );
/// ```
pub fn wrap_selectors_with_global(css: &str) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / 2);
    wrap_rules(css, &mut out);
    out
}

fn wrap_rules(css: &str, out: &mut String) {
    let bytes = css.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            let end = css[pos..].find(|c: char| !c.is_ascii_whitespace()).map_or(css.len(), |n| pos + n);
            out.push_str(&css[pos..end]);
            pos = end;
            continue;
        }
        if css[pos..].starts_with("/*") {
            let end = skip_comment(bytes, pos);
            out.push_str(&css[pos..end]);
            pos = end;
            continue;
        }

        let prelude_end = scan_until(bytes, pos, |b| matches!(b, b'{' | b';' | b'}'));
        if bytes.get(prelude_end) != Some(&b'{') {
            // At-rule statement, stray `}` or truncated input.
            let end = (prelude_end + 1).min(bytes.len());
            out.push_str(&css[pos..end]);
            pos = end;
            continue;
        }

        let prelude = &css[pos..prelude_end];
        let body_end = block_end(bytes, prelude_end + 1);
        let body = &css[prelude_end + 1..body_end];

        if prelude.starts_with('@') {
            out.push_str(prelude);
            out.push('{');
            if is_grouping_at_rule(prelude) {
                wrap_rules(body, out);
            } else {
                out.push_str(body);
            }
        } else {
            wrap_selector_list(prelude, out);
            out.push('{');
            out.push_str(body);
        }

        if body_end < bytes.len() {
            out.push('}');
            pos = body_end + 1;
        } else {
            pos = body_end;
        }
    }
}

fn wrap_selector_list(prelude: &str, out: &mut String) {
    let bytes = prelude.as_bytes();
    let mut start = 0;
    loop {
        let end = scan_until(bytes, start, |b| b == b',');
        wrap_selector(&prelude[start..end], out);
        if end >= bytes.len() {
            break;
        }
        out.push(',');
        start = end + 1;
    }
}

fn wrap_selector(part: &str, out: &mut String) {
    let selector = part.trim();
    if selector.is_empty() || selector.starts_with(GLOBAL_PREFIX) {
        out.push_str(part);
        return;
    }
    let leading = part.len() - part.trim_start().len();
    let trailing_start = part.trim_end().len();
    out.push_str(&part[..leading]);
    out.push_str(GLOBAL_PREFIX);
    out.push_str(selector);
    out.push(')');
    out.push_str(&part[trailing_start..]);
}

fn is_grouping_at_rule(prelude: &str) -> bool {
    let name_end = prelude[1..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
        .map_or(prelude.len(), |n| n + 1);
    let mut name = &prelude[1..name_end];
    // Vendor prefixes, e.g. `@-moz-document`.
    if let Some(rest) = name.strip_prefix('-') {
        name = rest.split_once('-').map_or(rest, |(_, unprefixed)| unprefixed);
    }
    GROUPING_AT_RULES.iter().any(|grouping| grouping.eq_ignore_ascii_case(name))
}

/// Index of the first byte at or after `from` that matches `stop` outside
/// strings, comments, escapes and parentheses or brackets; `bytes.len()` if none.
fn scan_until(bytes: &[u8], from: usize, stop: impl Fn(u8) -> bool) -> usize {
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        if let Some(next) = skip_opaque(bytes, i) {
            i = next;
            continue;
        }
        let b = bytes[i];
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && stop(b) => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Index of the `}` closing a block whose contents start at `from`.
fn block_end(bytes: &[u8], from: usize) -> usize {
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        if let Some(next) = skip_opaque(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' if depth == 0 => return i,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// If a string, comment or escape starts at `i`, the index just past it.
fn skip_opaque(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes[i] {
        b'\\' => Some((i + 2).min(bytes.len())),
        quote @ (b'"' | b'\'') => {
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 2,
                    b if b == quote => return Some(j + 1),
                    _ => j += 1,
                }
            }
            Some(bytes.len())
        }
        b'/' if bytes.get(i + 1) == Some(&b'*') => Some(skip_comment(bytes, i)),
        _ => None,
    }
}

/// Index just past the comment starting at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .windows(2)
        .position(|pair| pair == b"*/")
        .map_or(bytes.len(), |n| start + 2 + n + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_single_rule() {
        assert_eq!(
            wrap_selectors_with_global(".uno-07jvco{margin-bottom:0.25rem;margin-right:0.25rem;}"),
            ":global(.uno-07jvco){margin-bottom:0.25rem;margin-right:0.25rem;}"
        );
    }

    #[test]
    fn test_wraps_each_selector_of_a_list() {
        assert_eq!(
            wrap_selectors_with_global("._mb-1_7dkb0w,.x > .y{margin:0}.z{color:red}"),
            ":global(._mb-1_7dkb0w),:global(.x > .y){margin:0}:global(.z){color:red}"
        );
    }

    #[test]
    fn test_recurses_into_grouping_at_rules() {
        assert_eq!(
            wrap_selectors_with_global(
                "@media (min-width:640px){.sm\\:p-2{padding:0.5rem;}}@supports (display:grid){@layer base{.g{display:grid}}}"
            ),
            "@media (min-width:640px){:global(.sm\\:p-2){padding:0.5rem;}}\
             @supports (display:grid){@layer base{:global(.g){display:grid}}}"
        );
    }

    #[test]
    fn test_keyframes_and_font_face_are_untouched() {
        let css = "@keyframes spin{from{transform:rotate(0deg)}to{transform:rotate(360deg)}}\
                   @font-face{font-family:X;src:url(x.woff)}\
                   .animate-spin{animation:spin 1s linear infinite;}";
        assert_eq!(
            wrap_selectors_with_global(css),
            "@keyframes spin{from{transform:rotate(0deg)}to{transform:rotate(360deg)}}\
             @font-face{font-family:X;src:url(x.woff)}\
             :global(.animate-spin){animation:spin 1s linear infinite;}"
        );
    }

    #[test]
    fn test_statements_pass_through() {
        assert_eq!(
            wrap_selectors_with_global("@import url(\"a.css\");.a{color:red}"),
            "@import url(\"a.css\");:global(.a){color:red}"
        );
    }

    #[test]
    fn test_already_global_is_kept() {
        assert_eq!(
            wrap_selectors_with_global(":global(.a){color:red}.b,:global(.c){color:blue}"),
            ":global(.a){color:red}:global(.b),:global(.c){color:blue}"
        );
    }

    #[test]
    fn test_commas_and_braces_in_arguments_and_strings() {
        assert_eq!(
            wrap_selectors_with_global(":is(.a,.b) .c{x:y}[data-x=\"a,b{\"]{content:\"}\"}"),
            ":global(:is(.a,.b) .c){x:y}:global([data-x=\"a,b{\"]){content:\"}\"}"
        );
    }

    #[test]
    fn test_pretty_output_keeps_whitespace_and_comments() {
        let css = "/* layer: default */\n.mb-1, .mr-1 {\n  margin: 0;\n}\n";
        assert_eq!(
            wrap_selectors_with_global(css),
            "/* layer: default */\n:global(.mb-1), :global(.mr-1) {\n  margin: 0;\n}\n"
        );
    }

    #[test]
    fn test_vendor_prefixed_grouping_rule() {
        assert_eq!(
            wrap_selectors_with_global("@-moz-document url-prefix(){.a{color:red}}"),
            "@-moz-document url-prefix(){:global(.a){color:red}}"
        );
    }

    #[test]
    fn test_empty_and_truncated_input() {
        assert_eq!(wrap_selectors_with_global(""), "");
        assert_eq!(wrap_selectors_with_global(".a{color:red"), ":global(.a){color:red");
    }
}
