//! Class finder.
//!
//! Locates class-bearing spans in component markup without parsing the
//! template grammar. Opening tags are walked attribute by attribute, and each
//! value is scanned by hand so that quotes and braces inside `{…}`
//! expressions are balanced correctly:
//!
//! - `class="mb-1 mr-1"`, `class='…'`, `class=mb-1` → [`ClassKind::Regular`]
//! - string literals inside `class="a {cond ? 'b' : 'c'}"` or
//!   `class={cond ? 'b' : 'c'}` → [`ClassKind::Expression`]
//! - `class:mb-1={cond}` → [`ClassKind::Directive`]
//! - `class:flex` → [`ClassKind::DirectiveShorthand`]
//!
//! Text content, other attributes' values, HTML comments, `<script>` and
//! `<style>` elements are skipped.

use std::ops::Range;
use std::sync::LazyLock;

use oxc_span::Span;
use regex::Regex;

static IGNORED_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script(?:\s[^>]*)?>.*?</script\s*>|<style(?:\s[^>]*)?>.*?</style\s*>")
        .expect("ignored region pattern is valid")
});

static COMMENT_OR_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script(?:\s[^>]*)?>.*?</script\s*>").expect("comment or script pattern is valid")
});

const CLASS_ATTRIBUTE: &str = "class";
const CLASS_DIRECTIVE_PREFIX: &str = "class:";

/// How a class span was written in the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Static text of a `class` attribute.
    Regular,
    /// A string literal inside a dynamic class expression.
    Expression,
    /// The name of a `class:name={…}` directive.
    Directive,
    /// The name of a `class:name` shorthand directive.
    DirectiveShorthand,
}

/// A class-bearing span in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundClass {
    /// The raw text of the span.
    pub body: String,
    /// Byte range of `body` in the source.
    pub span: Span,
    pub kind: ClassKind,
}

impl FoundClass {
    #[expect(clippy::cast_possible_truncation)]
    fn new(source: &str, range: Range<usize>, kind: ClassKind) -> Self {
        Self {
            body: source[range.clone()].to_string(),
            span: Span::new(range.start as u32, range.end as u32),
            kind,
        }
    }
}

/// Find every class-bearing span in `source`, in ascending source order.
pub fn find_classes(source: &str) -> Vec<FoundClass> {
    let ignored = ignored_regions(source);
    let bytes = source.as_bytes();
    let mut found = Vec::new();
    let mut regions = ignored.iter().peekable();
    let mut i = 0;

    while i < bytes.len() {
        // Regions are sorted and disjoint.
        while regions.next_if(|region| region.end <= i).is_some() {}
        if let Some(region) = regions.peek().filter(|region| region.start <= i) {
            i = region.end;
            continue;
        }
        match bytes[i] {
            b'<' if bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) => {
                i = scan_tag(source, i + 1, &mut found);
            }
            // Text expressions such as `{a < b}` are not markup.
            b'{' => i = ValueScanner::new(source).scan_expression(i + 1),
            _ => i += 1,
        }
    }

    found
}

/// Byte ranges of comments, `<script>` and `<style>` elements.
fn ignored_regions(source: &str) -> Vec<Range<usize>> {
    IGNORED_REGION.find_iter(source).map(|m| m.range()).collect()
}

/// Byte ranges of HTML comments and `<script>` elements.
pub(crate) fn comment_and_script_regions(source: &str) -> Vec<Range<usize>> {
    COMMENT_OR_SCRIPT.find_iter(source).map(|m| m.range()).collect()
}

pub(crate) fn is_ignored(regions: &[Range<usize>], position: usize) -> bool {
    regions.iter().any(|region| region.contains(&position))
}

/// Walk the attributes of an opening tag whose name starts at `start`.
/// Returns the position after the tag.
fn scan_tag(source: &str, start: usize, found: &mut Vec<FoundClass>) -> usize {
    let bytes = source.as_bytes();
    let mut i = start;
    while i < bytes.len() && !is_name_end(bytes[i]) {
        i += 1;
    }

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        match bytes.get(i) {
            None => return bytes.len(),
            Some(b'>') => return i + 1,
            // `{...rest}` and `{name}` attributes.
            Some(b'{') => {
                i = ValueScanner::new(source).scan_expression(i + 1);
                continue;
            }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len() && !is_name_end(bytes[i]) {
            i += 1;
        }
        if i == name_start {
            // A stray quote or brace.
            i += 1;
            continue;
        }
        let name = &source[name_start..i];
        let value_start = attribute_value_start(bytes, i);

        if name.strip_prefix(CLASS_DIRECTIVE_PREFIX).is_some_and(|directive| !directive.is_empty()) {
            let kind = if value_start.is_some() { ClassKind::Directive } else { ClassKind::DirectiveShorthand };
            found.push(FoundClass::new(source, name_start + CLASS_DIRECTIVE_PREFIX.len()..i, kind));
        }

        let Some(value_start) = value_start else {
            continue;
        };
        let mut scanner = ValueScanner::new(source);
        i = scanner.scan_value(value_start);
        if name == CLASS_ATTRIBUTE {
            found.append(&mut scanner.found);
        }
    }
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/' | b'{' | b'}')
}

/// Position of the attribute value after a name ending at `name_end`,
/// skipping `\s*=\s*`. `None` for a valueless attribute.
fn attribute_value_start(bytes: &[u8], name_end: usize) -> Option<usize> {
    let mut i = name_end;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
        return None;
    }
    i += 1;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    match bytes.get(i) {
        None | Some(b'>') => None,
        Some(_) => Some(i),
    }
}

/// Scans one attribute value, collecting spans into `found`.
///
/// All delimiters are ASCII, so every index it produces is a char boundary.
struct ValueScanner<'s> {
    source: &'s str,
    bytes: &'s [u8],
    found: Vec<FoundClass>,
}

impl<'s> ValueScanner<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            found: Vec::new(),
        }
    }

    /// Scan the value starting at `start` and return the position after it.
    fn scan_value(&mut self, start: usize) -> usize {
        match self.bytes[start] {
            quote @ (b'"' | b'\'') => self.scan_quoted(start + 1, quote),
            b'{' => self.scan_expression(start + 1),
            _ => {
                let end = self.bytes[start..]
                    .iter()
                    .position(|b| b.is_ascii_whitespace() || *b == b'>')
                    .map_or(self.bytes.len(), |offset| start + offset);
                self.push_trimmed(start..end, ClassKind::Regular);
                end
            }
        }
    }

    /// `class="…"`: static runs between `{…}` expressions.
    ///
    /// An unterminated value yields nothing.
    fn scan_quoted(&mut self, start: usize, quote: u8) -> usize {
        let found_before = self.found.len();
        let mut i = start;
        let mut run_start = start;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b if b == quote => {
                    self.push_trimmed(run_start..i, ClassKind::Regular);
                    return i + 1;
                }
                b'{' => {
                    self.push_trimmed(run_start..i, ClassKind::Regular);
                    i = self.scan_expression(i + 1);
                    run_start = i;
                }
                _ => i += 1,
            }
        }
        self.found.truncate(found_before);
        self.bytes.len()
    }

    /// Scan a JS expression after its opening `{`, collecting string
    /// literals. Returns the position after the matching `}`.
    fn scan_expression(&mut self, start: usize) -> usize {
        let mut depth = 1usize;
        let mut i = start;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return i + 1;
                    }
                }
                quote @ (b'"' | b'\'') => {
                    i = self.scan_string_literal(i + 1, quote);
                    continue;
                }
                b'`' => {
                    i = self.scan_template_literal(i + 1);
                    continue;
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'/') => {
                    i = self.bytes[i..]
                        .iter()
                        .position(|b| *b == b'\n')
                        .map_or(self.bytes.len(), |offset| i + offset);
                    continue;
                }
                b'/' if self.bytes.get(i + 1) == Some(&b'*') => {
                    i = self.source[i + 2..]
                        .find("*/")
                        .map_or(self.bytes.len(), |offset| i + 2 + offset + 2);
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        self.bytes.len()
    }

    /// `'…'` or `"…"`. Literals with escapes are left alone.
    fn scan_string_literal(&mut self, start: usize, quote: u8) -> usize {
        let mut i = start;
        let mut escaped = false;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => {
                    escaped = true;
                    i += 2;
                }
                b'\n' => return i,
                b if b == quote => {
                    if !escaped {
                        self.push_trimmed(start..i, ClassKind::Expression);
                    }
                    return i + 1;
                }
                _ => i += 1,
            }
        }
        self.bytes.len()
    }

    /// `` `…` ``. Only literals without `${…}` are collected, but string
    /// literals inside the interpolations are.
    fn scan_template_literal(&mut self, start: usize) -> usize {
        let mut i = start;
        let mut plain = true;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => {
                    plain = false;
                    i += 2;
                }
                b'`' => {
                    if plain {
                        self.push_trimmed(start..i, ClassKind::Expression);
                    }
                    return i + 1;
                }
                b'$' if self.bytes.get(i + 1) == Some(&b'{') => {
                    plain = false;
                    i = self.scan_expression(i + 2);
                }
                _ => i += 1,
            }
        }
        self.bytes.len()
    }

    fn push_trimmed(&mut self, range: Range<usize>, kind: ClassKind) {
        let end = range.end.min(self.bytes.len());
        let text = &self.source[range.start..end];
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let start = range.start + (text.len() - text.trim_start().len());
        self.found.push(FoundClass::new(self.source, start..start + trimmed.len(), kind));
    }
}
