//! Selector escaping.
//!
//! Pure functions with no dependency on engine state. Generated class names
//! embed raw utility tokens (`_hover:bg-red_7dkb0w`, `_w-[10px]_7dkb0w`), so
//! they must be escaped before they are printed as a CSS class selector.

use std::borrow::Cow;

/// Escape a class name for use as a CSS identifier, following the
/// `CSS.escape()` algorithm from the CSSOM spec.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
///
/// ```
/// use uno_scoped::escape_selector;
///
/// assert_eq!(escape_selector("mb-1"), "mb-1");
/// assert_eq!(escape_selector("hover:bg-red"), "hover\\:bg-red");
/// assert_eq!(escape_selector("1/2"), "\\31 \\/2");
/// ```
pub fn escape_selector(ident: &str) -> Cow<'_, str> {
    if !needs_escape(ident) {
        return Cow::Borrowed(ident);
    }

    let mut result = String::with_capacity(ident.len() + 8);
    let mut chars = ident.chars().enumerate().peekable();
    let first = ident.chars().next();

    while let Some((index, c)) = chars.next() {
        match c {
            '\0' => result.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => push_code_point(&mut result, c),
            '0'..='9' if index == 0 => push_code_point(&mut result, c),
            '0'..='9' if index == 1 && first == Some('-') => push_code_point(&mut result, c),
            '-' if index == 0 && chars.peek().is_none() => result.push_str("\\-"),
            c if is_ident_char(c) => result.push(c),
            c => {
                result.push('\\');
                result.push(c);
            }
        }
    }

    Cow::Owned(result)
}

/// Fast check used to skip allocation for the common case of plain class names.
fn needs_escape(ident: &str) -> bool {
    let bytes = ident.as_bytes();
    match bytes {
        [] => false,
        [b'-'] => true,
        [first, ..] if first.is_ascii_digit() => true,
        [b'-', second, ..] if second.is_ascii_digit() => true,
        _ => !ident.chars().all(is_ident_char),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c as u32 >= 0x80
}

/// Escape a code point as `\{hex} ` (the trailing space terminates the escape).
fn push_code_point(result: &mut String, c: char) {
    result.push_str(&format!("\\{:x} ", u32::from(c)));
}
