//! Deterministic class-name generation.
//!
//! Generated names depend only on the class content and the component's file
//! identity, so the same markup always compiles to the same class names no
//! matter which order components are processed in.

use crate::TransformClassesOptions;

/// Separator placed between tokens when hashing a combined class list.
///
/// Tokens are split on whitespace, so a space can never occur inside one.
pub const TOKEN_SEPARATOR: &str = " ";

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Hash a string into a six character, lowercase base-36 identifier.
///
/// This is a 32-bit FNV-1a over UTF-16 code units, with the FNV prime
/// multiplication written as shift-adds. Shorter results are left-padded with
/// `0`, longer ones keep their last six digits.
///
/// ```
/// assert_eq!(uno_scoped::hash("Foo.svelte"), "7dkb0w");
/// ```
pub fn hash(input: &str) -> String {
    let mut hval: u32 = 0x811C_9DC5;
    for unit in input.encode_utf16() {
        hval ^= u32::from(unit);
        hval = hval
            .wrapping_add(hval << 1)
            .wrapping_add(hval << 4)
            .wrapping_add(hval << 7)
            .wrapping_add(hval << 8)
            .wrapping_add(hval << 24);
    }

    let padded = format!("00000{}", to_base36(hval));
    padded[padded.len() - 6..].to_string()
}

fn to_base36(mut value: u32) -> String {
    let mut digits = Vec::with_capacity(7);
    loop {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    // Only ASCII digits were pushed.
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate the scoped class name for `body` in the component `filename`.
///
/// - combined: `{class_prefix}{hash(body + filename)}`
/// - uncombined: `_{body}_{hash(filename)}`
///
/// In combined mode `body` is the ordered list of utility tokens joined with
/// [`TOKEN_SEPARATOR`]; token order is significant.
pub fn generate_class_name(body: &str, options: &TransformClassesOptions, filename: &str) -> String {
    if options.combine {
        let digest = options.hash(&format!("{body}{filename}"));
        format!("{}{digest}", options.class_prefix)
    } else {
        format!("_{body}_{}", options.hash(filename))
    }
}

/// Join utility tokens into the key hashed for a combined class.
pub fn combined_body(tokens: &[&str]) -> String {
    tokens.join(TOKEN_SEPARATOR)
}
