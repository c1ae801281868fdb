//! Sourcemap builder for patched output.
//!
//! Maps positions in the rewritten component back to the original source.
//! Text copied from the original gets one mapping per character ("hires");
//! replacement text gets a single mapping at its first character pointing to
//! the start of the replaced range.

use oxc_sourcemap::{SourceMap, SourceMapBuilder};

/// Sourcemap builder for one rewrite pass.
///
/// Output must be written through [`PatchMapBuilder::push_original`] and
/// [`PatchMapBuilder::push_replacement`] so generated positions stay in sync.
pub struct PatchMapBuilder<'s> {
    /// The source id assigned by the inner sourcemap builder.
    source_id: u32,
    /// The original source text.
    original_source: &'s str,
    /// `line_starts[i]` is the byte offset of the first character on line `i`.
    line_starts: Vec<u32>,
    inner: SourceMapBuilder,
    /// Current generated line (0-indexed).
    generated_line: u32,
    /// Current generated column (0-indexed, in UTF-16 code units).
    generated_column: u32,
}

impl<'s> PatchMapBuilder<'s> {
    /// `source_path` is the name used in the sourcemap's `sources` array.
    pub fn new(source_path: &str, source_text: &'s str) -> Self {
        let mut inner = SourceMapBuilder::default();
        let source_id = inner.set_source_and_content(source_path, source_text);
        Self {
            source_id,
            original_source: source_text,
            line_starts: Self::compute_line_starts(source_text),
            inner,
            generated_line: 0,
            generated_column: 0,
        }
    }

    pub fn into_sourcemap(self) -> SourceMap {
        self.inner.into_sourcemap()
    }

    /// Copy `original_source[start..end]` to `output`, mapping every
    /// character back to itself.
    #[expect(clippy::cast_possible_truncation)]
    pub fn push_original(&mut self, output: &mut String, start: u32, end: u32) {
        if start >= end {
            return;
        }
        let text = &self.original_source[start as usize..end as usize];
        let (start_line, start_column) = self.byte_offset_to_line_column(start);
        let (mut line, mut column) = (start_line, start_column);
        let mut chars = text.chars().peekable();

        // The copied text advances generated and original positions in lockstep.
        while let Some(c) = chars.next() {
            match c {
                '\n' => {
                    line += 1;
                    column = 0;
                }
                '\r' => {
                    // `\r\n` breaks the line at the `\n`.
                    if chars.peek() != Some(&'\n') {
                        line += 1;
                        column = 0;
                    }
                }
                _ => {
                    let generated_line = self.generated_line + (line - start_line);
                    let generated_column = if line == start_line {
                        self.generated_column + (column - start_column)
                    } else {
                        column
                    };
                    self.add_token(generated_line, generated_column, line, column);
                    column += c.len_utf16() as u32;
                }
            }
        }

        output.push_str(text);
        self.advance_generated(text);
    }

    /// Write `content` in place of the original range starting at
    /// `original_start`.
    pub fn push_replacement(&mut self, output: &mut String, original_start: u32, content: &str) {
        if content.is_empty() {
            return;
        }
        let (line, column) = self.byte_offset_to_line_column(original_start);
        self.add_token(self.generated_line, self.generated_column, line, column);
        output.push_str(content);
        self.advance_generated(content);
    }

    fn add_token(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        original_line: u32,
        original_column: u32,
    ) {
        self.inner.add_token(
            generated_line,
            generated_column,
            original_line,
            original_column,
            Some(self.source_id),
            None,
        );
    }

    /// Convert a byte offset in the original source to (line, column), both 0-indexed.
    /// Column is counted in UTF-16 code units (per the sourcemap spec).
    #[expect(clippy::cast_possible_truncation)]
    fn byte_offset_to_line_column(&self, byte_offset: u32) -> (u32, u32) {
        let byte_offset = byte_offset.min(self.original_source.len() as u32);
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(exact) => exact,
            Err(insert_pos) => insert_pos.saturating_sub(1),
        };

        let line_start = self.line_starts[line] as usize;
        let segment = &self.original_source.as_bytes()[line_start..byte_offset as usize];

        let column = if segment.is_ascii() {
            segment.len() as u32
        } else {
            self.original_source[line_start..byte_offset as usize].encode_utf16().count() as u32
        };

        (line as u32, column)
    }

    /// Move the generated position past `text`.
    #[expect(clippy::cast_possible_truncation)]
    fn advance_generated(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut last_newline_pos = None;
        let mut newline_count: u32 = 0;

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    newline_count += 1;
                    last_newline_pos = Some(i);
                }
                b'\r' => {
                    newline_count += 1;
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    last_newline_pos = Some(i);
                }
                _ => {}
            }
            i += 1;
        }

        if let Some(last_nl) = last_newline_pos {
            self.generated_line += newline_count;
            self.generated_column = text[last_nl + 1..].encode_utf16().count() as u32;
        } else if text.is_ascii() {
            self.generated_column += text.len() as u32;
        } else {
            self.generated_column += text.encode_utf16().count() as u32;
        }
    }

    /// Compute line start byte offsets for the source text.
    #[expect(clippy::cast_possible_truncation)]
    fn compute_line_starts(source: &str) -> Vec<u32> {
        let mut starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push((i + 1) as u32);
            } else if b == b'\r' {
                if source.as_bytes().get(i + 1) == Some(&b'\n') {
                    continue;
                }
                starts.push((i + 1) as u32);
            }
        }
        starts
    }
}
