use oxc_span::Span;

use crate::engine::EngineError;

/// A failure of [`transform_classes`](crate::transform_classes).
///
/// Token lookup failures are not represented here: an unresolvable token
/// passes through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The style engine failed while generating the component's CSS.
    ///
    /// The engine's shortcuts table has been restored by the time this is returned.
    #[error("failed to generate styles for {filename}: {source}")]
    Generation {
        filename: String,
        #[source]
        source: EngineError,
    },

    /// Two code updates address overlapping ranges of the original source.
    #[error(
        "overlapping code updates in {filename}: {}..{} and {}..{}",
        .first.start,
        .first.end,
        .second.start,
        .second.end
    )]
    OverlappingUpdates {
        filename: String,
        first: Span,
        second: Span,
    },

    /// A code update points outside the source or into the middle of a character.
    #[error("code update {}..{} is out of bounds in {filename}", .span.start, .span.end)]
    PatchOutOfBounds { filename: String, span: Span },
}

impl TransformError {
    pub fn filename(&self) -> &str {
        match self {
            Self::Generation { filename, .. }
            | Self::OverlappingUpdates { filename, .. }
            | Self::PatchOutOfBounds { filename, .. } => filename,
        }
    }
}
