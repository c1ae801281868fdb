//! The style-rule engine seen by the transform.
//!
//! The engine itself (utility resolution and CSS emission) lives outside this
//! crate. The transform only needs the capabilities described by
//! [`StyleEngine`]: resolving a token, reading and extending the ordered
//! shortcuts table, and generating CSS for a set of selectors.

mod shared;
mod static_engine;

pub use shared::SharedEngine;
pub use static_engine::StaticEngine;

/// One CSS rule produced by resolving a utility token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUtil {
    /// Position of the matching rule in the engine's rule table.
    pub index: usize,
    /// The selector the engine would print for the token.
    pub selector: String,
    /// Declarations, e.g. `margin-bottom:0.25rem`.
    pub body: String,
}

/// A named macro expanding to a list of utility tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub name: String,
    pub expansion: Vec<String>,
}

impl Shortcut {
    pub fn new<I, S>(name: impl Into<String>, expansion: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            expansion: expansion.into_iter().map(Into::into).collect(),
        }
    }
}

/// Options passed to [`StyleEngine::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Emit the engine's preflight (reset) CSS.
    pub preflights: bool,
    /// Include the engine's safelisted tokens.
    pub safelist: bool,
    /// Strip comments and whitespace from the output.
    pub minify: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            preflights: true,
            safelist: true,
            minify: false,
        }
    }
}

impl GenerateOptions {
    /// Options for a component's own styles: only the requested selectors,
    /// minified so later selector rewriting never meets a comment.
    pub const fn component() -> Self {
        Self {
            preflights: false,
            safelist: false,
            minify: true,
        }
    }
}

/// An error reported by the style engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capabilities the transform needs from a style-rule engine.
pub trait StyleEngine {
    /// Resolve a single token.
    ///
    /// `Ok(None)` means the engine has no rule for the token. Errors are
    /// treated the same way by the transform.
    fn resolve_token(&self, token: &str) -> Result<Option<Vec<ParsedUtil>>, EngineError>;

    /// The ordered shortcuts table.
    fn shortcuts(&self) -> &[Shortcut];

    /// Mutable access to the shortcuts table.
    ///
    /// Prefer [`ShortcutsGuard`], which restores the table when dropped.
    fn shortcuts_mut(&mut self) -> &mut Vec<Shortcut>;

    /// Generate CSS for exactly `selectors` (plus preflights/safelist when enabled).
    fn generate(&self, selectors: &[String], options: &GenerateOptions) -> Result<String, EngineError>;

    /// Whether `token` names an entry of the shortcuts table.
    fn is_shortcut(&self, token: &str) -> bool {
        self.shortcuts().iter().any(|shortcut| shortcut.name == token)
    }
}

/// Extends an engine's shortcuts table for the guard's lifetime.
///
/// The original table is snapshotted on creation and written back on drop, so
/// component-local entries never outlive the guard, whether generation
/// returns, fails, or panics.
pub struct ShortcutsGuard<'e, E: StyleEngine + ?Sized> {
    engine: &'e mut E,
    original: Vec<Shortcut>,
}

impl<'e, E: StyleEngine + ?Sized> ShortcutsGuard<'e, E> {
    /// Snapshot the table, then append `extra`.
    pub fn extend(engine: &'e mut E, extra: impl IntoIterator<Item = Shortcut>) -> Self {
        let original = engine.shortcuts().to_vec();
        engine.shortcuts_mut().extend(extra);
        Self { engine, original }
    }

    /// The engine, with the extended table in place.
    pub fn engine(&self) -> &E {
        self.engine
    }
}

impl<E: StyleEngine + ?Sized> Drop for ShortcutsGuard<'_, E> {
    fn drop(&mut self) {
        *self.engine.shortcuts_mut() = std::mem::take(&mut self.original);
    }
}
