//! Options for the class transform.
//!
//! Hosts usually deserialize them from their own JSON configuration; every field
//! has a default so a partial object (or `{}`) is accepted.

use serde::Deserialize;

use crate::naming;

/// Prefix used for combined class names when none is configured.
pub const DEFAULT_CLASS_PREFIX: &str = "uno-";

/// A caller-supplied replacement for [`naming::hash`].
pub type HashFn = dyn Fn(&str) -> String + Send + Sync;

/// Options for transforming the classes of one component.
#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformClassesOptions {
    /// Collapse all utilities of one class list into a single generated class.
    ///
    /// When `false`, each utility gets its own generated class
    /// (`_mb-1_7dkb0w`). Defaults to `true`.
    pub combine: bool,

    /// Prefix for combined class names. Defaults to `"uno-"`.
    pub class_prefix: String,

    /// Custom hash function used in place of [`naming::hash`].
    ///
    /// Must be deterministic: the same input has to produce the same output
    /// on every call, otherwise generated names drift between builds.
    #[serde(skip)]
    pub hash_fn: Option<Box<HashFn>>,
}

impl Default for TransformClassesOptions {
    fn default() -> Self {
        Self {
            combine: true,
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            hash_fn: None,
        }
    }
}

impl std::fmt::Debug for TransformClassesOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformClassesOptions")
            .field("combine", &self.combine)
            .field("class_prefix", &self.class_prefix)
            .field("hash_fn", &self.hash_fn.as_ref().map(|_| "Some(<fn>)"))
            .finish()
    }
}

impl TransformClassesOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable combining utilities into one class.
    #[must_use]
    pub fn with_combine(mut self, combine: bool) -> Self {
        self.combine = combine;
        self
    }

    /// Set the prefix for combined class names.
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Replace the default hash function.
    #[must_use]
    pub fn with_hash_fn(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.hash_fn = Some(Box::new(f));
        self
    }

    /// Hash `input` with the configured hash function.
    pub fn hash(&self, input: &str) -> String {
        match &self.hash_fn {
            Some(hash_fn) => hash_fn(input),
            None => naming::hash(input),
        }
    }
}
