use parking_lot::{Mutex, MutexGuard};

use super::StyleEngine;
use crate::{TransformClassesOptions, TransformError, TransformOutput, transform_classes};

/// An engine shared between components compiled concurrently.
///
/// A transform temporarily extends the engine's shortcuts table, and token
/// resolution reads that same table, so whole transforms are serialized
/// rather than individual engine calls.
#[derive(Debug, Default)]
pub struct SharedEngine<E> {
    inner: Mutex<E>,
}

impl<E: StyleEngine> SharedEngine<E> {
    pub fn new(engine: E) -> Self {
        Self {
            inner: Mutex::new(engine),
        }
    }

    /// Run [`transform_classes`] while holding the engine lock.
    pub fn transform(
        &self,
        source_text: &str,
        filename: &str,
        options: &TransformClassesOptions,
    ) -> Result<Option<TransformOutput>, TransformError> {
        let mut engine = self.inner.lock();
        transform_classes(source_text, filename, &mut *engine, options)
    }

    /// Lock the engine, e.g. to update its configuration between builds.
    pub fn lock(&self) -> MutexGuard<'_, E> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> E {
        self.inner.into_inner()
    }
}
