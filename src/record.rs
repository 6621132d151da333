//! The recursively-filterable record capability.

use crate::info::{FieldInfo, RecordInfo};
use crate::value::Value;

// -----------------------------------------------------------------------------
// Filterable

/// The capability a record type carries to opt into recursive descent by the
/// filtering engine.
///
/// A `Filterable` record exposes a compile-time descriptor table
/// ([`RecordInfo`]) and positional access to its field values. Nested records
/// that do *not* implement this trait are treated as opaque payloads and
/// copied through verbatim instead of being descended into.
///
/// Use [`#[derive(Filterable)]`](crate::derive::Filterable) rather than
/// implementing this by hand; the derive builds the descriptor table from
/// `#[patch(...)]` attributes and keeps `field_at` in sync with it.
///
/// # Examples
///
/// ```
/// use patchmap::derive::Filterable;
/// use patchmap::{Filterable as _, Nullable};
/// use serde::Serialize;
///
/// #[derive(Filterable, Clone, Debug, Serialize, Default)]
/// struct Patch {
///     #[patch(json = "id")]
///     id: Nullable<i64>,
///     #[patch(json = "label")]
///     label: Nullable<String>,
/// }
///
/// let patch = Patch::default();
/// let info = patch.record_info();
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.field_at(0).unwrap().name(), "id");
/// assert!(patch.field("label").is_some());
/// ```
pub trait Filterable: Value {
    /// Returns the descriptor table for this record type.
    fn record_info(&self) -> &'static RecordInfo;

    /// Returns the value of the field at `index`, in declaration order.
    ///
    /// Returns `None` if `index` is out of bounds.
    fn field_at(&self, index: usize) -> Option<&dyn Value>;

    /// Returns the value of the field named `name`.
    ///
    /// Returns `None` if no such field exists.
    fn field(&self, name: &str) -> Option<&dyn Value> {
        self.field_at(self.record_info().index_of(name)?)
    }

    /// Returns an iterator over `(descriptor, value)` pairs in declaration
    /// order.
    fn iter_fields(&self) -> FieldIter<'_>;
}

// -----------------------------------------------------------------------------
// Field iterator

/// An iterator over a record's field descriptors and values.
pub struct FieldIter<'a> {
    record: &'a dyn Filterable,
    index: usize,
}

impl<'a> FieldIter<'a> {
    /// Creates a new iterator for the given record.
    #[inline]
    pub fn new(record: &'a dyn Filterable) -> Self {
        FieldIter { record, index: 0 }
    }
}

impl<'a> Iterator for FieldIter<'a> {
    type Item = (&'static FieldInfo, &'a dyn Value);

    fn next(&mut self) -> Option<Self::Item> {
        let info = self.record.record_info().field_at(self.index)?;
        let value = self.record.field_at(self.index)?;
        self.index += 1;
        Some((info, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .record
            .record_info()
            .field_len()
            .saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FieldIter<'_> {}

// -----------------------------------------------------------------------------
// Tests
