//! The storage-layer boundary.
//!
//! Database drivers exchange a small closed set of scalar shapes. This module
//! models that boundary as [`StorageValue`] and two conversion traits:
//! [`ToStorage`] (produce a storage value) and [`FromStorage`] (consume one).
//! The generic coercion routine [`convert_assign`] covers the scalar
//! combinations; custom payload types plug in by implementing
//! [`FromStorage`] themselves (their "decode hook").
//!
//! [`Nullable<T>`] integrates on both sides: it renders as
//! [`StorageValue::Null`] while unset or explicitly null, and scanning a
//! storage value into it always marks it set.

mod convert;

pub use convert::{ConvertError, convert_assign};

use crate::nullable::Nullable;

// -----------------------------------------------------------------------------
// StorageValue

/// A value crossing the storage-layer boundary.
///
/// The variants mirror the canonical scan types of SQL driver interfaces:
/// null, boolean, 64-bit integer, double, text and raw bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum StorageValue {
    /// The explicit absence marker.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl StorageValue {
    /// Returns a short name for the variant, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }

    /// Returns `true` for the absence marker.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

// -----------------------------------------------------------------------------
// Conversion traits

/// Types that can produce a storage-layer value.
pub trait ToStorage {
    /// Converts `self` into a [`StorageValue`].
    fn to_storage(&self) -> Result<StorageValue, ConvertError>;
}

/// Types that can be assembled from a storage-layer value.
///
/// Implementations perform best-effort scalar coercion (see
/// [`convert_assign`] for the supported combinations). Custom types
/// implement this directly — typically decoding from
/// [`StorageValue::Bytes`] — which is how byte payloads reach a type's own
/// decode hook.
pub trait FromStorage: Sized {
    /// Builds a value from the given [`StorageValue`].
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError>;
}

// -----------------------------------------------------------------------------
// Nullable integration

impl<T: ToStorage> ToStorage for Nullable<T> {
    /// Unset and explicitly null containers render as the absence marker;
    /// otherwise the payload's own conversion decides.
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        if !self.is_set() || !self.is_valid() {
            return Ok(StorageValue::Null);
        }

        self.value().to_storage()
    }
}

impl<T> Nullable<T>
where
    T: FromStorage + Default,
{
    /// Consumes a storage value into this container.
    ///
    /// The container is always marked set. The absence marker yields explicit
    /// null with a default payload; anything else goes through
    /// [`convert_assign`]. On a conversion failure the container is left set
    /// and invalid with a default payload, and the error is propagated.
    ///
    /// # Examples
    ///
    /// ```
    /// use patchmap::Nullable;
    /// use patchmap::storage::StorageValue;
    ///
    /// let mut count = Nullable::<i64>::default();
    /// count.scan(&StorageValue::Int(7)).unwrap();
    /// assert_eq!(count.as_option(), Some(&7));
    ///
    /// count.scan(&StorageValue::Null).unwrap();
    /// assert!(count.is_set());
    /// assert!(!count.is_valid());
    /// ```
    pub fn scan(&mut self, src: &StorageValue) -> Result<(), ConvertError> {
        if src.is_null() {
            self.set_null();
            return Ok(());
        }

        match T::from_storage(src) {
            Ok(value) => {
                self.set(value);
                Ok(())
            }
            Err(err) => {
                self.set_null();
                Err(err)
            }
        }
    }
}

impl<T> FromStorage for Nullable<T>
where
    T: FromStorage + Default,
{
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
        let mut out = Self::default();
        out.scan(value)?;
        Ok(out)
    }
}

// -----------------------------------------------------------------------------
// Tests
