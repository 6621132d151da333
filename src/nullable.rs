//! The tri-state nullable container.

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::{Value, ValueKind};

// -----------------------------------------------------------------------------
// Nullable

/// A value holder distinguishing *unset*, *explicitly null* and *has-value*.
///
/// `Option<T>` collapses "the caller never touched this" and "the caller
/// deliberately cleared this" into one state; `Nullable<T>` keeps them apart:
///
/// | state           | `is_set()` | `is_valid()` | payload        |
/// |-----------------|------------|--------------|----------------|
/// | unset (default) | `false`    | `false`      | `T::default()` |
/// | explicit null   | `true`     | `false`      | `T::default()` |
/// | has-value       | `true`     | `true`       | the value      |
///
/// Containers start unset; transitions go through [`set`], [`set_null`] and
/// [`unset`], or through deserialization/scanning (which always mark the
/// container set).
///
/// # Serialization
///
/// Serializing yields the format's null marker whenever the container is
/// unset or explicitly null, and the encoded payload otherwise.
/// Deserializing always produces a *set* container: the null marker yields
/// explicit null, anything else decodes the payload. To keep absent fields
/// unset, annotate them with `#[serde(default)]`:
///
/// ```
/// use patchmap::Nullable;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Default)]
/// struct Patch {
///     #[serde(default)]
///     name: Nullable<String>,
///     #[serde(default)]
///     email: Nullable<String>,
/// }
///
/// let patch: Patch = serde_json::from_str(r#"{ "email": null }"#).unwrap();
/// assert!(!patch.name.is_set());                    // absent: never touched
/// assert!(patch.email.is_set() && !patch.email.is_valid()); // explicit null
/// ```
///
/// # Examples
///
/// ```
/// use patchmap::Nullable;
///
/// let mut age = Nullable::<u32>::default();
/// assert!(!age.is_set());
///
/// age.set(36);
/// assert_eq!(age.as_option(), Some(&36));
///
/// age.set_null();
/// assert!(age.is_set());
/// assert!(!age.is_valid());
/// assert_eq!(age.as_option(), None);
/// ```
///
/// [`set`]: Nullable::set
/// [`set_null`]: Nullable::set_null
/// [`unset`]: Nullable::unset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nullable<T> {
    set: bool,
    valid: bool,
    value: T,
}

impl<T> Nullable<T> {
    /// Creates a container holding `value`.
    #[inline]
    pub const fn of(value: T) -> Self {
        Self {
            set: true,
            valid: true,
            value,
        }
    }

    /// Sets the value.
    #[inline]
    pub fn set(&mut self, value: T) {
        self.set = true;
        self.valid = true;
        self.value = value;
    }

    /// Returns `true` if the value was set (including to explicit null).
    #[inline]
    pub const fn is_set(&self) -> bool {
        self.set
    }

    /// Returns `true` if the container holds a live payload (set and not
    /// null).
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns a reference to the stored payload.
    ///
    /// Meaningful only when the container [is valid](Nullable::is_valid);
    /// otherwise this is the payload type's default.
    #[inline]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the container and returns the stored payload.
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the payload as an `Option`: `Some` only when set and valid.
    #[inline]
    pub const fn as_option(&self) -> Option<&T> {
        if self.set && self.valid {
            Some(&self.value)
        } else {
            None
        }
    }
}

impl<T: Default> Nullable<T> {
    /// Creates a container in the explicit-null state.
    #[inline]
    pub fn null() -> Self {
        Self {
            set: true,
            valid: false,
            value: T::default(),
        }
    }

    /// Sets the container to explicit null, resetting the payload.
    #[inline]
    pub fn set_null(&mut self) {
        self.set = true;
        self.valid = false;
        self.value = T::default();
    }

    /// Returns the container to the unset state, resetting the payload.
    #[inline]
    pub fn unset(&mut self) {
        self.set = false;
        self.valid = false;
        self.value = T::default();
    }
}

impl<T: Default> Default for Nullable<T> {
    /// The unset state.
    #[inline]
    fn default() -> Self {
        Self {
            set: false,
            valid: false,
            value: T::default(),
        }
    }
}

impl<T> From<T> for Nullable<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::of(value)
    }
}

impl<T: Default> From<Option<T>> for Nullable<T> {
    /// `Some` becomes has-value, `None` becomes explicit null.
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::of(value),
            None => Self::null(),
        }
    }
}

// -----------------------------------------------------------------------------
// Serde integration

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.set || !self.valid {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(&self.value)
        }
    }
}

impl<'de, T> Deserialize<'de> for Nullable<T>
where
    T: Deserialize<'de> + Default,
{
    /// Always yields a set container; the null marker yields explicit null.
    /// Payload decode failures propagate as the deserializer's error.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Self::of(value),
            None => Self::null(),
        })
    }
}

// -----------------------------------------------------------------------------
// NullableValue capability

/// The tri-state capability, as consumed by the filtering engine.
///
/// Exposes exactly what the engine needs: whether the container was touched
/// at all, and the effective value when it was — `Some(payload)` for
/// has-value, `None` for explicit null. External callers should use the
/// inherent [`Nullable`] API instead.
pub trait NullableValue {
    /// Returns `true` if the container was set.
    fn is_set(&self) -> bool;

    /// Returns the effective value: the payload when set and valid, `None`
    /// when explicitly null (or unset).
    fn effective_value(&self) -> Option<&dyn Value>;
}

impl<T: Value> NullableValue for Nullable<T> {
    #[inline]
    fn is_set(&self) -> bool {
        self.set
    }

    #[inline]
    fn effective_value(&self) -> Option<&dyn Value> {
        if self.set && self.valid {
            Some(&self.value)
        } else {
            None
        }
    }
}

impl<T> Value for Nullable<T>
where
    T: Value + Clone + Serialize,
{
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Nullable
    }

    #[inline]
    fn as_nullable(&self) -> Option<&dyn NullableValue> {
        Some(self)
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Tests
