use std::any::{Any, TypeId};
use std::fmt;

use serde_core::{Serialize, Serializer};

use crate::map::PatchMap;
use crate::nullable::NullableValue;
use crate::record::Filterable;

// -----------------------------------------------------------------------------
// ValueKind

/// The declared kind of a [`Value`], as seen by the filtering engine.
///
/// The kind decides which branch of the engine handles a field or map entry;
/// the capability accessors on [`Value`] decide what happens inside that
/// branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A fixed-shape aggregate of named fields (a struct).
    Record,
    /// Any mapping shape. Only [`PatchMap`] is descended into; typed maps
    /// such as `HashMap<String, i32>` are copied through verbatim.
    Map,
    /// A tri-state [`Nullable`](crate::Nullable) container.
    Nullable,
    /// Everything else: scalars, sequences, opaque payloads.
    Opaque,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Map => f.write_str("map"),
            Self::Nullable => f.write_str("nullable"),
            Self::Opaque => f.write_str("opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// Value

/// The erased value model the filtering engine operates on.
///
/// Every value that can appear as a record field or a [`PatchMap`] entry
/// implements this trait. It carries just enough structure for the engine:
///
/// - a [kind](Value::kind) classification,
/// - three narrow capability probes ([`as_filterable`], [`as_nullable`],
///   [`as_patch_map`]) that return `None` by default,
/// - [`clone_value`] for verbatim copy-through into an output mapping,
/// - type-erased serialization (via [`erased_serde`]), so a `Box<dyn Value>`
///   can be handed to any serde serializer afterwards.
///
/// Implementations exist for the std scalars and common containers (see
/// [`crate::impls`]), for [`Nullable<T>`](crate::Nullable), for [`PatchMap`],
/// and for every `#[derive(Filterable)]` record.
///
/// # Examples
///
/// ```
/// use patchmap::{Value, ValueKind};
///
/// let value: &dyn Value = &42_i64;
/// assert_eq!(value.kind(), ValueKind::Opaque);
/// assert_eq!(value.downcast_ref::<i64>(), Some(&42));
/// ```
///
/// [`as_filterable`]: Value::as_filterable
/// [`as_nullable`]: Value::as_nullable
/// [`as_patch_map`]: Value::as_patch_map
/// [`clone_value`]: Value::clone_value
pub trait Value: Any + Send + Sync + fmt::Debug + erased_serde::Serialize {
    /// Returns the declared kind of this value.
    fn kind(&self) -> ValueKind;

    /// Returns the [`TypeId`] of the underlying type.
    ///
    /// Calling `type_id` on a `Box<dyn Value>` yields the id of the box, not
    /// the payload; this method always reports the concrete type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Returns the full type name of the underlying type.
    ///
    /// Diagnostic only: the exact string is not a stable identifier.
    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns this value as a recursively-filterable record, if it is one.
    #[inline]
    fn as_filterable(&self) -> Option<&dyn Filterable> {
        None
    }

    /// Returns this value as a tri-state container, if it is one.
    #[inline]
    fn as_nullable(&self) -> Option<&dyn NullableValue> {
        None
    }

    /// Returns this value as a generic string-keyed mapping, if it is one.
    ///
    /// Typed maps (`HashMap<String, i32>` and friends) return `None` here
    /// even though their [kind](Value::kind) is [`ValueKind::Map`]; only the
    /// generic mapping participates in recursive filtering.
    #[inline]
    fn as_patch_map(&self) -> Option<&PatchMap> {
        None
    }

    /// Clones this value into a fresh boxed value.
    ///
    /// The engine uses this for every verbatim copy-through, so output
    /// mappings never alias the caller's data.
    fn clone_value(&self) -> Box<dyn Value>;
}

erased_serde::serialize_trait_object!(Value);

impl dyn Value {
    /// Returns `true` if the underlying value is of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use patchmap::Value;
    /// let value: &dyn Value = &"hello".to_string();
    /// assert!(value.is::<String>());
    /// assert!(!value.is::<i64>());
    /// ```
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// Returns `None` if the underlying value is not a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }
}

// -----------------------------------------------------------------------------
// Null

/// The explicit null marker.
///
/// A [`PatchMap`] entry holding `Null` means "this key was deliberately
/// cleared", as opposed to the key being absent (never touched). It is what
/// the engine emits for a container that is set but invalid, and it
/// serializes as the null marker of the target format.
///
/// # Examples
///
/// ```
/// use patchmap::{Null, PatchMap};
///
/// let mut map = PatchMap::new();
/// map.insert("email", Null);
///
/// assert_eq!(
///     serde_json::to_string(&map).unwrap(),
///     r#"{"email":null}"#,
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl Serialize for Null {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_none()
    }
}

impl Value for Null {
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Opaque
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(Null)
    }
}

// -----------------------------------------------------------------------------
// Tests
