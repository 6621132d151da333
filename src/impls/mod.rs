//! [`Value`] implementations for std scalars and containers.
//!
//! Scalars, strings, sequences and `Option`s are opaque to the filtering
//! engine: they are copied through verbatim. Typed maps keyed by `String`
//! report the map kind but are still copied verbatim — only
//! [`PatchMap`](crate::PatchMap) is the generic string-to-anything mapping
//! the engine descends into.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_core::Serialize;

use crate::value::{Value, ValueKind};

// -----------------------------------------------------------------------------
// Opaque scalars

macro_rules! impl_opaque_value {
    ($($ty:ty),* $(,)?) => {$(
        impl Value for $ty {
            #[inline]
            fn kind(&self) -> ValueKind {
                ValueKind::Opaque
            }

            #[inline]
            fn clone_value(&self) -> Box<dyn Value> {
                Box::new(Clone::clone(self))
            }
        }
    )*};
}

impl_opaque_value!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

// -----------------------------------------------------------------------------
// Opaque containers

impl<T> Value for Vec<T>
where
    T: Serialize + Clone + Send + Sync + fmt::Debug + 'static,
{
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Opaque
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

impl<T> Value for Option<T>
where
    T: Serialize + Clone + Send + Sync + fmt::Debug + 'static,
{
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Opaque
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Typed maps

// Map kind, but no `as_patch_map`: a typed map is one of the "other mapping
// shapes" and is copied through without descent.

impl<V> Value for HashMap<String, V>
where
    V: Serialize + Clone + Send + Sync + fmt::Debug + 'static,
{
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Map
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

impl<V> Value for BTreeMap<String, V>
where
    V: Serialize + Clone + Send + Sync + fmt::Debug + 'static,
{
    #[inline]
    fn kind(&self) -> ValueKind {
        ValueKind::Map
    }

    #[inline]
    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::value::{Value, ValueKind};

    #[test]
    fn scalar_kinds() {
        assert_eq!(1_i64.kind(), ValueKind::Opaque);
        assert_eq!("s".kind(), ValueKind::Opaque);
        assert_eq!(vec![1_i64].kind(), ValueKind::Opaque);
        assert_eq!(Some(1_i64).kind(), ValueKind::Opaque);
    }

    #[test]
    fn typed_maps_are_not_patch_maps() {
        let map: HashMap<String, i64> = [("a".to_string(), 1)].into_iter().collect();
        assert_eq!(map.kind(), ValueKind::Map);
        assert!(map.as_patch_map().is_none());
    }

    #[test]
    fn boxed_value_delegates() {
        let boxed: Box<dyn Value> = Box::new(3_i64);
        assert_eq!(boxed.kind(), ValueKind::Opaque);
        assert!((*boxed).is::<i64>());

        let cloned = boxed.clone_value();
        assert_eq!(cloned.downcast_ref::<i64>(), Some(&3));
    }
}
