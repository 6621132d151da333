use std::any::type_name;
use std::error;
use std::fmt;

use crate::storage::{FromStorage, StorageValue, ToStorage};

// -----------------------------------------------------------------------------
// ConvertError

/// An error raised while converting across the storage boundary.
#[derive(Debug)]
pub enum ConvertError {
    /// The source and destination shapes cannot be reconciled.
    TypeMismatch {
        /// Kind name of the source storage value.
        value: &'static str,
        /// Type name of the destination.
        target: &'static str,
    },
    /// The combination is supported but the concrete value does not fit the
    /// destination (integer overflow, float overflow, negative to unsigned).
    OutOfRange {
        value: String,
        target: &'static str,
    },
    /// A byte payload reached the destination type's decode hook and failed
    /// to decode.
    InvalidPayload {
        target: &'static str,
        reason: String,
    },
}

impl ConvertError {
    /// Shorthand for a [`ConvertError::TypeMismatch`] against `src`.
    pub const fn mismatch(src: &StorageValue, target: &'static str) -> Self {
        Self::TypeMismatch {
            value: src.kind_name(),
            target,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { value, target } => {
                write!(f, "cannot convert storage value of kind `{value}` to `{target}`")
            }
            Self::OutOfRange { value, target } => {
                write!(f, "value `{value}` is out of range for `{target}`")
            }
            Self::InvalidPayload { target, reason } => {
                write!(f, "failed to decode payload for `{target}`: {reason}")
            }
        }
    }
}

impl error::Error for ConvertError {}

// -----------------------------------------------------------------------------
// convert_assign

/// Assigns a storage value into `dest`, coercing where possible.
///
/// Supported coercions, at minimum:
///
/// - identical-shape passthrough (`Text` to `String`, `Int` to `i64`, ...);
/// - integer and float narrowing/widening with range checks
///   ([`ConvertError::OutOfRange`] when the value does not fit);
/// - byte payloads into text (UTF-8 validated);
/// - byte payloads into custom types through their own [`FromStorage`]
///   implementation.
///
/// Unsupported combinations fail with [`ConvertError::TypeMismatch`]. On
/// error `dest` is left untouched.
///
/// # Examples
///
/// ```
/// use patchmap::storage::{StorageValue, convert_assign};
///
/// let mut n = 0_u16;
/// convert_assign(&mut n, &StorageValue::Int(512)).unwrap();
/// assert_eq!(n, 512);
///
/// assert!(convert_assign(&mut n, &StorageValue::Int(100_000)).is_err());
/// assert_eq!(n, 512); // untouched on failure
/// ```
#[inline]
pub fn convert_assign<T: FromStorage>(
    dest: &mut T,
    src: &StorageValue,
) -> Result<(), ConvertError> {
    *dest = T::from_storage(src)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Integer conversions

macro_rules! impl_int_storage {
    ($($ty:ty),* $(,)?) => {$(
        impl FromStorage for $ty {
            fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
                match value {
                    StorageValue::Int(v) => <$ty>::try_from(*v).map_err(|_| {
                        ConvertError::OutOfRange {
                            value: v.to_string(),
                            target: type_name::<$ty>(),
                        }
                    }),
                    other => Err(ConvertError::mismatch(other, type_name::<$ty>())),
                }
            }
        }

        impl ToStorage for $ty {
            fn to_storage(&self) -> Result<StorageValue, ConvertError> {
                i64::try_from(*self)
                    .map(StorageValue::Int)
                    .map_err(|_| ConvertError::OutOfRange {
                        value: self.to_string(),
                        target: type_name::<i64>(),
                    })
            }
        }
    )*};
}

impl_int_storage!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Float conversions

impl FromStorage for f64 {
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
        match value {
            StorageValue::Float(v) => Ok(*v),
            StorageValue::Int(v) => Ok(*v as f64),
            other => Err(ConvertError::mismatch(other, type_name::<f64>())),
        }
    }
}

impl FromStorage for f32 {
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
        let wide = f64::from_storage(value)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(ConvertError::OutOfRange {
                value: wide.to_string(),
                target: type_name::<f32>(),
            });
        }
        Ok(wide as f32)
    }
}

impl ToStorage for f64 {
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        Ok(StorageValue::Float(*self))
    }
}

impl ToStorage for f32 {
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        Ok(StorageValue::Float(f64::from(*self)))
    }
}

// -----------------------------------------------------------------------------
// Bool conversions

impl FromStorage for bool {
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
        match value {
            StorageValue::Bool(v) => Ok(*v),
            // Drivers commonly surface booleans as 0/1 integers.
            StorageValue::Int(0) => Ok(false),
            StorageValue::Int(1) => Ok(true),
            StorageValue::Int(v) => Err(ConvertError::OutOfRange {
                value: v.to_string(),
                target: type_name::<bool>(),
            }),
            other => Err(ConvertError::mismatch(other, type_name::<bool>())),
        }
    }
}

impl ToStorage for bool {
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        Ok(StorageValue::Bool(*self))
    }
}

// -----------------------------------------------------------------------------
// Text and byte conversions

impl FromStorage for String {
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
        match value {
            StorageValue::Text(v) => Ok(v.clone()),
            StorageValue::Bytes(v) => {
                String::from_utf8(v.clone()).map_err(|err| ConvertError::InvalidPayload {
                    target: type_name::<String>(),
                    reason: err.to_string(),
                })
            }
            other => Err(ConvertError::mismatch(other, type_name::<String>())),
        }
    }
}

impl ToStorage for String {
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        Ok(StorageValue::Text(self.clone()))
    }
}

impl ToStorage for &str {
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        Ok(StorageValue::Text((*self).to_string()))
    }
}

impl FromStorage for Vec<u8> {
    fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
        match value {
            StorageValue::Bytes(v) => Ok(v.clone()),
            StorageValue::Text(v) => Ok(v.clone().into_bytes()),
            other => Err(ConvertError::mismatch(other, type_name::<Vec<u8>>())),
        }
    }
}

impl ToStorage for Vec<u8> {
    fn to_storage(&self) -> Result<StorageValue, ConvertError> {
        Ok(StorageValue::Bytes(self.clone()))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{ConvertError, FromStorage, StorageValue, ToStorage, convert_assign};

    #[test]
    fn int_widths() {
        let src = StorageValue::Int(1);
        assert_eq!(i8::from_storage(&src).unwrap(), 1);
        assert_eq!(i16::from_storage(&src).unwrap(), 1);
        assert_eq!(i32::from_storage(&src).unwrap(), 1);
        assert_eq!(i64::from_storage(&src).unwrap(), 1);
        assert_eq!(u8::from_storage(&src).unwrap(), 1);
        assert_eq!(u16::from_storage(&src).unwrap(), 1);
        assert_eq!(u32::from_storage(&src).unwrap(), 1);
        assert_eq!(u64::from_storage(&src).unwrap(), 1);
        assert_eq!(usize::from_storage(&src).unwrap(), 1);
    }

    #[test]
    fn int_out_of_range() {
        let err = i8::from_storage(&StorageValue::Int(400)).unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { .. }));

        let err = u32::from_storage(&StorageValue::Int(-1)).unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { .. }));
    }

    #[test]
    fn floats() {
        assert_eq!(f64::from_storage(&StorageValue::Float(1.5)).unwrap(), 1.5);
        assert_eq!(f32::from_storage(&StorageValue::Float(1.5)).unwrap(), 1.5);
        assert_eq!(f64::from_storage(&StorageValue::Int(2)).unwrap(), 2.0);

        let err = f32::from_storage(&StorageValue::Float(1e300)).unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { .. }));
    }

    #[test]
    fn bools() {
        assert!(bool::from_storage(&StorageValue::Bool(true)).unwrap());
        assert!(!bool::from_storage(&StorageValue::Int(0)).unwrap());
        assert!(bool::from_storage(&StorageValue::Int(1)).unwrap());
        assert!(bool::from_storage(&StorageValue::Int(2)).is_err());
    }

    #[test]
    fn bytes_to_text() {
        let src = StorageValue::Bytes(b"foo".to_vec());
        assert_eq!(String::from_storage(&src).unwrap(), "foo");

        let err = String::from_storage(&StorageValue::Bytes(vec![0xff, 0xfe])).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidPayload { .. }));
    }

    #[test]
    fn mismatch() {
        let err = i64::from_storage(&StorageValue::Text("1".to_string())).unwrap_err();
        assert!(matches!(err, ConvertError::TypeMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "cannot convert storage value of kind `text` to `i64`",
        );
    }

    #[test]
    fn convert_assign_in_place() {
        let mut s = String::new();
        convert_assign(&mut s, &StorageValue::Text("abc".to_string())).unwrap();
        assert_eq!(s, "abc");

        let mut n = 5_i64;
        assert!(convert_assign(&mut n, &StorageValue::Bool(true)).is_err());
        assert_eq!(n, 5);
    }

    // A custom payload type with its own decode hook, fed from a byte
    // payload the way drivers deliver JSON columns.
    #[derive(Debug, PartialEq, Default, serde::Deserialize)]
    struct JsonColumn {
        id: i64,
        label: String,
    }

    impl FromStorage for JsonColumn {
        fn from_storage(value: &StorageValue) -> Result<Self, ConvertError> {
            match value {
                StorageValue::Bytes(bytes) => {
                    serde_json::from_slice(bytes).map_err(|err| ConvertError::InvalidPayload {
                        target: std::any::type_name::<JsonColumn>(),
                        reason: err.to_string(),
                    })
                }
                other => Err(ConvertError::mismatch(
                    other,
                    std::any::type_name::<JsonColumn>(),
                )),
            }
        }
    }

    #[test]
    fn custom_decode_hook() {
        let src = StorageValue::Bytes(br#"{ "id": 7, "label": "x" }"#.to_vec());
        assert_eq!(
            JsonColumn::from_storage(&src).unwrap(),
            JsonColumn {
                id: 7,
                label: "x".to_string()
            },
        );

        let err = JsonColumn::from_storage(&StorageValue::Bytes(b"{".to_vec())).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidPayload { .. }));
    }

    #[test]
    fn to_storage_scalars() {
        assert_eq!(3_i32.to_storage().unwrap(), StorageValue::Int(3));
        assert_eq!(true.to_storage().unwrap(), StorageValue::Bool(true));
        assert_eq!(
            "s".to_storage().unwrap(),
            StorageValue::Text("s".to_string())
        );
        assert_eq!(1.5_f32.to_storage().unwrap(), StorageValue::Float(1.5));

        let err = u64::MAX.to_storage().unwrap_err();
        assert!(matches!(err, ConvertError::OutOfRange { .. }));
    }
}
