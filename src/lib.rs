#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `patchmap::...` paths. This alias lets the generated
// code resolve inside this crate as well (doc tests and unit tests included).
extern crate self as patchmap;

// -----------------------------------------------------------------------------
// Modules

mod value;

pub mod filter;
pub mod impls;
pub mod info;
pub mod map;
pub mod nullable;
pub mod record;
pub mod storage;

// -----------------------------------------------------------------------------
// Top-level exports

pub use filter::{FilterError, FilterOptions, filter_map, filter_record, filter_record_with};
pub use map::PatchMap;
pub use nullable::{Nullable, NullableValue};
pub use record::Filterable;
pub use value::{Null, Value, ValueKind};

pub use patchmap_derive as derive;
