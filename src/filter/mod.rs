//! The recursive filtering engine.
//!
//! Given a record or a generic string-keyed mapping, the engine produces a
//! fresh [`PatchMap`] containing only the populated entries:
//!
//! - unset [`Nullable`](crate::Nullable) fields vanish,
//! - explicitly-null ones survive as [`Null`](crate::Null),
//! - nested filterable records are descended into (and omitted entirely when
//!   they filter down to nothing),
//! - embedded records are promoted into their parent,
//! - everything else is copied through verbatim.
//!
//! The traversal is a pure projection: no side effects, no aliasing of the
//! input, recursion bounded by the input's nesting depth.

mod error;
mod options;

pub use error::FilterError;
pub use options::{DEFAULT_TAG, FilterOptions};

use crate::map::PatchMap;
use crate::nullable::NullableValue;
use crate::record::Filterable;
use crate::value::{Null, Value, ValueKind};

// -----------------------------------------------------------------------------
// Entry points

/// Filters a record down to its populated fields, using the default tag
/// namespace (`"json"`) for key discovery.
///
/// Fails with [`FilterError::NilInput`] when `record` is `None` and with
/// [`FilterError::NotARecord`] when the value is not a filterable record.
/// On success the result is never conceptually nil — an empty [`PatchMap`]
/// is a valid outcome.
///
/// # Examples
///
/// ```
/// use patchmap::derive::Filterable;
/// use patchmap::{Nullable, filter_record};
/// use serde::Serialize;
///
/// #[derive(Filterable, Clone, Debug, Serialize, Default)]
/// struct Patch {
///     #[patch(json = "a")]
///     a: Nullable<String>,
///     #[patch(json = "b")]
///     b: String,
/// }
///
/// let patch = Patch { a: Nullable::default(), b: "x".to_string() };
/// let map = filter_record(Some(&patch)).unwrap();
///
/// // The unset `a` vanished; the plain `b` copied through.
/// assert_eq!(
///     serde_json::to_value(&map).unwrap(),
///     serde_json::json!({ "b": "x" }),
/// );
/// ```
#[inline]
pub fn filter_record(record: Option<&dyn Value>) -> Result<PatchMap, FilterError> {
    filter_record_with(record, FilterOptions::new())
}

/// Filters a record down to its populated fields with explicit
/// [`FilterOptions`].
///
/// Switching the tag namespace restricts the output to fields carrying a tag
/// under that namespace:
///
/// ```
/// use patchmap::derive::Filterable;
/// use patchmap::{FilterOptions, Nullable, filter_record_with};
/// use serde::Serialize;
///
/// #[derive(Filterable, Clone, Debug, Serialize, Default)]
/// struct Patch {
///     #[patch(json = "name", db = "name")]
///     name: String,
///     #[patch(json = "note")]
///     note: String,
/// }
///
/// let patch = Patch { name: "n".into(), note: "x".into() };
/// let map = filter_record_with(Some(&patch), FilterOptions::new().tag("db")).unwrap();
///
/// // `note` has no `db` tag and is omitted.
/// assert_eq!(
///     serde_json::to_value(&map).unwrap(),
///     serde_json::json!({ "name": "n" }),
/// );
/// ```
pub fn filter_record_with(
    record: Option<&dyn Value>,
    options: FilterOptions,
) -> Result<PatchMap, FilterError> {
    let value = record.ok_or(FilterError::NilInput)?;
    let record = value.as_filterable().ok_or(FilterError::NotARecord {
        type_name: value.type_name(),
        kind: value.kind(),
    })?;

    Ok(filter_record_inner(options.tag_name(), record))
}

/// Filters a generic string-keyed mapping down to its populated entries.
///
/// Fails with [`FilterError::NilInput`] when `mapping` is `None`.
///
/// # Examples
///
/// ```
/// use patchmap::{FilterError, Nullable, PatchMap, filter_map};
///
/// let mut map = PatchMap::new();
/// map.insert("k", Nullable::<String>::null());
/// map.insert("gone", Nullable::<String>::default());
///
/// let filtered = filter_map(Some(&map)).unwrap();
/// assert_eq!(
///     serde_json::to_value(&filtered).unwrap(),
///     serde_json::json!({ "k": null }),
/// );
///
/// assert!(matches!(filter_map(None), Err(FilterError::NilInput)));
/// ```
pub fn filter_map(mapping: Option<&PatchMap>) -> Result<PatchMap, FilterError> {
    let mapping = mapping.ok_or(FilterError::NilInput)?;
    Ok(filter_map_inner(mapping))
}

// -----------------------------------------------------------------------------
// Recursion

// Field walk, in declaration order:
// 1. no tag entry and not embedded        -> skip
// 2. key = first `,`-segment of the tag
// 3. key "-"                              -> skip
//    key empty, not embedded              -> skip
//    key empty, embedded, kind != record  -> skip
// 4. record kind: filterable -> recurse (merge or nest),
//                 nullable   -> emit effective value,
//                 otherwise  -> verbatim (keyed fields only)
//    map kind:    patch map  -> recurse, drop when empty,
//                 otherwise  -> verbatim
//    opaque:                 -> verbatim
fn filter_record_inner(tag: &str, record: &dyn Filterable) -> PatchMap {
    let mut out = PatchMap::new();

    for (index, field) in record.record_info().iter().enumerate() {
        let Some(value) = record.field_at(index) else {
            continue;
        };

        let tag_value = field.tag(tag);
        if tag_value.is_none() && !field.is_embedded() {
            continue;
        }

        let key = tag_value
            .and_then(|tag| tag.split(',').next())
            .unwrap_or("");

        if key == "-"
            || (key.is_empty() && !field.is_embedded())
            || (key.is_empty() && field.is_embedded() && value.kind() != ValueKind::Record)
        {
            continue;
        }

        match value.kind() {
            ValueKind::Record | ValueKind::Nullable => {
                if let Some(nested) = value.as_filterable() {
                    let filtered = filter_record_inner(tag, nested);

                    if field.is_embedded() && key.is_empty() {
                        // Promote to the parent level. First writer wins:
                        // earlier-declared fields shadow promoted ones.
                        for (k, v) in filtered {
                            out.insert_if_absent(k, v);
                        }
                    } else if !filtered.is_empty() {
                        out.insert_boxed(key, Box::new(filtered));
                    }
                } else if let Some(nullable) = value.as_nullable() {
                    emit_nullable(&mut out, key, nullable);
                } else if !key.is_empty() {
                    out.insert_boxed(key, value.clone_value());
                }
            }
            ValueKind::Map => {
                if let Some(nested) = value.as_patch_map() {
                    let filtered = filter_map_inner(nested);
                    if !filtered.is_empty() {
                        out.insert_boxed(key, Box::new(filtered));
                    }
                } else {
                    out.insert_boxed(key, value.clone_value());
                }
            }
            ValueKind::Opaque => {
                out.insert_boxed(key, value.clone_value());
            }
        }
    }

    out
}

fn filter_map_inner(mapping: &PatchMap) -> PatchMap {
    let mut out = PatchMap::new();

    for (key, value) in mapping.iter() {
        if let Some(nullable) = value.as_nullable() {
            emit_nullable(&mut out, key, nullable);
        } else if let Some(nested) = value.as_patch_map() {
            let filtered = filter_map_inner(nested);
            if !filtered.is_empty() {
                out.insert_boxed(key, Box::new(filtered));
            }
        } else {
            out.insert_boxed(key, value.clone_value());
        }
    }

    out
}

fn emit_nullable(out: &mut PatchMap, key: &str, value: &dyn NullableValue) {
    if !value.is_set() {
        return;
    }

    match value.effective_value() {
        Some(payload) => out.insert_boxed(key, payload.clone_value()),
        None => out.insert_boxed(key, Box::new(Null)),
    };
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serialize;
    use serde_json::json;

    use super::{FilterError, FilterOptions, filter_map, filter_record, filter_record_with};
    use crate::derive::Filterable;
    use crate::map::PatchMap;
    use crate::nullable::Nullable;
    use crate::value::{Value, ValueKind};

    // A record that carries the capability to be descended into.
    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Inner {
        #[patch(json = "some_field")]
        some_field: String,
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Middle {
        no_tag: Nullable<String>,
        #[patch(json = "s2_other_str", db = "s2_other_str")]
        other: String,
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Outer {
        #[patch(json = "str", db = "str")]
        null_str: Nullable<String>,
        #[patch(json = "other_str", db = "other_str")]
        other: String,
        #[patch(json = "s2", db = "s2")]
        nested: Middle,
        #[patch(json = "s3")]
        another: Inner,
        #[patch(embed)]
        promoted: Inner,
    }

    // A record kind without the filterable capability: copied verbatim.
    #[derive(Clone, Serialize, Default, Debug)]
    struct PlainRecord {
        k: String,
    }

    impl Value for PlainRecord {
        fn kind(&self) -> ValueKind {
            ValueKind::Record
        }

        fn clone_value(&self) -> Box<dyn Value> {
            Box::new(self.clone())
        }
    }

    fn as_json(map: &PatchMap) -> serde_json::Value {
        serde_json::to_value(map).unwrap()
    }

    #[test]
    fn nil_and_non_record_inputs() {
        assert!(matches!(filter_record(None), Err(FilterError::NilInput)));
        assert!(matches!(filter_map(None), Err(FilterError::NilInput)));

        let err = filter_record(Some(&1_i64)).unwrap_err();
        assert!(matches!(
            err,
            FilterError::NotARecord {
                kind: ValueKind::Opaque,
                ..
            }
        ));

        // Record kind without a descriptor table cannot be walked either.
        let plain = PlainRecord::default();
        let err = filter_record(Some(&plain)).unwrap_err();
        assert!(matches!(
            err,
            FilterError::NotARecord {
                kind: ValueKind::Record,
                ..
            }
        ));
    }

    #[test]
    fn default_record_with_default_tag() {
        let out = filter_record(Some(&Outer::default())).unwrap();

        // The unset nullable vanished, the untagged nullable in `Middle` was
        // skipped, the embedded record's field was promoted to the top.
        assert_eq!(
            as_json(&out),
            json!({
                "other_str": "",
                "s2": { "s2_other_str": "" },
                "s3": { "some_field": "" },
                "some_field": "",
            }),
        );
    }

    #[test]
    fn tag_switching() {
        let out =
            filter_record_with(Some(&Outer::default()), FilterOptions::new().tag("db")).unwrap();

        // `s3` and the embedded record carry no `db` tags and drop out.
        assert_eq!(
            as_json(&out),
            json!({
                "other_str": "",
                "s2": { "s2_other_str": "" },
            }),
        );

        // An empty tag name falls back to the default namespace.
        let out =
            filter_record_with(Some(&Outer::default()), FilterOptions::new().tag("")).unwrap();
        assert!(as_json(&out).as_object().unwrap().contains_key("s3"));
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Pair {
        #[patch(json = "c")]
        c: Nullable<i64>,
        #[patch(json = "d")]
        d: Nullable<i64>,
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Wide {
        #[patch(json = "a")]
        a: Nullable<String>,
        #[patch(json = "b")]
        b: String,
        #[patch(json = "m")]
        m: PatchMap,
        #[patch(json = "m2")]
        m2: HashMap<String, String>,
        #[patch(json = "m3")]
        m3: PatchMap,
        #[patch(json = "s")]
        s: Pair,
        #[patch(embed, json = "ss")]
        ss: Pair,
        #[patch(json = "s6_1")]
        plain: PlainRecord,
        #[patch(embed, json = "s6_2")]
        plain_embedded: PlainRecord,
    }

    fn wide_fixture() -> Wide {
        let mut inner_map = PatchMap::new();
        inner_map.insert("q", String::new());
        inner_map.insert("qq", Nullable::of(0.2_f64));
        inner_map.insert("qqq", Nullable::<f64>::null());

        let mut m = PatchMap::new();
        m.insert("z", Nullable::of("z".to_string()));
        m.insert("zz", Nullable::<String>::default());
        m.insert("zzz", 5_i64);
        m.insert("mm", inner_map);

        let mut m3 = PatchMap::new();
        m3.insert("m3", Nullable::<String>::default());

        Wide {
            a: Nullable::null(),
            b: String::new(),
            m,
            m2: [
                ("m2".to_string(), "222".to_string()),
                ("m22".to_string(), "2222".to_string()),
            ]
            .into_iter()
            .collect(),
            m3,
            s: Pair {
                c: Nullable::default(),
                d: Nullable::null(),
            },
            ss: Pair::default(),
            plain: PlainRecord { k: "K1".to_string() },
            plain_embedded: PlainRecord { k: "K2".to_string() },
        }
    }

    #[test]
    fn nested_maps_records_and_plain_values() {
        let out = filter_record(Some(&wide_fixture())).unwrap();

        assert_eq!(
            as_json(&out),
            json!({
                // Explicit null survives, distinguishable from absence.
                "a": null,
                // Plain values copy through verbatim, empty or not.
                "b": "",
                // Generic mappings filter recursively.
                "m": {
                    "z": "z",
                    "zzz": 5,
                    "mm": { "q": "", "qq": 0.2, "qqq": null },
                },
                // Typed maps copy through verbatim.
                "m2": { "m2": "222", "m22": "2222" },
                // `m3` filtered down to nothing and vanished entirely.
                // Nested filterable record keeps only populated fields.
                "s": { "d": null },
                // `ss` (embedded with a key) filtered to nothing: omitted.
                // Non-filterable records copy through verbatim...
                "s6_1": { "k": "K1" },
                // ...including an embedded one carrying an explicit key.
                "s6_2": { "k": "K2" },
            }),
        );
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Stamp {
        #[patch(json = "updated_by")]
        updated_by: Nullable<String>,
        #[patch(json = "note")]
        note: Nullable<String>,
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct Entry {
        #[patch(json = "note")]
        note: String,
        #[patch(embed)]
        stamp: Stamp,
    }

    #[test]
    fn embedded_promotion_precedence() {
        let entry = Entry {
            note: "outer".to_string(),
            stamp: Stamp {
                updated_by: Nullable::of("u".to_string()),
                note: Nullable::of("inner".to_string()),
            },
        };

        let out = filter_record(Some(&entry)).unwrap();

        // The embedding record's earlier-declared `note` shadows the
        // promoted one; the non-colliding promoted field lands on top level.
        assert_eq!(
            as_json(&out),
            json!({ "note": "outer", "updated_by": "u" }),
        );
    }

    #[derive(Filterable, Clone, Debug, Serialize, Default)]
    struct LateWriter {
        #[patch(json = "x")]
        first: i64,
        #[patch(json = "x")]
        second: String,
        #[patch(json = "-")]
        hidden: String,
    }

    #[test]
    fn later_fields_overwrite_and_sentinel_skips() {
        let record = LateWriter {
            first: 1,
            second: "two".to_string(),
            hidden: "secret".to_string(),
        };

        let out = filter_record(Some(&record)).unwrap();
        assert_eq!(as_json(&out), json!({ "x": "two" }));
    }

    #[test]
    fn filter_map_entries() {
        let mut f = PatchMap::new();
        f.insert("a", Nullable::<String>::null());
        f.insert("b", Nullable::of("B".to_string()));

        let mut g = PatchMap::new();
        g.insert("a", Nullable::<String>::default());

        let mut m = PatchMap::new();
        m.insert("a", Nullable::<String>::null());
        m.insert("b", Nullable::of("B".to_string()));
        m.insert("c", Nullable::<String>::default());
        m.insert("d", "D".to_string());
        m.insert(
            "e",
            [("ee".to_string(), "ee".to_string())]
                .into_iter()
                .collect::<HashMap<String, String>>(),
        );
        m.insert("f", f);
        m.insert("g", g);

        let out = filter_map(Some(&m)).unwrap();
        assert_eq!(
            as_json(&out),
            json!({
                "a": null,
                "b": "B",
                "d": "D",
                "e": { "ee": "ee" },
                "f": { "a": null, "b": "B" },
            }),
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let out = filter_record(Some(&wide_fixture())).unwrap();
        let again = filter_map(Some(&out)).unwrap();
        assert_eq!(as_json(&out), as_json(&again));
    }
}
