//! Procedural macros for the `patchmap` crate.
//!
//! See [`Filterable`](macro@Filterable).

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static PATCH_ATTRIBUTE_NAME: &str = "patch";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;

// -----------------------------------------------------------------------------
// Macros

/// # Filterable Record Derivation
///
/// `#[derive(Filterable)]` implements the following traits for a named-field
/// struct:
///
/// - `patchmap::Value` (kind `Record`, cloning through `Clone`)
/// - `patchmap::Filterable` (field access plus a `static` descriptor table)
///
/// The type must also implement `Clone`, `Debug` and `serde::Serialize`;
/// derive them alongside.
///
/// ## Tags
///
/// Output keys are declared per field with the `#[patch(...)]` attribute.
/// Every `name = "value"` pair declares a tag under the namespace `name`;
/// the filtering engine reads the namespace selected by its options
/// (`"json"` by default) and uses the first `,`-separated segment of the
/// value as the output key:
///
/// ```rust, ignore
/// #[derive(Filterable, Clone, Debug, Serialize, Default)]
/// struct Patch {
///     #[patch(json = "id", db = "id")]
///     id: Nullable<i64>,
///     #[patch(json = "display_name,omitempty")]
///     display_name: Nullable<String>,
/// }
/// ```
///
/// A field without a `#[patch]` attribute carries no tags and is skipped by
/// the engine (unless embedded). A tag value of `"-"` skips the field under
/// that namespace explicitly.
///
/// ## Embedded fields
///
/// The `embed` flag marks a field as embedded/promoted. An embedded
/// filterable record without an explicit tag has its filtered fields merged
/// into the parent's output at the top level (existing keys win); with an
/// explicit tag it nests under that key like any other field:
///
/// ```rust, ignore
/// #[derive(Filterable, Clone, Debug, Serialize, Default)]
/// struct Entry {
///     #[patch(json = "note")]
///     note: String,
///     #[patch(embed)]
///     audit: AuditStamp,
/// }
/// ```
///
/// ## Restrictions
///
/// Enums, tuple structs, unit structs and generic structs are rejected with
/// a compile error: the descriptor table is a single `static` per type, and
/// only concrete named-field structs map onto it.
///
/// Field privacy has no effect here — the derive sees every field. Exclude
/// fields by omitting their tag or with the `"-"` sentinel.
#[proc_macro_derive(Filterable, attributes(patch))]
pub fn derive_filterable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::FilterableRecord::parse(&ast) {
        Ok(record) => impls::impl_filterable(&record).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
