use syn::{Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

use crate::PATCH_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// FilterableRecord

/// The parsed model of a struct deriving `Filterable`.
pub(crate) struct FilterableRecord<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) fields: Vec<RecordField<'a>>,
}

/// One parsed field with its `#[patch(...)]` data.
pub(crate) struct RecordField<'a> {
    pub(crate) ident: &'a Ident,
    /// Tag entries as `(namespace, value)` pairs, in attribute order.
    pub(crate) tags: Vec<(String, String)>,
    pub(crate) embedded: bool,
}

impl<'a> FilterableRecord<'a> {
    pub(crate) fn parse(ast: &'a DeriveInput) -> Result<Self> {
        if !ast.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &ast.generics,
                "`Filterable` cannot be derived for generic types",
            ));
        }

        let Data::Struct(data) = &ast.data else {
            return Err(Error::new_spanned(
                &ast.ident,
                "`Filterable` can only be derived for structs",
            ));
        };

        let Fields::Named(named) = &data.fields else {
            return Err(Error::new_spanned(
                &ast.ident,
                "`Filterable` requires named fields",
            ));
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let ident = field.ident.as_ref().expect("named field without an ident");
            let mut tags = Vec::new();
            let mut embedded = false;

            for attr in &field.attrs {
                if !attr.path().is_ident(PATCH_ATTRIBUTE_NAME) {
                    continue;
                }

                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("embed") {
                        embedded = true;
                        return Ok(());
                    }

                    let Some(namespace) = meta.path.get_ident() else {
                        return Err(meta.error("expected `embed` or `<namespace> = \"key\"`"));
                    };

                    let lit: LitStr = meta.value()?.parse()?;
                    tags.push((namespace.to_string(), lit.value()));
                    Ok(())
                })?;
            }

            fields.push(RecordField {
                ident,
                tags,
                embedded,
            });
        }

        Ok(Self {
            ident: &ast.ident,
            fields,
        })
    }
}
