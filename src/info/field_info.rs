// -----------------------------------------------------------------------------
// FieldInfo

/// The compile-time descriptor of a single record field.
///
/// Holds the field name, the tag entries declared with `#[patch(...)]`
/// (pairs of tag namespace and raw tag string) and the embedded flag.
/// Instances are built by the derive macro into a `static` table; the
/// constructors are `const` for exactly that reason.
///
/// # Examples
///
/// ```
/// use patchmap::info::FieldInfo;
///
/// static FIELD: FieldInfo =
///     FieldInfo::new("display_name", &[("json", "display_name,omitempty"), ("db", "display_name")]);
///
/// assert_eq!(FIELD.name(), "display_name");
/// assert_eq!(FIELD.tag("json"), Some("display_name,omitempty"));
/// assert_eq!(FIELD.tag("bson"), None);
/// assert!(!FIELD.is_embedded());
/// ```
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    tags: &'static [(&'static str, &'static str)],
    embedded: bool,
}

impl FieldInfo {
    /// Creates a new descriptor for the field `name` with the given tag
    /// entries.
    #[inline]
    pub const fn new(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            name,
            tags,
            embedded: false,
        }
    }

    /// Marks the field as embedded/promoted.
    #[inline]
    pub const fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Returns the field name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if the field is embedded/promoted.
    #[inline]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Returns the raw tag string declared under `namespace`, if any.
    ///
    /// The raw string may carry `,`-separated options; the engine only uses
    /// the first segment as the output key.
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, tag)| *tag)
    }

    /// Returns all declared tag entries.
    #[inline]
    pub const fn tags(&self) -> &'static [(&'static str, &'static str)] {
        self.tags
    }
}
