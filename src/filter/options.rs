use std::borrow::Cow;

/// The tag namespace used for key discovery when none is configured.
pub const DEFAULT_TAG: &str = "json";

// -----------------------------------------------------------------------------
// FilterOptions

/// Configuration for [`filter_record_with`](crate::filter_record_with).
///
/// One recognized setting: the tag namespace used to discover output keys.
///
/// # Examples
///
/// ```
/// use patchmap::FilterOptions;
///
/// let options = FilterOptions::new().tag("db");
/// # let _ = options;
/// ```
#[derive(Clone, Debug)]
pub struct FilterOptions {
    tag: Cow<'static, str>,
}

impl FilterOptions {
    /// Creates the default options (tag namespace `"json"`).
    #[inline]
    pub const fn new() -> Self {
        Self {
            tag: Cow::Borrowed(DEFAULT_TAG),
        }
    }

    /// Sets the tag namespace used for key discovery.
    ///
    /// An empty string means "use the default", not "use no tag".
    pub fn tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        let tag = tag.into();
        if !tag.is_empty() {
            self.tag = tag;
        }
        self
    }

    /// Returns the configured tag namespace.
    #[inline]
    pub fn tag_name(&self) -> &str {
        &self.tag
    }
}

impl Default for FilterOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::FilterOptions;

    #[test]
    fn empty_tag_means_default() {
        assert_eq!(FilterOptions::new().tag_name(), "json");
        assert_eq!(FilterOptions::new().tag("").tag_name(), "json");
        assert_eq!(FilterOptions::new().tag("db").tag_name(), "db");
        assert_eq!(FilterOptions::new().tag("db".to_string()).tag_name(), "db");
    }
}
