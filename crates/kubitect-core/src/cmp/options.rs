//! Comparator configuration and tag parsing.

/// Options threaded through every recursive comparison call.
///
/// There is no process-wide state: two comparators with different options
/// can run side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Primary tag used for field names, skip markers and the `id` option
    pub tag: String,
    /// Tags consulted in order when the primary tag gives no name
    pub extra_name_tags: Vec<String>,
    /// Match list elements by position instead of by equality
    pub respect_slice_order: bool,
    /// Do not emit nodes for pairs where both sides are absent
    pub ignore_empty_changes: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tag: "cmp".to_string(),
            extra_name_tags: Vec::new(),
            respect_slice_order: false,
            ignore_empty_changes: false,
        }
    }
}

impl CompareOptions {
    /// Options used for cluster configuration files: `opt` tags with
    /// YAML names as fallback.
    pub fn kubitect() -> Self {
        Self::default()
            .with_tag("opt")
            .with_extra_name_tags(["yaml"])
            .ignore_empty_changes(true)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_extra_name_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_name_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn respect_slice_order(mut self, on: bool) -> Self {
        self.respect_slice_order = on;
        self
    }

    pub fn ignore_empty_changes(mut self, on: bool) -> Self {
        self.ignore_empty_changes = on;
        self
    }

    /// Primary tag followed by the fallback tags
    pub(crate) fn name_tags(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.tag.as_str()).chain(self.extra_name_tags.iter().map(String::as_str))
    }
}

/// Marker that excludes a field from comparison
pub const SKIP_MARKER: &str = "-";

/// Option that marks the identity field of a list element type
pub const ID_OPTION: &str = "id";

/// Parsed `name[,option...]` tag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagSpec<'a> {
    pub name: &'a str,
    pub options: Vec<&'a str>,
}

impl<'a> TagSpec<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut parts = raw.split(',');
        let name = parts.next().unwrap_or("").trim();
        let options = parts.map(str::trim).filter(|o| !o.is_empty()).collect();
        Self { name, options }
    }

    pub fn is_skip(&self) -> bool {
        self.name == SKIP_MARKER
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| *o == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_options() {
        let spec = TagSpec::parse("name,id,omitempty");
        assert_eq!(spec.name, "name");
        assert!(spec.has_option("id"));
        assert!(spec.has_option("omitempty"));
    }

    #[test]
    fn test_parse_option_only() {
        let spec = TagSpec::parse(",id");
        assert_eq!(spec.name, "");
        assert!(spec.has_option(ID_OPTION));
    }

    #[test]
    fn test_skip_marker() {
        assert!(TagSpec::parse("-").is_skip());
        assert!(!TagSpec::parse("-x").is_skip());
    }

    #[test]
    fn test_kubitect_options() {
        let opts = CompareOptions::kubitect();
        let tags: Vec<&str> = opts.name_tags().collect();
        assert_eq!(tags, vec!["opt", "yaml"]);
        assert!(!opts.respect_slice_order);
    }
}
