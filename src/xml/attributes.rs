//! Attributes of the current start tag.
//!
//! Readers parse a start tag's attributes once and cache them here, so
//! repeated [`attribute_value`](super::XmlDeserializer::attribute_value)
//! calls do not rescan the input. [`IndexMap`] keeps them in document order.
//!
//! ```rust
//! use streamtok::{XmlDeserializer, XmlTokenizer};
//!
//! let mut xml = XmlTokenizer::new(r#"<item b="2" a='1' flag>text</item>"#);
//! xml.find_tag("item").unwrap();
//! let names: Vec<_> = xml.attributes().unwrap().unwrap().names().collect();
//! assert_eq!(names, ["b", "a", "flag"]);
//! ```

use indexmap::IndexMap;

/// Decoded attribute values keyed by name, in document order.
///
/// A name given without `=` maps to an empty value. Later duplicates replace
/// earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Attributes(IndexMap::new())
    }

    /// Returns the previous value for `name`, if there was one.
    pub fn insert(&mut self, name: String, value: String) -> Option<String> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    /// Name and value pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for Attributes {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Attributes(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_replace() {
        let mut attrs = Attributes::new();
        assert!(attrs.insert("z".into(), "1".into()).is_none());
        attrs.insert("a".into(), "2".into());
        assert_eq!(attrs.insert("z".into(), "3".into()).as_deref(), Some("1"));
        assert_eq!(attrs.iter().collect::<Vec<_>>(), [("z", "3"), ("a", "2")]);
        assert_eq!(attrs.get("missing"), None);
        attrs.clear();
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_collect() {
        let attrs: Attributes = [("k".to_string(), String::new())].into_iter().collect();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("k"), Some(""));
    }
}
