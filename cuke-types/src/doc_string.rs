//! Doc strings attached to steps

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A block of text with a content type tag (`text/plain`, `application/json`, ...).
///
/// Behaves like a `str` for reading: it derefs to its content, displays as its
/// content and compares equal to strings with the same content.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocString {
    content: String,
    content_type: String,
}

impl DocString {
    pub fn new(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: content_type.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// New doc string with transformed content and the same content type.
    pub fn map<F>(&self, f: F) -> DocString
    where
        F: FnOnce(&str) -> String,
    {
        DocString {
            content: f(&self.content),
            content_type: self.content_type.clone(),
        }
    }

    pub fn is_data_table(&self) -> bool {
        false
    }

    pub fn is_doc_string(&self) -> bool {
        true
    }
}

impl Deref for DocString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.content
    }
}

impl AsRef<str> for DocString {
    fn as_ref(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for DocString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

impl fmt::Debug for DocString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#<DocString")?;
        writeln!(f, "  \"\"\"{}", self.content_type)?;
        for line in self.content.lines() {
            writeln!(f, "  {line}")?;
        }
        write!(f, "  \"\"\">")
    }
}

impl PartialEq<str> for DocString {
    fn eq(&self, other: &str) -> bool {
        self.content == other
    }
}

impl PartialEq<&str> for DocString {
    fn eq(&self, other: &&str) -> bool {
        self.content == *other
    }
}

impl PartialEq<String> for DocString {
    fn eq(&self, other: &String) -> bool {
        &self.content == other
    }
}

impl From<DocString> for String {
    fn from(doc: DocString) -> Self {
        doc.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let doc = DocString::new("test", "text/plain");
        assert!(doc.is_doc_string());
        assert!(!doc.is_data_table());
    }

    #[test]
    fn test_map_receives_content() {
        let doc = DocString::new("original content", "text/plain");
        let mut seen = None;
        doc.map(|content| {
            seen = Some(content.to_string());
            content.to_string()
        });
        assert_eq!(seen.as_deref(), Some("original content"));
    }

    #[test]
    fn test_map_keeps_content_type() {
        let doc = DocString::new("original content", "text/markdown");
        let mapped = doc.map(|_| "foo".to_string());
        assert_eq!(mapped.content(), "foo");
        assert_eq!(mapped.content_type(), "text/markdown");
    }

    #[test]
    fn test_equality() {
        let doc = DocString::new("foo", "text/plain");
        assert_eq!(doc, DocString::new("foo", "text/plain"));
        assert_ne!(doc, DocString::new("bar", "text/plain"));
        assert_ne!(doc, DocString::new("foo", "text/html"));
        assert_eq!(doc, "foo");
        assert_eq!(doc, "foo".to_string());
    }

    #[test]
    fn test_reads_like_a_string() {
        let doc = DocString::new("content", "text/plain");
        assert!("expected content".contains(&*doc));
        assert_eq!(doc.to_string(), "content");
        assert_eq!(doc.replace('n', "_"), "co_te_t");
        assert_eq!(doc.split('n').collect::<Vec<_>>(), vec!["co", "te", "t"]);
    }

    #[test]
    fn test_debug_rendering() {
        let doc = DocString::new("some text", "text/plain");
        assert_eq!(
            format!("{doc:?}"),
            "#<DocString\n  \"\"\"text/plain\n  some text\n  \"\"\">"
        );
    }
}
