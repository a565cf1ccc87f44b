//! Elements offered to report rules

use ahash::AHashMap;

use crate::condition::{FieldLookup, FieldValue};

/// An element that report rules can be checked against
pub trait Candidate: FieldLookup {
    /// Slash-separated location of the element
    fn path(&self) -> &str;

    /// Schema tag; by default the file extension of `path`
    fn extension(&self) -> Option<&str> {
        let name = self.path().rsplit('/').next().unwrap_or_default();
        name.rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

impl<T: Candidate + ?Sized> Candidate for &T {
    fn path(&self) -> &str {
        (**self).path()
    }

    fn extension(&self) -> Option<&str> {
        (**self).extension()
    }
}

/// In-memory candidate: a path plus its field values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    path: String,
    fields: AHashMap<String, FieldValue>,
}

impl Record {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fields: AHashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn fields(&self) -> &AHashMap<String, FieldValue> {
        &self.fields
    }
}

impl FieldLookup for Record {
    fn field_value(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned()
    }
}

impl Candidate for Record {
    fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_path() {
        assert_eq!(Record::new("specs/a/one.req").extension(), Some("req"));
        assert_eq!(Record::new("one.tar.gz").extension(), Some("gz"));
        assert_eq!(Record::new("specs.d/readme").extension(), None);
        assert_eq!(Record::new("specs/trailing.").extension(), None);
        assert_eq!(Record::new("").extension(), None);
    }

    #[test]
    fn test_fields() {
        let mut record = Record::new("a.req").with_field("n", FieldValue::Number(3.0));
        record.set_field("s", FieldValue::Text("x".to_string()));

        assert_eq!(record.field_value("n"), Some(FieldValue::Number(3.0)));
        assert_eq!(record.field_value("s"), Some(FieldValue::Text("x".to_string())));
        assert_eq!(record.field_value("missing"), None);
        assert_eq!(record.fields().len(), 2);
    }

    struct Tagged;

    impl FieldLookup for Tagged {
        fn field_value(&self, _name: &str) -> Option<FieldValue> {
            None
        }
    }

    impl Candidate for Tagged {
        fn path(&self) -> &str {
            "docs/readme"
        }

        fn extension(&self) -> Option<&str> {
            Some("doc")
        }
    }

    #[test]
    fn test_extension_override() {
        assert_eq!(Tagged.extension(), Some("doc"));
        assert_eq!((&Tagged).extension(), Some("doc"));
    }
}
