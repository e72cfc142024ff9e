//! Typed field readers.
//!
//! Each reader resolves a dotted path and returns `None` when the field is
//! absent *or* holds a value of another type. Type mismatches are never
//! errors at this level.

use crate::value::Document;

/// Binary value at `field`.
pub fn get_bytes<'a>(doc: &'a Document, field: &str) -> Option<&'a [u8]> {
    doc.get_path(field)?.as_bytes()
}

/// String value at `field`.
pub fn get_string<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get_path(field)?.as_str()
}

/// Integer value at `field`.
pub fn get_int(doc: &Document, field: &str) -> Option<i64> {
    doc.get_path(field)?.as_int()
}

/// Nested document at `field`.
pub fn get_document<'a>(doc: &'a Document, field: &str) -> Option<&'a Document> {
    doc.get_path(field)?.as_document()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sample() -> Document {
        Document::new()
            .with("_id", 7)
            .with("name", "alpha")
            .with("data", vec![1u8, 2, 3])
            .with("nested", Document::new().with("count", 3))
    }

    #[test]
    fn readers_return_typed_values() {
        let doc = sample();
        assert_eq!(get_int(&doc, "_id"), Some(7));
        assert_eq!(get_string(&doc, "name"), Some("alpha"));
        assert_eq!(get_bytes(&doc, "data"), Some(&[1u8, 2, 3][..]));
        assert_eq!(get_int(&doc, "nested.count"), Some(3));
        assert!(get_document(&doc, "nested").is_some());
    }

    #[test]
    fn wrong_type_degrades_to_absent() {
        let doc = sample();
        assert_eq!(get_int(&doc, "name"), None);
        assert_eq!(get_string(&doc, "_id"), None);
        assert_eq!(get_bytes(&doc, "name"), None);
        assert_eq!(get_document(&doc, "data"), None);
    }

    #[test]
    fn missing_field_is_absent() {
        let doc = sample();
        assert_eq!(get_bytes(&doc, "index"), None);
        assert_eq!(get_int(&doc, "nested.missing"), None);
        assert_eq!(get_int(&doc, "name.deeper"), None);
    }

    #[test]
    fn null_is_not_a_string() {
        let doc = Document::new().with("name", Value::Null);
        assert_eq!(get_string(&doc, "name"), None);
    }
}
