//! Case-insensitive substring search over record fields.

use crate::record::FieldSource;

/// Search predicate over a fixed list of fields.
///
/// The needle is lower-cased once so a matcher can be reused across a whole
/// collection.
#[derive(Debug, Clone)]
pub struct FieldMatcher<'a> {
    needle: String,
    fields: &'a [String],
}

impl<'a> FieldMatcher<'a> {
    /// Creates a matcher for `search_text` over `fields`.
    pub fn new(search_text: &str, fields: &'a [String]) -> Self {
        Self {
            needle: search_text.to_lowercase(),
            fields,
        }
    }

    /// True when the search text is empty or at least one field contains it.
    ///
    /// Absent fields never match.
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        self.fields.iter().any(|name| {
            record
                .field(name)
                .is_some_and(|value| value.display_text().to_lowercase().contains(&self.needle))
        })
    }
}

/// One-shot form of [`FieldMatcher::matches`].
pub fn matches<R: FieldSource + ?Sized>(record: &R, search_text: &str, fields: &[String]) -> bool {
    FieldMatcher::new(search_text, fields).matches(record)
}
