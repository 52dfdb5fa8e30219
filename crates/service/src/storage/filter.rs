use mongodb::bson::{Bson, Document};
use models::RecordId;

/// Query predicate over one collection.
///
/// Rendered to a MongoDB filter document by [`Filter::to_document`] and
/// evaluated in-process by [`Filter::matches`]; both must agree.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Field equals value.
    Eq(String, Bson),
    /// `_id` equals the identifier.
    Id(RecordId),
    /// Case-insensitive substring match on a string field.
    ContainsIgnoreCase(String, String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Bson>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn contains_ignore_case(field: &str, needle: &str) -> Self {
        Filter::ContainsIgnoreCase(field.to_string(), needle.to_string())
    }

    /// AND of the given conditions; no conditions means [`Filter::All`].
    pub fn all_of(conditions: Vec<Filter>) -> Self {
        if conditions.is_empty() {
            Filter::All
        } else {
            Filter::And(conditions)
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        match self {
            Filter::All => {}
            Filter::Eq(field, value) => {
                doc.insert(field.as_str(), value.clone());
            }
            Filter::Id(id) => {
                doc.insert("_id", Bson::from(*id));
            }
            Filter::ContainsIgnoreCase(field, needle) => {
                let mut regex = Document::new();
                regex.insert("$regex", regex::escape(needle));
                regex.insert("$options", "i");
                doc.insert(field.as_str(), regex);
            }
            Filter::And(parts) => {
                if !parts.is_empty() {
                    doc.insert("$and", Self::render_all(parts));
                }
            }
            Filter::Or(parts) => {
                doc.insert("$or", Self::render_all(parts));
            }
        }
        doc
    }

    fn render_all(parts: &[Filter]) -> Bson {
        Bson::Array(parts.iter().map(|f| Bson::Document(f.to_document())).collect())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            // An array field matches when any element does.
            Filter::Eq(field, value) => doc
                .get(field)
                .is_some_and(|v| v == value || matches!(v, Bson::Array(items) if items.contains(value))),
            Filter::Id(id) => doc.get("_id") == Some(&Bson::from(*id)),
            Filter::ContainsIgnoreCase(field, needle) => {
                let needle = needle.to_lowercase();
                let hit = |v: &Bson| matches!(v, Bson::String(s) if s.to_lowercase().contains(&needle));
                doc.get(field)
                    .is_some_and(|v| hit(v) || matches!(v, Bson::Array(items) if items.iter().any(hit)))
            }
            Filter::And(parts) => parts.iter().all(|f| f.matches(doc)),
            // `$or: []` is rejected by MongoDB; treat it as matching nothing.
            Filter::Or(parts) => parts.iter().any(|f| f.matches(doc)),
        }
    }
}
