//! Feedback records and their decoding from raw store attributes.

use std::collections::HashMap;
use std::num::ParseIntError;

/// A tagged scalar as read from the record store.
///
/// Mirrors the DynamoDB attribute types the report cares about: `S` maps to
/// [`AttrValue::Text`] and `N` (a number carried as a string) maps to
/// [`AttrValue::Number`]. Anything else is kept only by its type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Number(String),
    Unsupported(&'static str),
}

impl AttrValue {
    fn kind(&self) -> &'static str {
        match self {
            AttrValue::Text(_) => "string",
            AttrValue::Number(_) => "number",
            AttrValue::Unsupported(kind) => kind,
        }
    }
}

/// One record exactly as the store returned it.
pub type RawRecord = HashMap<String, AttrValue>;

/// Why a raw record could not become a [`FeedbackItem`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be a {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `id` is empty")]
    EmptyId,

    #[error("rating `{value}` is not an integer: {source}")]
    InvalidRating {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// A single feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackItem {
    id: String,
    description: String,
    rating: i64,
    urgency: String,
    submitted_at: String,
}

impl FeedbackItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        rating: i64,
        urgency: impl Into<String>,
        submitted_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            rating,
            urgency: urgency.into(),
            submitted_at: submitted_at.into(),
        }
    }

    /// Decodes a raw store record.
    ///
    /// Fields are checked in the order `id`, `description`, `rating`,
    /// `urgency`, `submitted_at` and the first problem is returned. The
    /// rating may be stored either as a number or as a string.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if a field is absent, has the wrong type,
    /// the id is empty, or the rating is not a base-10 integer.
    pub fn from_attributes(record: &RawRecord) -> Result<Self, DecodeError> {
        let id = text(record, "id")?;
        if id.is_empty() {
            return Err(DecodeError::EmptyId);
        }
        let description = text(record, "description")?;
        let rating = rating(record)?;
        let urgency = text(record, "urgency")?;
        let submitted_at = text(record, "submitted_at")?;

        Ok(Self {
            id: id.to_string(),
            description: description.to_string(),
            rating,
            urgency: urgency.to_string(),
            submitted_at: submitted_at.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn urgency(&self) -> &str {
        &self.urgency
    }

    pub fn submitted_at(&self) -> &str {
        &self.submitted_at
    }
}

fn field<'a>(record: &'a RawRecord, name: &'static str) -> Result<&'a AttrValue, DecodeError> {
    record
        .get(name)
        .ok_or(DecodeError::MissingField { field: name })
}

fn text<'a>(record: &'a RawRecord, name: &'static str) -> Result<&'a str, DecodeError> {
    match field(record, name)? {
        AttrValue::Text(s) => Ok(s),
        other => Err(DecodeError::WrongType {
            field: name,
            expected: "string",
            found: other.kind(),
        }),
    }
}

fn rating(record: &RawRecord) -> Result<i64, DecodeError> {
    let raw = match field(record, "rating")? {
        AttrValue::Number(n) | AttrValue::Text(n) => n,
        other => {
            return Err(DecodeError::WrongType {
                field: "rating",
                expected: "number",
                found: other.kind(),
            });
        }
    };

    raw.parse::<i64>().map_err(|source| DecodeError::InvalidRating {
        value: raw.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, AttrValue)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn s(v: &str) -> AttrValue {
        AttrValue::Text(v.to_string())
    }

    fn n(v: &str) -> AttrValue {
        AttrValue::Number(v.to_string())
    }

    fn complete() -> RawRecord {
        record(&[
            ("id", s("1")),
            ("description", s("bug")),
            ("rating", n("2")),
            ("urgency", s("high")),
            ("submitted_at", s("2024-01-01")),
        ])
    }

    #[test]
    fn test_decode_complete_record() {
        let item = FeedbackItem::from_attributes(&complete()).unwrap();
        assert_eq!(item, FeedbackItem::new("1", "bug", 2, "high", "2024-01-01"));
    }

    #[test]
    fn test_decode_rating_stored_as_text() {
        let mut raw = complete();
        raw.insert("rating".into(), s("-3"));
        let item = FeedbackItem::from_attributes(&raw).unwrap();
        assert_eq!(item.rating(), -3);
    }

    #[test]
    fn test_decode_each_missing_field_fails() {
        for name in ["id", "description", "rating", "urgency", "submitted_at"] {
            let mut raw = complete();
            raw.remove(name);
            let err = FeedbackItem::from_attributes(&raw).unwrap_err();
            assert!(
                matches!(err, DecodeError::MissingField { field } if field == name),
                "unexpected error for {name}: {err}"
            );
        }
    }

    #[test]
    fn test_decode_non_numeric_rating_without_id() {
        let raw = record(&[
            ("description", s("x")),
            ("rating", s("abc")),
            ("urgency", s("low")),
            ("submitted_at", s("2024-01-01")),
        ]);
        let err = FeedbackItem::from_attributes(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field: "id" }));
    }

    #[test]
    fn test_decode_non_numeric_rating() {
        let mut raw = complete();
        raw.insert("rating".into(), n("abc"));
        let err = FeedbackItem::from_attributes(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidRating { ref value, .. } if value == "abc"));
    }

    #[test]
    fn test_decode_fractional_or_padded_rating_fails() {
        for bad in ["4.5", " 4", "4 ", ""] {
            let mut raw = complete();
            raw.insert("rating".into(), n(bad));
            assert!(FeedbackItem::from_attributes(&raw).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_decode_empty_id_fails() {
        let mut raw = complete();
        raw.insert("id".into(), s(""));
        let err = FeedbackItem::from_attributes(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::EmptyId));
    }

    #[test]
    fn test_decode_wrong_type() {
        let mut raw = complete();
        raw.insert("urgency".into(), n("3"));
        let err = FeedbackItem::from_attributes(&raw).unwrap_err();
        assert_eq!(err.to_string(), "field `urgency` must be a string, found number");

        let mut raw = complete();
        raw.insert("rating".into(), AttrValue::Unsupported("bool"));
        let err = FeedbackItem::from_attributes(&raw).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::WrongType { field: "rating", found: "bool", .. }
        ));
    }
}
