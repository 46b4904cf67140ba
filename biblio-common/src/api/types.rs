//! Shared API request/response types
//!
//! Types used by the Biblio backend and its clients. All wire fields use
//! camelCase names (`articleId`, `articleTitle`, ...) while the Rust
//! fields and the database columns stay snake_case.

use serde::{Deserialize, Serialize};

// ========================================
// Record Types
// ========================================

/// A stored article row.
///
/// # Examples
///
/// ```
/// use biblio_common::api::types::Article;
///
/// let article = Article {
///     article_id: 1,
///     article_title: "A first article".to_string(),
///     article_abstract: "Summary of the first article".to_string(),
///     article_date: "2020-01-01T00:00:00Z".to_string(),
/// };
/// assert_eq!(
///     serde_json::to_value(&article).unwrap()["articleTitle"],
///     "A first article"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Server-generated integer primary key
    pub article_id: i64,

    /// Title, at least 5 characters
    pub article_title: String,

    /// Abstract, at least 10 characters
    pub article_abstract: String,

    /// Publication date in canonical RFC 3339 form
    pub article_date: String,
}

/// A stored reference row, owned by exactly one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Server-generated integer primary key
    pub reference_id: i64,

    /// Title, at least 5 characters
    pub reference_title: String,

    /// Publication date in canonical RFC 3339 form
    pub reference_date: String,

    /// Free-form author list
    pub reference_authors: String,

    /// Owning article id (foreign key)
    pub article_id: i64,
}

/// An article together with all of its references.
///
/// This is the detail-view shape returned by `GET /article/:id`. The
/// article fields are flattened to the top level with the reference
/// list nested under `references`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleWithReferences {
    #[serde(flatten)]
    pub article: Article,

    pub references: Vec<Reference>,
}

// ========================================
// Request Types
// ========================================

/// Client-supplied article fields for create and update requests.
///
/// Every field is optional on the wire; validation decides which are
/// required for the operation at hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_abstract: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_date: Option<String>,
}

/// Client-supplied reference fields for create and update requests.
///
/// The owning article id always comes from the request path, never from
/// the body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_authors: Option<String>,
}

// ========================================
// List Response Types
// ========================================

/// One page of the article listing.
///
/// `count` is the number of articles matching the active filters, not
/// the page length, so clients can derive the page count from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlePage {
    pub records: Vec<Article>,
    pub count: i64,
}

/// Sort direction for the article listing.
///
/// The wire encoding follows the listing API: `-1` sorts descending,
/// any other value ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Decode the wire value (`-1` means descending).
    pub fn from_wire(value: &str) -> Self {
        if value == "-1" {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }

    /// Encode for use in a query string.
    pub fn wire_value(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "1",
            SortOrder::Descending => "-1",
        }
    }

    /// SQL keyword for an ORDER BY clause.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

// ========================================
// Error Response Types
// ========================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Wire name of the offending field (`articleTitle`, ...)
    pub field: String,
    /// Human-readable description of the failure
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable error code (`NOT_FOUND`, `VALIDATION_FAILED`, ...)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-level failures for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

/// Error response envelope.
///
/// Every non-2xx response from the backend carries this shape:
///
/// ```
/// use biblio_common::api::types::ErrorEnvelope;
///
/// let envelope = ErrorEnvelope::new("NOT_FOUND", "Article 7 not found");
/// let json = serde_json::to_value(&envelope).unwrap();
/// assert_eq!(json["error"]["code"], "NOT_FOUND");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    /// Create a new error envelope without violation details
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                violations: None,
            },
        }
    }

    /// Create a validation error envelope carrying field violations
    pub fn with_violations(
        code: impl Into<String>,
        message: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                violations: Some(violations),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_serializes_camel_case() {
        let article = Article {
            article_id: 7,
            article_title: "Testing article".to_string(),
            article_abstract: "An abstract over ten chars".to_string(),
            article_date: "2020-01-01T00:00:00Z".to_string(),
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["articleId"], 7);
        assert_eq!(json["articleTitle"], "Testing article");
        assert_eq!(json["articleAbstract"], "An abstract over ten chars");
        assert_eq!(json["articleDate"], "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_article_with_references_flattens() {
        let detail = ArticleWithReferences {
            article: Article {
                article_id: 3,
                article_title: "Flattened".to_string(),
                article_abstract: "Flattening abstract".to_string(),
                article_date: "2020-01-01T00:00:00Z".to_string(),
            },
            references: vec![Reference {
                reference_id: 1,
                reference_title: "First ref".to_string(),
                reference_date: "2019-05-05T00:00:00Z".to_string(),
                reference_authors: "Doe, J.".to_string(),
                article_id: 3,
            }],
        };
        let json = serde_json::to_value(&detail).unwrap();
        // Article fields sit at the top level, not under a nested key
        assert_eq!(json["articleId"], 3);
        assert_eq!(json["references"][0]["referenceTitle"], "First ref");
        assert_eq!(json["references"][0]["articleId"], 3);
    }

    #[test]
    fn test_draft_deserializes_partial_body() {
        let draft: ArticleDraft =
            serde_json::from_str(r#"{"articleTitle": "Only a title"}"#).unwrap();
        assert_eq!(draft.article_title.as_deref(), Some("Only a title"));
        assert!(draft.article_abstract.is_none());
        assert!(draft.article_date.is_none());
    }

    #[test]
    fn test_sort_order_wire_decoding() {
        assert_eq!(SortOrder::from_wire("-1"), SortOrder::Descending);
        assert_eq!(SortOrder::from_wire("1"), SortOrder::Ascending);
        // Anything that is not -1 sorts ascending
        assert_eq!(SortOrder::from_wire("0"), SortOrder::Ascending);
        assert_eq!(SortOrder::from_wire("banana"), SortOrder::Ascending);
    }

    #[test]
    fn test_sort_order_sql_keywords() {
        assert_eq!(SortOrder::Ascending.as_sql(), "ASC");
        assert_eq!(SortOrder::Descending.as_sql(), "DESC");
    }

    #[test]
    fn test_error_envelope_omits_empty_violations() {
        let envelope = ErrorEnvelope::new("internal", "boom");
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("violations"));
    }

    #[test]
    fn test_error_envelope_carries_violations() {
        let envelope = ErrorEnvelope::with_violations(
            "validation",
            "Validation failed",
            vec![Violation::new("articleTitle", "must be at least 5 characters")],
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["violations"][0]["field"], "articleTitle");
    }
}
