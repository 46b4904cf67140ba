//! Declarative request validation
//!
//! Field constraints are declared as data (one schema per record type)
//! and evaluated in a single pass. Evaluation returns the complete list
//! of violations rather than stopping at the first failure, so a client
//! sees every problem with its request at once.
//!
//! Partial updates are merged onto the existing record first and the
//! merged result is validated with the same schema as a create.

use crate::db::articles::NewArticle;
use crate::db::references::NewReference;
use biblio_common::api::types::{Article, ArticleDraft, Reference, ReferenceDraft, Violation};
use biblio_common::time;

/// Constraint on a single field value.
///
/// Presence is implicit: every schema field is required, and a missing
/// value short-circuits the remaining rules for that field.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Minimum length in characters
    MinLength(usize),
    /// Must not be the empty string
    NonEmpty,
    /// Must parse as a date in an accepted input form
    Date,
}

/// Validation schema: wire field name plus its rules, applied in order
type Schema = &'static [(&'static str, &'static [Rule])];

const ARTICLE_SCHEMA: Schema = &[
    ("articleTitle", &[Rule::MinLength(5)]),
    ("articleAbstract", &[Rule::MinLength(10)]),
    ("articleDate", &[Rule::Date]),
];

const REFERENCE_SCHEMA: Schema = &[
    ("referenceTitle", &[Rule::MinLength(5)]),
    ("referenceDate", &[Rule::Date]),
    ("referenceAuthors", &[Rule::NonEmpty]),
];

fn evaluate(schema: Schema, values: &[Option<&str>]) -> Vec<Violation> {
    schema
        .iter()
        .zip(values)
        .filter_map(|((field, rules), value)| check_field(field, *value, rules))
        .collect()
}

/// Check one field, reporting at most one violation: a missing value or
/// the first failing rule.
fn check_field(field: &str, value: Option<&str>, rules: &[Rule]) -> Option<Violation> {
    let Some(value) = value else {
        return Some(Violation::new(field, "is required"));
    };

    for rule in rules {
        match rule {
            Rule::MinLength(min) => {
                if value.chars().count() < *min {
                    return Some(Violation::new(
                        field,
                        format!("must be at least {} characters", min),
                    ));
                }
            }
            Rule::NonEmpty => {
                if value.is_empty() {
                    return Some(Violation::new(field, "must not be empty"));
                }
            }
            Rule::Date => {
                if time::parse_date(value).is_none() {
                    return Some(Violation::new(field, "must be a valid date"));
                }
            }
        }
    }

    None
}

/// Validate an article draft against the article schema.
pub fn validate_article(draft: &ArticleDraft) -> Vec<Violation> {
    evaluate(
        ARTICLE_SCHEMA,
        &[
            draft.article_title.as_deref(),
            draft.article_abstract.as_deref(),
            draft.article_date.as_deref(),
        ],
    )
}

/// Validate a reference draft against the reference schema.
pub fn validate_reference(draft: &ReferenceDraft) -> Vec<Violation> {
    evaluate(
        REFERENCE_SCHEMA,
        &[
            draft.reference_title.as_deref(),
            draft.reference_date.as_deref(),
            draft.reference_authors.as_deref(),
        ],
    )
}

/// Validate a draft and extract the article values to persist.
///
/// The date is re-emitted in canonical form so stored values sort
/// lexicographically by time.
pub fn new_article(draft: &ArticleDraft) -> Result<NewArticle, Vec<Violation>> {
    let violations = validate_article(draft);
    if !violations.is_empty() {
        return Err(violations);
    }

    match (
        &draft.article_title,
        &draft.article_abstract,
        draft.article_date.as_deref().and_then(time::canonicalize_date),
    ) {
        (Some(title), Some(article_abstract), Some(date)) => Ok(NewArticle {
            article_title: title.clone(),
            article_abstract: article_abstract.clone(),
            article_date: date,
        }),
        // Unreachable once validation passed; report the date field to
        // keep the error shape consistent anyway
        _ => Err(vec![Violation::new("articleDate", "must be a valid date")]),
    }
}

/// Validate a draft and extract the reference values to persist.
pub fn new_reference(draft: &ReferenceDraft) -> Result<NewReference, Vec<Violation>> {
    let violations = validate_reference(draft);
    if !violations.is_empty() {
        return Err(violations);
    }

    match (
        &draft.reference_title,
        draft.reference_date.as_deref().and_then(time::canonicalize_date),
        &draft.reference_authors,
    ) {
        (Some(title), Some(date), Some(authors)) => Ok(NewReference {
            reference_title: title.clone(),
            reference_date: date,
            reference_authors: authors.clone(),
        }),
        _ => Err(vec![Violation::new("referenceDate", "must be a valid date")]),
    }
}

/// Merge a partial update onto an existing article.
///
/// Fields absent from the draft keep their stored values; the merged
/// draft then goes through the same validation as a create.
pub fn merge_article(existing: &Article, draft: &ArticleDraft) -> ArticleDraft {
    ArticleDraft {
        article_title: draft
            .article_title
            .clone()
            .or_else(|| Some(existing.article_title.clone())),
        article_abstract: draft
            .article_abstract
            .clone()
            .or_else(|| Some(existing.article_abstract.clone())),
        article_date: draft
            .article_date
            .clone()
            .or_else(|| Some(existing.article_date.clone())),
    }
}

/// Merge a partial update onto an existing reference.
pub fn merge_reference(existing: &Reference, draft: &ReferenceDraft) -> ReferenceDraft {
    ReferenceDraft {
        reference_title: draft
            .reference_title
            .clone()
            .or_else(|| Some(existing.reference_title.clone())),
        reference_date: draft
            .reference_date
            .clone()
            .or_else(|| Some(existing.reference_date.clone())),
        reference_authors: draft
            .reference_authors
            .clone()
            .or_else(|| Some(existing.reference_authors.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_article_draft() -> ArticleDraft {
        ArticleDraft {
            article_title: Some("A valid title".to_string()),
            article_abstract: Some("An abstract with enough characters".to_string()),
            article_date: Some("2020-01-01".to_string()),
        }
    }

    #[test]
    fn test_valid_article_has_no_violations() {
        assert!(validate_article(&full_article_draft()).is_empty());
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let violations = validate_article(&ArticleDraft::default());

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["articleTitle", "articleAbstract", "articleDate"]);
        assert!(violations.iter().all(|v| v.message == "is required"));
    }

    #[test]
    fn test_short_title_is_rejected() {
        let mut draft = full_article_draft();
        draft.article_title = Some("1234".to_string());

        let violations = validate_article(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "articleTitle");
        assert_eq!(violations[0].message, "must be at least 5 characters");
    }

    #[test]
    fn test_boundary_lengths_pass() {
        let draft = ArticleDraft {
            article_title: Some("12345".to_string()),
            article_abstract: Some("1234567890".to_string()),
            article_date: Some("2020-01-01".to_string()),
        };

        assert!(validate_article(&draft).is_empty());
    }

    #[test]
    fn test_minimum_lengths_count_characters_not_bytes() {
        let mut draft = full_article_draft();
        // Five characters, more than five bytes
        draft.article_title = Some("héllo".to_string());

        assert!(validate_article(&draft).is_empty());
    }

    #[test]
    fn test_short_abstract_is_rejected() {
        let mut draft = full_article_draft();
        draft.article_abstract = Some("123456789".to_string());

        let violations = validate_article(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "articleAbstract");
        assert_eq!(violations[0].message, "must be at least 10 characters");
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let mut draft = full_article_draft();
        draft.article_date = Some("soon".to_string());

        let violations = validate_article(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "articleDate");
    }

    #[test]
    fn test_multiple_violations_reported_together() {
        let draft = ArticleDraft {
            article_title: Some("1234".to_string()),
            article_abstract: Some("short".to_string()),
            article_date: Some("never".to_string()),
        };

        assert_eq!(validate_article(&draft).len(), 3);
    }

    #[test]
    fn test_new_article_canonicalizes_date() {
        let values = new_article(&full_article_draft()).unwrap();
        assert_eq!(values.article_date, "2020-01-01T00:00:00Z");
    }

    #[test]
    fn test_reference_authors_must_be_present_and_non_empty() {
        let mut draft = ReferenceDraft {
            reference_title: Some("A reference title".to_string()),
            reference_date: Some("2019-06-15".to_string()),
            reference_authors: None,
        };

        let violations = validate_reference(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "referenceAuthors");
        assert_eq!(violations[0].message, "is required");

        draft.reference_authors = Some(String::new());
        let violations = validate_reference(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "referenceAuthors");
        assert_eq!(violations[0].message, "must not be empty");

        draft.reference_authors = Some("Doe, J.".to_string());
        assert!(validate_reference(&draft).is_empty());
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let existing = Article {
            article_id: 1,
            article_title: "Original title".to_string(),
            article_abstract: "Original abstract text".to_string(),
            article_date: "2020-01-01T00:00:00Z".to_string(),
        };
        let draft = ArticleDraft {
            article_title: Some("Updated title".to_string()),
            article_abstract: None,
            article_date: None,
        };

        let merged = merge_article(&existing, &draft);
        assert_eq!(merged.article_title.as_deref(), Some("Updated title"));
        assert_eq!(
            merged.article_abstract.as_deref(),
            Some("Original abstract text")
        );
        assert_eq!(merged.article_date.as_deref(), Some("2020-01-01T00:00:00Z"));
    }

    #[test]
    fn test_merged_update_still_validates() {
        let existing = Article {
            article_id: 1,
            article_title: "Original title".to_string(),
            article_abstract: "Original abstract text".to_string(),
            article_date: "2020-01-01T00:00:00Z".to_string(),
        };
        // Shrinking the title below the minimum must fail even though
        // the other fields stay valid
        let draft = ArticleDraft {
            article_title: Some("tiny".to_string()),
            article_abstract: None,
            article_date: None,
        };

        let merged = merge_article(&existing, &draft);
        let violations = validate_article(&merged);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "articleTitle");
    }
}
