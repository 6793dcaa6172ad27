//! Vocabulary resolution - locates annotations and materializes them into
//! typed capability records.
//!
//! Lookup is a two-step chain for navigation sources: the entity set or
//! singleton itself first, then its underlying entity type. Absence is a
//! valid, common outcome ("no restriction declared, default policy applies")
//! and is never an error; records are recreated on every lookup and owned by
//! the caller.

use crate::capabilities::{terms, Revision, TermRecord};
use crate::error::ResolveError;
use crate::model::{Annotated, EdmModel, Expression, NavigationSource, PrimitiveKind};
use crate::primitive::{self, PrimitiveValue};

/// Resolve a term record directly on a model element.
///
/// Returns `Ok(None)` when the element carries no matching annotation.
///
/// # Errors
///
/// Returns `ResolveError` if the annotation exists but is not a record, or if
/// record deserialization fails.
pub fn resolve_term<T: TermRecord>(element: &impl Annotated) -> Result<Option<T>, ResolveError> {
    let Some(annotation) = element.find_annotation(T::TERM) else {
        return Ok(None);
    };
    match &annotation.value {
        Expression::Record(record) => T::from_record(record).map(Some),
        other => Err(ResolveError::InvalidAnnotationShape {
            term: T::TERM.to_string(),
            expected: "a record".to_string(),
            actual: other.shape_name().to_string(),
        }),
    }
}

/// Resolve a term record on a navigation source, falling back to the
/// source's underlying entity type when the source itself is unannotated.
///
/// # Errors
///
/// Same as [`resolve_term`].
pub fn resolve_on_source<T: TermRecord>(
    model: &EdmModel,
    source: &NavigationSource,
) -> Result<Option<T>, ResolveError> {
    if let Some(found) = resolve_term::<T>(source)? {
        return Ok(Some(found));
    }
    match model.entity_type(source.entity_type_name()) {
        Some(entity_type) => resolve_term(entity_type),
        None => Ok(None),
    }
}

/// Shortcut for single-boolean terms such as `TopSupported`.
///
/// Decodes the boolean directly instead of materializing a record type for a
/// yes/no answer.
///
/// # Errors
///
/// Returns `ResolveError` if the annotation exists but is not a boolean
/// literal, or if the literal fails to decode.
pub fn resolve_boolean(
    element: &impl Annotated,
    term: &str,
) -> Result<Option<bool>, ResolveError> {
    let Some(annotation) = element.find_annotation(term) else {
        return Ok(None);
    };
    match &annotation.value {
        Expression::Literal(lit) if lit.kind == PrimitiveKind::Boolean => {
            match primitive::decode_literal(lit)? {
                PrimitiveValue::Boolean(b) => Ok(Some(b)),
                _ => unreachable!("boolean literal decodes to boolean"),
            }
        }
        other => Err(ResolveError::InvalidAnnotationShape {
            term: term.to_string(),
            expected: "a boolean literal".to_string(),
            actual: other.shape_name().to_string(),
        }),
    }
}

/// Boolean shortcut with the same source-then-type fallback as
/// [`resolve_on_source`].
///
/// # Errors
///
/// Same as [`resolve_boolean`].
pub fn resolve_boolean_on_source(
    model: &EdmModel,
    source: &NavigationSource,
    term: &str,
) -> Result<Option<bool>, ResolveError> {
    if let Some(found) = resolve_boolean(source, term)? {
        return Ok(Some(found));
    }
    match model.entity_type(source.entity_type_name()) {
        Some(entity_type) => resolve_boolean(entity_type, term),
        None => Ok(None),
    }
}

/// Resolve the `Core.Revisions` collection on an element.
///
/// # Errors
///
/// Returns `ResolveError` if the annotation is not a collection of records or
/// any entry fails to deserialize.
pub fn resolve_revisions(element: &impl Annotated) -> Result<Vec<Revision>, ResolveError> {
    let Some(annotation) = element.find_annotation(terms::REVISIONS) else {
        return Ok(Vec::new());
    };
    let Expression::Collection(items) = &annotation.value else {
        return Err(ResolveError::InvalidAnnotationShape {
            term: terms::REVISIONS.to_string(),
            expected: "a collection of records".to_string(),
            actual: annotation.value.shape_name().to_string(),
        });
    };
    items
        .iter()
        .map(|item| match item {
            Expression::Record(record) => Revision::from_record(record),
            other => Err(ResolveError::InvalidAnnotationShape {
                term: terms::REVISIONS.to_string(),
                expected: "a collection of records".to_string(),
                actual: other.shape_name().to_string(),
            }),
        })
        .collect()
}

/// Resolve the `Core.Description` string on an element.
///
/// # Errors
///
/// Returns `ResolveError` if the annotation is not a string literal.
pub fn resolve_description(element: &impl Annotated) -> Result<Option<String>, ResolveError> {
    let Some(annotation) = element.find_annotation(terms::DESCRIPTION) else {
        return Ok(None);
    };
    match &annotation.value {
        Expression::Literal(lit) if lit.kind == PrimitiveKind::String => {
            Ok(Some(lit.value.clone()))
        }
        other => Err(ResolveError::InvalidAnnotationShape {
            term: terms::DESCRIPTION.to_string(),
            expected: "a string literal".to_string(),
            actual: other.shape_name().to_string(),
        }),
    }
}
