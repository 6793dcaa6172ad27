//! Typed capability records for the recognized vocabulary terms.
//!
//! Each record mirrors one term (or nested record type) from the capabilities
//! and core vocabularies and knows how to initialize itself from a generic
//! record expression. Boolean-like fields are `Option<bool>` throughout:
//! "not declared" and "declared false" drive serialization and fallback
//! differently and are never collapsed.
//!
//! Terms outside this fixed catalog are not interpreted.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveTime};

use crate::error::ResolveError;
use crate::model::{Expression, PrimitiveKind, Record};
use crate::primitive::{self, PrimitiveValue};

/// Qualified term names recognized by the resolver.
pub mod terms {
    pub const INSERT_RESTRICTIONS: &str = "Org.OData.Capabilities.V1.InsertRestrictions";
    pub const UPDATE_RESTRICTIONS: &str = "Org.OData.Capabilities.V1.UpdateRestrictions";
    pub const DELETE_RESTRICTIONS: &str = "Org.OData.Capabilities.V1.DeleteRestrictions";
    pub const READ_RESTRICTIONS: &str = "Org.OData.Capabilities.V1.ReadRestrictions";
    pub const COUNT_RESTRICTIONS: &str = "Org.OData.Capabilities.V1.CountRestrictions";
    pub const TOP_SUPPORTED: &str = "Org.OData.Capabilities.V1.TopSupported";
    pub const SKIP_SUPPORTED: &str = "Org.OData.Capabilities.V1.SkipSupported";
    pub const EXAMPLE: &str = "Org.OData.Core.V1.Example";
    pub const REVISIONS: &str = "Org.OData.Core.V1.Revisions";
    pub const DESCRIPTION: &str = "Org.OData.Core.V1.Description";
}

/// A capability record that can be materialized from a record expression
/// found under its qualified term.
pub trait TermRecord: Sized {
    const TERM: &'static str;

    /// Initialize from a generic record expression.
    ///
    /// Unknown source properties are ignored; missing optional properties
    /// leave fields unset; missing required properties fail.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` when a property literal fails to decode or a
    /// required property is absent.
    fn from_record(record: &Record) -> Result<Self, ResolveError>;
}

// --- Field extraction helpers ---

fn type_name(record: &Record, default: &str) -> String {
    record
        .type_name
        .clone()
        .unwrap_or_else(|| default.to_string())
}

fn wrong_type(record: &Record, default: &str, property: &str, expected: &str, actual: &str) -> ResolveError {
    ResolveError::InvalidPropertyType {
        type_name: type_name(record, default),
        property: property.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

fn optional_bool(
    record: &Record,
    default: &str,
    property: &str,
) -> Result<Option<bool>, ResolveError> {
    match record.property(property) {
        None => Ok(None),
        Some(Expression::Literal(lit)) if lit.kind == PrimitiveKind::Boolean => {
            match primitive::decode_literal(lit)? {
                PrimitiveValue::Boolean(b) => Ok(Some(b)),
                _ => unreachable!("boolean literal decodes to boolean"),
            }
        }
        Some(other) => Err(wrong_type(
            record,
            default,
            property,
            "a boolean literal",
            other.shape_name(),
        )),
    }
}

fn optional_string(
    record: &Record,
    default: &str,
    property: &str,
) -> Result<Option<String>, ResolveError> {
    match record.property(property) {
        None => Ok(None),
        Some(Expression::Literal(lit)) if lit.kind == PrimitiveKind::String => {
            Ok(Some(lit.value.clone()))
        }
        Some(other) => Err(wrong_type(
            record,
            default,
            property,
            "a string literal",
            other.shape_name(),
        )),
    }
}

fn required_string(record: &Record, default: &str, property: &str) -> Result<String, ResolveError> {
    optional_string(record, default, property)?.ok_or_else(|| ResolveError::MissingRecordProperty {
        type_name: type_name(record, default),
        property: property.to_string(),
    })
}

fn string_collection(
    record: &Record,
    default: &str,
    property: &str,
) -> Result<Vec<String>, ResolveError> {
    let Some(expr) = record.property(property) else {
        return Ok(Vec::new());
    };
    let Expression::Collection(items) = expr else {
        return Err(wrong_type(
            record,
            default,
            property,
            "a collection of strings",
            expr.shape_name(),
        ));
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Expression::Literal(lit) if lit.kind == PrimitiveKind::String => {
                out.push(lit.value.clone());
            }
            other => {
                return Err(wrong_type(
                    record,
                    default,
                    property,
                    "a collection of strings",
                    other.shape_name(),
                ))
            }
        }
    }
    Ok(out)
}

fn scope_collection(
    record: &Record,
    default: &str,
    property: &str,
) -> Result<Vec<ScopeType>, ResolveError> {
    let Some(expr) = record.property(property) else {
        return Ok(Vec::new());
    };
    let Expression::Collection(items) = expr else {
        return Err(wrong_type(
            record,
            default,
            property,
            "a collection of scope records",
            expr.shape_name(),
        ));
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Expression::Record(scope) => out.push(ScopeType::from_record(scope)?),
            other => {
                return Err(wrong_type(
                    record,
                    default,
                    property,
                    "a collection of scope records",
                    other.shape_name(),
                ))
            }
        }
    }
    Ok(out)
}

fn optional_timestamp(
    record: &Record,
    default: &str,
    property: &str,
) -> Result<Option<DateTime<FixedOffset>>, ResolveError> {
    let Some(expr) = record.property(property) else {
        return Ok(None);
    };
    match expr {
        Expression::Literal(lit) if lit.kind == PrimitiveKind::DateTimeOffset => {
            match primitive::decode_literal(lit)? {
                PrimitiveValue::DateTimeOffset(dt) => Ok(Some(dt)),
                _ => unreachable!("timestamp literal decodes to timestamp"),
            }
        }
        // Bare dates normalize to midnight UTC so the serialized form is uniform.
        Expression::Literal(lit) if lit.kind == PrimitiveKind::Date => {
            match primitive::decode_literal(lit)? {
                PrimitiveValue::Date(d) => {
                    Ok(Some(d.and_time(NaiveTime::MIN).and_utc().fixed_offset()))
                }
                _ => unreachable!("date literal decodes to date"),
            }
        }
        other => Err(wrong_type(
            record,
            default,
            property,
            "a date or timestamp literal",
            other.shape_name(),
        )),
    }
}

// --- Nested record types ---

/// Which query options modification requests support.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationQueryOptions {
    pub expand_supported: Option<bool>,
    pub select_supported: Option<bool>,
    pub compute_supported: Option<bool>,
    pub filter_supported: Option<bool>,
    pub search_supported: Option<bool>,
    pub sort_supported: Option<bool>,
}

impl ModificationQueryOptions {
    pub const TYPE_NAME: &'static str = "Org.OData.Capabilities.V1.ModificationQueryOptionsType";

    pub fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = Self::TYPE_NAME;
        Ok(Self {
            expand_supported: optional_bool(record, t, "ExpandSupported")?,
            select_supported: optional_bool(record, t, "SelectSupported")?,
            compute_supported: optional_bool(record, t, "ComputeSupported")?,
            filter_supported: optional_bool(record, t, "FilterSupported")?,
            search_supported: optional_bool(record, t, "SearchSupported")?,
            sort_supported: optional_bool(record, t, "SortSupported")?,
        })
    }

    /// Query option names declared supported, in the fixed catalog order.
    pub fn supported_options(&self) -> Vec<&'static str> {
        [
            (self.expand_supported, "$expand"),
            (self.select_supported, "$select"),
            (self.compute_supported, "$compute"),
            (self.filter_supported, "$filter"),
            (self.search_supported, "$search"),
            (self.sort_supported, "$orderby"),
        ]
        .into_iter()
        .filter(|(flag, _)| *flag == Some(true))
        .map(|(_, name)| name)
        .collect()
    }
}

/// An authorization scope requirement.
///
/// `restricted_properties` carries the mini-grammar (`*`, `-Prop`, `Prop`)
/// opaquely; this core does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeType {
    pub scope: String,
    pub restricted_properties: String,
}

impl ScopeType {
    pub const TYPE_NAME: &'static str = "Org.OData.Capabilities.V1.ScopeType";

    /// Both fields are required; a record missing either fails construction.
    pub fn from_record(record: &Record) -> Result<Self, ResolveError> {
        Ok(Self {
            scope: required_string(record, Self::TYPE_NAME, "Scope")?,
            restricted_properties: required_string(record, Self::TYPE_NAME, "RestrictedProperties")?,
        })
    }
}

/// Nested restrictions for reads addressing a single entity by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadByKeyRestrictions {
    pub readable: Option<bool>,
}

impl ReadByKeyRestrictions {
    pub const TYPE_NAME: &'static str = "Org.OData.Capabilities.V1.ReadByKeyRestrictionsType";

    pub fn from_record(record: &Record) -> Result<Self, ResolveError> {
        Ok(Self {
            readable: optional_bool(record, Self::TYPE_NAME, "Readable")?,
        })
    }
}

// --- Term records ---

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertRestrictions {
    pub insertable: Option<bool>,
    pub non_insertable_navigation_properties: Vec<String>,
    pub required_scopes: Vec<ScopeType>,
    pub query_options: Option<ModificationQueryOptions>,
    pub description: Option<String>,
}

impl InsertRestrictions {
    /// Inserts are permitted unless `Insertable` is explicitly false.
    pub fn allows_insert(&self) -> bool {
        self.insertable != Some(false)
    }
}

impl TermRecord for InsertRestrictions {
    const TERM: &'static str = terms::INSERT_RESTRICTIONS;

    fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = "Org.OData.Capabilities.V1.InsertRestrictionsType";
        Ok(Self {
            insertable: optional_bool(record, t, "Insertable")?,
            non_insertable_navigation_properties: string_collection(
                record,
                t,
                "NonInsertableNavigationProperties",
            )?,
            required_scopes: scope_collection(record, t, "RequiredScopes")?,
            query_options: nested_query_options(record, t)?,
            description: optional_string(record, t, "Description")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRestrictions {
    pub updatable: Option<bool>,
    pub upsertable: Option<bool>,
    pub required_scopes: Vec<ScopeType>,
    pub query_options: Option<ModificationQueryOptions>,
    pub description: Option<String>,
}

impl UpdateRestrictions {
    pub fn allows_update(&self) -> bool {
        self.updatable != Some(false)
    }
}

impl TermRecord for UpdateRestrictions {
    const TERM: &'static str = terms::UPDATE_RESTRICTIONS;

    fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = "Org.OData.Capabilities.V1.UpdateRestrictionsType";
        Ok(Self {
            updatable: optional_bool(record, t, "Updatable")?,
            upsertable: optional_bool(record, t, "Upsertable")?,
            required_scopes: scope_collection(record, t, "RequiredScopes")?,
            query_options: nested_query_options(record, t)?,
            description: optional_string(record, t, "Description")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteRestrictions {
    pub deletable: Option<bool>,
    pub non_deletable_navigation_properties: Vec<String>,
    pub required_scopes: Vec<ScopeType>,
    pub description: Option<String>,
}

impl DeleteRestrictions {
    pub fn allows_delete(&self) -> bool {
        self.deletable != Some(false)
    }
}

impl TermRecord for DeleteRestrictions {
    const TERM: &'static str = terms::DELETE_RESTRICTIONS;

    fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = "Org.OData.Capabilities.V1.DeleteRestrictionsType";
        Ok(Self {
            deletable: optional_bool(record, t, "Deletable")?,
            non_deletable_navigation_properties: string_collection(
                record,
                t,
                "NonDeletableNavigationProperties",
            )?,
            required_scopes: scope_collection(record, t, "RequiredScopes")?,
            description: optional_string(record, t, "Description")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadRestrictions {
    pub readable: Option<bool>,
    pub required_scopes: Vec<ScopeType>,
    pub description: Option<String>,
    pub read_by_key: Option<ReadByKeyRestrictions>,
}

impl ReadRestrictions {
    pub fn allows_read(&self) -> bool {
        self.readable != Some(false)
    }

    /// Key-addressed reads follow `ReadByKeyRestrictions` when declared,
    /// otherwise inherit the collection-level flag.
    pub fn allows_read_by_key(&self) -> bool {
        match self.read_by_key.as_ref().and_then(|r| r.readable) {
            Some(flag) => flag,
            None => self.allows_read(),
        }
    }
}

impl TermRecord for ReadRestrictions {
    const TERM: &'static str = terms::READ_RESTRICTIONS;

    fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = "Org.OData.Capabilities.V1.ReadRestrictionsType";
        let read_by_key = match record.property("ReadByKeyRestrictions") {
            None => None,
            Some(Expression::Record(nested)) => Some(ReadByKeyRestrictions::from_record(nested)?),
            Some(other) => {
                return Err(wrong_type(
                    record,
                    t,
                    "ReadByKeyRestrictions",
                    "a record",
                    other.shape_name(),
                ))
            }
        };
        Ok(Self {
            readable: optional_bool(record, t, "Readable")?,
            required_scopes: scope_collection(record, t, "RequiredScopes")?,
            description: optional_string(record, t, "Description")?,
            read_by_key,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountRestrictions {
    pub countable: Option<bool>,
}

impl CountRestrictions {
    pub fn allows_count(&self) -> bool {
        self.countable != Some(false)
    }
}

impl TermRecord for CountRestrictions {
    const TERM: &'static str = terms::COUNT_RESTRICTIONS;

    fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = "Org.OData.Capabilities.V1.CountRestrictionsType";
        Ok(Self {
            countable: optional_bool(record, t, "Countable")?,
        })
    }
}

fn nested_query_options(
    record: &Record,
    parent_type: &str,
) -> Result<Option<ModificationQueryOptions>, ResolveError> {
    match record.property("QueryOptions") {
        None => Ok(None),
        Some(Expression::Record(nested)) => Ok(Some(ModificationQueryOptions::from_record(nested)?)),
        Some(other) => Err(wrong_type(
            record,
            parent_type,
            "QueryOptions",
            "a record",
            other.shape_name(),
        )),
    }
}

// --- Example values ---

/// An example value attached to a model element.
///
/// The variant set is closed and fixed by the vocabulary, so this is a tagged
/// union rather than an open hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    Primitive {
        description: Option<String>,
        value: PrimitiveValue,
    },
    External {
        description: Option<String>,
        external_value: String,
    },
}

const PRIMITIVE_EXAMPLE_TYPE: &str = "Org.OData.Core.V1.PrimitiveExampleValue";
const EXTERNAL_EXAMPLE_TYPE: &str = "Org.OData.Core.V1.ExternalExampleValue";

type ExampleCtor = fn(&Record) -> Result<ExampleValue, ResolveError>;

/// Registry mapping declared record type names to constructors.
///
/// Populated once, queried by exact string match. Replaces runtime reflection
/// over declared metadata with a plain lookup table.
fn example_registry() -> &'static HashMap<&'static str, ExampleCtor> {
    static REGISTRY: OnceLock<HashMap<&'static str, ExampleCtor>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map: HashMap<&'static str, ExampleCtor> = HashMap::new();
        map.insert(PRIMITIVE_EXAMPLE_TYPE, primitive_example);
        map.insert(EXTERNAL_EXAMPLE_TYPE, external_example);
        map
    })
}

fn primitive_example(record: &Record) -> Result<ExampleValue, ResolveError> {
    let t = PRIMITIVE_EXAMPLE_TYPE;
    let value = match record.property("Value") {
        Some(Expression::Literal(lit)) => primitive::decode_literal(lit)?,
        Some(other) => {
            return Err(wrong_type(record, t, "Value", "a literal", other.shape_name()))
        }
        None => {
            return Err(ResolveError::MissingRecordProperty {
                type_name: t.to_string(),
                property: "Value".to_string(),
            })
        }
    };
    Ok(ExampleValue::Primitive {
        description: optional_string(record, t, "Description")?,
        value,
    })
}

fn external_example(record: &Record) -> Result<ExampleValue, ResolveError> {
    let t = EXTERNAL_EXAMPLE_TYPE;
    Ok(ExampleValue::External {
        description: optional_string(record, t, "Description")?,
        external_value: required_string(record, t, "ExternalValue")?,
    })
}

impl TermRecord for ExampleValue {
    const TERM: &'static str = terms::EXAMPLE;

    fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let declared = record.type_name.as_deref().unwrap_or("(none)");
        match example_registry().get(declared) {
            Some(ctor) => ctor(record),
            None => Err(ResolveError::UnknownRecordType {
                type_name: declared.to_string(),
            }),
        }
    }
}

// --- Revisions ---

/// One entry of the `Core.Revisions` collection. Entries whose kind is
/// `deprecated` feed the deprecation extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Revision {
    pub version: Option<String>,
    pub kind: String,
    pub description: Option<String>,
    pub date: Option<DateTime<FixedOffset>>,
    pub removal_date: Option<DateTime<FixedOffset>>,
}

impl Revision {
    pub const TYPE_NAME: &'static str = "Org.OData.Core.V1.RevisionType";

    pub fn from_record(record: &Record) -> Result<Self, ResolveError> {
        let t = Self::TYPE_NAME;
        Ok(Self {
            version: optional_string(record, t, "Version")?,
            kind: required_string(record, t, "Kind")?,
            description: optional_string(record, t, "Description")?,
            date: optional_timestamp(record, t, "Date")?,
            removal_date: optional_timestamp(record, t, "RemovalDate")?,
        })
    }

    pub fn is_deprecation(&self) -> bool {
        self.kind.eq_ignore_ascii_case("deprecated")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_record_leaves_every_field_unset() {
        let r = InsertRestrictions::from_record(&record(json!({}))).unwrap();
        assert_eq!(r, InsertRestrictions::default());
        assert_eq!(r.insertable, None);
        assert!(r.allows_insert());
    }

    #[test]
    fn explicit_false_is_distinct_from_unset() {
        let r = InsertRestrictions::from_record(&record(json!({
            "properties": {
                "Insertable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }
        })))
        .unwrap();
        assert_eq!(r.insertable, Some(false));
        assert!(!r.allows_insert());
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let r = ReadRestrictions::from_record(&record(json!({
            "properties": {
                "Readable": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                "SomeFutureProperty": { "literal": { "kind": "Edm.String", "value": "x" } }
            }
        })))
        .unwrap();
        assert_eq!(r.readable, Some(true));
    }

    #[test]
    fn bad_literal_fails_whole_record() {
        let result = UpdateRestrictions::from_record(&record(json!({
            "properties": {
                "Updatable": { "literal": { "kind": "Edm.Boolean", "value": "maybe" } }
            }
        })));
        assert!(matches!(result, Err(ResolveError::InvalidLiteral { .. })));
    }

    #[test]
    fn modification_query_options_supported_list() {
        let q = ModificationQueryOptions::from_record(&record(json!({
            "properties": {
                "ExpandSupported": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                "SortSupported": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                "FilterSupported": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }
        })))
        .unwrap();
        assert_eq!(q.supported_options(), vec!["$expand", "$orderby"]);
    }

    #[test]
    fn scope_requires_both_fields() {
        let ok = ScopeType::from_record(&record(json!({
            "properties": {
                "Scope": { "literal": { "kind": "Edm.String", "value": "Products.Read" } },
                "RestrictedProperties": { "literal": { "kind": "Edm.String", "value": "*" } }
            }
        })))
        .unwrap();
        assert_eq!(ok.scope, "Products.Read");

        let missing = ScopeType::from_record(&record(json!({
            "properties": {
                "Scope": { "literal": { "kind": "Edm.String", "value": "Products.Read" } }
            }
        })));
        assert!(matches!(
            missing,
            Err(ResolveError::MissingRecordProperty { property, .. }) if property == "RestrictedProperties"
        ));
    }

    #[test]
    fn read_by_key_overrides_collection_flag() {
        let r = ReadRestrictions::from_record(&record(json!({
            "properties": {
                "Readable": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                "ReadByKeyRestrictions": {
                    "record": {
                        "properties": {
                            "Readable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
                        }
                    }
                }
            }
        })))
        .unwrap();
        assert!(r.allows_read());
        assert!(!r.allows_read_by_key());

        let inherit = ReadRestrictions::from_record(&record(json!({
            "properties": {
                "Readable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }
        })))
        .unwrap();
        assert!(!inherit.allows_read_by_key());
    }

    mod examples {
        use super::*;

        #[test]
        fn primitive_variant_dispatched_by_type_name() {
            let example = ExampleValue::from_record(&record(json!({
                "type": "Org.OData.Core.V1.PrimitiveExampleValue",
                "properties": {
                    "Description": { "literal": { "kind": "Edm.String", "value": "a sample" } },
                    "Value": { "literal": { "kind": "Edm.Int64", "value": "7" } }
                }
            })))
            .unwrap();
            match example {
                ExampleValue::Primitive { description, value } => {
                    assert_eq!(description.as_deref(), Some("a sample"));
                    assert_eq!(value, PrimitiveValue::Int64(7));
                }
                other => panic!("expected primitive example, got {:?}", other),
            }
        }

        #[test]
        fn external_variant_requires_url() {
            let example = ExampleValue::from_record(&record(json!({
                "type": "Org.OData.Core.V1.ExternalExampleValue",
                "properties": {
                    "ExternalValue": { "literal": { "kind": "Edm.String", "value": "https://example.com/p.json" } }
                }
            })))
            .unwrap();
            assert!(matches!(example, ExampleValue::External { .. }));

            let missing = ExampleValue::from_record(&record(json!({
                "type": "Org.OData.Core.V1.ExternalExampleValue"
            })));
            assert!(matches!(
                missing,
                Err(ResolveError::MissingRecordProperty { .. })
            ));
        }

        #[test]
        fn unknown_type_name_errors() {
            let result = ExampleValue::from_record(&record(json!({
                "type": "Org.OData.Core.V1.FancyExampleValue"
            })));
            assert!(matches!(
                result,
                Err(ResolveError::UnknownRecordType { type_name }) if type_name.contains("Fancy")
            ));
        }

        #[test]
        fn undeclared_type_name_errors() {
            let result = ExampleValue::from_record(&record(json!({
                "properties": {
                    "Value": { "literal": { "kind": "Edm.Int64", "value": "7" } }
                }
            })));
            assert!(matches!(result, Err(ResolveError::UnknownRecordType { .. })));
        }
    }

    mod revisions {
        use super::*;

        #[test]
        fn date_literal_normalizes_to_midnight_utc() {
            let rev = Revision::from_record(&record(json!({
                "properties": {
                    "Kind": { "literal": { "kind": "Edm.String", "value": "deprecated" } },
                    "Date": { "literal": { "kind": "Edm.Date", "value": "2020-01-01" } }
                }
            })))
            .unwrap();
            assert!(rev.is_deprecation());
            let date = rev.date.unwrap();
            assert_eq!(
                crate::primitive::format_timestamp(&date),
                "2020-01-01T00:00:00.0000000+00:00"
            );
        }

        #[test]
        fn kind_is_required() {
            let result = Revision::from_record(&record(json!({})));
            assert!(matches!(
                result,
                Err(ResolveError::MissingRecordProperty { property, .. }) if property == "Kind"
            ));
        }
    }
}
