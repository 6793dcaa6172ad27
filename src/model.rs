//! EDM model graph - the read-only input to conversion.
//!
//! The core does not parse CSDL XML. Models arrive either as JSON in the
//! format deserialized here, or are built in memory by embedders. Conversion
//! only ever reads the graph; a model can safely be shared across concurrent
//! conversion runs with different settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The EDM primitive kinds this crate can decode from annotation literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    #[serde(rename = "Edm.String")]
    String,
    #[serde(rename = "Edm.Int64")]
    Int64,
    #[serde(rename = "Edm.Boolean")]
    Boolean,
    #[serde(rename = "Edm.Double")]
    Double,
    #[serde(rename = "Edm.Decimal")]
    Decimal,
    #[serde(rename = "Edm.TimeOfDay")]
    TimeOfDay,
    #[serde(rename = "Edm.Date")]
    Date,
    #[serde(rename = "Edm.Duration")]
    Duration,
    #[serde(rename = "Edm.DateTimeOffset")]
    DateTimeOffset,
    #[serde(rename = "Edm.Guid")]
    Guid,
}

impl PrimitiveKind {
    /// Returns the qualified EDM name, e.g. `Edm.Boolean`.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "Edm.String",
            PrimitiveKind::Int64 => "Edm.Int64",
            PrimitiveKind::Boolean => "Edm.Boolean",
            PrimitiveKind::Double => "Edm.Double",
            PrimitiveKind::Decimal => "Edm.Decimal",
            PrimitiveKind::TimeOfDay => "Edm.TimeOfDay",
            PrimitiveKind::Date => "Edm.Date",
            PrimitiveKind::Duration => "Edm.Duration",
            PrimitiveKind::DateTimeOffset => "Edm.DateTimeOffset",
            PrimitiveKind::Guid => "Edm.Guid",
        }
    }
}

/// A raw literal expression: the declared primitive kind plus the literal text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Literal {
    pub kind: PrimitiveKind,
    pub value: String,
}

/// A record expression: an optional declared type name plus named properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, Expression>,
}

impl Record {
    /// Look up a property by name. Unknown properties in the source are
    /// simply never looked up, which is how forward compatibility falls out.
    pub fn property(&self, name: &str) -> Option<&Expression> {
        self.properties.get(name)
    }
}

/// An annotation value expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Literal(Literal),
    Record(Record),
    Collection(Vec<Expression>),
}

impl Expression {
    /// Returns the expression shape name for error messages.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Record(_) => "record",
            Expression::Collection(_) => "collection",
        }
    }
}

/// A vocabulary annotation: a qualified term name bound to a value expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    pub term: String,
    pub value: Expression,
}

/// Anything in the graph that carries vocabulary annotations.
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];

    /// Find the annotation matching a qualified term name, if declared.
    fn find_annotation(&self, term: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.term == term)
    }
}

macro_rules! impl_annotated {
    ($($ty:ty),+) => {
        $(impl Annotated for $ty {
            fn annotations(&self) -> &[Annotation] {
                &self.annotations
            }
        })+
    };
}

/// A structural property of an entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// A navigable relationship to another entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationProperty {
    pub name: String,
    /// Target entity type, simple or namespace-qualified.
    pub target: String,
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    /// Key property names, in key declaration order.
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    #[serde(default)]
    pub is_flags: bool,
    #[serde(default)]
    pub members: Vec<EnumMember>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Function,
    Action,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub nullable: bool,
}

/// A function or action, optionally bound to an entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub kind: OperationKind,
    /// Entity type this operation is bound to. None for unbound operations.
    #[serde(default)]
    pub binding_type: Option<String>,
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySet {
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Singleton {
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Exposes an unbound operation through the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationImport {
    pub name: String,
    /// Name of the unbound operation in the model.
    pub operation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityContainer {
    pub name: String,
    #[serde(default)]
    pub entity_sets: Vec<EntitySet>,
    #[serde(default)]
    pub singletons: Vec<Singleton>,
    #[serde(default)]
    pub operation_imports: Vec<OperationImport>,
}

/// The whole schema graph handed to conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdmModel {
    pub namespace: String,
    #[serde(default)]
    pub entity_types: Vec<EntityType>,
    #[serde(default)]
    pub enum_types: Vec<EnumType>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub containers: Vec<EntityContainer>,
}

impl_annotated!(
    Property,
    NavigationProperty,
    EntityType,
    EnumMember,
    EnumType,
    Operation,
    EntitySet,
    Singleton
);

impl EdmModel {
    /// Look up an entity type by simple or namespace-qualified name.
    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        let simple = self.simple_name(name);
        self.entity_types.iter().find(|t| t.name == simple)
    }

    /// Look up an enum type by simple or namespace-qualified name.
    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        let simple = self.simple_name(name);
        self.enum_types.iter().find(|t| t.name == simple)
    }

    /// Look up an operation by name.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|o| o.name == name)
    }

    /// Operations bound to the given entity type, in declaration order.
    pub fn bound_operations<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a Operation> {
        let simple = self.simple_name(entity_type).to_string();
        self.operations.iter().filter(move |o| {
            o.binding_type
                .as_deref()
                .is_some_and(|b| b == simple || b == entity_type)
        })
    }

    /// Strip this model's namespace prefix, if present.
    fn simple_name<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(&self.namespace)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name)
    }
}

/// Uniform view over the two navigation-source kinds.
///
/// Entity sets and singletons share the fallback-by-type resolution behavior
/// and most of the path generation logic; this avoids duplicating both.
#[derive(Debug, Clone, Copy)]
pub enum NavigationSource<'a> {
    EntitySet(&'a EntitySet),
    Singleton(&'a Singleton),
}

impl<'a> NavigationSource<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            NavigationSource::EntitySet(s) => &s.name,
            NavigationSource::Singleton(s) => &s.name,
        }
    }

    pub fn entity_type_name(&self) -> &'a str {
        match self {
            NavigationSource::EntitySet(s) => &s.entity_type,
            NavigationSource::Singleton(s) => &s.entity_type,
        }
    }

    /// Entity sets hold collections; singletons hold a single instance.
    pub fn is_collection(&self) -> bool {
        matches!(self, NavigationSource::EntitySet(_))
    }
}

impl Annotated for NavigationSource<'_> {
    fn annotations(&self) -> &[Annotation] {
        match self {
            NavigationSource::EntitySet(s) => &s.annotations,
            NavigationSource::Singleton(s) => &s.annotations,
        }
    }
}
