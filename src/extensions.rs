//! OpenAPI extension writers.
//!
//! Three stateless serializers, each owning its extension name and a
//! conditional-emission rule. Key order inside each block is fixed; the
//! surrounding document uses insertion-ordered maps, so what is inserted here
//! is exactly what is serialized.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use crate::capabilities::Revision;
use crate::primitive::format_timestamp;
use crate::types::OpenApiVersion;

/// Deprecation metadata (`x-ms-deprecation`).
///
/// All fields are optional and independent; the block is omitted entirely
/// when every field is unset. Timestamps serialize with full round-trip
/// precision even when only a date was conceptually relevant - the format is
/// pinned for byte-compatibility with existing consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeprecationExtension {
    pub removal_date: Option<DateTime<FixedOffset>>,
    pub date: Option<DateTime<FixedOffset>>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl DeprecationExtension {
    pub const NAME: &'static str = "x-ms-deprecation";

    /// Build from a deprecation revision record.
    pub fn from_revision(revision: &Revision) -> Self {
        Self {
            removal_date: revision.removal_date,
            date: revision.date,
            version: revision.version.clone(),
            description: revision.description.clone(),
        }
    }

    /// The extension block, or `None` when every field is unset.
    ///
    /// Key order is fixed: removalDate, date, version, description, skipping
    /// unset ones.
    pub fn to_value(&self) -> Option<Value> {
        let mut block = Map::new();
        if let Some(removal) = &self.removal_date {
            block.insert("removalDate".to_string(), Value::String(format_timestamp(removal)));
        }
        if let Some(date) = &self.date {
            block.insert("date".to_string(), Value::String(format_timestamp(date)));
        }
        if let Some(version) = &self.version {
            block.insert("version".to_string(), Value::String(version.clone()));
        }
        if let Some(description) = &self.description {
            block.insert("description".to_string(), Value::String(description.clone()));
        }
        if block.is_empty() {
            None
        } else {
            Some(Value::Object(block))
        }
    }

    /// Attach the block to an extension slot if there is anything to emit.
    pub fn write(&self, target: &mut Map<String, Value>) {
        if let Some(value) = self.to_value() {
            target.insert(Self::NAME.to_string(), value);
        }
    }
}

/// Enum flags metadata (`x-ms-enum-flags`).
///
/// Unlike deprecation, this block is always emitted: the boolean's explicit
/// presence is itself information, and absence of the block never means
/// "false".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumFlagsExtension {
    pub is_flags: bool,
    pub style: Option<String>,
}

impl EnumFlagsExtension {
    pub const NAME: &'static str = "x-ms-enum-flags";

    pub fn to_value(&self) -> Value {
        let mut block = Map::new();
        block.insert("isFlags".to_string(), Value::Bool(self.is_flags));
        if let Some(style) = &self.style {
            block.insert("style".to_string(), Value::String(style.clone()));
        }
        Value::Object(block)
    }

    pub fn write(&self, target: &mut Map<String, Value>) {
        target.insert(Self::NAME.to_string(), self.to_value());
    }
}

/// One enum member entry of the values-description extension.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDescription {
    pub value: String,
    pub name: String,
    pub description: Option<String>,
}

/// Enum values description (`x-ms-enum`).
///
/// Emitted only when the enum name is set and the value list is non-empty,
/// and only for spec versions 2.0 and 3.0 - under 3.1 the information is
/// redundant with native schema enum support and is suppressed at write time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumValuesDescriptionExtension {
    pub enum_name: Option<String>,
    pub values: Vec<EnumValueDescription>,
}

impl EnumValuesDescriptionExtension {
    pub const NAME: &'static str = "x-ms-enum";

    pub fn to_value(&self, version: OpenApiVersion) -> Option<Value> {
        if !version.supports_enum_values_description() {
            return None;
        }
        let name = self.enum_name.as_ref()?;
        if self.values.is_empty() {
            return None;
        }

        let values: Vec<Value> = self
            .values
            .iter()
            .map(|v| {
                let mut entry = Map::new();
                entry.insert("value".to_string(), Value::String(v.value.clone()));
                if let Some(description) = &v.description {
                    entry.insert("description".to_string(), Value::String(description.clone()));
                }
                entry.insert("name".to_string(), Value::String(v.name.clone()));
                Value::Object(entry)
            })
            .collect();

        let mut block = Map::new();
        block.insert("name".to_string(), Value::String(name.clone()));
        block.insert("modelAsString".to_string(), Value::Bool(false));
        block.insert("values".to_string(), Value::Array(values));
        Some(Value::Object(block))
    }

    pub fn write(&self, version: OpenApiVersion, target: &mut Map<String, Value>) {
        if let Some(value) = self.to_value(version) {
            target.insert(Self::NAME.to_string(), value);
        }
    }
}
