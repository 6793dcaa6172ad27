//! Conversion settings - the sole configuration surface into the core.

use serde::{Deserialize, Serialize};

/// Target OpenAPI specification version.
///
/// Mostly a serialization concern, but the enum-values-description extension
/// is suppressed under 3.1 where native schema enums carry the same
/// information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpenApiVersion {
    #[serde(rename = "2.0")]
    V2_0,
    #[default]
    #[serde(rename = "3.0")]
    V3_0,
    #[serde(rename = "3.1")]
    V3_1,
}

impl OpenApiVersion {
    /// The version string written into the document frame.
    pub fn document_version(&self) -> &'static str {
        match self {
            OpenApiVersion::V2_0 => "2.0",
            OpenApiVersion::V3_0 => "3.0.1",
            OpenApiVersion::V3_1 => "3.1.0",
        }
    }

    pub fn is_v2(&self) -> bool {
        matches!(self, OpenApiVersion::V2_0)
    }

    /// Whether `x-ms-enum` is emitted. Under 3.1 the information is redundant
    /// with native schema enum support, so it is suppressed at write time.
    pub fn supports_enum_values_description(&self) -> bool {
        !matches!(self, OpenApiVersion::V3_1)
    }
}

impl std::str::FromStr for OpenApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2.0" => Ok(OpenApiVersion::V2_0),
            "3.0" => Ok(OpenApiVersion::V3_0),
            "3.1" => Ok(OpenApiVersion::V3_1),
            other => Err(format!(
                "unknown OpenAPI version '{}': expected 2.0, 3.0, or 3.1",
                other
            )),
        }
    }
}

/// Generation policies for one conversion run.
///
/// A flat value object, serializable to and from user-facing configuration.
/// Each run owns its settings exclusively; the input model is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConvertSettings {
    /// Base URI of the service, rendered as the document's server URL.
    pub service_root: String,
    /// Render entity keys as path segments (`/Sets/{key}`) instead of
    /// parenthetical key syntax (`/Sets({key})`). Formatting only.
    pub key_as_segment: bool,
    /// Whether navigation property paths are emitted at all.
    pub enable_navigation_property_path: bool,
    /// Upper bound on recursive navigation traversal. Non-negative by type.
    pub navigation_property_depth: u32,
    /// Whether resolving a key segment consumes one unit of depth budget.
    pub count_key_segment_as_depth: bool,
    pub open_api_version: OpenApiVersion,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            service_root: "http://localhost".to_string(),
            key_as_segment: false,
            enable_navigation_property_path: true,
            navigation_property_depth: 5,
            count_key_segment_as_depth: false,
            open_api_version: OpenApiVersion::default(),
        }
    }
}

impl ConvertSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service_root(mut self, root: impl Into<String>) -> Self {
        self.service_root = root.into();
        self
    }

    pub fn key_as_segment(mut self, enabled: bool) -> Self {
        self.key_as_segment = enabled;
        self
    }

    pub fn enable_navigation_property_path(mut self, enabled: bool) -> Self {
        self.enable_navigation_property_path = enabled;
        self
    }

    pub fn navigation_property_depth(mut self, depth: u32) -> Self {
        self.navigation_property_depth = depth;
        self
    }

    pub fn count_key_segment_as_depth(mut self, enabled: bool) -> Self {
        self.count_key_segment_as_depth = enabled;
        self
    }

    pub fn open_api_version(mut self, version: OpenApiVersion) -> Self {
        self.open_api_version = version;
        self
    }
}
