//! Conversion of annotated EDM models to OpenAPI documents.
//!
//! An EDM model is a read-only graph of entity types, enum types, operations,
//! and containers, decorated with vocabulary annotations from the OData
//! Capabilities and Core vocabularies. This crate resolves those annotations
//! into typed capability records and assembles an OpenAPI 2.0, 3.0, or 3.1
//! document from them: paths for entity sets, singletons, navigation
//! properties, and operations; schemas for entity and enum types; and
//! Microsoft OpenAPI extensions for deprecation and enum metadata.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use odata_openapi::{convert, load_model, ConvertSettings, OpenApiVersion};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = load_model(Path::new("model.json"))?;
//! let settings = ConvertSettings::new()
//!     .service_root("https://api.example.com/v1")
//!     .open_api_version(OpenApiVersion::V3_0);
//! let document = convert(&model, &settings)?;
//! println!("{}", serde_json::to_string_pretty(&document)?);
//! # Ok(())
//! # }
//! ```
//!
//! Capability annotations are tri-state: a boolean left unset is not the same
//! as one set to `false`, and defaults apply only on true absence. Resolution
//! on an entity set or singleton falls back to the underlying entity type
//! when the source itself is unannotated.

pub mod capabilities;
pub mod check;
pub mod error;
pub mod extensions;
pub mod generator;
pub mod loader;
pub mod model;
pub mod primitive;
pub mod resolver;
pub mod types;

pub use capabilities::{
    CountRestrictions, DeleteRestrictions, ExampleValue, InsertRestrictions,
    ModificationQueryOptions, ReadByKeyRestrictions, ReadRestrictions, Revision, ScopeType,
    UpdateRestrictions,
};
pub use check::{check_model, CheckReport, Finding};
pub use error::{ConvertError, LoadError, ResolveError};
pub use generator::convert;
pub use loader::{load_model, load_model_str};
pub use model::{EdmModel, NavigationSource};
pub use types::{ConvertSettings, OpenApiVersion};
