//! OpenAPI document assembly.
//!
//! Walks the EDM graph in declaration order, consults the resolver for
//! capability records, and builds the output tree into insertion-ordered
//! maps. The same model and settings always produce a byte-identical
//! document.

use serde_json::{json, Map, Value};

use crate::capabilities::{
    terms, CountRestrictions, DeleteRestrictions, ExampleValue, InsertRestrictions,
    ModificationQueryOptions, ReadRestrictions, ScopeType, UpdateRestrictions,
};
use crate::error::{ConvertError, ResolveError};
use crate::extensions::{
    DeprecationExtension, EnumFlagsExtension, EnumValueDescription,
    EnumValuesDescriptionExtension,
};
use crate::model::{
    EdmModel, EntitySet, EntityType, EnumType, NavigationSource, Operation, OperationImport,
    OperationKind, Singleton,
};
use crate::resolver;
use crate::types::{ConvertSettings, OpenApiVersion};

/// Convert a model into an OpenAPI document tree.
///
/// The model is only read; conversion either returns a complete document or
/// fails with an error naming the offending element and term.
///
/// # Errors
///
/// Returns `ConvertError` when a set or navigation property references an
/// unknown type, or when any recognized annotation fails to deserialize.
pub fn convert(model: &EdmModel, settings: &ConvertSettings) -> Result<Value, ConvertError> {
    Generator { model, settings }.run()
}

const ERROR_SCHEMA: &str = "odata.error";

struct Generator<'a> {
    model: &'a EdmModel,
    settings: &'a ConvertSettings,
}

/// Wrap a resolution failure with the element it occurred on.
fn on<T>(element: &str, term: &str, result: Result<T, ResolveError>) -> Result<T, ConvertError> {
    result.map_err(|source| ConvertError::Annotation {
        element: element.to_string(),
        term: term.to_string(),
        source,
    })
}

impl Generator<'_> {
    fn run(&self) -> Result<Value, ConvertError> {
        let version = self.settings.open_api_version;
        let mut doc = Map::new();

        if version.is_v2() {
            doc.insert("swagger".to_string(), json!("2.0"));
        } else {
            doc.insert("openapi".to_string(), json!(version.document_version()));
        }
        doc.insert(
            "info".to_string(),
            json!({
                "title": format!("OData Service for namespace {}", self.model.namespace),
                "version": "1.0.0"
            }),
        );
        if version.is_v2() {
            doc.insert("basePath".to_string(), json!(self.settings.service_root));
        } else {
            doc.insert(
                "servers".to_string(),
                json!([{ "url": self.settings.service_root }]),
            );
        }

        let mut paths = Map::new();
        for container in &self.model.containers {
            for set in &container.entity_sets {
                self.emit_entity_set(&mut paths, set)?;
            }
            for singleton in &container.singletons {
                self.emit_singleton(&mut paths, singleton)?;
            }
            for import in &container.operation_imports {
                self.emit_operation_import(&mut paths, import)?;
            }
        }
        doc.insert("paths".to_string(), Value::Object(paths));

        let schemas = self.build_schemas()?;
        if version.is_v2() {
            doc.insert("definitions".to_string(), Value::Object(schemas));
        } else {
            doc.insert(
                "components".to_string(),
                json!({ "schemas": Value::Object(schemas) }),
            );
        }

        Ok(Value::Object(doc))
    }

    // --- Entity sets and singletons ---

    fn emit_entity_set(
        &self,
        paths: &mut Map<String, Value>,
        set: &EntitySet,
    ) -> Result<(), ConvertError> {
        let source = NavigationSource::EntitySet(set);
        let entity_type = self.entity_type_of(&source)?;
        let name = set.name.as_str();

        let read: Option<ReadRestrictions> =
            on(name, terms::READ_RESTRICTIONS, resolver::resolve_on_source(self.model, &source))?;
        let insert: Option<InsertRestrictions> =
            on(name, terms::INSERT_RESTRICTIONS, resolver::resolve_on_source(self.model, &source))?;
        let update: Option<UpdateRestrictions> =
            on(name, terms::UPDATE_RESTRICTIONS, resolver::resolve_on_source(self.model, &source))?;
        let delete: Option<DeleteRestrictions> =
            on(name, terms::DELETE_RESTRICTIONS, resolver::resolve_on_source(self.model, &source))?;
        let deprecation = self.deprecation_of(&source)?;

        // Collection path.
        let mut item = Map::new();
        if read.as_ref().map_or(true, ReadRestrictions::allows_read) {
            let mut op = self.operation_frame(
                format!("Get entities from {}", name),
                Some(format!("List{}", name)),
            );
            op.insert(
                "parameters".to_string(),
                Value::Array(self.collection_parameters(&source)?),
            );
            op.insert(
                "responses".to_string(),
                self.responses(self.ok_response(
                    json!("Retrieved entities"),
                    self.collection_schema(entity_type),
                )),
            );
            self.attach_scopes(&mut op, read.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("get".to_string(), Value::Object(op));
        }
        if insert.as_ref().map_or(true, InsertRestrictions::allows_insert) {
            let mut op = self.operation_frame(
                format!("Add new entity to {}", name),
                Some(format!("Create{}", name)),
            );
            let params = self.modification_parameters(
                insert.as_ref().and_then(|r| r.query_options.as_ref()),
            );
            if !params.is_empty() {
                op.insert("parameters".to_string(), Value::Array(params));
            }
            self.attach_request_body(&mut op, "New entity", self.schema_ref(&entity_type.name));
            op.insert(
                "responses".to_string(),
                self.responses(self.ok_response_with_status(
                    "201",
                    json!("Created entity"),
                    self.schema_ref(&entity_type.name),
                )),
            );
            self.attach_scopes(&mut op, insert.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("post".to_string(), Value::Object(op));
        }
        if !item.is_empty() {
            paths.insert(format!("/{}", name), Value::Object(item));
        }

        // Key-addressed operations need a key to address by. A keyless type
        // gets only the collection path, which then anchors bound operations
        // and navigation; emitting a key path here would collide with it.
        if entity_type.key.is_empty() {
            let base = format!("/{}", name);
            self.emit_bound_operations(paths, entity_type, &base)?;
            self.emit_navigation_root(paths, entity_type, &base)?;
            return Ok(());
        }

        // Key-addressed path.
        let key_path = format!("/{}{}", name, self.key_suffix(entity_type));
        let mut item = Map::new();
        if read.as_ref().map_or(true, ReadRestrictions::allows_read_by_key) {
            let mut op = self.operation_frame(
                format!("Get entity from {} by key", name),
                Some(format!("Get{}", name)),
            );
            op.insert(
                "parameters".to_string(),
                Value::Array(self.key_parameters(entity_type)),
            );
            op.insert(
                "responses".to_string(),
                self.responses(self.ok_response(
                    json!("Retrieved entity"),
                    self.schema_ref(&entity_type.name),
                )),
            );
            self.attach_scopes(&mut op, read.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("get".to_string(), Value::Object(op));
        }
        if update.as_ref().map_or(true, UpdateRestrictions::allows_update) {
            let mut op = self.operation_frame(
                format!("Update entity in {}", name),
                Some(format!("Update{}", name)),
            );
            let mut params = self.key_parameters(entity_type);
            params.extend(self.modification_parameters(
                update.as_ref().and_then(|r| r.query_options.as_ref()),
            ));
            op.insert("parameters".to_string(), Value::Array(params));
            self.attach_request_body(&mut op, "New property values", self.schema_ref(&entity_type.name));
            op.insert("responses".to_string(), self.responses(self.no_content_response()));
            self.attach_scopes(&mut op, update.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("patch".to_string(), Value::Object(op));
        }
        if delete.as_ref().map_or(true, DeleteRestrictions::allows_delete) {
            let mut op = self.operation_frame(
                format!("Delete entity from {}", name),
                Some(format!("Delete{}", name)),
            );
            op.insert(
                "parameters".to_string(),
                Value::Array(self.key_parameters(entity_type)),
            );
            op.insert("responses".to_string(), self.responses(self.no_content_response()));
            self.attach_scopes(&mut op, delete.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("delete".to_string(), Value::Object(op));
        }
        if !item.is_empty() {
            paths.insert(key_path.clone(), Value::Object(item));
        }

        self.emit_bound_operations(paths, entity_type, &key_path)?;
        self.emit_navigation_root(paths, entity_type, &key_path)?;
        Ok(())
    }

    fn emit_singleton(
        &self,
        paths: &mut Map<String, Value>,
        singleton: &Singleton,
    ) -> Result<(), ConvertError> {
        let source = NavigationSource::Singleton(singleton);
        let entity_type = self.entity_type_of(&source)?;
        let name = singleton.name.as_str();

        let read: Option<ReadRestrictions> =
            on(name, terms::READ_RESTRICTIONS, resolver::resolve_on_source(self.model, &source))?;
        let update: Option<UpdateRestrictions> =
            on(name, terms::UPDATE_RESTRICTIONS, resolver::resolve_on_source(self.model, &source))?;
        let deprecation = self.deprecation_of(&source)?;

        let path = format!("/{}", name);
        let mut item = Map::new();
        if read.as_ref().map_or(true, ReadRestrictions::allows_read) {
            let mut op = self.operation_frame(
                format!("Get {}", name),
                Some(format!("Get{}", name)),
            );
            op.insert(
                "responses".to_string(),
                self.responses(self.ok_response(
                    json!("Retrieved entity"),
                    self.schema_ref(&entity_type.name),
                )),
            );
            self.attach_scopes(&mut op, read.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("get".to_string(), Value::Object(op));
        }
        if update.as_ref().map_or(true, UpdateRestrictions::allows_update) {
            let mut op = self.operation_frame(
                format!("Update {}", name),
                Some(format!("Update{}", name)),
            );
            let params = self.modification_parameters(
                update.as_ref().and_then(|r| r.query_options.as_ref()),
            );
            if !params.is_empty() {
                op.insert("parameters".to_string(), Value::Array(params));
            }
            self.attach_request_body(&mut op, "New property values", self.schema_ref(&entity_type.name));
            op.insert("responses".to_string(), self.responses(self.no_content_response()));
            self.attach_scopes(&mut op, update.as_ref().map(|r| r.required_scopes.as_slice()));
            deprecation.write(&mut op);
            item.insert("patch".to_string(), Value::Object(op));
        }
        if !item.is_empty() {
            paths.insert(path.clone(), Value::Object(item));
        }

        self.emit_bound_operations(paths, entity_type, &path)?;
        self.emit_navigation_root(paths, entity_type, &path)?;
        Ok(())
    }

    fn entity_type_of(&self, source: &NavigationSource) -> Result<&EntityType, ConvertError> {
        self.model
            .entity_type(source.entity_type_name())
            .ok_or_else(|| ConvertError::UnknownEntityType {
                source_name: source.name().to_string(),
                entity_type: source.entity_type_name().to_string(),
            })
    }

    fn deprecation_of(&self, source: &NavigationSource) -> Result<DeprecationExtension, ConvertError> {
        self.deprecation_on(source.name(), source)
    }

    /// The element's deprecation block, or an empty one that writes nothing.
    fn deprecation_on(
        &self,
        element: &str,
        annotated: &impl crate::model::Annotated,
    ) -> Result<DeprecationExtension, ConvertError> {
        let revisions = on(element, terms::REVISIONS, resolver::resolve_revisions(annotated))?;
        Ok(revisions
            .iter()
            .find(|r| r.is_deprecation())
            .map(DeprecationExtension::from_revision)
            .unwrap_or_default())
    }

    // --- Bound operations and operation imports ---

    fn emit_bound_operations(
        &self,
        paths: &mut Map<String, Value>,
        entity_type: &EntityType,
        base: &str,
    ) -> Result<(), ConvertError> {
        for operation in self.model.bound_operations(&entity_type.name) {
            let path = format!("{}/{}.{}", base, self.model.namespace, operation.name);
            let item = self.operation_path_item(operation)?;
            paths.insert(path, item);
        }
        Ok(())
    }

    fn emit_operation_import(
        &self,
        paths: &mut Map<String, Value>,
        import: &OperationImport,
    ) -> Result<(), ConvertError> {
        let operation = self.model.operation(&import.operation).ok_or_else(|| {
            ConvertError::UnknownOperation {
                import: import.name.clone(),
                operation: import.operation.clone(),
            }
        })?;
        let item = self.operation_path_item(operation)?;
        paths.insert(format!("/{}", import.name), item);
        Ok(())
    }

    fn operation_path_item(&self, operation: &Operation) -> Result<Value, ConvertError> {
        let description = on(
            &operation.name,
            terms::DESCRIPTION,
            resolver::resolve_description(operation),
        )?;
        let deprecation = self.deprecation_on(&operation.name, operation)?;

        let mut op = self.operation_frame(
            format!("Invoke {}", operation.name),
            Some(format!("Invoke{}", operation.name)),
        );
        if let Some(text) = description {
            op.insert("description".to_string(), Value::String(text));
        }
        deprecation.write(&mut op);

        let method = match operation.kind {
            OperationKind::Function => {
                if !operation.parameters.is_empty() {
                    let params: Vec<Value> = operation
                        .parameters
                        .iter()
                        .map(|p| self.query_parameter(&p.name, None, self.type_schema(&p.type_name)))
                        .collect();
                    op.insert("parameters".to_string(), Value::Array(params));
                }
                "get"
            }
            OperationKind::Action => {
                if !operation.parameters.is_empty() {
                    let mut properties = Map::new();
                    for p in &operation.parameters {
                        properties.insert(p.name.clone(), self.type_schema(&p.type_name));
                    }
                    self.attach_request_body(
                        &mut op,
                        "Action parameters",
                        json!({ "type": "object", "properties": Value::Object(properties) }),
                    );
                }
                "post"
            }
        };

        let success = match &operation.return_type {
            Some(return_type) => {
                self.ok_response(json!("Success"), self.type_schema(return_type))
            }
            None => self.no_content_response(),
        };
        op.insert("responses".to_string(), self.responses(success));

        let mut item = Map::new();
        item.insert(method.to_string(), Value::Object(op));
        Ok(Value::Object(item))
    }

    // --- Navigation property paths ---

    fn emit_navigation_root(
        &self,
        paths: &mut Map<String, Value>,
        entity_type: &EntityType,
        base: &str,
    ) -> Result<(), ConvertError> {
        if !self.settings.enable_navigation_property_path {
            return Ok(());
        }
        let budget = self.settings.navigation_property_depth;
        // The root counts as expanded at the full budget.
        let mut expanded = vec![(entity_type.name.clone(), budget)];
        self.emit_navigation(paths, entity_type, base, budget, &mut expanded)
    }

    /// Recursive navigation expansion under a remaining depth budget.
    ///
    /// A hop is emitted whenever the budget allows it; the hop's target is
    /// expanded further only if it has not already been expanded on the
    /// current path at an equal-or-greater remaining budget. Re-visits at
    /// strictly smaller budgets emit their hop but stop there, which
    /// terminates cyclic schemas without suppressing legitimate cycle paths.
    fn emit_navigation(
        &self,
        paths: &mut Map<String, Value>,
        entity_type: &EntityType,
        base: &str,
        budget: u32,
        expanded: &mut Vec<(String, u32)>,
    ) -> Result<(), ConvertError> {
        if budget == 0 {
            return Ok(());
        }
        for nav in &entity_type.navigation_properties {
            let target = self.model.entity_type(&nav.target).ok_or_else(|| {
                ConvertError::UnknownEntityType {
                    source_name: format!("{}.{}", entity_type.name, nav.name),
                    entity_type: nav.target.clone(),
                }
            })?;
            let remaining = budget - 1;

            let nav_deprecation =
                self.deprecation_on(&format!("{}.{}", entity_type.name, nav.name), nav)?;

            let path = format!("{}/{}", base, nav.name);
            let schema = if nav.collection {
                self.collection_schema(target)
            } else {
                self.schema_ref(&target.name)
            };
            let mut op = self.operation_frame(
                format!("Get {} from {}", nav.name, entity_type.name),
                None,
            );
            op.insert(
                "responses".to_string(),
                self.responses(self.ok_response(json!("Retrieved navigation property"), schema)),
            );
            nav_deprecation.write(&mut op);
            let mut item = Map::new();
            item.insert("get".to_string(), Value::Object(op));
            paths.insert(path.clone(), Value::Object(item));

            let (child_base, child_budget) = if nav.collection {
                let charge = u32::from(self.settings.count_key_segment_as_depth);
                if remaining < charge {
                    continue;
                }
                let key_path = format!("{}{}", path, self.key_suffix(target));
                let mut op = self.operation_frame(
                    format!("Get {} from {} by key", nav.name, entity_type.name),
                    None,
                );
                op.insert(
                    "parameters".to_string(),
                    Value::Array(self.key_parameters(target)),
                );
                op.insert(
                    "responses".to_string(),
                    self.responses(
                        self.ok_response(json!("Retrieved entity"), self.schema_ref(&target.name)),
                    ),
                );
                nav_deprecation.write(&mut op);
                let mut item = Map::new();
                item.insert("get".to_string(), Value::Object(op));
                paths.insert(key_path.clone(), Value::Object(item));
                (key_path, remaining - charge)
            } else {
                (path, remaining)
            };

            let dominated = expanded
                .iter()
                .any(|(name, at)| *name == target.name && *at >= child_budget);
            if dominated {
                continue;
            }
            expanded.push((target.name.clone(), child_budget));
            self.emit_navigation(paths, target, &child_base, child_budget, expanded)?;
            expanded.pop();
        }
        Ok(())
    }

    // --- Parameters ---

    fn collection_parameters(&self, source: &NavigationSource) -> Result<Vec<Value>, ConvertError> {
        let name = source.name();
        let top = on(
            name,
            terms::TOP_SUPPORTED,
            resolver::resolve_boolean_on_source(self.model, source, terms::TOP_SUPPORTED),
        )?;
        let skip = on(
            name,
            terms::SKIP_SUPPORTED,
            resolver::resolve_boolean_on_source(self.model, source, terms::SKIP_SUPPORTED),
        )?;
        let count: Option<CountRestrictions> = on(
            name,
            terms::COUNT_RESTRICTIONS,
            resolver::resolve_on_source(self.model, source),
        )?;

        let mut params = Vec::new();
        if top != Some(false) {
            params.push(self.query_parameter(
                "$top",
                Some("Show only the first n items"),
                json!({ "type": "integer", "minimum": 0 }),
            ));
        }
        if skip != Some(false) {
            params.push(self.query_parameter(
                "$skip",
                Some("Skip the first n items"),
                json!({ "type": "integer", "minimum": 0 }),
            ));
        }
        if count.as_ref().map_or(true, CountRestrictions::allows_count) {
            params.push(self.query_parameter(
                "$count",
                Some("Include count of items"),
                json!({ "type": "boolean" }),
            ));
        }
        for (name, description) in [
            ("$filter", "Filter items by property values"),
            ("$orderby", "Order items by property values"),
            ("$select", "Select properties to be returned"),
            ("$expand", "Expand related entities"),
            ("$search", "Search items by search phrases"),
        ] {
            params.push(self.query_parameter(name, Some(description), json!({ "type": "string" })));
        }
        Ok(params)
    }

    /// Query option parameters a modification request declares support for.
    fn modification_parameters(&self, options: Option<&ModificationQueryOptions>) -> Vec<Value> {
        let Some(options) = options else {
            return Vec::new();
        };
        options
            .supported_options()
            .into_iter()
            .map(|name| self.query_parameter(name, None, json!({ "type": "string" })))
            .collect()
    }

    fn query_parameter(&self, name: &str, description: Option<&str>, schema: Value) -> Value {
        let mut param = Map::new();
        param.insert("name".to_string(), json!(name));
        param.insert("in".to_string(), json!("query"));
        if let Some(text) = description {
            param.insert("description".to_string(), json!(text));
        }
        self.attach_parameter_schema(&mut param, schema);
        Value::Object(param)
    }

    fn key_parameters(&self, entity_type: &EntityType) -> Vec<Value> {
        entity_type
            .key
            .iter()
            .map(|key| {
                let schema = entity_type
                    .properties
                    .iter()
                    .find(|p| &p.name == key)
                    .map(|p| self.type_schema(&p.type_name))
                    .unwrap_or_else(|| json!({ "type": "string" }));
                let mut param = Map::new();
                param.insert("name".to_string(), json!(key));
                param.insert("in".to_string(), json!("path"));
                param.insert("required".to_string(), json!(true));
                self.attach_parameter_schema(&mut param, schema);
                Value::Object(param)
            })
            .collect()
    }

    fn attach_parameter_schema(&self, param: &mut Map<String, Value>, schema: Value) {
        if self.settings.open_api_version.is_v2() {
            // Swagger 2.0 inlines the type keywords into the parameter.
            if let Value::Object(fields) = schema {
                for (k, v) in fields {
                    param.insert(k, v);
                }
            }
        } else {
            param.insert("schema".to_string(), schema);
        }
    }

    /// Key rendering policy. Formatting only - operation emission never
    /// depends on it.
    fn key_suffix(&self, entity_type: &EntityType) -> String {
        if self.settings.key_as_segment {
            entity_type
                .key
                .iter()
                .map(|k| format!("/{{{}}}", k))
                .collect()
        } else if entity_type.key.len() == 1 {
            format!("({{{}}})", entity_type.key[0])
        } else {
            let parts: Vec<String> = entity_type
                .key
                .iter()
                .map(|k| format!("{}={{{}}}", k, k))
                .collect();
            format!("({})", parts.join(","))
        }
    }

    // --- Operations, responses, security ---

    /// Navigation hops carry no operation id; every other operation does.
    fn operation_frame(&self, summary: String, operation_id: Option<String>) -> Map<String, Value> {
        let mut op = Map::new();
        op.insert("summary".to_string(), Value::String(summary));
        if let Some(id) = operation_id {
            op.insert("operationId".to_string(), Value::String(id));
        }
        op
    }

    fn attach_request_body(&self, op: &mut Map<String, Value>, description: &str, schema: Value) {
        if self.settings.open_api_version.is_v2() {
            let params = op
                .entry("parameters".to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = params {
                list.push(json!({
                    "name": "body",
                    "in": "body",
                    "description": description,
                    "required": true,
                    "schema": schema
                }));
            }
        } else {
            op.insert(
                "requestBody".to_string(),
                json!({
                    "description": description,
                    "required": true,
                    "content": { "application/json": { "schema": schema } }
                }),
            );
        }
    }

    fn attach_scopes(&self, op: &mut Map<String, Value>, scopes: Option<&[ScopeType]>) {
        let Some(scopes) = scopes else { return };
        if scopes.is_empty() {
            return;
        }
        let names: Vec<&str> = scopes.iter().map(|s| s.scope.as_str()).collect();
        op.insert("security".to_string(), json!([{ "oauth2": names }]));
    }

    fn ok_response(&self, description: Value, schema: Value) -> (String, Value) {
        self.ok_response_with_status("200", description, schema)
    }

    fn ok_response_with_status(
        &self,
        status: &str,
        description: Value,
        schema: Value,
    ) -> (String, Value) {
        let body = if self.settings.open_api_version.is_v2() {
            json!({ "description": description, "schema": schema })
        } else {
            json!({
                "description": description,
                "content": { "application/json": { "schema": schema } }
            })
        };
        (status.to_string(), body)
    }

    fn no_content_response(&self) -> (String, Value) {
        ("204".to_string(), json!({ "description": "Success" }))
    }

    fn responses(&self, success: (String, Value)) -> Value {
        let mut responses = Map::new();
        responses.insert(success.0, success.1);
        let error_schema = self.named_schema_ref(ERROR_SCHEMA);
        let error = if self.settings.open_api_version.is_v2() {
            json!({ "description": "error", "schema": error_schema })
        } else {
            json!({
                "description": "error",
                "content": { "application/json": { "schema": error_schema } }
            })
        };
        responses.insert("default".to_string(), error);
        Value::Object(responses)
    }

    // --- Schemas ---

    fn build_schemas(&self) -> Result<Map<String, Value>, ConvertError> {
        let mut schemas = Map::new();
        for entity_type in &self.model.entity_types {
            schemas.insert(
                format!("{}.{}", self.model.namespace, entity_type.name),
                self.entity_schema(entity_type)?,
            );
        }
        for enum_type in &self.model.enum_types {
            schemas.insert(
                format!("{}.{}", self.model.namespace, enum_type.name),
                self.enum_schema(enum_type)?,
            );
        }
        schemas.insert(
            ERROR_SCHEMA.to_string(),
            json!({
                "type": "object",
                "properties": {
                    "error": {
                        "type": "object",
                        "properties": {
                            "code": { "type": "string" },
                            "message": { "type": "string" }
                        },
                        "required": ["code", "message"]
                    }
                },
                "required": ["error"]
            }),
        );
        Ok(schemas)
    }

    fn entity_schema(&self, entity_type: &EntityType) -> Result<Value, ConvertError> {
        let mut properties = Map::new();
        for property in &entity_type.properties {
            let element = format!("{}.{}", entity_type.name, property.name);
            let mut schema = self.type_schema(&property.type_name);
            if property.nullable {
                self.mark_nullable(&mut schema);
            }
            if let Value::Object(fields) = &mut schema {
                let example: Option<ExampleValue> =
                    on(&element, terms::EXAMPLE, resolver::resolve_term(property))?;
                match example {
                    Some(ExampleValue::Primitive { value, .. }) => {
                        fields.insert("example".to_string(), value.to_json());
                    }
                    Some(ExampleValue::External { external_value, .. }) => {
                        fields.insert("externalDocs".to_string(), json!({ "url": external_value }));
                    }
                    None => {}
                }
                let revisions =
                    on(&element, terms::REVISIONS, resolver::resolve_revisions(property))?;
                if let Some(deprecation) = revisions
                    .iter()
                    .find(|r| r.is_deprecation())
                    .map(DeprecationExtension::from_revision)
                {
                    deprecation.write(fields);
                }
            }
            properties.insert(property.name.clone(), schema);
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !entity_type.key.is_empty() {
            schema.insert("required".to_string(), json!(entity_type.key));
        }
        if let Some(description) = on(
            &entity_type.name,
            terms::DESCRIPTION,
            resolver::resolve_description(entity_type),
        )? {
            schema.insert("description".to_string(), Value::String(description));
        }
        let revisions = on(
            &entity_type.name,
            terms::REVISIONS,
            resolver::resolve_revisions(entity_type),
        )?;
        if let Some(deprecation) = revisions
            .iter()
            .find(|r| r.is_deprecation())
            .map(DeprecationExtension::from_revision)
        {
            deprecation.write(&mut schema);
        }
        Ok(Value::Object(schema))
    }

    fn enum_schema(&self, enum_type: &EnumType) -> Result<Value, ConvertError> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("string"));
        let names: Vec<&str> = enum_type.members.iter().map(|m| m.name.as_str()).collect();
        schema.insert("enum".to_string(), json!(names));

        EnumFlagsExtension {
            is_flags: enum_type.is_flags,
            style: None,
        }
        .write(&mut schema);

        let mut values = Vec::with_capacity(enum_type.members.len());
        for member in &enum_type.members {
            let element = format!("{}.{}", enum_type.name, member.name);
            values.push(EnumValueDescription {
                value: member.value.to_string(),
                name: member.name.clone(),
                description: on(
                    &element,
                    terms::DESCRIPTION,
                    resolver::resolve_description(member),
                )?,
            });
        }
        EnumValuesDescriptionExtension {
            enum_name: Some(enum_type.name.clone()),
            values,
        }
        .write(self.settings.open_api_version, &mut schema);

        self.deprecation_on(&enum_type.name, enum_type)?.write(&mut schema);

        Ok(Value::Object(schema))
    }

    fn collection_schema(&self, entity_type: &EntityType) -> Value {
        json!({ "type": "array", "items": self.schema_ref(&entity_type.name) })
    }

    fn schema_ref(&self, type_name: &str) -> Value {
        self.named_schema_ref(&format!("{}.{}", self.model.namespace, type_name))
    }

    fn named_schema_ref(&self, key: &str) -> Value {
        if self.settings.open_api_version.is_v2() {
            json!({ "$ref": format!("#/definitions/{}", key) })
        } else {
            json!({ "$ref": format!("#/components/schemas/{}", key) })
        }
    }

    /// Map an EDM type name to an OpenAPI schema. Unrecognized names are
    /// treated as model type references; `Collection(...)` wraps in an array.
    fn type_schema(&self, type_name: &str) -> Value {
        if let Some(inner) = type_name
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return json!({ "type": "array", "items": self.type_schema(inner) });
        }
        match type_name {
            "Edm.String" => json!({ "type": "string" }),
            "Edm.Boolean" => json!({ "type": "boolean" }),
            "Edm.Byte" | "Edm.SByte" | "Edm.Int16" | "Edm.Int32" => {
                json!({ "type": "integer", "format": "int32" })
            }
            "Edm.Int64" => json!({ "type": "integer", "format": "int64" }),
            "Edm.Single" => json!({ "type": "number", "format": "float" }),
            "Edm.Double" => json!({ "type": "number", "format": "double" }),
            "Edm.Decimal" => json!({ "type": "number", "format": "decimal" }),
            "Edm.Date" => json!({ "type": "string", "format": "date" }),
            "Edm.DateTimeOffset" => json!({ "type": "string", "format": "date-time" }),
            "Edm.TimeOfDay" => json!({ "type": "string", "format": "time" }),
            "Edm.Duration" => json!({ "type": "string", "format": "duration" }),
            "Edm.Guid" => json!({ "type": "string", "format": "uuid" }),
            "Edm.Binary" => json!({ "type": "string", "format": "base64url" }),
            other => {
                let simple = other
                    .strip_prefix(&self.model.namespace)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .unwrap_or(other);
                self.schema_ref(simple)
            }
        }
    }

    fn mark_nullable(&self, schema: &mut Value) {
        let Value::Object(fields) = schema else { return };
        match self.settings.open_api_version {
            OpenApiVersion::V2_0 => {}
            OpenApiVersion::V3_0 => {
                fields.insert("nullable".to_string(), json!(true));
            }
            OpenApiVersion::V3_1 => {
                if let Some(Value::String(t)) = fields.get("type").cloned().as_ref() {
                    fields.insert("type".to_string(), json!([t, "null"]));
                }
            }
        }
    }
}
