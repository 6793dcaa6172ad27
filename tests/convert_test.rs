//! End-to-end conversion tests: JSON model in, OpenAPI document out.

use odata_openapi::{convert, load_model_str, ConvertSettings, OpenApiVersion};
use serde_json::{json, Value};

fn model(value: Value) -> odata_openapi::EdmModel {
    load_model_str(&value.to_string()).unwrap()
}

fn boolean_term(term: &str, value: bool) -> Value {
    json!({
        "term": term,
        "value": { "literal": { "kind": "Edm.Boolean", "value": value.to_string() } }
    })
}

fn catalog() -> Value {
    json!({
        "namespace": "Store",
        "entity_types": [
            {
                "name": "Product",
                "key": ["ID"],
                "properties": [
                    { "name": "ID", "type": "Edm.Int64" },
                    { "name": "Name", "type": "Edm.String", "nullable": true }
                ]
            }
        ],
        "containers": [{
            "name": "Default",
            "entity_sets": [{ "name": "Products", "entity_type": "Store.Product" }]
        }]
    })
}

mod crud_policy {
    use super::*;

    #[test]
    fn unannotated_set_gets_full_crud() {
        let doc = convert(&model(catalog()), &ConvertSettings::default()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        let collection = paths["/Products"].as_object().unwrap();
        assert_eq!(collection["get"]["operationId"], json!("ListProducts"));
        assert_eq!(collection["post"]["operationId"], json!("CreateProducts"));

        let by_key = paths["/Products({ID})"].as_object().unwrap();
        assert_eq!(by_key["get"]["operationId"], json!("GetProducts"));
        assert_eq!(by_key["patch"]["operationId"], json!("UpdateProducts"));
        assert_eq!(by_key["delete"]["operationId"], json!("DeleteProducts"));
    }

    #[test]
    fn keyless_type_keeps_collection_operations() {
        let m = json!({
            "namespace": "Store",
            "entity_types": [{
                "name": "Note",
                "properties": [{ "name": "Text", "type": "Edm.String" }]
            }],
            "containers": [{
                "name": "Default",
                "entity_sets": [{ "name": "Notes", "entity_type": "Store.Note" }]
            }]
        });

        let settings = ConvertSettings::default().key_as_segment(true);
        let doc = convert(&model(m), &settings).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        // Without a key there is nothing to address an entity by, so the
        // collection path is the only one and it keeps its operations.
        assert_eq!(paths.len(), 1);
        let collection = paths["/Notes"].as_object().unwrap();
        assert!(collection.get("get").is_some());
        assert!(collection.get("post").is_some());
        assert!(collection.get("patch").is_none());
        assert!(collection.get("delete").is_none());
    }

    #[test]
    fn insertable_false_suppresses_post_only() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.InsertRestrictions",
            "value": { "record": { "properties": {
                "Insertable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let collection = doc["paths"]["/Products"].as_object().unwrap();
        assert!(collection.get("get").is_some());
        assert!(collection.get("post").is_none());
    }

    #[test]
    fn deletable_false_keeps_other_key_operations() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.DeleteRestrictions",
            "value": { "record": { "properties": {
                "Deletable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let by_key = doc["paths"]["/Products({ID})"].as_object().unwrap();
        assert!(by_key.get("get").is_some());
        assert!(by_key.get("patch").is_some());
        assert!(by_key.get("delete").is_none());
    }

    #[test]
    fn read_by_key_restriction_splits_collection_and_key_reads() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.ReadRestrictions",
            "value": { "record": { "properties": {
                "Readable": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                "ReadByKeyRestrictions": { "record": { "properties": {
                    "Readable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
                }}}
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths["/Products"].get("get").is_some());
        assert!(paths["/Products({ID})"].get("get").is_none());
    }

    #[test]
    fn restrictions_on_entity_type_apply_through_fallback() {
        let mut m = catalog();
        m["entity_types"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.InsertRestrictions",
            "value": { "record": { "properties": {
                "Insertable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        assert!(doc["paths"]["/Products"].get("post").is_none());
    }

    #[test]
    fn required_scopes_become_security_requirements() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.ReadRestrictions",
            "value": { "record": { "properties": {
                "RequiredScopes": { "collection": [
                    { "record": { "properties": {
                        "Scope": { "literal": { "kind": "Edm.String", "value": "Products.Read" } },
                        "RestrictedProperties": { "literal": { "kind": "Edm.String", "value": "*" } }
                    }}}
                ]}
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        assert_eq!(
            doc["paths"]["/Products"]["get"]["security"],
            json!([{ "oauth2": ["Products.Read"] }])
        );
        // Scopes on the read restriction do not leak onto unrelated operations.
        assert!(doc["paths"]["/Products"]["post"].get("security").is_none());
    }

    #[test]
    fn modification_query_options_add_parameters() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.UpdateRestrictions",
            "value": { "record": { "properties": {
                "QueryOptions": { "record": { "properties": {
                    "SelectSupported": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                    "ExpandSupported": { "literal": { "kind": "Edm.Boolean", "value": "true" } },
                    "FilterSupported": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
                }}}
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let params = doc["paths"]["/Products({ID})"]["patch"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["ID", "$expand", "$select"]);
    }
}

mod query_parameters {
    use super::*;

    #[test]
    fn collection_get_carries_system_query_options() {
        let doc = convert(&model(catalog()), &ConvertSettings::default()).unwrap();
        let params = doc["paths"]["/Products"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            ["$top", "$skip", "$count", "$filter", "$orderby", "$select", "$expand", "$search"]
        );
    }

    #[test]
    fn top_supported_false_drops_only_top() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([boolean_term(
            "Org.OData.Capabilities.V1.TopSupported",
            false
        )]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let params = doc["paths"]["/Products"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert!(!names.contains(&"$top"));
        assert!(names.contains(&"$skip"));
    }

    #[test]
    fn countable_false_drops_count() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.CountRestrictions",
            "value": { "record": { "properties": {
                "Countable": { "literal": { "kind": "Edm.Boolean", "value": "false" } }
            }}}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let params = doc["paths"]["/Products"]["get"]["parameters"]
            .as_array()
            .unwrap();
        assert!(!params.iter().any(|p| p["name"] == json!("$count")));
    }
}

mod navigation {
    use super::*;

    fn linked_model() -> Value {
        json!({
            "namespace": "Store",
            "entity_types": [
                {
                    "name": "A",
                    "key": ["ID"],
                    "properties": [{ "name": "ID", "type": "Edm.Int64" }],
                    "navigation_properties": [{ "name": "B", "target": "Store.B" }]
                },
                {
                    "name": "B",
                    "key": ["ID"],
                    "properties": [{ "name": "ID", "type": "Edm.Int64" }],
                    "navigation_properties": [{ "name": "A", "target": "Store.A" }]
                }
            ],
            "containers": [{
                "name": "Default",
                "entity_sets": [{ "name": "As", "entity_type": "Store.A" }]
            }]
        })
    }

    #[test]
    fn depth_zero_emits_no_navigation_paths() {
        let settings = ConvertSettings::default().navigation_property_depth(0);
        let doc = convert(&model(linked_model()), &settings).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/As({ID})"));
        assert!(!paths.keys().any(|k| k.contains("/B")));
    }

    #[test]
    fn disabled_navigation_paths_override_depth() {
        let settings = ConvertSettings::default()
            .enable_navigation_property_path(false)
            .navigation_property_depth(5);
        let doc = convert(&model(linked_model()), &settings).unwrap();
        assert!(!doc["paths"].as_object().unwrap().keys().any(|k| k.contains("/B")));
    }

    #[test]
    fn cycle_expands_exactly_to_budget() {
        let settings = ConvertSettings::default().navigation_property_depth(2);
        let doc = convert(&model(linked_model()), &settings).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/As({ID})/B"));
        assert!(paths.contains_key("/As({ID})/B/A"));
        assert!(!paths.contains_key("/As({ID})/B/A/B"));
    }

    #[test]
    fn collection_navigation_gets_key_path() {
        let m = json!({
            "namespace": "Store",
            "entity_types": [
                {
                    "name": "Order",
                    "key": ["ID"],
                    "properties": [{ "name": "ID", "type": "Edm.Int64" }],
                    "navigation_properties": [
                        { "name": "Items", "target": "Store.Item", "collection": true }
                    ]
                },
                { "name": "Item", "key": ["SKU"], "properties": [
                    { "name": "SKU", "type": "Edm.String" }
                ]}
            ],
            "containers": [{
                "name": "Default",
                "entity_sets": [{ "name": "Orders", "entity_type": "Store.Order" }]
            }]
        });

        let settings = ConvertSettings::default().navigation_property_depth(1);
        let doc = convert(&model(m.clone()), &settings).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/Orders({ID})/Items"));
        assert!(paths.contains_key("/Orders({ID})/Items({SKU})"));

        // Charging the key segment against the budget removes the key path.
        let settings = ConvertSettings::default()
            .navigation_property_depth(1)
            .count_key_segment_as_depth(true);
        let doc = convert(&model(m), &settings).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/Orders({ID})/Items"));
        assert!(!paths.contains_key("/Orders({ID})/Items({SKU})"));
    }

    #[test]
    fn key_as_segment_applies_to_navigation_paths() {
        let settings = ConvertSettings::default()
            .key_as_segment(true)
            .navigation_property_depth(1);
        let doc = convert(&model(linked_model()), &settings).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/As/{ID}/B"));
    }
}

mod operations {
    use super::*;

    fn model_with_operations() -> Value {
        json!({
            "namespace": "Store",
            "entity_types": [{
                "name": "Product",
                "key": ["ID"],
                "properties": [{ "name": "ID", "type": "Edm.Int64" }]
            }],
            "operations": [
                {
                    "name": "Discount",
                    "kind": "action",
                    "binding_type": "Store.Product",
                    "parameters": [{ "name": "percentage", "type": "Edm.Int32" }]
                },
                {
                    "name": "TopSellers",
                    "kind": "function",
                    "parameters": [{ "name": "count", "type": "Edm.Int32" }],
                    "return_type": "Collection(Store.Product)"
                }
            ],
            "containers": [{
                "name": "Default",
                "entity_sets": [{ "name": "Products", "entity_type": "Store.Product" }],
                "operation_imports": [{ "name": "TopSellers", "operation": "TopSellers" }]
            }]
        })
    }

    #[test]
    fn bound_action_appears_under_key_path_as_post() {
        let doc = convert(&model(model_with_operations()), &ConvertSettings::default()).unwrap();
        let item = &doc["paths"]["/Products({ID})/Store.Discount"];
        assert!(item.get("post").is_some());
        assert!(item.get("get").is_none());
        let body = &item["post"]["requestBody"]["content"]["application/json"]["schema"];
        assert_eq!(body["properties"]["percentage"]["type"], json!("integer"));
    }

    #[test]
    fn imported_function_appears_at_root_as_get() {
        let doc = convert(&model(model_with_operations()), &ConvertSettings::default()).unwrap();
        let op = &doc["paths"]["/TopSellers"]["get"];
        assert_eq!(op["operationId"], json!("InvokeTopSellers"));
        let params = op["parameters"].as_array().unwrap();
        assert_eq!(params[0]["name"], json!("count"));
        let schema = &op["responses"]["200"]["content"]["application/json"]["schema"];
        assert_eq!(schema["type"], json!("array"));
        assert_eq!(
            schema["items"]["$ref"],
            json!("#/components/schemas/Store.Product")
        );
    }

    #[test]
    fn deprecated_operation_carries_extension_block() {
        let mut m = model_with_operations();
        m["operations"][1]["annotations"] = json!([{
            "term": "Org.OData.Core.V1.Revisions",
            "value": { "collection": [
                { "record": { "properties": {
                    "Kind": { "literal": { "kind": "Edm.String", "value": "deprecated" } },
                    "Date": { "literal": { "kind": "Edm.Date", "value": "2024-06-01" } },
                    "Version": { "literal": { "kind": "Edm.String", "value": "3.0" } }
                }}}
            ]}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let block = &doc["paths"]["/TopSellers"]["get"]["x-ms-deprecation"];
        assert_eq!(block["date"], json!("2024-06-01T00:00:00.0000000+00:00"));
        assert_eq!(block["version"], json!("3.0"));
    }

    #[test]
    fn import_of_unknown_operation_fails() {
        let mut m = model_with_operations();
        m["containers"][0]["operation_imports"] = json!([
            { "name": "Nope", "operation": "Missing" }
        ]);
        let result = convert(&model(m), &ConvertSettings::default());
        assert!(matches!(
            result,
            Err(odata_openapi::ConvertError::UnknownOperation { .. })
        ));
    }
}

mod schemas {
    use super::*;

    fn annotated_catalog() -> Value {
        let mut m = catalog();
        m["entity_types"][0]["properties"][1]["annotations"] = json!([{
            "term": "Org.OData.Core.V1.Example",
            "value": { "record": {
                "type": "Org.OData.Core.V1.PrimitiveExampleValue",
                "properties": {
                    "Value": { "literal": { "kind": "Edm.String", "value": "Widget" } }
                }
            }}
        }]);
        m
    }

    #[test]
    fn entity_schema_lists_properties_and_key_requirements() {
        let doc = convert(&model(catalog()), &ConvertSettings::default()).unwrap();
        let schema = &doc["components"]["schemas"]["Store.Product"];
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["required"], json!(["ID"]));
        assert_eq!(schema["properties"]["ID"]["format"], json!("int64"));
        assert_eq!(schema["properties"]["Name"]["nullable"], json!(true));
    }

    #[test]
    fn nullable_rendering_follows_version() {
        let m = model(catalog());
        let v2 = convert(
            &m,
            &ConvertSettings::default().open_api_version(OpenApiVersion::V2_0),
        )
        .unwrap();
        let name = &v2["definitions"]["Store.Product"]["properties"]["Name"];
        assert!(name.get("nullable").is_none());

        let v31 = convert(
            &m,
            &ConvertSettings::default().open_api_version(OpenApiVersion::V3_1),
        )
        .unwrap();
        let name = &v31["components"]["schemas"]["Store.Product"]["properties"]["Name"];
        assert_eq!(name["type"], json!(["string", "null"]));
    }

    #[test]
    fn primitive_example_lands_on_property_schema() {
        let doc = convert(&model(annotated_catalog()), &ConvertSettings::default()).unwrap();
        let name = &doc["components"]["schemas"]["Store.Product"]["properties"]["Name"];
        assert_eq!(name["example"], json!("Widget"));
    }

    #[test]
    fn deprecated_revision_becomes_extension_block() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Core.V1.Revisions",
            "value": { "collection": [
                { "record": { "properties": {
                    "Kind": { "literal": { "kind": "Edm.String", "value": "deprecated" } },
                    "Date": { "literal": { "kind": "Edm.Date", "value": "2023-03-15" } },
                    "Version": { "literal": { "kind": "Edm.String", "value": "2.0" } }
                }}}
            ]}
        }]);
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let block = &doc["paths"]["/Products"]["get"]["x-ms-deprecation"];
        assert_eq!(block["date"], json!("2023-03-15T00:00:00.0000000+00:00"));
        assert_eq!(block["version"], json!("2.0"));
        assert!(block.get("removalDate").is_none());
    }

    #[test]
    fn enum_schema_carries_extensions_per_version() {
        let m = json!({
            "namespace": "Store",
            "enum_types": [{
                "name": "Color",
                "is_flags": false,
                "members": [
                    { "name": "Red", "value": 1, "annotations": [{
                        "term": "Org.OData.Core.V1.Description",
                        "value": { "literal": { "kind": "Edm.String", "value": "red color" } }
                    }]},
                    { "name": "Green", "value": 2 }
                ]
            }]
        });

        let doc = convert(&model(m.clone()), &ConvertSettings::default()).unwrap();
        let schema = &doc["components"]["schemas"]["Store.Color"];
        assert_eq!(schema["enum"], json!(["Red", "Green"]));
        assert_eq!(schema["x-ms-enum-flags"], json!({ "isFlags": false }));
        assert_eq!(schema["x-ms-enum"]["name"], json!("Color"));
        assert_eq!(
            schema["x-ms-enum"]["values"][0],
            json!({ "value": "1", "description": "red color", "name": "Red" })
        );

        let doc31 = convert(
            &model(m),
            &ConvertSettings::default().open_api_version(OpenApiVersion::V3_1),
        )
        .unwrap();
        let schema = &doc31["components"]["schemas"]["Store.Color"];
        assert!(schema.get("x-ms-enum").is_none());
        assert_eq!(schema["x-ms-enum-flags"], json!({ "isFlags": false }));
    }

    #[test]
    fn deprecated_enum_type_marks_its_schema() {
        let m = json!({
            "namespace": "Store",
            "enum_types": [{
                "name": "Color",
                "is_flags": false,
                "members": [{ "name": "Red", "value": 1 }],
                "annotations": [{
                    "term": "Org.OData.Core.V1.Revisions",
                    "value": { "collection": [
                        { "record": { "properties": {
                            "Kind": { "literal": { "kind": "Edm.String", "value": "deprecated" } },
                            "Version": { "literal": { "kind": "Edm.String", "value": "1.1" } }
                        }}}
                    ]}
                }]
            }]
        });
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let schema = &doc["components"]["schemas"]["Store.Color"];
        assert_eq!(schema["x-ms-deprecation"]["version"], json!("1.1"));
        assert!(schema["x-ms-deprecation"].get("date").is_none());
    }

    #[test]
    fn error_schema_is_always_present() {
        let doc = convert(&model(catalog()), &ConvertSettings::default()).unwrap();
        let error = &doc["components"]["schemas"]["odata.error"];
        assert_eq!(error["required"], json!(["error"]));
        assert_eq!(
            doc["paths"]["/Products"]["get"]["responses"]["default"]["content"]
                ["application/json"]["schema"]["$ref"],
            json!("#/components/schemas/odata.error")
        );
    }
}

mod failure {
    use super::*;

    #[test]
    fn malformed_boolean_aborts_conversion() {
        let mut m = catalog();
        m["containers"][0]["entity_sets"][0]["annotations"] = json!([{
            "term": "Org.OData.Capabilities.V1.TopSupported",
            "value": { "literal": { "kind": "Edm.Boolean", "value": "yes" } }
        }]);
        let result = convert(&model(m), &ConvertSettings::default());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Products"));
        assert!(err.to_string().contains("TopSupported"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn singleton_without_key_path_updates_in_place() {
        let m = json!({
            "namespace": "Store",
            "entity_types": [{
                "name": "Company",
                "properties": [{ "name": "Name", "type": "Edm.String" }]
            }],
            "containers": [{
                "name": "Default",
                "singletons": [{ "name": "Company", "entity_type": "Store.Company" }]
            }]
        });
        let doc = convert(&model(m), &ConvertSettings::default()).unwrap();
        let item = doc["paths"]["/Company"].as_object().unwrap();
        assert!(item.get("get").is_some());
        assert!(item.get("patch").is_some());
        assert!(item.get("delete").is_none());
        assert!(item.get("post").is_none());
    }
}
