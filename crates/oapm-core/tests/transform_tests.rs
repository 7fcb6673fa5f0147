use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use oapm_core::error::{ParseError, ResolveError, TransformError};
use oapm_core::parse;
use oapm_core::postman::{CollectionItem, TagFolder};
use oapm_core::transform::summary::SummaryScope;
use oapm_core::transform::{self, TransformOptions};
use oapm_core::{SpecDocument, SpecVersion};
use serde_json::{Value, json};

const SWAGGER2: &str = include_str!("fixtures/petstore-swagger2.json");
const OPENAPI3: &str = include_str!("fixtures/petstore-openapi3.yaml");
const UNSUPPORTED: &str = include_str!("fixtures/unsupported-openapi31.json");
const BROKEN_REF: &str = include_str!("fixtures/broken-ref-swagger2.json");

fn options(name: &str) -> TransformOptions {
    TransformOptions {
        exported_at: Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
        ..TransformOptions::new(name)
    }
}

#[test]
fn swagger2_scenario_single_path() {
    let doc = SpecDocument::from_value(json!({
        "swagger": "2.0",
        "info": { "title": "Pets", "version": "1" },
        "schemes": ["https"],
        "host": "api.example.com",
        "basePath": "/v1",
        "paths": {
            "/pets/{id}": {
                "get": {
                    "summary": "Get a pet",
                    "parameters": [{ "in": "path", "name": "id" }]
                }
            }
        }
    }))
    .unwrap();

    let artifacts = transform::transform_with_options(&doc, &options("pets")).unwrap();
    assert_eq!(artifacts.version, SpecVersion::Swagger2);

    let row = &artifacts.summary.rows[0];
    assert_eq!(row.url, "/pets/{id}");
    assert_eq!(row.name, "Get a pet");
    assert_eq!(row.method, "get");
    assert_eq!(row.parameter_count, 1);
    assert_eq!(row.body, "none");
    assert_eq!(row.path_parameters, vec!["id"]);
    assert_eq!(row.path_count, 1);
    assert!(row.query_parameters.is_empty());
    assert_eq!(row.query_count, 0);

    let env: Vec<(&str, &str)> = artifacts
        .environment
        .values
        .iter()
        .map(|v| (v.key.as_str(), v.value.as_str()))
        .collect();
    assert_eq!(
        env,
        vec![
            ("protocol", "https"),
            ("host", "api.example.com"),
            ("base_url", "/v1"),
            ("id", "string"),
        ]
    );
}

#[test]
fn unsupported_version_halts() {
    let err = parse::from_json(UNSUPPORTED).unwrap_err();
    match err {
        ParseError::UnsupportedVersion(found) => assert_eq!(found, "openapi 3.1.0"),
        other => panic!("expected unsupported version, got {other}"),
    }
}

#[test]
fn tag_grouping_scenario() {
    let doc = SpecDocument::from_value(json!({
        "openapi": "3.0.1",
        "paths": {
            "/pets": {
                "get": { "operationId": "listPets", "tags": ["Pets"] },
                "post": { "operationId": "createPet", "tags": ["Pets"] }
            },
            "/admin/pets": {
                "delete": { "operationId": "purgePets", "tags": ["Pets", "Admin"] }
            }
        }
    }))
    .unwrap();

    let collection = transform::build_collection(&doc, &options("tags")).unwrap();
    assert_eq!(collection.item.len(), 2);

    match &collection.item[0] {
        CollectionItem::Request(req) => assert_eq!(req.name, "purgePets"),
        other => panic!("expected the dual-tagged request at the root, got {other:?}"),
    }
    let folders: Vec<&TagFolder> = collection.folders().collect();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].name, "Pets");
    let names: Vec<&str> = folders[0].item.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["listPets", "createPet"]);
}

#[test]
fn swagger2_fixture_end_to_end() {
    let doc = parse::from_json(SWAGGER2).unwrap();
    let artifacts = transform::transform_with_options(&doc, &options("petstore")).unwrap();

    // One row per path, first method only
    let urls: Vec<&str> = artifacts.summary.rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["/pets/{id}", "/pets", "/pets/findByStatus", "/store/orders/{orderId}", "/health"]
    );
    let add = &artifacts.summary.rows[1];
    assert_eq!(add.body, "body");
    assert_eq!(add.parameter_count, 1);
    // No summary on /health: route-derived name
    assert_eq!(artifacts.summary.rows[4].name, "listHealth");

    // Every method is in the collection
    assert_eq!(artifacts.collection.requests().count(), 6);
    let info = &artifacts.collection.info;
    assert_eq!(info.name, "petstore");
    assert_eq!(info.description, "Pet store served over Swagger 2. Version:1.0.7");

    // Root: dual-tagged and untagged requests, then folders in first-seen order
    let top: Vec<&str> = artifacts
        .collection
        .item
        .iter()
        .map(|item| match item {
            CollectionItem::Request(r) => r.name.as_str(),
            CollectionItem::Folder(f) => f.name.as_str(),
        })
        .collect();
    assert_eq!(top, vec!["Finds pets by status", "listHealth", "pet", "store"]);

    let keys: Vec<&str> = artifacts.environment.keys().collect();
    assert_eq!(
        keys,
        vec!["protocol", "host", "base_url", "id", "status", "limit", "orderId"]
    );

    let add_pet = artifacts
        .collection
        .requests()
        .find(|r| r.name == "Add a new pet to the store")
        .unwrap();
    let body: Value = serde_json::from_str(&add_pet.request.body.as_ref().unwrap().raw).unwrap();
    assert_eq!(
        body.as_object().unwrap().keys().collect::<Vec<_>>(),
        vec!["id", "name", "status"]
    );
}

#[test]
fn openapi3_fixture_end_to_end() {
    let doc = parse::from_yaml(OPENAPI3).unwrap();
    assert_eq!(doc.version, SpecVersion::OpenApi3);

    let opts = TransformOptions {
        source_url: Some("https://petstore3.example.io/api/v3/openapi.json".to_string()),
        summary_scope: SummaryScope::AllMethods,
        ..options("petstore3")
    };
    let artifacts = transform::transform_with_options(&doc, &opts).unwrap();

    assert_eq!(artifacts.summary.rows.len(), 5);
    let env = &artifacts.environment;
    assert_eq!(env.get("protocol").unwrap().value, "https");
    assert_eq!(env.get("host").unwrap().value, "petstore3.example.io");
    assert_eq!(env.get("base_url").unwrap().value, "/api/v3");
    assert_eq!(env.name, "petstore3_environment");
    assert_eq!(env.exported_at, "2024-01-02T03:04:05.000000Z");

    let create = artifacts
        .collection
        .requests()
        .find(|r| r.name == "createPet")
        .unwrap();
    let body: Value = serde_json::from_str(&create.request.body.as_ref().unwrap().raw).unwrap();
    assert_eq!(body["name"]["example"], "Rex \"the dog\"");

    let user_post = artifacts
        .collection
        .requests()
        .find(|r| r.name == "getUserPost")
        .unwrap();
    assert_eq!(
        user_post.request.url.raw,
        "{{protocol}}://{{host}}{{base_url}}/users/:userId/posts/:postId"
    );
    assert_eq!(user_post.request.url.path, vec!["users", ":userId", "posts", ":postId"]);

    // updatePet has two tags and sits at the root
    match &artifacts.collection.item[0] {
        CollectionItem::Request(r) => assert_eq!(r.name, "updatePet"),
        other => panic!("expected updatePet at the root, got {other:?}"),
    }
}

#[test]
fn environment_keys_are_unique() {
    let doc = parse::from_yaml(OPENAPI3).unwrap();
    let env = transform::build_environment(&doc, &options("unique"));
    let mut seen = HashSet::new();
    for key in env.keys() {
        assert!(seen.insert(key), "duplicate environment key {key}");
    }
    // petId appears in two operations, limit in two
    assert_eq!(env.values.iter().filter(|v| v.key == "petId").count(), 1);
    assert_eq!(env.values.iter().filter(|v| v.key == "limit").count(), 1);
}

#[test]
fn broken_reference_fails_collection_only() {
    let doc = parse::from_json(BROKEN_REF).unwrap();
    let opts = options("broken");

    // The summary does not depend on reference resolution
    let summary = transform::summarize(&doc, &opts);
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].body, "thing");

    // Neither does the environment
    let env = transform::build_environment(&doc, &opts);
    assert_eq!(env.keys().collect::<Vec<_>>(), vec!["protocol", "host", "base_url"]);

    let err = transform::build_collection(&doc, &opts).unwrap_err();
    match err {
        TransformError::Resolve { operation, source } => {
            assert_eq!(operation, "POST /things");
            assert!(matches!(source, ResolveError::RefTargetNotFound(ref p) if p == "#/definitions/Missing"));
        }
        other => panic!("expected a resolve error, got {other}"),
    }
}

#[test]
fn array_body_fails_collection_but_keeps_environment() {
    let doc = SpecDocument::from_value(json!({
        "swagger": "2.0",
        "host": "api.example.com",
        "paths": {
            "/batches/{batchId}": {
                "post": {
                    "summary": "Append items",
                    "parameters": [
                        { "in": "path", "name": "batchId", "required": true },
                        { "in": "body", "name": "items", "required": true,
                          "schema": { "type": "array", "items": { "type": "string" } } }
                    ]
                }
            }
        }
    }))
    .unwrap();
    let opts = options("batches");

    let env = transform::build_environment(&doc, &opts);
    assert!(env.get("batchId").is_some());

    match transform::build_collection(&doc, &opts).unwrap_err() {
        TransformError::Resolve { operation, source } => {
            assert_eq!(operation, "POST /batches/{batchId}");
            assert!(matches!(source, ResolveError::RefNotFound(_)));
        }
        other => panic!("expected a resolve error, got {other}"),
    }
}

#[test]
fn unquoted_yaml_info_version() {
    let doc = parse::from_yaml(
        "openapi: 3.0.1\ninfo:\n  title: Numbers\n  version: 1.0\npaths:\n  /ping:\n    get:\n      operationId: ping\n",
    )
    .unwrap();
    assert_eq!(doc.info.version.as_deref(), Some("1.0"));

    let artifacts = transform::transform_with_options(&doc, &options("numbers")).unwrap();
    assert_eq!(artifacts.summary.rows.len(), 1);
    assert_eq!(artifacts.collection.info.description, " Version:1.0");
}

#[test]
fn collection_serializes_to_postman_shape() {
    let doc = parse::from_json(SWAGGER2).unwrap();
    let collection = transform::build_collection(&doc, &options("shape")).unwrap();
    let value = serde_json::to_value(&collection).unwrap();

    assert_eq!(
        value["info"]["schema"],
        "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
    );
    let folder = value["item"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == "pet")
        .unwrap();
    let find_by_id = &folder["item"][0];
    assert_eq!(find_by_id["name"], "Find pet by ID");
    assert_eq!(find_by_id["response"], json!([]));
    assert_eq!(find_by_id["request"]["method"], "get");
    assert_eq!(find_by_id["request"]["description"], "Returns a single pet");
    assert_eq!(find_by_id["request"]["header"], json!([{ "key": "accept", "value": "*/*" }]));
    assert!(find_by_id["request"].get("body").is_none());
    assert_eq!(
        find_by_id["request"]["url"],
        json!({
            "raw": "{{protocol}}://{{host}}{{base_url}}/pets/:id",
            "host": ["{{protocol}}://{{host}}{{base_url}}"],
            "path": ["pets", ":id"],
            "variable": [{ "key": "id", "value": "{{id}}" }],
            "query": []
        })
    );
}
