//! End-to-end binding scenarios.
//!
//! These tests drive complete handler bindings through the validator
//! the way an embedding server would: build the binding once, then run
//! real requests through it and check either the bound values or the
//! exact shape of the 422 error body.

use http::{Method, StatusCode, Uri};
use serde::Deserialize;
use serde_json::json;
use talaria_binding::{
    Annotation, BytesBody, FormDataBody, HandlerBindingBuilder, Header, JsonBody, Path, Query,
    RequestValidator, StreamBody, TextBody,
};
use talaria_extract::{RequestParts, RequestPartsBuilder};

fn get(uri: &'static str) -> RequestParts {
    RequestPartsBuilder::new()
        .method(Method::GET)
        .uri(Uri::from_static(uri))
        .build()
}

fn post_json(uri: &'static str, body: &str) -> RequestParts {
    RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static(uri))
        .header("content-type", "application/json")
        .body(body.to_string())
        .build()
}

/// Three individual JSON body attributes are delivered as separate
/// typed values from one shared body extraction.
#[tokio::test]
async fn test_individual_json_body_attributes() {
    let binding = HandlerBindingBuilder::new("create_user")
        .param("username", Annotation::of::<String>(), JsonBody::new())
        .unwrap()
        .param("password", Annotation::of::<String>(), JsonBody::new())
        .unwrap()
        .param("repeat_password", Annotation::of::<String>(), JsonBody::new())
        .unwrap()
        .build();

    let parts = post_json(
        "/users",
        r#"{"username": "a", "password": "x", "repeat_password": "x"}"#,
    );
    let values = RequestValidator::new().run(&binding, &parts).await.unwrap();

    assert_eq!(values.get::<String>("username").unwrap(), "a");
    assert_eq!(values.get::<String>("password").unwrap(), "x");
    assert_eq!(values.get::<String>("repeat_password").unwrap(), "x");
}

/// A body that fails to decode produces exactly one issue, located at
/// the body itself rather than any declared attribute.
#[tokio::test]
async fn test_malformed_body_single_extraction_issue() {
    let binding = HandlerBindingBuilder::new("handler")
        .param("attr1", Annotation::of::<String>(), JsonBody::new())
        .unwrap()
        .build();

    let parts = post_json("/items", "}[{{}");
    let failure = RequestValidator::new()
        .run(&binding, &parts)
        .await
        .unwrap_err();

    assert_eq!(failure.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(failure.issues().len(), 1);
    let body = failure.to_body();
    assert_eq!(body["errors"][0]["loc"], json!(["body"]));
    assert_eq!(body["errors"][0]["type"], "body_extraction");
}

/// A required header with no default reports a missing-field issue
/// under its wire alias.
#[tokio::test]
async fn test_missing_required_header() {
    let binding = HandlerBindingBuilder::new("handler")
        .param(
            "api_key",
            Annotation::of::<String>(),
            Header::new().alias("x-api-key"),
        )
        .unwrap()
        .build();

    let failure = RequestValidator::new()
        .run(&binding, &get("/items"))
        .await
        .unwrap_err();

    let body = failure.to_body();
    assert_eq!(
        body,
        json!({
            "errors": [
                {"loc": ["header", "x-api-key"], "msg": "Field required", "type": "missing"}
            ]
        })
    );
}

/// An optional query parameter that the request omits binds `None`
/// without producing a failure.
#[tokio::test]
async fn test_absent_optional_query_binds_none() {
    let binding = HandlerBindingBuilder::new("handler")
        .param("limit", Annotation::of::<u32>().optional(), Query::new())
        .unwrap()
        .build();

    let values = RequestValidator::new()
        .run(&binding, &get("/items"))
        .await
        .unwrap();
    assert_eq!(values.get::<Option<u32>>("limit").unwrap(), None);
}

/// A binding with no declared parameters accepts any request and binds
/// nothing.
#[tokio::test]
async fn test_empty_binding() {
    let binding = HandlerBindingBuilder::new("health").build();
    assert!(binding.is_empty());

    let values = RequestValidator::new()
        .run(&binding, &get("/health"))
        .await
        .unwrap();
    assert!(values.is_empty());
}

/// Failures from different locations accumulate into one response.
#[tokio::test]
async fn test_issues_accumulate_across_locations() {
    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    let binding = HandlerBindingBuilder::new("handler")
        .param("user_id", Annotation::of::<u64>(), Path::new())
        .unwrap()
        .param("page", Annotation::of::<u32>(), Query::new())
        .unwrap()
        .param("payload", Annotation::model::<Payload>(), JsonBody::new())
        .unwrap()
        .build();

    // Bad path value, missing query param, type-invalid body.
    let parts = RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/users/nine"))
        .path_param("user_id", "nine")
        .header("content-type", "application/json")
        .body(r#"{"name": 5}"#)
        .build();

    let failure = RequestValidator::new()
        .run(&binding, &parts)
        .await
        .unwrap_err();
    let issues = failure.issues();
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].loc, vec!["path", "user_id"]);
    assert_eq!(issues[1].loc, vec!["query", "page"]);
    assert_eq!(issues[1].issue_type, "missing");
    assert_eq!(issues[2].loc, vec!["body"]);
    assert_eq!(issues[2].issue_type, "validation_error");
}

/// Path and query string values coerce into numeric and boolean
/// targets.
#[tokio::test]
async fn test_string_sources_coerce() {
    let binding = HandlerBindingBuilder::new("handler")
        .param("user_id", Annotation::of::<u64>(), Path::new())
        .unwrap()
        .param("active", Annotation::of::<bool>(), Query::new())
        .unwrap()
        .build();

    let parts = RequestPartsBuilder::new()
        .method(Method::GET)
        .uri(Uri::from_static("/users/42?active=true"))
        .path_param("user_id", "42")
        .build();

    let values = RequestValidator::new().run(&binding, &parts).await.unwrap();
    assert_eq!(values.get::<u64>("user_id").unwrap(), 42);
    assert!(values.get::<bool>("active").unwrap());
}

/// Form bodies serve both styles: a whole-body model of the wire
/// strings, or individual attributes with per-value coercion.
#[tokio::test]
async fn test_form_body_schema() {
    #[derive(Debug, Deserialize)]
    struct LoginForm {
        username: String,
        password: String,
    }

    let binding = HandlerBindingBuilder::new("login")
        .param("form", Annotation::model::<LoginForm>(), FormDataBody::new())
        .unwrap()
        .build();

    let parts = RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=alice&password=s3cret")
        .build();

    let values = RequestValidator::new().run(&binding, &parts).await.unwrap();
    let form = values.get::<LoginForm>("form").unwrap();
    assert_eq!(form.username, "alice");
    assert_eq!(form.password, "s3cret");
}

/// Individual form attributes coerce the wire strings into their
/// declared types.
#[tokio::test]
async fn test_form_body_attributes_coerce() {
    let binding = HandlerBindingBuilder::new("login")
        .param("username", Annotation::of::<String>(), FormDataBody::new())
        .unwrap()
        .param("remember", Annotation::of::<bool>(), FormDataBody::new())
        .unwrap()
        .build();

    let parts = RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/login"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("username=alice&remember=true")
        .build();

    let values = RequestValidator::new().run(&binding, &parts).await.unwrap();
    assert_eq!(values.get::<String>("username").unwrap(), "alice");
    assert!(values.get::<bool>("remember").unwrap());
}

/// Raw body markers pass bytes and text through without validation.
#[tokio::test]
async fn test_raw_body_markers() {
    let bytes_binding = HandlerBindingBuilder::new("upload")
        .param("data", Annotation::raw(), BytesBody::new())
        .unwrap()
        .build();
    let text_binding = HandlerBindingBuilder::new("note")
        .param("note", Annotation::raw(), TextBody::new())
        .unwrap()
        .build();
    let stream_binding = HandlerBindingBuilder::new("ingest")
        .param("stream", Annotation::raw(), StreamBody::new())
        .unwrap()
        .build();

    let parts = RequestPartsBuilder::new()
        .method(Method::POST)
        .uri(Uri::from_static("/upload"))
        .body("payload bytes")
        .build();

    let values = RequestValidator::new()
        .run(&bytes_binding, &parts)
        .await
        .unwrap();
    assert_eq!(values.bytes("data").unwrap().as_ref(), b"payload bytes");

    let values = RequestValidator::new()
        .run(&text_binding, &parts)
        .await
        .unwrap();
    assert_eq!(values.text("note").unwrap(), "payload bytes");

    let values = RequestValidator::new()
        .run(&stream_binding, &parts)
        .await
        .unwrap();
    assert!(values.stream("stream").is_ok());
}
