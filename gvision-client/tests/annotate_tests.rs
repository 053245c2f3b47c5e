use std::io::Write;

use gvision_client::{
    AnnotateImageRequest, BatchAnnotateImagesRequest, Error, FeatureKind, Image, ImageAnnotator,
    VisionBuilder, VisionClient,
};
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, body_string_contains, header, method, path},
};

const TEST_KEY: &str = include_str!("fixtures/test_key.pem");

fn credentials_file(token_uri: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let key = json!({
        "type": "service_account",
        "project_id": "demo",
        "private_key_id": "key-1",
        "private_key": TEST_KEY,
        "client_email": "annotator@demo.iam.gserviceaccount.com",
        "token_uri": token_uri,
    });
    file.write_all(key.to_string().as_bytes()).unwrap();
    file
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "expires_in": 3600,
            "token_type": "Bearer",
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn client_for(server: &MockServer, credentials: &NamedTempFile) -> VisionClient {
    VisionBuilder::new()
        .with_base_url_str(&format!("{}/v1/", server.uri()))
        .unwrap()
        .with_credentials_file(credentials.path())
        .await
        .unwrap()
        .build()
        .unwrap()
}

fn batch(kind: &str) -> BatchAnnotateImagesRequest {
    AnnotateImageRequest::new(Image::from_bytes(b"image"), kind).into()
}

#[tokio::test]
async fn annotate_sends_bearer_token_and_returns_results() {
    let server = MockServer::start().await;
    let credentials = credentials_file(&format!("{}/token", server.uri()));
    mount_token(&server, 1).await;

    let face = json!({ "faceAnnotations": [{ "detectionConfidence": 0.98, "joyLikelihood": "VERY_LIKELY" }] });
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_partial_json(json!({
            "requests": [{
                "image": { "content": "aW1hZ2U=" },
                "features": [{ "type": "FACE_DETECTION", "maxResults": 10 }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": [face.clone()] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &credentials).await;
    let response = client.annotate(batch("FACE_DETECTION")).await.unwrap();

    assert_eq!(response.responses.len(), 1);
    assert_eq!(response.responses[0].as_value(), &face);
}

#[tokio::test]
async fn unknown_feature_kind_reaches_the_server_unchanged() {
    let server = MockServer::start().await;
    let credentials = credentials_file(&format!("{}/token", server.uri()));
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(body_partial_json(json!({
            "requests": [{ "features": [{ "type": "NOT_A_FEATURE" }] }]
        })))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid value at 'requests[0].features[0].type'"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &credentials).await;
    assert_eq!(FeatureKind::from("NOT_A_FEATURE"), FeatureKind::Custom("NOT_A_FEATURE".into()));

    let err = client.annotate(batch("NOT_A_FEATURE")).await.unwrap_err();
    match err {
        Error::BadResponse { code, description } => {
            assert_eq!(code, 400);
            assert!(description.unwrap().contains("features[0].type"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn access_token_is_cached_between_calls() {
    let server = MockServer::start().await;
    let credentials = credentials_file(&format!("{}/token", server.uri()));
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": [{}] })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, &credentials).await;
    client.annotate(batch("LABEL_DETECTION")).await.unwrap();
    client.annotate(batch("LABEL_DETECTION")).await.unwrap();
}

#[tokio::test]
async fn rejected_assertion_is_an_authentication_error() {
    let server = MockServer::start().await;
    let credentials = credentials_file(&format!("{}/token", server.uri()));

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "invalid_grant" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, &credentials).await;
    let err = client.annotate(batch("FACE_DETECTION")).await.unwrap_err();
    assert!(matches!(err, Error::TokenRejected { code: 401, .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn per_image_errors_are_returned_not_raised() {
    let server = MockServer::start().await;
    let credentials = credentials_file(&format!("{}/token", server.uri()));
    mount_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [{ "error": { "code": 3, "message": "Bad image data." } }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &credentials).await;
    let response = client.annotate(batch("FACE_DETECTION")).await.unwrap();
    assert_eq!(response.responses[0].error_message(), Some("Bad image data."));
}

#[tokio::test]
async fn missing_credentials_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = VisionBuilder::new()
        .with_credentials_file(dir.path().join("nope.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReadCredentials { .. }));
}

#[tokio::test]
async fn oversized_token_lifetime_is_clamped_and_cached() {
    let server = MockServer::start().await;
    let credentials = credentials_file(&format!("{}/token", server.uri()));

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-forever",
            "expires_in": i64::MAX,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/images:annotate"))
        .and(header("authorization", "Bearer tok-forever"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "responses": [{}] })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, &credentials).await;
    client.annotate(batch("FACE_DETECTION")).await.unwrap();
    client.annotate(batch("FACE_DETECTION")).await.unwrap();
}
