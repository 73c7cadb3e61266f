//! The HTTP collaborators against a local mock server: request shape
//! (method, path, headers, body) and status-code handling.

use catalog_core::DescriptorKind;
use catalog_sync::maven::latest_version;
use catalog_sync::{
    build_agent, ArtifactSource, HttpSource, PublishOutcome, Publisher, RegistryClient, SyncError,
};
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// ureq is blocking; keep it off the runtime thread that drives the server.
async fn publish(
    registry_url: String,
    kind: DescriptorKind,
    payload: &'static [u8],
) -> Result<PublishOutcome, SyncError> {
    tokio::task::spawn_blocking(move || {
        RegistryClient::new(build_agent(), registry_url, "tok").publish(kind, payload)
    })
    .await
    .expect("publish task")
}

async fn get(url: String) -> Result<Vec<u8>, SyncError> {
    tokio::task::spawn_blocking(move || HttpSource::new(build_agent()).get(&url))
        .await
        .expect("get task")
}

#[tokio::test(flavor = "multi_thread")]
async fn extension_post_carries_yaml_content_type_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/extension"))
        .and(header("Content-Type", "application/yaml"))
        .and(header("Token", "tok"))
        .and(body_bytes(b"name: ext\n".to_vec()))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = publish(server.uri(), DescriptorKind::Extension, b"name: ext\n")
        .await
        .expect("conflict is success");
    assert_eq!(outcome, PublishOutcome::AlreadyExists);
}

#[tokio::test(flavor = "multi_thread")]
async fn platform_post_goes_to_catalog_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/extension/catalog"))
        .and(header("Content-Type", "application/json"))
        .and(header("Token", "tok"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = publish(server.uri(), DescriptorKind::Platform, b"{}")
        .await
        .expect("accepted");
    assert_eq!(outcome, PublishOutcome::Accepted);
}

#[tokio::test(flavor = "multi_thread")]
async fn path_on_registry_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/extension/catalog"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let registry_url = format!("{}/some/prefix/", server.uri());
    let outcome = publish(registry_url, DescriptorKind::Platform, b"{}")
        .await
        .expect("accepted");
    assert_eq!(outcome, PublishOutcome::Accepted);
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_keeps_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/v1/extension"))
        .respond_with(ResponseTemplate::new(500).set_body_string("body"))
        .mount(&server)
        .await;

    let err = publish(server.uri(), DescriptorKind::Extension, b"name: ext\n")
        .await
        .unwrap_err();
    match err {
        SyncError::Publish { status, body, url } => {
            assert_eq!(status, 500);
            assert_eq!(body, "body");
            assert!(url.ends_with("/admin/v1/extension"), "url={url}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn source_returns_response_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/io/quarkus/bom/1.0/bom-1.0.json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{\"ok\":true}".to_vec()))
        .mount(&server)
        .await;

    let bytes = get(format!("{}/io/quarkus/bom/1.0/bom-1.0.json", server.uri()))
        .await
        .expect("bytes");
    assert_eq!(bytes, b"{\"ok\":true}");
}

#[tokio::test(flavor = "multi_thread")]
async fn source_maps_not_found_to_retrieval_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = get(format!("{}/missing.json", server.uri())).await.unwrap_err();
    match err {
        SyncError::Retrieval { url, reason } => {
            assert!(url.ends_with("/missing.json"), "url={url}");
            assert!(reason.contains("404"), "reason={reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn latest_version_is_read_from_served_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/io/quarkus/quarkus-core/maven-metadata.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<metadata><versioning><latest>3.1.0</latest><release>3.0.0</release></versioning></metadata>",
        ))
        .mount(&server)
        .await;

    let repository = format!("{}/", server.uri());
    let version = tokio::task::spawn_blocking(move || {
        let source = HttpSource::new(build_agent());
        latest_version(&source, &repository, "io.quarkus", "quarkus-core")
    })
    .await
    .expect("resolve task")
    .expect("latest version");
    assert_eq!(version, "3.1.0");
}
