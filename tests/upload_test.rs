//! Integration tests for upload and thumbnail listing.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_bytes, config_for, encoded_image, TestHarness, CONTAINER, THUMBNAILS};
use image::ImageFormat;
use matserve::server::AppContext;
use wiremock::matchers::{header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOUNDARY: &str = "matserve-test-boundary";

/// Build a multipart/form-data body with one `files` part per entry.
fn multipart(parts: &[(&str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/images/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_puts_each_image_and_points_at_thumbnails() {
    let h = TestHarness::new().await;
    Mock::given(method("PUT"))
        .and(path(format!("/{CONTAINER}/a.png")))
        .and(header_is("x-ms-blob-type", "BlockBlob"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&h.store)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/{CONTAINER}/b.jpg")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&h.store)
        .await;

    let png = encoded_image(2, 2, ImageFormat::Png);
    let jpeg = encoded_image(2, 2, ImageFormat::Jpeg);
    let resp = h
        .send(multipart(&[
            ("a.png", "image/png", &png[..]),
            ("dir/b.jpg", "image/jpeg", &jpeg[..]),
        ]))
        .await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/api/images/thumbnails"
    );
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["uploaded"], 2);
}

#[tokio::test]
async fn upload_without_thumbnail_container_has_no_location() {
    let store = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&store)
        .await;
    let mut config = config_for(&store.uri());
    config.storage.thumbnail_container.clear();
    let h = TestHarness {
        store,
        ctx: AppContext::new(config),
    };

    let resp = h.send(multipart(&[("a.png", "image/png", &b"png"[..])])).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(resp.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn upload_with_no_files_is_bad_request() {
    let h = TestHarness::new().await;
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::post("/api/images/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let resp = h.send(request).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No files received from the upload"));
}

#[tokio::test]
async fn upload_of_non_image_is_unsupported_media_type() {
    let h = TestHarness::new().await;
    let resp = h
        .send(multipart(&[("notes.txt", "text/plain", &b"hello"[..])]))
        .await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn upload_with_directory_file_name_is_bad_request() {
    let h = TestHarness::new().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.store)
        .await;

    let resp = h
        .send(multipart(&[("photos/", "image/png", &b"png"[..])]))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn upload_rejected_by_store_is_bad_gateway() {
    let h = TestHarness::new().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&h.store)
        .await;

    let resp = h.send(multipart(&[("a.png", "image/png", &b"png"[..])])).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["code"], "storage_error");
}

#[tokio::test]
async fn thumbnails_lists_urls_in_order() {
    let h = TestHarness::new().await;
    Mock::given(method("GET"))
        .and(path(format!("/{THUMBNAILS}")))
        .and(query_param("restype", "container"))
        .and(query_param("comp", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<EnumerationResults><Blobs>\
             <Blob><Name>z.png</Name></Blob>\
             <Blob><Name>a.png</Name></Blob>\
             </Blobs><NextMarker /></EnumerationResults>",
        ))
        .mount(&h.store)
        .await;

    let resp = h.get("/api/images/thumbnails").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let urls: Vec<String> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let base = format!("{}/{THUMBNAILS}", h.store.uri());
    assert_eq!(urls, vec![format!("{base}/z.png"), format!("{base}/a.png")]);
}

#[tokio::test]
async fn thumbnails_without_container_is_bad_request() {
    let mut config = config_for("http://127.0.0.1:1");
    config.storage.thumbnail_container.clear();
    let h = TestHarness {
        store: MockServer::start().await,
        ctx: AppContext::new(config),
    };

    let resp = h.get("/api/images/thumbnails").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_blob_store_is_used_for_uploads() {
    use bytes::Bytes;
    use matserve::blob::BlobStore;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemoryStore(Mutex<Vec<String>>);

    #[async_trait::async_trait]
    impl BlobStore for MemoryStore {
        async fn put_object(
            &self,
            name: &str,
            _data: Bytes,
            _content_type: &str,
        ) -> matserve_common::Result<()> {
            self.0.lock().push(name.to_string());
            Ok(())
        }

        async fn list_thumbnail_urls(&self) -> matserve_common::Result<Vec<String>> {
            Ok(self.0.lock().clone())
        }
    }

    let memory = Arc::new(MemoryStore::default());
    let h = TestHarness {
        store: MockServer::start().await,
        ctx: AppContext::with_blob_store(config_for("http://127.0.0.1:1"), memory.clone()),
    };

    let resp = h.send(multipart(&[("one.gif", "image/gif", &b"GIF89a"[..])])).await;
    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert_eq!(*memory.0.lock(), vec!["one.gif".to_string()]);

    let resp = h.get("/api/images/thumbnails").await;
    let urls: Vec<String> = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(urls, vec!["one.gif".to_string()]);
}
