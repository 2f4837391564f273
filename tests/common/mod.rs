//! Shared test harness for integration tests.
//!
//! [`TestHarness`] starts a wiremock server standing in for the blob store
//! and builds an [`AppContext`] whose storage URL points at it.

#![allow(dead_code)]

use std::io::Cursor;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use matserve::config::{Config, StorageConfig};
use matserve::server::{create_router, AppContext};

pub const CONTAINER: &str = "images";
pub const THUMBNAILS: &str = "thumbnails";

pub struct TestHarness {
    pub store: MockServer,
    pub ctx: AppContext,
}

impl TestHarness {
    /// Blob store mock plus a context configured for it.
    pub async fn new() -> Self {
        let store = MockServer::start().await;
        let config = config_for(&store.uri());
        let ctx = AppContext::new(config);
        Self { store, ctx }
    }

    /// Register an object that answers both HEAD and GET.
    pub async fn put_object(&self, key: &str, body: Vec<u8>) {
        let object_path = format!("/{}/{}", CONTAINER, key);
        Mock::given(method("HEAD"))
            .and(path(object_path.clone()))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.store)
            .await;
        Mock::given(method("GET"))
            .and(path(object_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&self.store)
            .await;
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        create_router(self.ctx.clone())
            .oneshot(request)
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub fn config_for(uri: &str) -> Config {
    Config {
        storage: StorageConfig {
            url: uri.to_string(),
            image_container: CONTAINER.to_string(),
            thumbnail_container: THUMBNAILS.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Encode a small gradient in the given format.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x * 16) as u8, (y * 16) as u8, 200]);
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
