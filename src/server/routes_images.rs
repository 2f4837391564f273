//! Image serving, upload and thumbnail routes.
//!
//! Two serving variants share the same pipeline: `GetMaterialImage` frames
//! the bytes with explicit headers, `GetImageFile` returns a plain file
//! response. Both answer an unsupported source format with an empty 404.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use matserve_common::{Error, MaterialCode};

use super::error::AppError;
use super::AppContext;
use crate::images::uploads::{self, UploadedFile};
use crate::images::{EncodedImage, Rendition};

/// Largest accepted upload request body.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Path the upload endpoint points clients at when thumbnails exist.
const THUMBNAILS_PATH: &str = "/api/images/thumbnails";

/// Create image-related routes.
pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/GetMaterialImage/{material_code}", get(get_material_image))
        .route("/GetImageFile/{material_code}", get(get_image_file))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/thumbnails", get(list_thumbnails))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/images/GetMaterialImage/{material_code}
///
/// Responds with the re-encoded image and `Content-Type`, `Content-Length`,
/// `Content-Disposition: render; filename=...` and `Accept-Ranges: bytes`.
async fn get_material_image(
    State(ctx): State<AppContext>,
    Path(material_code): Path<String>,
) -> Result<Response, AppError> {
    let code = MaterialCode::parse(&material_code)?;
    let image = encoded(ctx.images.render(&code).await?)?;
    framed_response(image)
}

/// GET /api/images/GetImageFile/{material_code}
async fn get_image_file(
    State(ctx): State<AppContext>,
    Path(material_code): Path<String>,
) -> Result<Response, AppError> {
    let code = MaterialCode::parse(&material_code)?;
    let image = encoded(ctx.images.render(&code).await?)?;
    Ok(([(header::CONTENT_TYPE, image.content_type())], image.bytes).into_response())
}

/// POST /api/images/upload
///
/// Accepts a multipart body whose file parts are stored in the image
/// container. Answers 202 Accepted once at least one file is stored.
async fn upload(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("malformed multipart body: {}", e)))?
    {
        let Some(raw_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_input(format!("failed to read {}: {}", raw_name, e)))?;

        files.push(UploadedFile {
            file_name: uploads::base_name(&raw_name),
            content_type,
            data,
        });
    }

    let summary =
        uploads::store_uploads(ctx.blob_store.as_ref(), &ctx.config.storage, files).await?;
    tracing::info!(
        "Stored {} uploaded image(s), skipped {} empty",
        summary.uploaded,
        summary.skipped_empty
    );

    if ctx.config.storage.has_thumbnails() {
        Ok((
            StatusCode::ACCEPTED,
            [(header::LOCATION, THUMBNAILS_PATH)],
            Json(summary),
        )
            .into_response())
    } else {
        Ok((StatusCode::ACCEPTED, Json(summary)).into_response())
    }
}

/// GET /api/images/thumbnails
async fn list_thumbnails(State(ctx): State<AppContext>) -> Result<Json<Vec<String>>, AppError> {
    ctx.config.storage.require_thumbnails()?;
    let urls = ctx.blob_store.list_thumbnail_urls().await?;
    Ok(Json(urls))
}

// ============================================================================
// Helpers
// ============================================================================

/// Unsupported source formats become [`Error::UnsupportedFormat`] (empty 404).
fn encoded(rendition: Rendition) -> Result<EncodedImage, Error> {
    match rendition {
        Rendition::Encoded(image) => Ok(image),
        Rendition::Unsupported(format) => Err(Error::unsupported_format(format.to_string())),
    }
}

fn framed_response(image: EncodedImage) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(&image.file_name))
        .map_err(|e| Error::internal(format!("invalid content disposition: {}", e)))?;
    let length = HeaderValue::from(image.len());
    let content_type = HeaderValue::from_static(image.content_type());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::ACCEPT_RANGES, HeaderValue::from_static("bytes")),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, length),
        ],
        image.bytes,
    )
        .into_response())
}

/// `render; filename=<name>`, quoting the name when it is not a plain token.
fn content_disposition(file_name: &str) -> String {
    let is_token = !file_name.is_empty()
        && file_name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&b));
    if is_token {
        return format!("render; filename={}", file_name);
    }

    let mut quoted = String::with_capacity(file_name.len() + 2);
    for c in file_name.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => quoted.push(c),
            _ => quoted.push('_'),
        }
    }
    format!("render; filename=\"{}\"", quoted)
}
