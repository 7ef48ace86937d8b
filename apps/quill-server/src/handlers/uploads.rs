//! Image upload endpoint.

use actix_web::{HttpRequest, HttpResponse, http::header, web};

use quill_core::ports::upload_pathname;
use quill_shared::dto::UploadResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Store the raw request body as a publicly readable blob.
///
/// POST /api/uploads
pub async fn upload_image(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    if body.is_empty() {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let pathname = upload_pathname();
    let size = body.len();
    let blob = state
        .blobs
        .put(&pathname, body.to_vec(), content_type)
        .await?;

    tracing::info!(
        user_id = %identity.user_id,
        pathname = %blob.pathname,
        bytes = size,
        "Image uploaded"
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        url: blob.url,
        pathname: blob.pathname,
    }))
}
