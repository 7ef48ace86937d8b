//! Error responses.
//!
//! Post operations answer with the tagged `ApiResponse` shape, everything
//! else with RFC 7807 bodies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::ports::BlobError;
use quill_core::{PostError, PostErrorKind};
use quill_shared::{ApiResponse, ErrorResponse};
use std::fmt;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// A post operation failed; rendered in the tagged result shape.
    Post(PostError),
    BadRequest(String),
    /// The blob store rejected or failed an upload.
    Upload(BlobError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Post(err) => write!(f, "{}", err),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Upload(err) => write!(f, "Upload failed: {}", err),
        }
    }
}

/// HTTP status for a post failure kind.
pub fn post_status(kind: PostErrorKind) -> StatusCode {
    match kind {
        PostErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        PostErrorKind::Validation => StatusCode::BAD_REQUEST,
        PostErrorKind::NotFound => StatusCode::NOT_FOUND,
        PostErrorKind::Forbidden => StatusCode::FORBIDDEN,
        PostErrorKind::CreationFailed
        | PostErrorKind::FetchFailed
        | PostErrorKind::UpdateFailed
        | PostErrorKind::DeletionFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Post(err) => post_status(err.kind()),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());

        match self {
            AppError::Post(err) => {
                response.json(ApiResponse::<()>::failure(err.kind().as_str(), err.to_string()))
            }
            AppError::BadRequest(detail) => response.json(ErrorResponse::bad_request(detail)),
            AppError::Upload(err) => {
                tracing::error!(error = %err, "Upload failed");
                response.json(ApiResponse::<()>::failure("upload_failed", "Upload failed"))
            }
        }
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        AppError::Post(err)
    }
}

impl From<BlobError> for AppError {
    fn from(err: BlobError) -> Self {
        AppError::Upload(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use quill_core::error::PostAction;

    #[actix_web::test]
    async fn test_forbidden_post_error_body() {
        let err = AppError::from(PostError::Forbidden(PostAction::Delete));
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "forbidden");
        assert_eq!(
            json["message"],
            "You don't have permission to delete the post"
        );
    }

    #[actix_web::test]
    async fn test_upload_error_is_tagged() {
        let err = AppError::from(BlobError::Remote {
            status: 503,
            message: "store unavailable".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "upload_failed");
        assert_eq!(json["message"], "Upload failed");
    }

    #[test]
    fn test_post_status_by_kind() {
        assert_eq!(
            post_status(PostErrorKind::Unauthorized),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            post_status(PostErrorKind::Validation),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(post_status(PostErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            post_status(PostErrorKind::UpdateFailed),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
