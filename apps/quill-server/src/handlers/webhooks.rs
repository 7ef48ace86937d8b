//! Identity provider webhook.

use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use quill_core::domain::{IdentityEvent, User};
use quill_core::error::ProvisioningError;
use quill_core::ports::SignatureHeaders;
use quill_core::services::ProvisionOutcome;
use quill_shared::dto::UserResponse;

use crate::state::AppState;

const ID_HEADER: &str = "svix-id";
const TIMESTAMP_HEADER: &str = "svix-timestamp";
const SIGNATURE_HEADER: &str = "svix-signature";

/// Verify and apply an identity provider event.
///
/// POST /api/webhooks/identity
pub async fn identity_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let Some(verifier) = state.webhook_verifier.as_ref() else {
        tracing::error!("Webhook received but SIGNING_SECRET is not configured");
        return message(
            HttpResponse::InternalServerError(),
            "Webhook signing secret not configured",
        );
    };

    let (Some(id), Some(timestamp), Some(signature)) = (
        header(&req, ID_HEADER),
        header(&req, TIMESTAMP_HEADER),
        header(&req, SIGNATURE_HEADER),
    ) else {
        return message(HttpResponse::BadRequest(), "Missing Svix headers");
    };

    let headers = SignatureHeaders {
        id,
        timestamp,
        signature,
    };
    if let Err(e) = verifier.verify(&body, headers) {
        tracing::warn!(error = %e, msg_id = %id, "Webhook verification failed");
        return message(HttpResponse::BadRequest(), "Verification error");
    }

    let event: IdentityEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, msg_id = %id, "Malformed webhook payload");
            return message(HttpResponse::BadRequest(), "Invalid payload");
        }
    };

    tracing::debug!(msg_id = %id, event_type = %event.event_type, "Webhook verified");

    match state.provisioning.handle_event(event).await {
        Ok(ProvisionOutcome::Created(user)) => HttpResponse::Created().json(user_response(user)),
        Ok(ProvisionOutcome::AlreadyExists) => {
            message(HttpResponse::Ok(), "User already exists")
        }
        Ok(ProvisionOutcome::Ignored) => message(HttpResponse::Ok(), "Webhook received"),
        Err(ProvisioningError::InvalidPayload(reason)) => {
            tracing::warn!(msg_id = %id, reason = %reason, "Rejected user.created payload");
            message(HttpResponse::BadRequest(), &reason)
        }
        Err(ProvisioningError::Storage(_)) => {
            message(HttpResponse::InternalServerError(), "Error creating user")
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn message(mut builder: actix_web::HttpResponseBuilder, text: &str) -> HttpResponse {
    builder.json(json!({ "message": text }))
}

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        profile_image: user.profile_image,
    }
}
