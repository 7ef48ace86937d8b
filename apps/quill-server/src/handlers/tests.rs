use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use quill_core::ports::{BlobStore, TokenService, WebhookVerifier};
use quill_infra::{JwtConfig, JwtTokenService, LocalBlobConfig, LocalBlobStore, SvixVerifier};

use super::configure_routes;
use crate::state::AppState;

// base64("test-signing-key-0123456789")
const SECRET: &str = "whsec_dGVzdC1zaWduaW5nLWtleS0wMTIzNDU2Nzg5";

fn tokens() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        ..JwtConfig::default()
    }))
}

fn blobs() -> Arc<dyn BlobStore> {
    let root = std::env::temp_dir().join(format!("quill-handlers-{}", uuid::Uuid::new_v4()));
    Arc::new(LocalBlobStore::new(LocalBlobConfig {
        root,
        public_base_url: "http://cdn.test/blobs".to_string(),
    }))
}

fn state() -> AppState {
    let verifier: Arc<dyn WebhookVerifier> = Arc::new(SvixVerifier::new(SECRET).unwrap());
    AppState::in_memory(tokens(), Some(verifier), blobs())
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn user_created(id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "type": "user.created",
        "data": {
            "id": id,
            "email_addresses": [{ "email_address": format!("{id}@example.com") }],
            "first_name": "Ada",
            "last_name": "Lovelace",
            "image_url": null
        }
    }))
    .unwrap()
}

fn signed_webhook(body: Vec<u8>) -> test::TestRequest {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = SvixVerifier::new(SECRET)
        .unwrap()
        .sign("msg_test", &timestamp, &body);

    test::TestRequest::post()
        .uri("/api/webhooks/identity")
        .insert_header(("svix-id", "msg_test"))
        .insert_header(("svix-timestamp", timestamp))
        .insert_header(("svix-signature", format!("v1,{signature}")))
        .set_payload(body)
}

fn bearer(state: &AppState, user_id: &str) -> (&'static str, String) {
    let token = state.tokens.generate_token(user_id, None).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "in-memory");
}

#[actix_web::test]
async fn test_unsigned_webhook_is_rejected_without_side_effects() {
    let app = init_app!(state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/webhooks/identity")
            .set_payload(user_created("user_1"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing Svix headers");

    // No row was written: the first genuine delivery still creates the user.
    let resp = test::call_service(&app, signed_webhook(user_created("user_1")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_webhook_with_bad_signature() {
    let app = init_app!(state());
    let timestamp = chrono::Utc::now().timestamp().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/webhooks/identity")
            .insert_header(("svix-id", "msg_test"))
            .insert_header(("svix-timestamp", timestamp))
            .insert_header(("svix-signature", "v1,bm90LWEtc2lnbmF0dXJl"))
            .set_payload(user_created("user_1"))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Verification error");
}

#[actix_web::test]
async fn test_user_created_webhook() {
    let app = init_app!(state());

    let resp = test::call_service(&app, signed_webhook(user_created("user_1")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], "user_1");
    assert_eq!(body["email"], "user_1@example.com");
    assert_eq!(body["first_name"], "Ada");

    // Redelivery is a no-op.
    let resp = test::call_service(&app, signed_webhook(user_created("user_1")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_user_created_without_email() {
    let app = init_app!(state());
    let body = serde_json::to_vec(&json!({
        "type": "user.created",
        "data": { "id": "user_1", "email_addresses": [] }
    }))
    .unwrap();

    let resp = test::call_service(&app, signed_webhook(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_other_events_are_acknowledged() {
    let app = init_app!(state());
    let body = serde_json::to_vec(&json!({ "type": "session.created", "data": {} })).unwrap();

    let resp = test::call_service(&app, signed_webhook(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Webhook received");
}

#[actix_web::test]
async fn test_webhook_without_signing_secret() {
    let app = init_app!(AppState::in_memory(tokens(), None, blobs()));

    let resp = test::call_service(&app, signed_webhook(user_created("user_1")).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_create_requires_session() {
    let app = init_app!(state());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "Hello", "content": "<p>Hi</p>" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Unauthorized");
}

#[actix_web::test]
async fn test_create_rejects_blank_title() {
    let state = state();
    let auth = bearer(&state, "u1");
    let app = init_app!(state);
    test::call_service(&app, signed_webhook(user_created("u1")).to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(auth)
            .set_json(json!({ "title": "   ", "content": "body" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation");
    assert_eq!(body["message"], "Title is required");
}

#[actix_web::test]
async fn test_non_author_cannot_edit() {
    let state = state();
    let u1 = bearer(&state, "u1");
    let u2 = bearer(&state, "u2");
    let app = init_app!(state);
    test::call_service(&app, signed_webhook(user_created("u1")).to_request()).await;
    test::call_service(&app, signed_webhook(user_created("u2")).to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(u1.clone())
            .set_json(json!({ "title": "Hello", "content": "<p>Hi</p>" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["data"]["author_id"], "u1");
    assert!(created["data"]["image_url"].is_null());
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(u2.clone())
            .set_json(json!({ "title": "Hijacked", "content": "x" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "You don't have permission to edit the post");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(u2)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .insert_header(u1)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let detail: Value = test::read_body_json(resp).await;
    assert_eq!(detail["data"]["title"], "Hello");
    assert_eq!(detail["data"]["is_author"], true);
    assert_eq!(detail["data"]["author"]["name"], "Ada Lovelace");
}

#[actix_web::test]
async fn test_author_edits_and_deletes_with_cookie_session() {
    let state = state();
    let token = state.tokens.generate_token("u1", None).unwrap();
    let app = init_app!(state);
    test::call_service(&app, signed_webhook(user_created("u1")).to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .cookie(Cookie::new("__session", token.clone()))
            .set_json(json!({
                "title": "Hello",
                "content": "<p>Hi</p>",
                "image_url": "http://cdn.test/blobs/uploads/1-a.png"
            }))
            .to_request(),
    )
    .await;
    let created: Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{id}/edit"))
            .cookie(Cookie::new("__session", token.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/posts/{id}"))
            .cookie(Cookie::new("__session", token.clone()))
            .set_json(json!({ "title": "Hello again", "content": "<p>Updated</p>" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let edited: Value = test::read_body_json(resp).await;
    assert_eq!(edited["data"]["title"], "Hello again");
    assert_eq!(
        edited["data"]["image_url"],
        "http://cdn.test/blobs/uploads/1-a.png"
    );
    assert_eq!(edited["data"]["created_at"], created["data"]["created_at"]);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/posts/{id}"))
            .cookie(Cookie::new("__session", token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post not found");
}

#[actix_web::test]
async fn test_listing_and_dashboard() {
    let state = state();
    let u1 = bearer(&state, "u1");
    let u2 = bearer(&state, "u2");
    let app = init_app!(state);
    test::call_service(&app, signed_webhook(user_created("u1")).to_request()).await;
    test::call_service(&app, signed_webhook(user_created("u2")).to_request()).await;

    for (auth, title) in [(u1.clone(), "First"), (u2, "Second")] {
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(auth)
                .set_json(json!({ "title": title, "content": "<p>Some &amp; text</p>" }))
                .to_request(),
        )
        .await;
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request())
        .await;
    let listing: Value = test::read_body_json(resp).await;
    let posts = listing["data"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Second");
    assert_eq!(posts[0]["excerpt"], "Some & text");
    assert_eq!(posts[0]["author"]["id"], "u2");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/me/posts")
            .insert_header(u1)
            .to_request(),
    )
    .await;
    let mine: Value = test::read_body_json(resp).await;
    let mine = mine["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["title"], "First");
}

#[actix_web::test]
async fn test_unknown_post_id() {
    let state = state();
    let auth = bearer(&state, "u1");
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/posts/not-a-uuid/edit")
            .insert_header(auth)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_upload() {
    let state = state();
    let auth = bearer(&state, "u1");
    let app = init_app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/uploads")
            .set_payload("png-bytes")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/uploads")
            .insert_header(auth.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "No file uploaded");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/uploads")
            .insert_header(auth)
            .insert_header(("content-type", "image/png"))
            .set_payload("png-bytes")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let pathname = body["pathname"].as_str().unwrap();
    assert!(pathname.starts_with("uploads/"));
    assert_eq!(
        body["url"].as_str().unwrap(),
        format!("http://cdn.test/blobs/{pathname}")
    );
}
