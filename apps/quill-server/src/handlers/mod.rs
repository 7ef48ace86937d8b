//! HTTP handlers and route configuration.

mod health;
mod posts;
mod uploads;
mod webhooks;

use actix_web::{HttpResponse, error::InternalError, web};
use quill_shared::ErrorResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/webhooks/identity", web::post().to(webhooks::identity_webhook))
            // Posts
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::edit_post))
                    .route("/{id}", web::delete().to(posts::delete_post))
                    .route("/{id}/edit", web::get().to(posts::get_post_for_edit)),
            )
            .route("/me/posts", web::get().to(posts::my_posts))
            .route("/uploads", web::post().to(uploads::upload_image)),
    );
}

/// Malformed JSON bodies get an RFC 7807 response instead of plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::bad_request(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

#[cfg(test)]
mod tests;
