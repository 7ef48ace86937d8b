//! Post endpoints.
//!
//! Every handler extracts the caller as an [`OptionalIdentity`] and passes it
//! to the service, which decides whether the operation needs a session.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::PostError;
use quill_core::domain::{AuthoredPost, EditablePost, Post, PostDraft, User};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    AuthorResponse, DeletedResponse, EditablePostResponse, PostDetailResponse, PostPayload,
    PostResponse, PostSummaryResponse,
};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Characters of plain text shown per post in listings.
const EXCERPT_CHARS: usize = 200;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_recent().await?;
    let summaries: Vec<PostSummaryResponse> = posts.iter().map(summary_with_author).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(summaries)))
}

/// GET /api/me/posts
pub async fn my_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_mine(identity.user_id()).await?;
    let summaries: Vec<PostSummaryResponse> = posts.iter().map(summary).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(summaries)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let authored = state.posts.get(post_id).await?;

    let is_author = identity
        .user_id()
        .is_some_and(|user_id| authored.post.is_authored_by(user_id));

    let detail = PostDetailResponse {
        post: post_response(&authored.post),
        author: author_response(&authored.author),
        is_author,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id(), draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(&post))))
}

/// GET /api/posts/{id}/edit
pub async fn get_post_for_edit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let editable = state.posts.get_for_edit(identity.user_id(), post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(editable_response(editable))))
}

/// PUT /api/posts/{id}
pub async fn edit_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let post = state
        .posts
        .edit(identity.user_id(), post_id, draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&post))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    state.posts.delete(identity.user_id(), post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(DeletedResponse {
        id: post_id.to_string(),
        deleted: true,
    })))
}

/// Ids that are not UUIDs cannot name a stored post.
fn parse_post_id(raw: &str) -> Result<Uuid, PostError> {
    Uuid::parse_str(raw).map_err(|_| PostError::NotFound)
}

fn draft(payload: PostPayload) -> PostDraft {
    PostDraft {
        title: payload.title,
        content: payload.content,
        image_url: payload.image_url.filter(|url| !url.trim().is_empty()),
    }
}

fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        content: post.content.clone(),
        image_url: post.image_url.clone(),
        author_id: post.author_id.clone(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn editable_response(post: EditablePost) -> EditablePostResponse {
    EditablePostResponse {
        id: post.id.to_string(),
        title: post.title,
        content: post.content,
        image_url: post.image_url,
        author_id: post.author_id,
    }
}

fn author_response(user: &User) -> AuthorResponse {
    AuthorResponse {
        id: user.id.clone(),
        name: user.display_name(),
        profile_image: user.profile_image.clone(),
    }
}

fn summary(post: &Post) -> PostSummaryResponse {
    PostSummaryResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        excerpt: post.excerpt(EXCERPT_CHARS),
        image_url: post.image_url.clone(),
        created_at: post.created_at.to_rfc3339(),
        author: None,
    }
}

fn summary_with_author(authored: &AuthoredPost) -> PostSummaryResponse {
    PostSummaryResponse {
        author: Some(author_response(&authored.author)),
        ..summary(&authored.post)
    }
}
