use actix_web::{web, HttpResponse};

use super::{post_url, redirect};
use crate::error::Result;
use crate::forms::CommentForm;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Add a comment and return to the post; invalid comments are dropped
pub async fn add_comment(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    post_id: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    state
        .comments()
        .add_comment(post_id, viewer.id, &form)
        .await?;

    Ok(redirect(&post_url(post_id)))
}

/// A GET on the comment URL (e.g. following `next` after login) lands on the post
pub async fn comment_redirect(_viewer: CurrentUser, post_id: web::Path<i64>) -> HttpResponse {
    redirect(&post_url(post_id.into_inner()))
}
