/// Follow handlers - feed of followed authors, subscribe and unsubscribe
use actix_web::{web, HttpResponse};

use super::{profile_url, redirect};
use crate::db::post_repo::PostFilter;
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::pagination::PageQuery;
use crate::state::AppState;
use crate::templates::{render_page, Template};

/// Posts of the authors the viewer follows
pub async fn follow_index(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page_obj = state
        .posts()
        .list(PostFilter::FollowedBy(viewer.id), query.page.as_deref())
        .await?;

    Ok(render_page(&Template::Follow { page_obj }, Some(&viewer)))
}

pub async fn profile_follow(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = state.follows().follow(viewer.id, &username).await?;
    Ok(redirect(&profile_url(&author.username)))
}

pub async fn profile_unfollow(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = state.follows().unfollow(viewer.id, &username).await?;
    Ok(redirect(&profile_url(&author.username)))
}
