/// Post handlers - listings, post detail, create and edit pages
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};

use super::{post_url, profile_url, redirect};
use crate::cache::CacheKey;
use crate::db::post_repo::PostFilter;
use crate::error::Result;
use crate::forms::{read_post_submission, CommentForm, FormErrors, PostForm};
use crate::middleware::{can_edit_post, request_path, CurrentUser};
use crate::models::Post;
use crate::pagination::PageQuery;
use crate::services::PostFormOutcome;
use crate::state::AppState;
use crate::templates::{html_response, render_page, Template};

/// Cache key prefix of the index page
pub const INDEX_CACHE_PREFIX: &str = "index_page";

/// Main page: every post, newest first. Served from the page cache.
pub async fn index(
    state: web::Data<AppState>,
    req: HttpRequest,
    viewer: Option<CurrentUser>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let key = CacheKey::new(
        INDEX_CACHE_PREFIX,
        request_path(&req),
        viewer.as_ref().map(|u| u.id),
    );
    if let Some(body) = state.page_cache.get(&key) {
        return Ok(html_response(body.to_string()));
    }

    let page_obj = state
        .posts()
        .list(PostFilter::All, query.page.as_deref())
        .await?;
    let body = Template::Index { page_obj }.render(viewer.as_ref());
    let body = state.page_cache.insert(key, body);

    Ok(html_response(body.to_string()))
}

/// Posts of one group
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    viewer: Option<CurrentUser>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (group, page_obj) = state
        .posts()
        .group_page(&slug, query.page.as_deref())
        .await?;

    Ok(render_page(
        &Template::GroupList { group, page_obj },
        viewer.as_ref(),
    ))
}

/// Author profile with their posts
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    viewer: Option<CurrentUser>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let (author, page_obj) = state
        .posts()
        .profile_page(&username, query.page.as_deref())
        .await?;

    let following = match &viewer {
        Some(user) if user.id != author.id => {
            state.follows().is_following(user.id, author.id).await?
        }
        _ => false,
    };

    Ok(render_page(
        &Template::Profile {
            post_count: page_obj.total_count as i64,
            author,
            page_obj,
            following,
        },
        viewer.as_ref(),
    ))
}

/// Single post with its comments
pub async fn post_detail(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    viewer: Option<CurrentUser>,
) -> Result<HttpResponse> {
    let posts = state.posts();
    let post = posts.get_post(*post_id).await?;
    let author_post_count = posts.count_by_author(post.author_id).await?;
    let comments = state.comments().comments_for_post(post.id).await?;
    let can_edit = can_edit_post(viewer.as_ref(), &post);

    Ok(render_page(
        &Template::PostDetail {
            post,
            author_post_count,
            comments,
            form: CommentForm::default().view(&FormErrors::default()),
            can_edit,
        },
        viewer.as_ref(),
    ))
}

async fn render_post_form(
    state: &AppState,
    viewer: &CurrentUser,
    form: &PostForm,
    errors: &FormErrors,
    existing: Option<&Post>,
) -> Result<HttpResponse> {
    let groups = state.posts().groups().await?;
    let current_image = existing.and_then(|post| post.image.as_deref());

    Ok(render_page(
        &Template::PostForm {
            form: form.view(&groups, current_image, errors),
            post_id: existing.map(|post| post.id),
        },
        Some(viewer),
    ))
}

/// Empty create form
pub async fn post_create_form(
    state: web::Data<AppState>,
    viewer: CurrentUser,
) -> Result<HttpResponse> {
    render_post_form(&state, &viewer, &PostForm::default(), &FormErrors::default(), None).await
}

/// Create a post and go to the author's profile
pub async fn post_create(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let submission =
        read_post_submission(payload, state.config.media.max_upload_bytes).await?;

    match state.posts().create_post(viewer.id, &submission).await? {
        PostFormOutcome::Saved(_) => Ok(redirect(&profile_url(&viewer.username))),
        PostFormOutcome::Invalid { form, errors } => {
            render_post_form(&state, &viewer, &form, &errors, None).await
        }
    }
}

/// Edit form, pre-filled; other users are sent back to the post
pub async fn post_edit_form(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = state.posts().get_post(*post_id).await?;
    if !can_edit_post(Some(&viewer), &post) {
        return Ok(redirect(&post_url(post.id)));
    }

    render_post_form(
        &state,
        &viewer,
        &PostForm::from_post(&post),
        &FormErrors::default(),
        Some(&post),
    )
    .await
}

/// Save an edited post and go back to it
pub async fn post_edit(
    state: web::Data<AppState>,
    viewer: CurrentUser,
    post_id: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let posts = state.posts();
    let post = posts.get_post(*post_id).await?;
    if !can_edit_post(Some(&viewer), &post) {
        tracing::warn!(post_id = post.id, user_id = viewer.id, "edit by non-author refused");
        return Ok(redirect(&post_url(post.id)));
    }

    let submission =
        read_post_submission(payload, state.config.media.max_upload_bytes).await?;

    match posts.update_post(&post, &submission).await? {
        PostFormOutcome::Saved(saved) => Ok(redirect(&post_url(saved.id))),
        PostFormOutcome::Invalid { form, errors } => {
            render_post_form(&state, &viewer, &form, &errors, Some(&post)).await
        }
    }
}
