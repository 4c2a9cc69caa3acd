#![allow(dead_code)]

use actix_web::cookie::Cookie;
use tempfile::TempDir;

use yatube_service::config::Config;
use yatube_service::db::{group_repo, post_repo, user_repo};
use yatube_service::models::{Group, Post, PostDraft, User};
use yatube_service::AppState;

/// Smallest valid GIF, used as an uploaded image.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

pub const BOUNDARY: &str = "yatube-test-boundary";

/// State over a fresh in-memory database; the media root lives as long as the context.
pub struct TestContext {
    pub state: AppState,
    pub media: TempDir,
}

pub async fn setup() -> TestContext {
    let media = tempfile::tempdir().expect("media dir");
    let config = Config::for_tests(media.path());
    let state = AppState::connect(config).await.expect("test state");
    TestContext { state, media }
}

/// App with the real routes and session middleware.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .wrap(yatube_service::SessionAuth::new($state.sessions.clone()))
                .configure(yatube_service::routes::configure),
        )
        .await
    };
}

/// User without a usable password; log in with [`session_cookie`].
pub async fn create_user(state: &AppState, username: &str) -> User {
    user_repo::create_user(&state.db, username, "", "", "!")
        .await
        .expect("create user")
}

pub async fn create_group(state: &AppState, title: &str, slug: &str) -> Group {
    group_repo::create_group(&state.db, title, slug, "Тестовое описание")
        .await
        .expect("create group")
}

pub async fn create_post(
    state: &AppState,
    author: &User,
    text: &str,
    group: Option<&Group>,
) -> Post {
    let draft = PostDraft {
        text: text.to_string(),
        group_id: group.map(|g| g.id),
        image: None,
    };
    post_repo::create_post(&state.db, author.id, &draft)
        .await
        .expect("create post")
}

/// Session cookie of a logged-in `user`.
pub fn session_cookie(state: &AppState, user: &User) -> Cookie<'static> {
    state.sessions.login_cookie(user).expect("session cookie")
}

/// Template name announced by a rendered page.
pub fn template_name(html: &str) -> Option<&str> {
    let marker = r#"<meta name="template" content=""#;
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(&html[start..start + end])
}

/// Number of post cards on a listing page.
pub fn post_cards(html: &str) -> usize {
    html.matches(r#"<article class="post""#).count()
}

/// A `multipart/form-data` body with text fields and an optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/gif\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
