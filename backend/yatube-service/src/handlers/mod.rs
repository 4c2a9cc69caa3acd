/// HTTP handlers for the Yatube pages
///
/// - posts: listings, post detail, create and edit
/// - comments: adding comments to a post
/// - follow: subscriptions and the follow feed
/// - auth: signup, login, logout
/// - site: custom 404, health check, uploaded media
pub mod auth;
pub mod comments;
pub mod site;
pub mod follow;
pub mod posts;

use actix_web::{http::header, HttpResponse};

/// 302 to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub(crate) fn post_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_ascii() {
        assert_eq!(profile_url("TestUser"), "/profile/TestUser/");
        assert_eq!(profile_url("Лев"), "/profile/%D0%9B%D0%B5%D0%B2/");
        assert_eq!(post_url(3), "/posts/3/");
    }

    #[test]
    fn redirect_sets_location() {
        let resp = redirect("/posts/3/");
        assert_eq!(resp.status(), actix_web::http::StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/posts/3/");
    }
}
