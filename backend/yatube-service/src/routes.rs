/// URL map of the site, shared by the binary and the integration tests.
use actix_web::web;

use crate::error::AppError;
use crate::handlers::{auth, comments, follow, posts, site};
use crate::metrics;

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Ids that match the route but do not parse (e.g. overflow i64) are missing pages
    cfg.app_data(web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(error = %err, path = req.path(), "unparsable path segment");
        AppError::not_found(req.path()).into()
    }));

    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route(
            "/profile/{username}/follow/",
            web::get().to(follow::profile_follow),
        )
        .route(
            "/profile/{username}/unfollow/",
            web::get().to(follow::profile_unfollow),
        )
        .route("/follow/", web::get().to(follow::follow_index))
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::post_create_form))
                .route(web::post().to(posts::post_create)),
        )
        .route(r"/posts/{post_id:\d+}/", web::get().to(posts::post_detail))
        .service(
            web::resource(r"/posts/{post_id:\d+}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .service(
            web::resource([r"/posts/{post_id:\d+}/comment", r"/posts/{post_id:\d+}/comment/"])
                .route(web::get().to(comments::comment_redirect))
                .route(web::post().to(comments::add_comment)),
        )
        .service(
            web::scope("/auth")
                .service(
                    web::resource("/signup/")
                        .route(web::get().to(auth::signup_form))
                        .route(web::post().to(auth::signup)),
                )
                .service(
                    web::resource("/login/")
                        .route(web::get().to(auth::login_form))
                        .route(web::post().to(auth::login)),
                )
                .service(
                    web::resource("/logout/")
                        .route(web::get().to(auth::logout))
                        .route(web::post().to(auth::logout)),
                ),
        )
        .route("/health", web::get().to(site::health))
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/media/{path:.*}", web::get().to(site::media))
        .default_service(web::to(site::page_not_found));
}
