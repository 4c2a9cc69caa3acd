/// Site-wide handlers: custom 404, health check and uploaded media
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use image::ImageFormat;
use serde_json::json;
use tracing::warn;

use crate::db;
use crate::error::{AppError, Result};
use crate::middleware::current_user;
use crate::state::AppState;
use crate::templates::Template;

/// Fallback for every unknown URL
pub async fn page_not_found(req: HttpRequest) -> HttpResponse {
    let viewer = current_user(&req);
    HttpResponse::build(StatusCode::NOT_FOUND)
        .content_type("text/html; charset=utf-8")
        .body(
            Template::NotFound {
                path: req.path().to_string(),
            }
            .render(viewer.as_ref()),
        )
}

/// Liveness check
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match db::ping(&state.db).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Err(e) => {
            warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}

/// Serve a stored upload from the media root
pub async fn media(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let not_found = || AppError::not_found(req.path());
    let file = state.media.resolve(&path).ok_or_else(not_found)?;

    let bytes = match tokio::fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    let content_type = image::guess_format(&bytes)
        .map(mime_type)
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

fn mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Gif => "image/gif",
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        _ => "application/octet-stream",
    }
}
