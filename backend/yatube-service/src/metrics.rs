//! Prometheus metrics for the Yatube service.
//!
//! Exposes page cache and content counters plus an HTTP handler for the
//! `/metrics` endpoint.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    /// Page cache events (hit/miss/store/clear).
    pub static ref PAGE_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "yatube_page_cache_events_total",
        "Page cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register yatube_page_cache_events_total");

    /// Content writes (post_created, post_edited, comment_created, follow, unfollow).
    pub static ref CONTENT_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "yatube_content_writes_total",
        "Content writes segmented by kind",
        &["kind"]
    )
    .expect("failed to register yatube_content_writes_total");
}

pub fn record_write(kind: &str) {
    CONTENT_WRITES_TOTAL.with_label_values(&[kind]).inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
