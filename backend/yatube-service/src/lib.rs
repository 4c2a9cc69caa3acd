/// Yatube Service Library
///
/// A blogging site: users publish posts, gather them in groups, comment on
/// them and follow other authors to get a personal feed. Pages are rendered
/// on the server.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers, one module per area
/// - `routes`: URL map
/// - `services`: Business logic layer
/// - `db`: Database access layer and repositories
/// - `models`: Rows for users, groups, posts, comments, follows
/// - `forms`: Form validation and field descriptors
/// - `templates`: HTML rendering
/// - `pagination`: Page-number pagination of listings
/// - `cache`: Rendered page cache
/// - `media`: Uploaded image storage
/// - `middleware`: Session authentication and permission checks
/// - `session`: Signed session cookies
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod media;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod templates;

pub use config::Config;
pub use error::{AppError, Result};
pub use middleware::SessionAuth;
pub use state::AppState;
