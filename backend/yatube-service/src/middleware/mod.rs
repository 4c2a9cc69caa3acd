/// HTTP middleware for the Yatube service
///
/// `SessionAuth` resolves the `sessionid` cookie into a [`CurrentUser`]
/// stored in the request extensions. It never rejects a request: pages that
/// need a user extract `CurrentUser`, which turns a missing session into a
/// redirect to the login page. Use `Option<CurrentUser>` where anonymous
/// access is fine.
pub mod permissions;

pub use permissions::*;

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use tracing::debug;

use crate::error::AppError;
use crate::session::{SessionKeys, SESSION_COOKIE};

// =====================================================================
// Session authentication
// =====================================================================

/// The logged-in user of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Actix middleware that validates the session cookie.
#[derive(Clone)]
pub struct SessionAuth {
    keys: SessionKeys,
}

impl SessionAuth {
    pub fn new(keys: SessionKeys) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        }))
    }
}

pub struct SessionAuthService<S> {
    service: Rc<S>,
    keys: SessionKeys,
}

impl<S, B> Service<ServiceRequest> for SessionAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if let Some(cookie) = req.cookie(SESSION_COOKIE) {
            match self.keys.verify(cookie.value()) {
                Ok(claims) => {
                    req.extensions_mut().insert(CurrentUser {
                        id: claims.sub,
                        username: claims.username,
                    });
                }
                Err(e) => debug!(error = %e, "ignoring session cookie"),
            }
        }

        Box::pin(async move { service.call(req).await })
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(current_user(req).ok_or_else(|| AppError::LoginRequired {
            next: request_path(req),
        }))
    }
}

/// Session user of a request, if any.
pub fn current_user(req: &HttpRequest) -> Option<CurrentUser> {
    req.extensions().get::<CurrentUser>().cloned()
}

/// Path plus query string, the value carried in `?next=`.
pub fn request_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}
