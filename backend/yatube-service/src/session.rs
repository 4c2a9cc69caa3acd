//! Signed session tokens carried in the `sessionid` cookie.
//!
//! A session is an HS256 JWT whose subject is the user id; the username is
//! embedded so pages can render the navigation without a lookup.
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::{AppError, Result};
use crate::models::User;

pub const SESSION_COOKIE: &str = "sessionid";

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i64,
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Key material and cookie policy, shared by the middleware and the login handlers.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure: bool,
}

impl SessionKeys {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            inner: Arc::new(SessionKeysInner {
                encoding: EncodingKey::from_secret(config.secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.secret.as_bytes()),
                ttl: Duration::hours(config.ttl_hours.max(1)),
                secure: config.cookie_secure,
            }),
        }
    }

    /// Sign a session token for `user`.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + self.inner.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.inner.encoding)
            .map_err(|e| AppError::Session(format!("Failed to sign session: {}", e)))
    }

    /// Validate signature and expiry of a session token.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(JWT_ALGORITHM);
        decode::<Claims>(token, &self.inner.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Session(format!("Invalid session: {}", e)))
    }

    /// Cookie that logs `user` in.
    pub fn login_cookie(&self, user: &User) -> Result<Cookie<'static>> {
        let token = self.issue(user)?;
        Ok(Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.inner.secure)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(self.inner.ttl.num_seconds()))
            .finish())
    }

    /// Cookie that overwrites and expires the session.
    pub fn logout_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.inner.secure)
            .same_site(SameSite::Lax)
            .finish();
        cookie.make_removal();
        cookie
    }
}
