/// Account service - signup, password hashing and credential checks
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::forms::{FormErrors, LoginForm, SignupForm};
use crate::models::User;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(rand::thread_rng());
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal("Failed to hash password".to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            warn!("stored password hash is not a PHC string");
            false
        }
    }
}

#[derive(Clone)]
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a user from a signup form.
    ///
    /// The inner `Err` carries the form errors to show (invalid input or a
    /// taken username).
    pub async fn signup(&self, form: &SignupForm) -> Result<std::result::Result<User, FormErrors>> {
        let form = match form.cleaned() {
            Ok(form) => form,
            Err(errors) => return Ok(Err(errors)),
        };

        if user_repo::username_exists(&self.pool, &form.username).await? {
            let mut errors = FormErrors::default();
            errors.add("username", "Пользователь с таким именем уже существует.");
            return Ok(Err(errors));
        }

        let password_hash = hash_password(&form.password1)?;
        let user = match user_repo::create_user(
            &self.pool,
            &form.username,
            &form.first_name,
            &form.last_name,
            &password_hash,
        )
        .await
        {
            Ok(user) => user,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let mut errors = FormErrors::default();
                errors.add("username", "Пользователь с таким именем уже существует.");
                return Ok(Err(errors));
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id = user.id, username = %user.username, "user signed up");
        Ok(Ok(user))
    }

    /// Check login credentials; `Err` holds the form errors to re-render.
    pub async fn authenticate(&self, form: &LoginForm) -> Result<std::result::Result<User, FormErrors>> {
        let form = match form.cleaned() {
            Ok(form) => form,
            Err(errors) => return Ok(Err(errors)),
        };

        let user = user_repo::find_by_username(&self.pool, &form.username).await?;
        match user {
            Some(user) if verify_password(&form.password, &user.password_hash) => {
                info!(user_id = user.id, "user logged in");
                Ok(Ok(user))
            }
            _ => {
                warn!(username = %form.username, "rejected login");
                let mut errors = FormErrors::default();
                errors.add_non_field(
                    "Пожалуйста, введите правильные имя пользователя и пароль. Оба поля могут быть чувствительны к регистру.",
                );
                Ok(Err(errors))
            }
        }
    }
}
