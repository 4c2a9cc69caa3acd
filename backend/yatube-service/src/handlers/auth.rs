/// Account handlers - signup, login and logout pages
use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::forms::{FormErrors, LoginForm, SignupForm};
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::templates::{render_page, Template};

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Only local paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path
        }
        _ => "/",
    }
}

pub async fn signup_form(viewer: Option<CurrentUser>) -> HttpResponse {
    render_page(
        &Template::Signup {
            form: SignupForm::default().view(&FormErrors::default()),
        },
        viewer.as_ref(),
    )
}

/// Create an account, log it in and go to the main page
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse> {
    match state.accounts().signup(&form).await? {
        Ok(user) => {
            let cookie = state.sessions.login_cookie(&user)?;
            Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, "/"))
                .cookie(cookie)
                .finish())
        }
        Err(errors) => Ok(render_page(
            &Template::Signup {
                form: form.view(&errors),
            },
            None,
        )),
    }
}

pub async fn login_form(
    viewer: Option<CurrentUser>,
    query: web::Query<NextQuery>,
) -> HttpResponse {
    render_page(
        &Template::Login {
            form: LoginForm::default().view(&FormErrors::default()),
            next: query.into_inner().next,
        },
        viewer.as_ref(),
    )
}

/// Check credentials, set the session cookie and follow `next`
pub async fn login(
    state: web::Data<AppState>,
    query: web::Query<NextQuery>,
    request: web::Form<LoginRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    let next = request.next.or_else(|| query.into_inner().next);
    let form = LoginForm {
        username: request.username,
        password: request.password,
    };

    match state.accounts().authenticate(&form).await? {
        Ok(user) => {
            let cookie = state.sessions.login_cookie(&user)?;
            Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, safe_next(next.as_deref())))
                .cookie(cookie)
                .finish())
        }
        Err(errors) => Ok(render_page(
            &Template::Login {
                form: form.view(&errors),
                next,
            },
            None,
        )),
    }
}

/// Drop the session cookie
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut response = render_page(&Template::LoggedOut, None);
    if let Err(e) = response.add_cookie(&state.sessions.logout_cookie()) {
        tracing::error!(error = %e, "failed to clear session cookie");
    }
    response
}
