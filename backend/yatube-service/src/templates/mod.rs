//! Server-side HTML rendering.
//!
//! Every page is a [`Template`] variant carrying its typed context. Pages
//! share one layout and announce their template name in
//! `<meta name="template">`.

mod errors;
mod posts;
mod users;

use actix_web::{http::StatusCode, HttpResponse};
use std::fmt::Write;

use crate::config::MEDIA_URL;
use crate::forms::{FieldKind, FormField, FormView};
use crate::middleware::CurrentUser;
use crate::models::{Comment, Group, Post, User};
use crate::pagination::Page;

const CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Clone)]
pub enum Template {
    Index {
        page_obj: Page<Post>,
    },
    GroupList {
        group: Group,
        page_obj: Page<Post>,
    },
    Profile {
        author: User,
        page_obj: Page<Post>,
        post_count: i64,
        following: bool,
    },
    PostDetail {
        post: Post,
        author_post_count: i64,
        comments: Vec<Comment>,
        form: FormView,
        can_edit: bool,
    },
    /// Create form when `post_id` is `None`, edit form otherwise.
    PostForm {
        form: FormView,
        post_id: Option<i64>,
    },
    Follow {
        page_obj: Page<Post>,
    },
    Signup {
        form: FormView,
    },
    Login {
        form: FormView,
        next: Option<String>,
    },
    LoggedOut,
    NotFound {
        path: String,
    },
    ServerError,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Index { .. } => "posts/index.html",
            Template::GroupList { .. } => "posts/group_list.html",
            Template::Profile { .. } => "posts/profile.html",
            Template::PostDetail { .. } => "posts/post_detail.html",
            Template::PostForm { .. } => "posts/create_post.html",
            Template::Follow { .. } => "posts/follow.html",
            Template::Signup { .. } => "users/signup.html",
            Template::Login { .. } => "users/login.html",
            Template::LoggedOut => "users/logged_out.html",
            Template::NotFound { .. } => "core/404.html",
            Template::ServerError => "core/500.html",
        }
    }

    fn title(&self) -> String {
        match self {
            Template::Index { .. } => "Последние обновления на сайте".to_string(),
            Template::GroupList { group, .. } => format!("Записи сообщества {}", group.title),
            Template::Profile { author, .. } => {
                format!("Профайл пользователя {}", author.display_name())
            }
            Template::PostDetail { post, .. } => {
                format!("Пост {}", truncate_chars(&post.text, 30))
            }
            Template::PostForm { post_id: None, .. } => "Новый пост".to_string(),
            Template::PostForm { post_id: Some(_), .. } => "Редактировать пост".to_string(),
            Template::Follow { .. } => "Подписки".to_string(),
            Template::Signup { .. } => "Зарегистрироваться".to_string(),
            Template::Login { .. } => "Войти".to_string(),
            Template::LoggedOut => "Вы вышли из системы".to_string(),
            Template::NotFound { .. } => "Страница не найдена".to_string(),
            Template::ServerError => "Ошибка сервера".to_string(),
        }
    }

    /// Full HTML document as seen by `viewer`.
    pub fn render(&self, viewer: Option<&CurrentUser>) -> String {
        let content = match self {
            Template::Index { page_obj } => posts::index(page_obj),
            Template::GroupList { group, page_obj } => posts::group_list(group, page_obj),
            Template::Profile {
                author,
                page_obj,
                post_count,
                following,
            } => posts::profile(viewer, author, page_obj, *post_count, *following),
            Template::PostDetail {
                post,
                author_post_count,
                comments,
                form,
                can_edit,
            } => posts::post_detail(viewer, post, *author_post_count, comments, form, *can_edit),
            Template::PostForm { form, post_id } => posts::post_form(form, *post_id),
            Template::Follow { page_obj } => posts::follow(page_obj),
            Template::Signup { form } => users::signup(form),
            Template::Login { form, next } => users::login(form, next.as_deref()),
            Template::LoggedOut => users::logged_out(),
            Template::NotFound { path } => errors::not_found(path),
            Template::ServerError => errors::server_error(),
        };

        layout(self.name(), &self.title(), viewer, &content)
    }
}

/// 200 response with the page rendered for `viewer`.
pub fn render_page(template: &Template, viewer: Option<&CurrentUser>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(CONTENT_TYPE)
        .body(template.render(viewer))
}

/// Anonymous rendering with an explicit status (error pages).
pub fn render_with_status(status: StatusCode, template: &Template) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(CONTENT_TYPE)
        .body(template.render(None))
}

/// Raw body response, used to replay cached pages.
pub fn html_response(body: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().content_type(CONTENT_TYPE).body(body.into())
}

fn layout(name: &str, title: &str, viewer: Option<&CurrentUser>, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="template" content="{name}">
<title>{title}</title>
</head>
<body>
<header>
{nav}
</header>
<main class="container py-5">
{content}
</main>
<footer class="border-top text-center py-3">
<p>&copy; Yatube</p>
</footer>
</body>
</html>
"#,
        name = name,
        title = escape_html(title),
        nav = navigation(viewer),
        content = content,
    )
}

fn navigation(viewer: Option<&CurrentUser>) -> String {
    let mut nav = String::from(r#"<nav class="navbar"><a class="navbar-brand" href="/">Yatube</a><ul class="nav">"#);
    nav.push_str(r#"<li><a href="/">Главная</a></li>"#);
    match viewer {
        Some(user) => {
            nav.push_str(r#"<li><a href="/follow/">Подписки</a></li>"#);
            nav.push_str(r#"<li><a href="/create/">Новая запись</a></li>"#);
            let _ = write!(
                nav,
                r#"<li><a href="/profile/{0}/">Пользователь: {0}</a></li>"#,
                escape_html(&user.username)
            );
            nav.push_str(r#"<li><a href="/auth/logout/">Выйти</a></li>"#);
        }
        None => {
            nav.push_str(r#"<li><a href="/auth/login/">Войти</a></li>"#);
            nav.push_str(r#"<li><a href="/auth/signup/">Регистрация</a></li>"#);
        }
    }
    nav.push_str("</ul></nav>");
    nav
}

// =====================================================================
// Shared fragments
// =====================================================================

/// Escape text for use in element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text with newlines turned into `<br>`.
fn linebreaks(raw: &str) -> String {
    escape_html(raw).replace("\r\n", "\n").replace('\n', "<br>\n")
}

fn truncate_chars(raw: &str, max: usize) -> String {
    match raw.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &raw[..idx]),
        None => raw.to_string(),
    }
}

fn media_url(relative: &str) -> String {
    format!("{}{}", MEDIA_URL, escape_html(relative))
}

/// Page navigation links; nothing for a single page.
fn paginator<T>(page: &Page<T>) -> String {
    if page.num_pages <= 1 {
        return String::new();
    }

    let mut out = String::from(r#"<nav class="pagination my-5"><ul>"#);
    if let Some(prev) = page.previous_page_number() {
        out.push_str(r#"<li><a href="?page=1">Первая</a></li>"#);
        let _ = write!(out, r#"<li><a href="?page={prev}">Предыдущая</a></li>"#);
    }
    for number in 1..=page.num_pages {
        if number == page.number {
            let _ = write!(out, r#"<li class="active"><span>{number}</span></li>"#);
        } else {
            let _ = write!(out, r#"<li><a href="?page={number}">{number}</a></li>"#);
        }
    }
    if let Some(next) = page.next_page_number() {
        let _ = write!(out, r#"<li><a href="?page={next}">Следующая</a></li>"#);
        let _ = write!(
            out,
            r#"<li><a href="?page={}">Последняя</a></li>"#,
            page.num_pages
        );
    }
    out.push_str("</ul></nav>");
    out
}

fn error_list(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<ul class="errorlist">"#);
    for error in errors {
        let _ = write!(out, "<li>{}</li>", escape_html(error));
    }
    out.push_str("</ul>");
    out
}

/// Every field of a form with its label, widget, help text and errors.
fn form_fields(form: &FormView) -> String {
    let mut out = error_list(&form.non_field_errors);
    for field in &form.fields {
        out.push_str(&form_field(field));
    }
    out
}

fn form_field(field: &FormField) -> String {
    let id = format!("id_{}", field.name);
    let required = if field.required { " required" } else { "" };
    let marker = if field.required {
        r#"<span class="required text-danger">*</span>"#
    } else {
        ""
    };

    let widget = match &field.kind {
        FieldKind::Char { multiline: true } => format!(
            r#"<textarea name="{name}" cols="40" rows="10" class="form-control" id="{id}"{required}>{value}</textarea>"#,
            name = field.name,
            value = escape_html(&field.value),
        ),
        FieldKind::Char { multiline: false } => format!(
            r#"<input type="text" name="{name}" class="form-control" id="{id}" value="{value}"{required}>"#,
            name = field.name,
            value = escape_html(&field.value),
        ),
        FieldKind::Password => format!(
            r#"<input type="password" name="{name}" class="form-control" id="{id}"{required}>"#,
            name = field.name,
        ),
        FieldKind::Choice { choices } => {
            let mut select = format!(
                r#"<select name="{name}" class="form-control" id="{id}"{required}>"#,
                name = field.name
            );
            for (value, label) in choices {
                let selected = if *value == field.value { " selected" } else { "" };
                let _ = write!(
                    select,
                    r#"<option value="{}"{}>{}</option>"#,
                    escape_html(value),
                    selected,
                    escape_html(label)
                );
            }
            select.push_str("</select>");
            select
        }
        FieldKind::Image => {
            let mut widget = String::new();
            if !field.value.is_empty() {
                let _ = write!(
                    widget,
                    r#"На данный момент: <a href="{url}">{value}</a> <input type="checkbox" name="{name}-clear" id="{name}-clear_id"> <label for="{name}-clear_id">Очистить</label><br>Изменить: "#,
                    url = media_url(&field.value),
                    value = escape_html(&field.value),
                    name = field.name,
                );
            }
            let _ = write!(
                widget,
                r#"<input type="file" name="{name}" accept="image/*" class="form-control" id="{id}">"#,
                name = field.name
            );
            widget
        }
    };

    let help = if field.help_text.is_empty() {
        String::new()
    } else {
        format!(
            r#"<small id="{id}-help" class="form-text text-muted">{}</small>"#,
            escape_html(field.help_text)
        )
    };

    format!(
        r#"<div class="form-group row my-3"><label for="{id}">{label}{marker}</label>{widget}{help}{errors}</div>"#,
        label = escape_html(field.label),
        errors = error_list(&field.errors),
    )
}
