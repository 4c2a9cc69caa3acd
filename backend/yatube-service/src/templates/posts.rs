use std::fmt::Write;

use super::{escape_html, form_fields, linebreaks, media_url, paginator};
use crate::forms::FormView;
use crate::middleware::CurrentUser;
use crate::models::{Comment, Group, Post, User};
use crate::pagination::Page;

const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// One post in a listing.
fn post_card(post: &Post, show_group: bool) -> String {
    let mut out = format!(r#"<article class="post" data-post-id="{}">"#, post.id);
    let _ = write!(
        out,
        r#"<ul><li>Автор: <a href="/profile/{author}/">{author}</a></li><li>Дата публикации: {date}</li></ul>"#,
        author = escape_html(&post.author_username),
        date = post.created_at.format(DATE_FORMAT),
    );
    if let Some(image) = &post.image {
        let _ = write!(
            out,
            r#"<img class="card-img my-2" src="{}" alt="">"#,
            media_url(image)
        );
    }
    let _ = write!(
        out,
        r#"<p>{}</p><a href="/posts/{}/">подробная информация</a>"#,
        linebreaks(&post.text),
        post.id
    );
    if show_group {
        if let (Some(slug), Some(title)) = (&post.group_slug, &post.group_title) {
            let _ = write!(
                out,
                r#"<br><a href="/group/{}/">все записи группы {}</a>"#,
                escape_html(slug),
                escape_html(title)
            );
        }
    }
    out.push_str("</article>");
    out
}

fn post_list(page_obj: &Page<Post>, show_group: bool) -> String {
    let mut out = String::new();
    for (i, post) in page_obj.iter().enumerate() {
        if i > 0 {
            out.push_str("<hr>");
        }
        out.push_str(&post_card(post, show_group));
    }
    out.push_str(&paginator(page_obj));
    out
}

pub(super) fn index(page_obj: &Page<Post>) -> String {
    format!(
        "<h1>Последние обновления на сайте</h1>\n{}",
        post_list(page_obj, true)
    )
}

pub(super) fn group_list(group: &Group, page_obj: &Page<Post>) -> String {
    format!(
        "<h1>{}</h1>\n<p>{}</p>\n{}",
        escape_html(&group.title),
        linebreaks(&group.description),
        post_list(page_obj, false)
    )
}

pub(super) fn follow(page_obj: &Page<Post>) -> String {
    let list = if page_obj.is_empty() {
        "<p>Вы пока ни на кого не подписаны или авторы ещё ничего не написали.</p>".to_string()
    } else {
        post_list(page_obj, true)
    };
    format!("<h1>Подписки</h1>\n{}", list)
}

pub(super) fn profile(
    viewer: Option<&CurrentUser>,
    author: &User,
    page_obj: &Page<Post>,
    post_count: i64,
    following: bool,
) -> String {
    let mut out = format!(
        r#"<div class="mb-5"><h1>Все посты пользователя {}</h1><h3>Всего постов: {}</h3>"#,
        escape_html(&author.display_name()),
        post_count
    );

    let is_self = viewer.map_or(false, |v| v.id == author.id);
    if viewer.is_some() && !is_self {
        let username = escape_html(&author.username);
        if following {
            let _ = write!(
                out,
                r#"<a class="btn btn-light" href="/profile/{username}/unfollow/" role="button">Отписаться</a>"#
            );
        } else {
            let _ = write!(
                out,
                r#"<a class="btn btn-primary" href="/profile/{username}/follow/" role="button">Подписаться</a>"#
            );
        }
    }
    out.push_str("</div>\n");
    out.push_str(&post_list(page_obj, true));
    out
}

pub(super) fn post_detail(
    viewer: Option<&CurrentUser>,
    post: &Post,
    author_post_count: i64,
    comments: &[Comment],
    form: &FormView,
    can_edit: bool,
) -> String {
    let author = escape_html(&post.author_username);
    let mut out = String::from(r#"<div class="row"><aside class="col-md-3"><ul>"#);
    let _ = write!(
        out,
        "<li>Дата публикации: {}</li>",
        post.created_at.format(DATE_FORMAT)
    );
    if let (Some(slug), Some(title)) = (&post.group_slug, &post.group_title) {
        let _ = write!(
            out,
            r#"<li>Группа: {} <a href="/group/{}/">все записи группы</a></li>"#,
            escape_html(title),
            escape_html(slug)
        );
    }
    let _ = write!(
        out,
        r#"<li>Автор: {author}</li><li>Всего постов автора: <span>{author_post_count}</span></li><li><a href="/profile/{author}/">все посты пользователя</a></li></ul></aside>"#
    );

    out.push_str(r#"<article class="col-md-9">"#);
    if let Some(image) = &post.image {
        let _ = write!(
            out,
            r#"<img class="card-img my-2" src="{}" alt="">"#,
            media_url(image)
        );
    }
    let _ = write!(out, "<p>{}</p>", linebreaks(&post.text));
    if can_edit {
        let _ = write!(
            out,
            r#"<a class="btn btn-primary" href="/posts/{}/edit/">редактировать запись</a>"#,
            post.id
        );
    }

    if viewer.is_some() {
        let _ = write!(
            out,
            r#"<div class="card my-4"><h5 class="card-header">Добавить комментарий:</h5><div class="card-body"><form method="post" action="/posts/{}/comment/">{}<button type="submit" class="btn btn-primary">Отправить</button></form></div></div>"#,
            post.id,
            form_fields(form)
        );
    }

    out.push_str(r#"<section class="comments">"#);
    for comment in comments {
        let _ = write!(
            out,
            r#"<div class="media mb-4" data-comment-id="{id}"><h5 class="mt-0"><a href="/profile/{author}/">{author}</a></h5><p>{text}</p></div>"#,
            id = comment.id,
            author = escape_html(&comment.author_username),
            text = linebreaks(&comment.text),
        );
    }
    out.push_str("</section></article></div>");
    out
}

pub(super) fn post_form(form: &FormView, post_id: Option<i64>) -> String {
    let (heading, action, button) = match post_id {
        Some(id) => (
            "Редактировать пост",
            format!("/posts/{}/edit/", id),
            "Сохранить",
        ),
        None => ("Новый пост", "/create/".to_string(), "Добавить"),
    };

    format!(
        r#"<div class="card"><div class="card-header">{heading}</div><div class="card-body"><form method="post" enctype="multipart/form-data" action="{action}">{fields}<div class="d-flex justify-content-end"><button type="submit" class="btn btn-primary">{button}</button></div></form></div></div>"#,
        fields = form_fields(form)
    )
}
