use super::escape_html;

pub(super) fn not_found(path: &str) -> String {
    format!(
        r#"<h1>Custom 404</h1><p>Страницы с адресом <code>{}</code> не существует</p><a href="/">Идите на главную</a>"#,
        escape_html(path)
    )
}

pub(super) fn server_error() -> String {
    r#"<h1>Custom 500</h1><p>Что-то пошло не так. Мы уже разбираемся.</p><a href="/">Идите на главную</a>"#
        .to_string()
}
