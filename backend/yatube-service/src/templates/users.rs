use super::{escape_html, form_fields};
use crate::forms::FormView;

pub(super) fn signup(form: &FormView) -> String {
    format!(
        r#"<div class="card"><div class="card-header">Зарегистрироваться</div><div class="card-body"><form method="post" action="/auth/signup/">{}<button type="submit" class="btn btn-primary">Зарегистрироваться</button></form></div></div>"#,
        form_fields(form)
    )
}

pub(super) fn login(form: &FormView, next: Option<&str>) -> String {
    let next_input = next
        .map(|n| format!(r#"<input type="hidden" name="next" value="{}">"#, escape_html(n)))
        .unwrap_or_default();

    format!(
        r#"<div class="card"><div class="card-header">Войти на сайт</div><div class="card-body"><form method="post" action="/auth/login/">{next_input}{fields}<button type="submit" class="btn btn-primary">Войти</button></form></div></div>"#,
        fields = form_fields(form)
    )
}

pub(super) fn logged_out() -> String {
    r#"<div class="card"><div class="card-header">Выход</div><div class="card-body"><p>Вы вышли из своей учётной записи. Ждём вас снова!</p><a href="/auth/login/">Войти снова</a></div></div>"#
        .to_string()
}
