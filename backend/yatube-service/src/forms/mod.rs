//! Form definitions shared by handlers and templates.
//!
//! Each form validates with `validator` after trimming its inputs and can be
//! turned into a [`FormView`]: the list of fields (kind, current value,
//! errors) the templates render.

pub mod multipart;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use crate::models::{Group, Post};

pub use multipart::{read_post_submission, PostSubmission, UploadedFile};

/// Widget family of a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Free text; `multiline` renders a textarea
    Char { multiline: bool },
    /// Select box over `(value, label)` pairs
    Choice { choices: Vec<(String, String)> },
    Image,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub errors: Vec<String>,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            help_text: "",
            kind,
            required: false,
            value: String::new(),
            errors: Vec::new(),
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn help(mut self, help_text: &'static str) -> Self {
        self.help_text = help_text;
        self
    }

    fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Field-level and form-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn for_field(&self, field: &str) -> Vec<String> {
        self.fields.get(field).cloned().unwrap_or_default()
    }

    /// Non-empty errors as `Err`, otherwise `Ok(())`.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FormErrors::default();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(&field.to_string(), message);
            }
        }
        out
    }
}

/// Renderable form: its fields in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub fields: Vec<FormField>,
    pub non_field_errors: Vec<String>,
}

impl FormView {
    fn new(fields: Vec<FormField>, errors: &FormErrors) -> Self {
        let fields = fields
            .into_iter()
            .map(|mut field| {
                field.errors = errors.for_field(field.name);
                field
            })
            .collect();

        Self {
            fields,
            non_field_errors: errors.non_field.clone(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// =====================================================================
// Posts
// =====================================================================

/// Create/edit form of a post. The image travels separately as an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "Текст поста не может быть пустым"))]
    pub text: String,
    pub group: Option<i64>,
}

impl PostForm {
    /// Parse a multipart submission; a malformed group id is a field error.
    pub fn from_submission(submission: &PostSubmission) -> Result<Self, FormErrors> {
        let mut errors = FormErrors::default();
        let group = match submission.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.add("group", "Выберите корректный вариант.");
                    None
                }
            },
        };

        let form = PostForm {
            text: submission.text.trim().to_string(),
            group,
        };

        if let Err(validation) = form.validate() {
            for (field, messages) in FormErrors::from(validation).fields {
                for message in messages {
                    errors.add(&field, message);
                }
            }
        }

        errors.into_result().map(|_| form)
    }

    /// Form pre-filled from an existing post (edit page).
    pub fn from_post(post: &Post) -> Self {
        PostForm {
            text: post.text.clone(),
            group: post.group_id,
        }
    }

    pub fn view(&self, groups: &[Group], current_image: Option<&str>, errors: &FormErrors) -> FormView {
        let mut choices = vec![(String::new(), "---------".to_string())];
        choices.extend(groups.iter().map(|g| (g.id.to_string(), g.title.clone())));

        let group_value = self.group.map(|id| id.to_string()).unwrap_or_default();

        FormView::new(
            vec![
                FormField::new("text", "Текст поста", FieldKind::Char { multiline: true })
                    .required()
                    .help("Текст нового поста")
                    .value(self.text.clone()),
                FormField::new("group", "Группа", FieldKind::Choice { choices })
                    .help("Группа, к которой будет относиться пост")
                    .value(group_value),
                FormField::new("image", "Картинка", FieldKind::Image)
                    .help("Загрузите картинку")
                    .value(current_image.unwrap_or_default()),
            ],
            errors,
        )
    }
}

// =====================================================================
// Comments
// =====================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Комментарий должен содержать от 1 до 2000 символов"
    ))]
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn cleaned(&self) -> Result<CommentForm, FormErrors> {
        let form = CommentForm {
            text: self.text.trim().to_string(),
        };
        form.validate().map_err(FormErrors::from)?;
        Ok(form)
    }

    pub fn view(&self, errors: &FormErrors) -> FormView {
        FormView::new(
            vec![
                FormField::new("text", "Текст комментария", FieldKind::Char { multiline: true })
                    .required()
                    .value(self.text.clone()),
            ],
            errors,
        )
    }
}

// =====================================================================
// Accounts
// =====================================================================

pub const USERNAME_MAX_LEN: usize = 150;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 150, message = "Имя пользователя: от 1 до 150 символов"))]
    #[serde(default)]
    pub username: String,
    #[validate(length(max = 150, message = "Не более 150 символов"))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 150, message = "Не более 150 символов"))]
    #[serde(default)]
    pub last_name: String,
    #[validate(length(min = 8, message = "Пароль должен содержать не менее 8 символов"))]
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignupForm {
    pub fn cleaned(&self) -> Result<SignupForm, FormErrors> {
        let form = SignupForm {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
        };

        let mut errors = match form.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };
        if !form.username.is_empty() && !is_valid_username(&form.username) {
            errors.add(
                "username",
                "Допустимы только буквы, цифры и символы @/./+/-/_",
            );
        }
        if form.password1 != form.password2 {
            errors.add("password2", "Пароли не совпадают");
        }

        errors.into_result().map(|_| form)
    }

    pub fn view(&self, errors: &FormErrors) -> FormView {
        FormView::new(
            vec![
                FormField::new("first_name", "Имя", FieldKind::Char { multiline: false })
                    .value(self.first_name.clone()),
                FormField::new("last_name", "Фамилия", FieldKind::Char { multiline: false })
                    .value(self.last_name.clone()),
                FormField::new("username", "Имя пользователя", FieldKind::Char { multiline: false })
                    .required()
                    .help("Не более 150 символов. Только буквы, цифры и символы @/./+/-/_.")
                    .value(self.username.clone()),
                FormField::new("password1", "Пароль", FieldKind::Password).required(),
                FormField::new("password2", "Подтверждение пароля", FieldKind::Password).required(),
            ],
            errors,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Обязательное поле"))]
    #[serde(default)]
    pub username: String,
    #[validate(length(min = 1, message = "Обязательное поле"))]
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn cleaned(&self) -> Result<LoginForm, FormErrors> {
        let form = LoginForm {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };
        form.validate().map_err(FormErrors::from)?;
        Ok(form)
    }

    pub fn view(&self, errors: &FormErrors) -> FormView {
        FormView::new(
            vec![
                FormField::new("username", "Имя пользователя", FieldKind::Char { multiline: false })
                    .required()
                    .value(self.username.clone()),
                FormField::new("password", "Пароль", FieldKind::Password).required(),
            ],
            errors,
        )
    }
}

/// Letters, digits and `@.+-_`, at most [`USERNAME_MAX_LEN`] characters.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= USERNAME_MAX_LEN
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(text: &str, group: Option<&str>) -> PostSubmission {
        PostSubmission {
            text: text.to_string(),
            group: group.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn post_form_requires_text() {
        let errors = PostForm::from_submission(&submission("   ", None)).unwrap_err();
        assert_eq!(errors.for_field("text").len(), 1);
    }

    #[test]
    fn post_form_parses_optional_group() {
        let form = PostForm::from_submission(&submission(" hello ", Some(""))).unwrap();
        assert_eq!(form.text, "hello");
        assert_eq!(form.group, None);

        let form = PostForm::from_submission(&submission("hello", Some("7"))).unwrap();
        assert_eq!(form.group, Some(7));

        let errors = PostForm::from_submission(&submission("hello", Some("seven"))).unwrap_err();
        assert!(!errors.for_field("group").is_empty());
    }

    #[test]
    fn post_form_view_exposes_field_kinds() {
        let groups = vec![Group {
            id: 1,
            title: "Cats".into(),
            slug: "cats".into(),
            description: String::new(),
        }];
        let view = PostForm::default().view(&groups, None, &FormErrors::default());

        assert!(matches!(
            view.field("text").unwrap().kind,
            FieldKind::Char { multiline: true }
        ));
        match &view.field("group").unwrap().kind {
            FieldKind::Choice { choices } => {
                assert_eq!(choices.len(), 2);
                assert_eq!(choices[1], ("1".to_string(), "Cats".to_string()));
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(view.field("image").unwrap().kind, FieldKind::Image);
        assert!(view.field("text").unwrap().required);
        assert!(!view.field("group").unwrap().required);
    }

    #[test]
    fn comment_form_rejects_blank_text() {
        let form = CommentForm {
            text: "  \n ".to_string(),
        };
        assert!(form.cleaned().is_err());
        let form = CommentForm {
            text: " nice ".to_string(),
        };
        assert_eq!(form.cleaned().unwrap().text, "nice");
    }

    #[test]
    fn signup_form_checks_passwords_and_username() {
        let form = SignupForm {
            username: "bad name!".into(),
            password1: "password123".into(),
            password2: "password124".into(),
            ..Default::default()
        };
        let errors = form.cleaned().unwrap_err();
        assert!(!errors.for_field("username").is_empty());
        assert!(!errors.for_field("password2").is_empty());

        let form = SignupForm {
            username: "leo.tolstoy".into(),
            password1: "password123".into(),
            password2: "password123".into(),
            ..Default::default()
        };
        assert!(form.cleaned().is_ok());
    }

    #[test]
    fn signup_form_requires_long_password() {
        let form = SignupForm {
            username: "leo".into(),
            password1: "short".into(),
            password2: "short".into(),
            ..Default::default()
        };
        assert!(!form.cleaned().unwrap_err().for_field("password1").is_empty());
    }

    #[test]
    fn username_rules() {
        assert!(is_valid_username("user_1@mail.ru"));
        assert!(is_valid_username("Лев"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("with space"));
        assert!(!is_valid_username(&"a".repeat(151)));
    }

    #[test]
    fn form_view_attaches_errors_to_fields() {
        let mut errors = FormErrors::default();
        errors.add("text", "required");
        errors.add_non_field("oops");
        let view = CommentForm::default().view(&errors);
        assert_eq!(view.field("text").unwrap().errors, vec!["required".to_string()]);
        assert_eq!(view.non_field_errors, vec!["oops".to_string()]);
    }
}
