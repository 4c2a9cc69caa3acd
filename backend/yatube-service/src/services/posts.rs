/// Post service - listings, post lookup, creation and editing
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::post_repo::{self, PostFilter};
use crate::db::{group_repo, user_repo};
use crate::error::{AppError, Result};
use crate::forms::{FormErrors, PostForm, PostSubmission};
use crate::media::{validate_image, MediaStorage};
use crate::metrics::record_write;
use crate::models::{Group, Post, PostDraft, User};
use crate::pagination::{Page, Paginator};

/// Result of a create/edit submission.
#[derive(Debug)]
pub enum PostFormOutcome {
    Saved(Post),
    /// The form to re-render with its errors; nothing was stored.
    Invalid { form: PostForm, errors: FormErrors },
}

#[derive(Clone)]
pub struct PostService {
    pool: SqlitePool,
    media: MediaStorage,
    per_page: usize,
}

impl PostService {
    pub fn new(pool: SqlitePool, media: MediaStorage, per_page: usize) -> Self {
        Self {
            pool,
            media,
            per_page,
        }
    }

    /// One page of the posts matching `filter`, newest first
    pub async fn list(&self, filter: PostFilter, raw_page: Option<&str>) -> Result<Page<Post>> {
        let total = post_repo::count_posts(&self.pool, filter).await?;
        let paginator = Paginator::new(self.per_page, total.max(0) as usize);
        let number = paginator.page_number(raw_page);

        let posts = post_repo::find_posts(
            &self.pool,
            filter,
            paginator.per_page() as i64,
            paginator.offset(number) as i64,
        )
        .await?;

        Ok(paginator.page(number, posts))
    }

    pub async fn group_page(&self, slug: &str, raw_page: Option<&str>) -> Result<(Group, Page<Post>)> {
        let group = group_repo::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("/group/{}/", slug)))?;
        let page = self.list(PostFilter::Group(group.id), raw_page).await?;
        Ok((group, page))
    }

    pub async fn profile_page(
        &self,
        username: &str,
        raw_page: Option<&str>,
    ) -> Result<(User, Page<Post>)> {
        let author = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("/profile/{}/", username)))?;
        let page = self.list(PostFilter::Author(author.id), raw_page).await?;
        Ok((author, page))
    }

    /// Get a post by ID
    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("/posts/{}/", post_id)))
    }

    pub async fn count_by_author(&self, author_id: i64) -> Result<i64> {
        Ok(post_repo::count_posts(&self.pool, PostFilter::Author(author_id)).await?)
    }

    /// Groups offered by the post form
    pub async fn groups(&self) -> Result<Vec<Group>> {
        Ok(group_repo::list_groups(&self.pool).await?)
    }

    /// Create a post owned by `author_id` from a submitted form
    pub async fn create_post(
        &self,
        author_id: i64,
        submission: &PostSubmission,
    ) -> Result<PostFormOutcome> {
        let (form, image) = match self.clean(submission, None).await? {
            Ok(cleaned) => cleaned,
            Err(invalid) => return Ok(invalid),
        };

        let draft = PostDraft {
            text: form.text,
            group_id: form.group,
            image,
        };
        let post = post_repo::create_post(&self.pool, author_id, &draft).await?;

        record_write("post_created");
        info!(post_id = post.id, author_id, "post created");
        Ok(PostFormOutcome::Saved(post))
    }

    /// Apply a submitted form to an existing post. Ownership is checked by the caller.
    pub async fn update_post(&self, post: &Post, submission: &PostSubmission) -> Result<PostFormOutcome> {
        let (form, image) = match self.clean(submission, Some(post)).await? {
            Ok(cleaned) => cleaned,
            Err(invalid) => return Ok(invalid),
        };

        let draft = PostDraft {
            text: form.text,
            group_id: form.group,
            image,
        };
        if !post_repo::update_post(&self.pool, post.id, &draft).await? {
            return Err(AppError::not_found(format!("/posts/{}/", post.id)));
        }

        record_write("post_edited");
        info!(post_id = post.id, "post edited");
        self.get_post(post.id).await.map(PostFormOutcome::Saved)
    }

    /// Validate a submission against stored groups and store its image.
    ///
    /// `Ok(Err(..))` is an invalid form; the image is only written once
    /// every field is valid.
    async fn clean(
        &self,
        submission: &PostSubmission,
        existing: Option<&Post>,
    ) -> Result<std::result::Result<(PostForm, Option<String>), PostFormOutcome>> {
        let (form, mut errors) = match PostForm::from_submission(submission) {
            Ok(form) => (form, FormErrors::default()),
            Err(errors) => (
                PostForm {
                    text: submission.text.clone(),
                    group: submission
                        .group
                        .as_deref()
                        .and_then(|g| g.trim().parse().ok()),
                },
                errors,
            ),
        };

        if let Some(group_id) = form.group {
            if group_repo::find_by_id(&self.pool, group_id).await?.is_none() {
                errors.add(
                    "group",
                    "Выберите корректный вариант. Вашего варианта нет среди допустимых значений.",
                );
            }
        }

        if let Some(upload) = &submission.image {
            if let Err(message) = validate_image(upload) {
                errors.add("image", message);
            }
        }

        if !errors.is_empty() {
            warn!(?errors, "rejected post form");
            return Ok(Err(PostFormOutcome::Invalid { form, errors }));
        }

        let image = match &submission.image {
            Some(upload) => Some(self.media.save_post_image(upload).await?),
            None if submission.clear_image => None,
            None => existing.and_then(|post| post.image.clone()),
        };

        Ok(Ok((form, image)))
    }
}
