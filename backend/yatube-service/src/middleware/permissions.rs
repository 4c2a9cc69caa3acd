/// Authorization checks for content
///
/// Only the author of a post may edit it; everybody may read.
use super::CurrentUser;
use crate::models::Post;

/// Check if a user owns a post
pub fn is_post_author(user_id: i64, post: &Post) -> bool {
    post.author_id == user_id
}

/// Verify the (possibly anonymous) viewer may edit a post
pub fn can_edit_post(viewer: Option<&CurrentUser>, post: &Post) -> bool {
    viewer.map_or(false, |user| is_post_author(user.id, post))
}
