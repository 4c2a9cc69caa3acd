/// Business logic layer
///
/// Services own the rules (pagination, ownership, idempotent follows, form
/// validation against stored data) and call into the `db` repositories.
pub mod accounts;
pub mod comments;
pub mod follow;
pub mod posts;

pub use accounts::AccountService;
pub use comments::CommentService;
pub use follow::FollowService;
pub use posts::{PostFormOutcome, PostService};
