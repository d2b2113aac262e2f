use async_trait::async_trait;
use shared::domain::{Comment, CommentId, NewComment, Post, PostId, User, UserId};

pub mod comment_form;
pub mod comments;
pub mod config;
pub mod error;
mod generation;
pub mod posts;
pub mod selection;
pub mod session;
pub mod transport;
pub mod users;

pub use comment_form::{CommentForm, SubmitRejected};
pub use comments::CommentsView;
pub use error::{ClientError, ClientResult};
pub use generation::Ticket;
pub use posts::PostsView;
pub use selection::{Selection, UserSelector};
pub use session::{Followup, Session, SessionEvent, SessionSnapshot};
pub use transport::HttpResourceClient;
pub use users::UsersView;

/// Remote users/posts/comments resource.
///
/// Implementations report an explicit `{ "error": .. }` body the same way as a
/// transport failure, so callers only ever see `Ok` data or a `ClientError`.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn list_users(&self) -> ClientResult<Vec<User>>;
    async fn list_posts(&self, user_id: UserId) -> ClientResult<Vec<Post>>;
    async fn list_comments(&self, post_id: PostId) -> ClientResult<Vec<Comment>>;
    async fn create_comment(&self, comment: &NewComment) -> ClientResult<Comment>;
    async fn delete_comment(&self, comment_id: CommentId) -> ClientResult<()>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
