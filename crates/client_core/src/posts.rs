use shared::{
    domain::{Post, PostId, UserId},
    error::ViewError,
};

use crate::{
    error::ClientResult,
    generation::{Generation, Ticket},
};

/// Exactly one of these is shown in the posts panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostsView {
    /// No user selected.
    #[default]
    Idle,
    Loading,
    Error(ViewError),
    Empty(ViewError),
    Ready(Vec<Post>),
}

impl PostsView {
    pub fn active_error(&self) -> Option<ViewError> {
        match self {
            Self::Error(kind) | Self::Empty(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        match self {
            Self::Ready(posts) => posts,
            _ => &[],
        }
    }
}

#[derive(Debug, Default)]
pub struct PostsMachine {
    view: PostsView,
    user: Option<UserId>,
    generation: Generation,
}

impl PostsMachine {
    pub fn view(&self) -> &PostsView {
        &self.view
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// Drops whatever was loaded for the previous user and starts loading for
    /// `user_id`.
    pub fn begin(&mut self, user_id: UserId) -> Ticket {
        self.user = Some(user_id);
        self.view = PostsView::Loading;
        self.generation.advance()
    }

    /// Back to `Idle`; any request still in flight becomes stale.
    pub fn reset(&mut self) {
        self.user = None;
        self.view = PostsView::Idle;
        self.generation.advance();
    }

    pub fn resolve(&mut self, ticket: Ticket, result: ClientResult<Vec<Post>>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.view = match result {
            Ok(posts) if posts.is_empty() => PostsView::Empty(ViewError::NoPosts),
            Ok(posts) => PostsView::Ready(posts),
            Err(_) => PostsView::Error(ViewError::PostsLoadFailed),
        };
        true
    }

    pub fn find(&self, post_id: PostId) -> Option<&Post> {
        self.view.posts().iter().find(|post| post.id == post_id)
    }
}

#[cfg(test)]
#[path = "tests/posts_tests.rs"]
mod tests;
