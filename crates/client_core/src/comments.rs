use shared::{
    domain::{Comment, CommentId, PostId},
    error::ViewError,
};

use crate::{
    error::ClientResult,
    generation::{Generation, Ticket},
};

/// Comments panel of the opened post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommentsView {
    /// No post is opened.
    #[default]
    Closed,
    Loading,
    Error(ViewError),
    Empty(ViewError),
    Ready {
        comments: Vec<Comment>,
        delete_error: Option<ViewError>,
    },
}

impl CommentsView {
    pub fn comments(&self) -> &[Comment] {
        match self {
            Self::Ready { comments, .. } => comments,
            _ => &[],
        }
    }

    pub fn active_error(&self) -> Option<ViewError> {
        match self {
            Self::Error(kind) | Self::Empty(kind) => Some(*kind),
            Self::Ready { delete_error, .. } => *delete_error,
            Self::Closed | Self::Loading => None,
        }
    }

    fn from_list(comments: Vec<Comment>, delete_error: Option<ViewError>) -> Self {
        if comments.is_empty() {
            Self::Empty(ViewError::NoComments)
        } else {
            Self::Ready {
                comments,
                delete_error,
            }
        }
    }
}

/// A comment already removed from the list whose server-side deletion has not
/// been confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    ticket: Ticket,
    comment: Comment,
}

impl PendingDelete {
    pub fn comment(&self) -> &Comment {
        &self.comment
    }
}

#[derive(Debug, Default)]
pub struct CommentsMachine {
    view: CommentsView,
    post: Option<PostId>,
    generation: Generation,
}

impl CommentsMachine {
    pub fn view(&self) -> &CommentsView {
        &self.view
    }

    pub fn post(&self) -> Option<PostId> {
        self.post
    }

    /// Ticket of the currently opened post, used to tie later appends to it.
    pub fn ticket(&self) -> Option<Ticket> {
        self.post.map(|_| self.generation.current())
    }

    /// Discards comments and errors of the previous post before loading
    /// `post_id`.
    pub fn open(&mut self, post_id: PostId) -> Ticket {
        self.post = Some(post_id);
        self.view = CommentsView::Loading;
        self.generation.advance()
    }

    pub fn close(&mut self) {
        self.post = None;
        self.view = CommentsView::Closed;
        self.generation.advance();
    }

    pub fn resolve(&mut self, ticket: Ticket, result: ClientResult<Vec<Comment>>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.view = match result {
            Ok(comments) => CommentsView::from_list(comments, None),
            Err(_) => CommentsView::Error(ViewError::CommentsLoadFailed),
        };
        true
    }

    /// Removes the comment right away. Returns `None` when it is not in the
    /// list, which also covers a second delete of the same comment.
    pub fn request_delete(&mut self, comment_id: CommentId) -> Option<PendingDelete> {
        let CommentsView::Ready { comments, .. } = &mut self.view else {
            return None;
        };
        let index = comments.iter().position(|c| c.id == comment_id)?;
        let comment = comments.remove(index);
        let remaining = std::mem::take(comments);
        self.view = CommentsView::from_list(remaining, None);
        Some(PendingDelete {
            ticket: self.generation.current(),
            comment,
        })
    }

    /// Applies the server's answer to a delete. A failure puts the comment
    /// back at the end of the list and activates `CommentDeleteFailed`.
    pub fn finish_delete(&mut self, pending: PendingDelete, result: ClientResult<()>) -> bool {
        if !self.generation.is_current(pending.ticket) {
            return false;
        }
        if result.is_ok() {
            return true;
        }
        let mut comments = match std::mem::take(&mut self.view) {
            CommentsView::Ready { comments, .. } => comments,
            _ => Vec::new(),
        };
        comments.push(pending.comment);
        self.view = CommentsView::from_list(comments, Some(ViewError::CommentDeleteFailed));
        true
    }

    /// Appends a freshly created comment, unless the post it was created for
    /// is no longer opened. While the list is loading the fetch result is
    /// authoritative, so nothing is appended.
    pub fn append(&mut self, ticket: Ticket, comment: Comment) -> bool {
        if self.post.is_none() || !self.generation.is_current(ticket) {
            return false;
        }
        match &mut self.view {
            CommentsView::Loading | CommentsView::Closed => return false,
            CommentsView::Ready { comments, .. } => comments.push(comment),
            CommentsView::Error(_) | CommentsView::Empty(_) => {
                self.view = CommentsView::from_list(vec![comment], None)
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/comments_tests.rs"]
mod tests;
