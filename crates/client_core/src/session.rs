//! Session container: owns every state machine and turns user intents into
//! transitions and resource calls.
//!
//! The state lock is never held across a network call. Each call carries the
//! ticket of the transition that issued it, and its completion is applied only
//! if that ticket is still current, so a late answer for a previous user or
//! post cannot overwrite what is on screen now.
//!
//! Intents that reach the network come in two halves: `begin_*` applies the
//! first transition and returns a [`Followup`] for [`Session::complete`].
//! Running the `begin_*` halves in sequence keeps intents in issue order
//! while their requests overlap.

use std::sync::Arc;

use shared::domain::{CommentId, Post, PostId, User, UserId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    comment_form::{CommentForm, PendingSubmit, SubmitRejected},
    comments::{CommentsMachine, CommentsView, PendingDelete},
    generation::Ticket,
    posts::{PostsMachine, PostsView},
    selection::{Selection, UserSelector},
    users::{UsersMachine, UsersView},
    ResourceClient,
};

/// Emitted after a transition has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    UsersChanged,
    SelectionChanged,
    PostsChanged,
    CommentsChanged,
    FormChanged,
}

/// Everything presentation needs to draw one frame.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub users: UsersView,
    pub selector_open: bool,
    pub selection: Selection,
    pub posts: PostsView,
    pub comments: CommentsView,
    pub form: CommentForm,
}

impl SessionSnapshot {
    /// "Write a comment" is offered while the composer is closed and the
    /// comments are not loading.
    pub fn can_open_composer(&self) -> bool {
        self.selection.opened_post().is_some()
            && !self.selection.composer_open()
            && !matches!(self.comments, CommentsView::Loading)
    }
}

/// Network half of an intent. The `begin_*` call that returned it has already
/// applied the intent's first transition; [`Session::complete`] performs the
/// request and applies the answer if it is still current.
#[derive(Debug)]
#[must_use]
pub enum Followup {
    Users(Ticket),
    Posts { user_id: UserId, ticket: Ticket },
    Comments { post_id: PostId, ticket: Ticket },
    Create {
        comments_ticket: Ticket,
        pending: PendingSubmit,
    },
    Delete(PendingDelete),
}

#[derive(Default)]
struct SessionState {
    users: UsersMachine,
    selector: UserSelector,
    selection: Selection,
    posts: PostsMachine,
    comments: CommentsMachine,
    form: CommentForm,
}

pub struct Session {
    client: Arc<dyn ResourceClient>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(client: Arc<dyn ResourceClient>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            client,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock().await;
        SessionSnapshot {
            users: state.users.view().clone(),
            selector_open: state.selector.is_open(),
            selection: state.selection.clone(),
            posts: state.posts.view().clone(),
            comments: state.comments.view().clone(),
            form: state.form.clone(),
        }
    }

    pub async fn find_user(&self, user_id: UserId) -> Option<User> {
        self.inner.lock().await.users.find(user_id).cloned()
    }

    pub async fn find_post(&self, post_id: PostId) -> Option<Post> {
        self.inner.lock().await.posts.find(post_id).cloned()
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub async fn load_users(&self) {
        let followup = self.begin_load_users().await;
        self.complete(followup).await;
    }

    pub async fn begin_load_users(&self) -> Followup {
        let ticket = self.inner.lock().await.users.begin();
        self.emit(SessionEvent::UsersChanged);
        Followup::Users(ticket)
    }

    pub async fn toggle_user_selector(&self) {
        self.inner.lock().await.selector.toggle();
        self.emit(SessionEvent::SelectionChanged);
    }

    pub async fn dismiss_user_selector(&self) {
        self.inner.lock().await.selector.dismiss();
        self.emit(SessionEvent::SelectionChanged);
    }

    /// A pick in the user dropdown; picking the current user only closes it.
    pub async fn choose_user(&self, user: User) {
        if let Some(followup) = self.begin_choose_user(user).await {
            self.complete(followup).await;
        }
    }

    pub async fn begin_choose_user(&self, user: User) -> Option<Followup> {
        let mut state = self.inner.lock().await;
        let current = state.selection.user_id();
        let changed = state.selector.choose(current, user.id);
        self.emit(SessionEvent::SelectionChanged);
        if changed {
            self.apply_select(&mut state, Some(user))
        } else {
            None
        }
    }

    /// Replaces the selected user. `None` returns the posts panel to idle; a
    /// user starts a fresh posts fetch. Re-selecting the current user does
    /// nothing.
    pub async fn select_user(&self, user: Option<User>) {
        if let Some(followup) = self.begin_select_user(user).await {
            self.complete(followup).await;
        }
    }

    pub async fn begin_select_user(&self, user: Option<User>) -> Option<Followup> {
        let mut state = self.inner.lock().await;
        self.apply_select(&mut state, user)
    }

    fn apply_select(&self, state: &mut SessionState, user: Option<User>) -> Option<Followup> {
        if !state.selection.select_user(user.clone()) {
            debug!("posts: user already selected");
            return None;
        }
        state.comments.close();
        state.form.reset();
        self.emit(SessionEvent::SelectionChanged);
        self.emit(SessionEvent::CommentsChanged);
        self.emit(SessionEvent::FormChanged);

        let Some(user) = user else {
            state.posts.reset();
            self.emit(SessionEvent::PostsChanged);
            return None;
        };
        let ticket = state.posts.begin(user.id);
        self.emit(SessionEvent::PostsChanged);
        Some(Followup::Posts {
            user_id: user.id,
            ticket,
        })
    }

    /// Opens `post` and loads its comments, closing the composer.
    pub async fn open_post(&self, post: Post) {
        let followup = self.begin_open_post(post).await;
        self.complete(followup).await;
    }

    pub async fn begin_open_post(&self, post: Post) -> Followup {
        let mut state = self.inner.lock().await;
        self.apply_open(&mut state, post)
    }

    fn apply_open(&self, state: &mut SessionState, post: Post) -> Followup {
        let post_id = post.id;
        state.selection.open_post(post);
        state.form.reset();
        let ticket = state.comments.open(post_id);
        self.emit(SessionEvent::SelectionChanged);
        self.emit(SessionEvent::FormChanged);
        self.emit(SessionEvent::CommentsChanged);
        Followup::Comments { post_id, ticket }
    }

    pub async fn close_post(&self) {
        let mut state = self.inner.lock().await;
        self.apply_close(&mut state);
    }

    fn apply_close(&self, state: &mut SessionState) {
        state.selection.close_post();
        state.comments.close();
        state.form.reset();
        self.emit(SessionEvent::SelectionChanged);
        self.emit(SessionEvent::CommentsChanged);
        self.emit(SessionEvent::FormChanged);
    }

    /// The Open/Close button of a post row.
    pub async fn toggle_post(&self, post: Post) {
        if let Some(followup) = self.begin_toggle_post(post).await {
            self.complete(followup).await;
        }
    }

    pub async fn begin_toggle_post(&self, post: Post) -> Option<Followup> {
        let mut state = self.inner.lock().await;
        if state.selection.opened_post_id() == Some(post.id) {
            self.apply_close(&mut state);
            None
        } else {
            Some(self.apply_open(&mut state, post))
        }
    }

    /// Shows the comment form. Refused while no post is opened or its
    /// comments are still loading.
    pub async fn open_composer(&self) -> bool {
        let opened = {
            let mut state = self.inner.lock().await;
            !matches!(state.comments.view(), CommentsView::Loading)
                && state.selection.open_composer()
        };
        if opened {
            self.emit(SessionEvent::SelectionChanged);
        }
        opened
    }

    pub async fn close_composer(&self) {
        let mut state = self.inner.lock().await;
        state.selection.close_composer();
        state.form.reset();
        self.emit(SessionEvent::SelectionChanged);
        self.emit(SessionEvent::FormChanged);
    }

    pub async fn edit_name(&self, value: impl Into<String>) {
        self.inner.lock().await.form.edit_name(value);
        self.emit(SessionEvent::FormChanged);
    }

    pub async fn edit_email(&self, value: impl Into<String>) {
        self.inner.lock().await.form.edit_email(value);
        self.emit(SessionEvent::FormChanged);
    }

    pub async fn edit_body(&self, value: impl Into<String>) {
        self.inner.lock().await.form.edit_body(value);
        self.emit(SessionEvent::FormChanged);
    }

    pub async fn clear_form(&self) {
        self.inner.lock().await.form.clear();
        self.emit(SessionEvent::FormChanged);
    }

    /// Validates the form and, when it passes, creates the comment. A failed
    /// create is reported through the form's submit error, not the return
    /// value.
    pub async fn submit_comment(&self) -> Result<(), SubmitRejected> {
        let followup = self.begin_submit_comment().await?;
        self.complete(followup).await;
        Ok(())
    }

    pub async fn begin_submit_comment(&self) -> Result<Followup, SubmitRejected> {
        let mut state = self.inner.lock().await;
        let post_id = match state.selection.opened_post_id() {
            Some(post_id) if state.selection.composer_open() => post_id,
            _ => return Err(SubmitRejected::NoOpenedPost),
        };
        let comments_ticket = state
            .comments
            .ticket()
            .ok_or(SubmitRejected::NoOpenedPost)?;
        let pending = state.form.begin_submit(post_id);
        self.emit(SessionEvent::FormChanged);
        Ok(Followup::Create {
            comments_ticket,
            pending: pending?,
        })
    }

    /// Removes the comment from the list at once, then asks the server to
    /// delete it. Returns `false` when the comment is not listed.
    pub async fn delete_comment(&self, comment_id: CommentId) -> bool {
        match self.begin_delete_comment(comment_id).await {
            Some(followup) => {
                self.complete(followup).await;
                true
            }
            None => false,
        }
    }

    pub async fn begin_delete_comment(&self, comment_id: CommentId) -> Option<Followup> {
        let pending = self.inner.lock().await.comments.request_delete(comment_id)?;
        self.emit(SessionEvent::CommentsChanged);
        Some(Followup::Delete(pending))
    }

    /// Runs the request behind `followup`. The state lock is not held while
    /// the request is in flight.
    pub async fn complete(&self, followup: Followup) {
        match followup {
            Followup::Users(ticket) => {
                info!("users: fetching");
                let result = self.client.list_users().await;
                match &result {
                    Ok(users) => info!(count = users.len(), "users: loaded"),
                    Err(err) => warn!(error = %err, "users: load failed"),
                }

                let mut state = self.inner.lock().await;
                if state.users.resolve(ticket, result) {
                    self.emit(SessionEvent::UsersChanged);
                } else {
                    debug!("users: dropped superseded response");
                }
            }
            Followup::Posts { user_id, ticket } => {
                info!(user_id = user_id.0, "posts: fetching");
                let result = self.client.list_posts(user_id).await;
                match &result {
                    Ok(posts) => info!(user_id = user_id.0, count = posts.len(), "posts: loaded"),
                    Err(err) => warn!(user_id = user_id.0, error = %err, "posts: load failed"),
                }

                let mut state = self.inner.lock().await;
                if state.posts.resolve(ticket, result) {
                    self.emit(SessionEvent::PostsChanged);
                } else {
                    debug!(user_id = user_id.0, "posts: dropped response for previous selection");
                }
            }
            Followup::Comments { post_id, ticket } => {
                info!(post_id = post_id.0, "comments: fetching");
                let result = self.client.list_comments(post_id).await;
                match &result {
                    Ok(comments) => {
                        info!(post_id = post_id.0, count = comments.len(), "comments: loaded")
                    }
                    Err(err) => warn!(post_id = post_id.0, error = %err, "comments: load failed"),
                }

                let mut state = self.inner.lock().await;
                if state.comments.resolve(ticket, result) {
                    self.emit(SessionEvent::CommentsChanged);
                } else {
                    debug!(post_id = post_id.0, "comments: dropped response for previous post");
                }
            }
            Followup::Create {
                comments_ticket,
                pending,
            } => {
                let post_id = pending.comment().post_id;
                info!(post_id = post_id.0, "comments: creating");
                let result = self.client.create_comment(pending.comment()).await;
                if let Err(err) = &result {
                    warn!(post_id = post_id.0, error = %err, "comments: create failed");
                }

                let mut state = self.inner.lock().await;
                if let Some(comment) = state.form.finish_submit(&pending, result) {
                    info!(post_id = post_id.0, comment_id = comment.id.0, "comments: created");
                    if state.comments.append(comments_ticket, comment) {
                        self.emit(SessionEvent::CommentsChanged);
                    }
                }
                self.emit(SessionEvent::FormChanged);
            }
            Followup::Delete(pending) => {
                let comment_id = pending.comment().id;
                info!(comment_id = comment_id.0, "comments: deleting");
                let result = self.client.delete_comment(comment_id).await;
                if let Err(err) = &result {
                    warn!(
                        comment_id = comment_id.0,
                        rejected = err.is_rejection(),
                        error = %err,
                        "comments: delete failed, restoring"
                    );
                }

                let mut state = self.inner.lock().await;
                if state.comments.finish_delete(pending, result) {
                    self.emit(SessionEvent::CommentsChanged);
                } else {
                    debug!(comment_id = comment_id.0, "comments: dropped delete result for previous post");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
