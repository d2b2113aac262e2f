//! Fixtures and a scripted `ResourceClient` shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::domain::{Comment, CommentId, NewComment, Post, PostId, User, UserId};
use tokio::sync::oneshot;

use crate::{
    error::{ClientError, ClientResult},
    ResourceClient,
};

pub fn user(id: i64) -> User {
    User {
        id: UserId(id),
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        username: None,
        phone: None,
    }
}

pub fn post(id: i64, user_id: i64) -> Post {
    Post {
        id: PostId(id),
        user_id: UserId(user_id),
        title: format!("post {id}"),
        body: format!("body of post {id}"),
    }
}

pub fn comment(id: i64, post_id: i64) -> Comment {
    Comment {
        id: CommentId(id),
        post_id: PostId(post_id),
        name: format!("author {id}"),
        email: format!("author{id}@example.com"),
        body: format!("comment {id}"),
    }
}

pub fn rejected(message: &str) -> ClientError {
    ClientError::Rejected(message.to_string())
}

/// One call observed by [`ScriptedClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListUsers,
    ListPosts(UserId),
    ListComments(PostId),
    CreateComment(NewComment),
    DeleteComment(CommentId),
}

/// Answer handed to a parked call; the variant must match the call.
#[derive(Debug)]
pub enum Reply {
    Users(ClientResult<Vec<User>>),
    Posts(ClientResult<Vec<Post>>),
    Comments(ClientResult<Vec<Comment>>),
    Created(ClientResult<Comment>),
    Deleted(ClientResult<()>),
}

/// Each call parks until the test answers it through [`ScriptedClient::reply`],
/// so completion order is fully controlled by the test.
#[derive(Default)]
pub struct ScriptedClient {
    calls: Mutex<Vec<Call>>,
    pending: Mutex<VecDeque<(Call, oneshot::Sender<Reply>)>>,
    notify: tokio::sync::Notify,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Waits until `call` has been issued and is waiting for an answer.
    pub async fn wait_for(&self, call: &Call) {
        loop {
            let notified = self.notify.notified();
            let parked = self
                .pending
                .lock()
                .expect("pending lock")
                .iter()
                .any(|(parked, _)| parked == call);
            if parked {
                return;
            }
            notified.await;
        }
    }

    /// Waits until `call` is parked and answers it with `reply`.
    pub async fn reply(&self, call: Call, reply: Reply) {
        loop {
            let notified = self.notify.notified();
            let found = {
                let mut pending = self.pending.lock().expect("pending lock");
                pending
                    .iter()
                    .position(|(parked, _)| *parked == call)
                    .and_then(|index| pending.remove(index))
            };
            if let Some((_, tx)) = found {
                tx.send(reply).expect("caller still waiting");
                return;
            }
            notified.await;
        }
    }

    async fn park(&self, call: Call) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().expect("calls lock").push(call.clone());
        self.pending
            .lock()
            .expect("pending lock")
            .push_back((call, tx));
        self.notify.notify_waiters();
        rx.await.expect("test dropped a parked call")
    }
}

#[async_trait]
impl ResourceClient for ScriptedClient {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        match self.park(Call::ListUsers).await {
            Reply::Users(result) => result,
            other => panic!("list_users answered with {other:?}"),
        }
    }

    async fn list_posts(&self, user_id: UserId) -> ClientResult<Vec<Post>> {
        match self.park(Call::ListPosts(user_id)).await {
            Reply::Posts(result) => result,
            other => panic!("list_posts answered with {other:?}"),
        }
    }

    async fn list_comments(&self, post_id: PostId) -> ClientResult<Vec<Comment>> {
        match self.park(Call::ListComments(post_id)).await {
            Reply::Comments(result) => result,
            other => panic!("list_comments answered with {other:?}"),
        }
    }

    async fn create_comment(&self, comment: &NewComment) -> ClientResult<Comment> {
        match self.park(Call::CreateComment(comment.clone())).await {
            Reply::Created(result) => result,
            other => panic!("create_comment answered with {other:?}"),
        }
    }

    async fn delete_comment(&self, comment_id: CommentId) -> ClientResult<()> {
        match self.park(Call::DeleteComment(comment_id)).await {
            Reply::Deleted(result) => result,
            other => panic!("delete_comment answered with {other:?}"),
        }
    }
}
