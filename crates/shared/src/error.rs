use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a banner is shown. Each view-state machine holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ViewError {
    #[error("failed to load users")]
    UsersLoadFailed,
    #[error("failed to load posts")]
    PostsLoadFailed,
    #[error("user has no posts")]
    NoPosts,
    #[error("failed to load comments")]
    CommentsLoadFailed,
    #[error("post has no comments")]
    NoComments,
    #[error("failed to create comment")]
    CommentCreateFailed,
    #[error("failed to delete comment")]
    CommentDeleteFailed,
}

impl ViewError {
    /// `NoPosts` and `NoComments` are informational rather than failures.
    pub fn is_failure(self) -> bool {
        !matches!(self, Self::NoPosts | Self::NoComments)
    }
}

/// The `{ "error": "..." }` body some endpoints answer with instead of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    pub error: String,
}

impl ApiErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Extracts an error indicator from an arbitrary JSON response body.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let indicator = value.as_object()?.get("error")?;
        let error = match indicator {
            serde_json::Value::Null | serde_json::Value::Bool(false) => return None,
            serde_json::Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        Some(Self { error })
    }
}
