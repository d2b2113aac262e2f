use serde::{Deserialize, Serialize};

use crate::{domain::Comment, error::ApiErrorPayload};

/// Body of `POST /comments`: either the stored comment or an error indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateCommentResponse {
    Rejected(ApiErrorPayload),
    Created(Comment),
}

pub const USERS_PATH: &str = "users";
pub const POSTS_PATH: &str = "posts";
pub const COMMENTS_PATH: &str = "comments";
