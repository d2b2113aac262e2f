use std::sync::OnceLock;

use regex::Regex;
use shared::{
    domain::{Comment, NewComment, PostId},
    error::ViewError,
};
use thiserror::Error;

use crate::{
    error::ClientResult,
    generation::{Generation, Ticket},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("one or more fields are invalid")]
    Invalid,
    #[error("a comment is already being submitted")]
    AlreadySubmitting,
    #[error("no post is opened")]
    NoOpenedPost,
}

pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

pub fn is_valid_body(body: &str) -> bool {
    !body.trim().is_empty()
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"\S+@\S+\.\S+")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Looks for a `local@domain.tld` shaped run of non-whitespace characters
/// anywhere in the input. Far looser than RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// A validated comment on its way to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    ticket: Ticket,
    comment: NewComment,
}

impl PendingSubmit {
    pub fn comment(&self) -> &NewComment {
        &self.comment
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentForm {
    name: String,
    email: String,
    body: String,
    name_error: bool,
    email_error: bool,
    body_error: bool,
    submitting: bool,
    submit_error: Option<ViewError>,
    generation: Generation,
}

impl CommentForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn name_error(&self) -> bool {
        self.name_error
    }

    pub fn email_error(&self) -> bool {
        self.email_error
    }

    pub fn body_error(&self) -> bool {
        self.body_error
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_error(&self) -> Option<ViewError> {
        self.submit_error
    }

    pub fn edit_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.name_error = false;
    }

    pub fn edit_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.email_error = false;
    }

    pub fn edit_body(&mut self, value: impl Into<String>) {
        self.body = value.into();
        self.body_error = false;
    }

    /// The "Clear" button: empties every field and flag. A submission in
    /// flight keeps running.
    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.body.clear();
        self.clear_field_errors();
    }

    /// Back to a pristine form; a submission still in flight is forgotten.
    pub fn reset(&mut self) {
        let generation = std::mem::take(&mut self.generation);
        *self = Self {
            generation,
            ..Self::default()
        };
        self.generation.advance();
    }

    /// Runs every rule so each field gets its own flag.
    pub fn validate(&mut self) -> bool {
        self.name_error = !is_valid_name(&self.name);
        self.email_error = !is_valid_email(&self.email);
        self.body_error = !is_valid_body(&self.body);
        !(self.name_error || self.email_error || self.body_error)
    }

    pub fn begin_submit(&mut self, post_id: PostId) -> Result<PendingSubmit, SubmitRejected> {
        if self.submitting {
            return Err(SubmitRejected::AlreadySubmitting);
        }
        if !self.validate() {
            return Err(SubmitRejected::Invalid);
        }
        self.submitting = true;
        self.submit_error = None;
        Ok(PendingSubmit {
            ticket: self.generation.advance(),
            comment: NewComment {
                post_id,
                name: self.name.clone(),
                email: self.email.clone(),
                body: self.body.clone(),
            },
        })
    }

    /// Returns the stored comment when it should be appended to the list.
    /// The author's name and email stay filled in for the next comment.
    pub fn finish_submit(
        &mut self,
        pending: &PendingSubmit,
        result: ClientResult<Comment>,
    ) -> Option<Comment> {
        if !self.generation.is_current(pending.ticket) {
            return None;
        }
        self.submitting = false;
        match result {
            Ok(comment) if comment.id.is_assigned() => {
                self.body.clear();
                self.clear_field_errors();
                Some(comment)
            }
            _ => {
                self.submit_error = Some(ViewError::CommentCreateFailed);
                None
            }
        }
    }

    fn clear_field_errors(&mut self) {
        self.name_error = false;
        self.email_error = false;
        self.body_error = false;
    }
}

#[cfg(test)]
#[path = "tests/comment_form_tests.rs"]
mod tests;
