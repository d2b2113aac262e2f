//! Routes terminal commands to session intents.

use std::sync::Arc;

use client_core::{Followup, Session};

use crate::commands::{Command, HELP};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Text for the user that does not come from a session change.
    Notice(String),
    Redraw,
    Quit,
}

fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::Users => "toggle_user_selector",
        Command::Dismiss => "dismiss_user_selector",
        Command::Select(_) => "select_user",
        Command::Open(_) => "toggle_post",
        Command::Close => "close_post",
        Command::Write => "open_composer",
        Command::Cancel => "close_composer",
        Command::Name(_) => "edit_name",
        Command::Email(_) => "edit_email",
        Command::Body(_) => "edit_body",
        Command::Submit => "submit_comment",
        Command::Clear => "clear_form",
        Command::Delete(_) => "delete_comment",
        Command::Show => "show",
        Command::Help => "help",
        Command::Quit => "quit",
    }
}

fn spawn_followup(session: &Arc<Session>, followup: Option<Followup>) {
    if let Some(followup) = followup {
        let session = Arc::clone(session);
        tokio::spawn(async move { session.complete(followup).await });
    }
}

/// Applies one command. Its first transition happens before this returns, so
/// commands take effect in the order they were typed; only the request a
/// command triggers runs on its own task.
pub async fn dispatch(session: &Arc<Session>, cmd: Command) -> Outcome {
    tracing::debug!(command = command_name(&cmd), "dispatching terminal command");

    match cmd {
        Command::Users => session.toggle_user_selector().await,
        Command::Dismiss => session.dismiss_user_selector().await,
        Command::Select(None) => {
            let followup = session.begin_select_user(None).await;
            spawn_followup(session, followup);
        }
        Command::Select(Some(user_id)) => {
            let Some(user) = session.find_user(user_id).await else {
                return Outcome::Notice(format!("no user with id {user_id}"));
            };
            let followup = if session.snapshot().await.selector_open {
                session.begin_choose_user(user).await
            } else {
                session.begin_select_user(Some(user)).await
            };
            spawn_followup(session, followup);
        }
        Command::Open(post_id) => {
            let Some(post) = session.find_post(post_id).await else {
                return Outcome::Notice(format!("no post with id {post_id} in the list"));
            };
            let followup = session.begin_toggle_post(post).await;
            spawn_followup(session, followup);
        }
        Command::Close => session.close_post().await,
        Command::Write => {
            if !session.open_composer().await {
                return Outcome::Notice("open a post and wait for its comments first".to_string());
            }
        }
        Command::Cancel => session.close_composer().await,
        Command::Name(value) => session.edit_name(value).await,
        Command::Email(value) => session.edit_email(value).await,
        Command::Body(value) => session.edit_body(value).await,
        Command::Clear => session.clear_form().await,
        Command::Submit => match session.begin_submit_comment().await {
            Ok(followup) => spawn_followup(session, Some(followup)),
            Err(reason) => tracing::debug!(%reason, "comment not submitted"),
        },
        Command::Delete(comment_id) => {
            let followup = session.begin_delete_comment(comment_id).await;
            if followup.is_none() {
                return Outcome::Notice(format!("no comment with id {comment_id} in the list"));
            }
            spawn_followup(session, followup);
        }
        Command::Show => return Outcome::Redraw,
        Command::Help => return Outcome::Notice(HELP.to_string()),
        Command::Quit => return Outcome::Quit,
    }
    Outcome::Continue
}
