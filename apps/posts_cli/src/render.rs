//! Text rendering of a session snapshot.

use std::fmt::{self, Write as _};

use client_core::{CommentForm, CommentsView, PostsView, SessionSnapshot, UserSelector, UsersView};
use shared::error::ViewError;

pub fn banner(kind: ViewError) -> &'static str {
    match kind {
        ViewError::UsersLoadFailed => "Unable to load users",
        ViewError::PostsLoadFailed => "Something went wrong!",
        ViewError::NoPosts => "No posts yet",
        ViewError::CommentsLoadFailed => "Something went wrong",
        ViewError::NoComments => "No comments yet",
        ViewError::CommentCreateFailed => "Unable to add a comment",
        ViewError::CommentDeleteFailed => "Unable to delete a comment",
    }
}

/// Failures get a `!` marker; informational entries are printed plain.
fn write_banner(out: &mut String, kind: ViewError) -> fmt::Result {
    if kind.is_failure() {
        writeln!(out, "! {}", banner(kind))
    } else {
        writeln!(out, "{}", banner(kind))
    }
}

pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    // Writing into a `String` never fails.
    let _ = render_into(&mut out, snapshot);
    out
}

fn render_into(out: &mut String, snapshot: &SessionSnapshot) -> fmt::Result {
    render_selector(out, snapshot)?;
    out.push('\n');
    render_posts(out, snapshot)?;
    if snapshot.selection.opened_post().is_some() {
        out.push('\n');
        render_sidebar(out, snapshot)?;
    }
    Ok(())
}

fn render_selector(out: &mut String, snapshot: &SessionSnapshot) -> fmt::Result {
    let selected = snapshot.selection.user();
    writeln!(out, "[{} v]", UserSelector::label(selected))?;
    match &snapshot.users {
        UsersView::Error(kind) => write_banner(out, *kind)?,
        UsersView::Ready(users) if snapshot.selector_open => {
            for user in users {
                let marker = if Some(user.id) == snapshot.selection.user_id() {
                    '*'
                } else {
                    ' '
                };
                writeln!(out, " {marker} {:>3}  {}", user.id.0, user.name)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn render_posts(out: &mut String, snapshot: &SessionSnapshot) -> fmt::Result {
    match &snapshot.posts {
        PostsView::Idle => out.push_str("No user selected\n"),
        PostsView::Loading => out.push_str("Loading...\n"),
        PostsView::Error(kind) | PostsView::Empty(kind) => write_banner(out, *kind)?,
        PostsView::Ready(posts) => {
            out.push_str("Posts:\n");
            let opened = snapshot.selection.opened_post_id();
            for post in posts {
                let button = if opened == Some(post.id) { "Close" } else { "Open" };
                writeln!(out, " {:>4}  {:<60} [{button}]", post.id.0, post.title)?;
            }
        }
    }
    Ok(())
}

fn render_sidebar(out: &mut String, snapshot: &SessionSnapshot) -> fmt::Result {
    let Some(post) = snapshot.selection.opened_post() else {
        return Ok(());
    };
    writeln!(out, "#{}: {}", post.id, post.title)?;
    writeln!(out, "{}\n", post.body)?;

    match &snapshot.comments {
        CommentsView::Closed => {}
        CommentsView::Loading => out.push_str("Loading...\n"),
        CommentsView::Error(kind) | CommentsView::Empty(kind) => write_banner(out, *kind)?,
        CommentsView::Ready {
            comments,
            delete_error,
        } => {
            if let Some(kind) = delete_error {
                write_banner(out, *kind)?;
            }
            out.push_str("Comments:\n");
            for comment in comments {
                writeln!(
                    out,
                    " [{}] {} <{}>  (delete {})",
                    comment.id, comment.name, comment.email, comment.id
                )?;
                writeln!(out, "     {}", comment.body)?;
            }
        }
    }

    if snapshot.can_open_composer() {
        out.push_str("[Write a comment]\n");
    }
    if snapshot.selection.composer_open() {
        render_form(out, &snapshot.form)?;
    }
    Ok(())
}

fn render_form(out: &mut String, form: &CommentForm) -> fmt::Result {
    writeln!(out, "Author Name:  {}", form.name())?;
    if form.name_error() {
        out.push_str("  ! Name is required\n");
    }
    writeln!(out, "Author Email: {}", form.email())?;
    if form.email_error() {
        out.push_str("  ! Email is required\n");
    }
    writeln!(out, "Comment Text: {}", form.body())?;
    if form.body_error() {
        out.push_str("  ! Enter some text\n");
    }
    if let Some(kind) = form.submit_error() {
        write_banner(out, kind)?;
    }
    let add = if form.is_submitting() { "[Add ...]" } else { "[Add]" };
    writeln!(out, "{add} [Clear]")
}
