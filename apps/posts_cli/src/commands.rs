//! Typed commands read from the terminal.

use shared::domain::{CommentId, PostId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Users,
    Dismiss,
    Select(Option<UserId>),
    Open(PostId),
    Close,
    Write,
    Cancel,
    Name(String),
    Email(String),
    Body(String),
    Submit,
    Clear,
    Delete(CommentId),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  users                 toggle the user dropdown
  dismiss               close the user dropdown
  select <id>|none      select a user (or clear the selection)
  open <post-id>        open a post, or close it if it is already open
  close                 close the opened post
  write | cancel        show or hide the comment form
  name|email|body <txt> edit a comment form field
  submit | clear        send or clear the comment form
  delete <comment-id>   delete a comment
  show | help | quit";

fn parse_id(arg: &str, what: &str) -> Result<i64, String> {
    arg.parse::<i64>()
        .map_err(|_| format!("expected a numeric {what} id, got '{arg}'"))
}

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "users" => Command::Users,
        "dismiss" => Command::Dismiss,
        "select" if rest.eq_ignore_ascii_case("none") => Command::Select(None),
        "select" => Command::Select(Some(UserId(parse_id(rest, "user")?))),
        "open" => Command::Open(PostId(parse_id(rest, "post")?)),
        "close" => Command::Close,
        "write" => Command::Write,
        "cancel" => Command::Cancel,
        // Field text is kept verbatim so validation sees what was typed.
        "name" => Command::Name(rest.to_string()),
        "email" => Command::Email(rest.to_string()),
        "body" => Command::Body(rest.to_string()),
        "submit" => Command::Submit,
        "clear" => Command::Clear,
        "delete" => Command::Delete(CommentId(parse_id(rest, "comment")?)),
        "" | "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(command)
}
