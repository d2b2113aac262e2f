use shared::{
    domain::{User, UserId},
    error::ViewError,
};

use crate::{
    error::ClientResult,
    generation::{Generation, Ticket},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UsersView {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Error(ViewError),
    Ready(Vec<User>),
}

#[derive(Debug, Default)]
pub struct UsersMachine {
    view: UsersView,
    generation: Generation,
}

impl UsersMachine {
    pub fn view(&self) -> &UsersView {
        &self.view
    }

    pub fn begin(&mut self) -> Ticket {
        self.view = UsersView::Loading;
        self.generation.advance()
    }

    /// Returns `false` when the completion was superseded and ignored.
    pub fn resolve(&mut self, ticket: Ticket, result: ClientResult<Vec<User>>) -> bool {
        if !self.generation.is_current(ticket) {
            return false;
        }
        self.view = match result {
            Ok(users) => UsersView::Ready(users),
            Err(_) => UsersView::Error(ViewError::UsersLoadFailed),
        };
        true
    }

    pub fn find(&self, user_id: UserId) -> Option<&User> {
        match &self.view {
            UsersView::Ready(users) => users.iter().find(|user| user.id == user_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn user(id: i64) -> User {
        User {
            id: UserId(id),
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            username: None,
            phone: None,
        }
    }

    #[test]
    fn failed_load_activates_users_load_failed() {
        let mut machine = UsersMachine::default();
        let ticket = machine.begin();
        assert_eq!(machine.view(), &UsersView::Loading);
        assert!(machine.resolve(ticket, Err(ClientError::Rejected("down".to_string()))));
        assert_eq!(machine.view(), &UsersView::Error(ViewError::UsersLoadFailed));
    }

    #[test]
    fn loaded_users_are_searchable_by_id() {
        let mut machine = UsersMachine::default();
        let ticket = machine.begin();
        machine.resolve(ticket, Ok(vec![user(1), user(2)]));
        assert_eq!(machine.find(UserId(2)).map(|u| u.name.as_str()), Some("user 2"));
        assert!(machine.find(UserId(3)).is_none());
    }

    #[test]
    fn superseded_load_is_ignored() {
        let mut machine = UsersMachine::default();
        let stale = machine.begin();
        let current = machine.begin();
        assert!(!machine.resolve(stale, Ok(vec![user(1)])));
        assert_eq!(machine.view(), &UsersView::Loading);
        assert!(machine.resolve(current, Ok(Vec::new())));
        assert_eq!(machine.view(), &UsersView::Ready(Vec::new()));
    }
}
