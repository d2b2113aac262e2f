use shared::domain::{Post, PostId, User, UserId};

/// Which user is selected, which of their posts is opened, and whether the
/// comment composer is showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    user: Option<User>,
    opened_post: Option<Post>,
    composer_open: bool,
}

impl Selection {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|user| user.id)
    }

    pub fn opened_post(&self) -> Option<&Post> {
        self.opened_post.as_ref()
    }

    pub fn opened_post_id(&self) -> Option<PostId> {
        self.opened_post.as_ref().map(|post| post.id)
    }

    pub fn composer_open(&self) -> bool {
        self.composer_open
    }

    /// Returns `false` (and changes nothing) when `user` is already selected.
    /// A change closes the opened post, which belonged to the previous user.
    pub fn select_user(&mut self, user: Option<User>) -> bool {
        if self.user_id() == user.as_ref().map(|u| u.id) {
            return false;
        }
        self.user = user;
        self.opened_post = None;
        self.composer_open = false;
        true
    }

    pub fn open_post(&mut self, post: Post) {
        self.opened_post = Some(post);
        self.composer_open = false;
    }

    pub fn close_post(&mut self) {
        self.opened_post = None;
        self.composer_open = false;
    }

    /// Composer only opens while a post is opened.
    pub fn open_composer(&mut self) -> bool {
        if self.opened_post.is_none() {
            return false;
        }
        self.composer_open = true;
        true
    }

    pub fn close_composer(&mut self) {
        self.composer_open = false;
    }
}

/// Dropdown listing the users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserSelector {
    open: bool,
}

impl UserSelector {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Click outside the dropdown.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// Picking an entry toggles the dropdown. Returns whether the pick changes
    /// the selection; picking the current user does not.
    pub fn choose(&mut self, current: Option<UserId>, picked: UserId) -> bool {
        self.toggle();
        current != Some(picked)
    }

    pub fn label(selected: Option<&User>) -> &str {
        selected.map_or("Choose a user", |user| user.name.as_str())
    }
}
