use enumset::EnumSet;
use im::{HashSet, Vector};

use crate::environment::types::*;

#[derive(Clone, Default, PartialEq)]
pub struct State {
    /// The logged in user. Derived from the session, never persisted
    pub user: Option<User>,
    pub posts: Vector<Post>,
    pub users: Vector<User>,
    pub entries: Vector<Entry>,
    pub contributions: Vector<HelpContribution>,

    /// Ids of everything the user liked
    pub likes: HashSet<String>,
    /// Ids of everything the user burned
    pub burns: HashSet<String>,

    pub open_modals: EnumSet<Modal>,
    pub theme: Theme,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("user", &self.user.as_ref().map(|e| &e.id))
            .field("posts", &self.posts.len())
            .field("users", &self.users.len())
            .field("entries", &self.entries.len())
            .field("contributions", &self.contributions.len())
            .field("likes", &self.likes.len())
            .field("burns", &self.burns.len())
            .field("open_modals", &self.open_modals)
            .field("theme", &self.theme)
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish()
    }
}

impl State {
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contribution(&self, id: &str) -> Option<&HelpContribution> {
        self.contributions.iter().find(|c| c.id == id)
    }

    pub fn user_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn entries_for_post<'a>(&'a self, post_id: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.entries.iter().filter(move |e| e.post_id == post_id)
    }

    pub fn contributions_for_post<'a>(
        &'a self,
        post_id: &'a str,
    ) -> impl Iterator<Item = &'a HelpContribution> {
        self.contributions.iter().filter(move |c| c.post_id == post_id)
    }

    /// Find a reply in either entries or contributions
    pub fn reply(&self, id: &str) -> Option<&Reply> {
        self.entries
            .iter()
            .flat_map(|e| e.replies.iter())
            .chain(self.contributions.iter().flat_map(|c| c.replies.iter()))
            .find(|r| r.id == id)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.likes.contains(id)
    }

    pub fn is_burned(&self, id: &str) -> bool {
        self.burns.contains(id)
    }

    pub fn is_modal_open(&self, modal: Modal) -> bool {
        self.open_modals.contains(modal)
    }

    pub fn show_create_modal(&self) -> bool {
        self.is_modal_open(Modal::Create)
    }

    pub fn show_giveaway_modal(&self) -> bool {
        self.is_modal_open(Modal::Giveaway)
    }

    pub fn show_request_modal(&self) -> bool {
        self.is_modal_open(Modal::Request)
    }
}
