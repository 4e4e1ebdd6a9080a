//! The persisted form of the store. Sets are written as sorted arrays and
//! the logged in user is left out; the session restores it.

use enumset::EnumSet;
use im::{HashSet, Vector};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::State;
use crate::environment::types::*;

/// A decoded snapshot, ready to be merged into the state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub posts: Vector<Post>,
    pub users: Vector<User>,
    pub entries: Vector<Entry>,
    pub contributions: Vector<HelpContribution>,
    pub likes: HashSet<String>,
    pub burns: HashSet<String>,
    pub open_modals: EnumSet<Modal>,
    pub theme: Theme,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Stored {
    posts: Vec<Post>,
    users: Vec<User>,
    entries: Vec<Entry>,
    contributions: Vec<HelpContribution>,
    likes: Vec<String>,
    burns: Vec<String>,
    theme: Theme,
    show_create_modal: bool,
    show_giveaway_modal: bool,
    show_request_modal: bool,
}

pub fn serialize(state: &State) -> Result<String, serde_json::Error> {
    let stored = Stored {
        posts: state.posts.iter().cloned().collect(),
        users: state.users.iter().cloned().collect(),
        entries: state.entries.iter().cloned().collect(),
        contributions: state.contributions.iter().cloned().collect(),
        likes: state.likes.iter().cloned().sorted().collect(),
        burns: state.burns.iter().cloned().sorted().collect(),
        theme: state.theme,
        show_create_modal: state.show_create_modal(),
        show_giveaway_modal: state.show_giveaway_modal(),
        show_request_modal: state.show_request_modal(),
    };
    serde_json::to_string(&stored)
}

/// Decode a snapshot. Anything unreadable is logged and yields `None`, the
/// caller then keeps its default state.
pub fn deserialize(raw: &str) -> Option<Snapshot> {
    let stored: Stored = match serde_json::from_str(raw) {
        Ok(stored) => stored,
        Err(e) => {
            log::error!("Failed to load state from storage: {e}");
            return None;
        }
    };
    let mut open_modals = EnumSet::new();
    for (open, modal) in [
        (stored.show_create_modal, Modal::Create),
        (stored.show_giveaway_modal, Modal::Giveaway),
        (stored.show_request_modal, Modal::Request),
    ] {
        if open {
            open_modals.insert(modal);
        }
    }
    Some(Snapshot {
        posts: stored.posts.into(),
        users: stored.users.into(),
        entries: stored.entries.into(),
        contributions: stored.contributions.into(),
        likes: stored.likes.into_iter().collect(),
        burns: stored.burns.into_iter().collect(),
        open_modals,
        theme: stored.theme,
    })
}
