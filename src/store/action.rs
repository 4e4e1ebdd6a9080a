use im::Vector;

use super::persistence::Snapshot;
use crate::environment::types::*;

#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug)]
pub enum Action {
    SetUser(Option<User>),
    SetUsers(Vector<User>),
    SetPosts(Vector<Post>),
    /// Merge a persisted snapshot into the state
    Hydrate(Snapshot),

    AddPost(Post),
    UpdatePost { id: PostId, update: PostUpdate },
    DeletePost(PostId),
    BurnPost(PostId),

    AddEntry(Entry),
    UpdateEntry { id: String, update: EntryUpdate },
    AddContribution(HelpContribution),
    AddReply {
        parent_id: String,
        parent_type: ParentType,
        reply: Reply,
    },
    BurnReply(String),

    ToggleLike(String),
    ToggleBurn(String),
    IncrementShare(PostId),

    AwardBadge { user_id: UserId, badge: Badge },

    SetLoading(bool),
    SetError(Option<String>),
    ToggleTheme,
    SetModal(Modal, bool),
}
