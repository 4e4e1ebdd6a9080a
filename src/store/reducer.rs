use im::HashSet;

use super::{Action, State};
use crate::environment::types::*;

/// Compute the next state. `state` is left untouched; the persistent
/// collections make the copy cheap.
pub fn reduce(state: &State, action: Action) -> State {
    let mut next = state.clone();
    apply(&mut next, action);
    next
}

fn apply(state: &mut State, action: Action) {
    log::trace!("{action:?}");
    match action {
        Action::SetUser(user) => state.user = user,
        Action::SetUsers(users) => state.users = users,
        Action::SetPosts(posts) => state.posts = posts,
        Action::Hydrate(snapshot) => {
            state.posts = snapshot.posts;
            state.users = snapshot.users;
            state.entries = snapshot.entries;
            state.contributions = snapshot.contributions;
            state.likes = snapshot.likes;
            state.burns = snapshot.burns;
            state.open_modals = snapshot.open_modals;
            state.theme = snapshot.theme;
        }
        Action::AddPost(post) => state.posts.push_front(post),
        Action::UpdatePost { id, update } => {
            if let Some(post) = state.posts.iter_mut().find(|p| p.id == id) {
                post.apply(update);
            }
        }
        Action::DeletePost(id) => state.posts.retain(|p| p.id != id),
        Action::BurnPost(id) => mutate_post(state, &id, |p| p.burn_count += 1),
        Action::AddEntry(entry) => state.entries.push_back(entry),
        Action::UpdateEntry { id, update } => {
            if let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) {
                entry.apply(update);
            }
        }
        Action::AddContribution(contribution) => state.contributions.push_back(contribution),
        Action::AddReply {
            parent_id,
            parent_type,
            reply,
        } => match parent_type {
            ParentType::Entry => {
                if let Some(entry) = state.entries.iter_mut().find(|e| e.id == parent_id) {
                    entry.replies.push(reply);
                }
            }
            ParentType::Contribution => {
                if let Some(contribution) = state
                    .contributions
                    .iter_mut()
                    .find(|c| c.id == parent_id)
                {
                    contribution.replies.push(reply);
                }
            }
        },
        Action::BurnReply(id) => {
            // Reply ids are globally unique, so at most one of these matches
            let burn = |replies: &mut Vec<Reply>| {
                for reply in replies.iter_mut().filter(|r| r.id == id) {
                    reply.burn_count += 1;
                }
            };
            for entry in state.entries.iter_mut() {
                if entry.replies.iter().any(|r| r.id == id) {
                    burn(&mut entry.replies);
                }
            }
            for contribution in state.contributions.iter_mut() {
                if contribution.replies.iter().any(|r| r.id == id) {
                    burn(&mut contribution.replies);
                }
            }
        }
        Action::ToggleLike(id) => {
            let added = toggle(&mut state.likes, &id);
            mutate_post(state, &id, |p| p.likes_count = adjust(p.likes_count, added));
        }
        Action::ToggleBurn(id) => {
            let added = toggle(&mut state.burns, &id);
            mutate_post(state, &id, |p| p.burn_count = adjust(p.burn_count, added));
        }
        Action::IncrementShare(id) => mutate_post(state, &id, |p| p.share_count += 1),
        Action::AwardBadge { user_id, badge } => {
            if let Some(user) = state.user.as_mut().filter(|u| u.id == user_id) {
                user.badges.push(badge.clone());
            }
            for user in state.users.iter_mut().filter(|u| u.id == user_id) {
                user.badges.push(badge.clone());
            }
        }
        Action::SetLoading(loading) => state.is_loading = loading,
        Action::SetError(error) => state.error = error,
        Action::ToggleTheme => state.theme = state.theme.toggled(),
        Action::SetModal(modal, show) => {
            if show {
                state.open_modals.insert(modal);
            } else {
                state.open_modals.remove(modal);
            }
        }
    }
}

// `iter_mut` on an `im::Vector` copies the chunks it visits, so only
// touch the collection when there's a match.
fn mutate_post(state: &mut State, id: &str, action: impl FnOnce(&mut Post)) {
    let Some(index) = state.posts.iter().position(|p| p.id == id) else {
        return;
    };
    if let Some(post) = state.posts.get_mut(index) {
        action(post);
    }
}

/// Flip membership, returns whether `id` is now a member
fn toggle(set: &mut HashSet<String>, id: &str) -> bool {
    if set.remove(id).is_some() {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

fn adjust(count: u32, added: bool) -> u32 {
    if added {
        count.saturating_add(1)
    } else {
        count.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::seed::{sample_post, sample_user};
    use chrono::Utc;

    fn state_with_posts() -> State {
        State {
            posts: vec![sample_post("p1", 3), sample_post("p2", 0)].into(),
            ..Default::default()
        }
    }

    fn entry(id: &str, user: &str) -> Entry {
        Entry {
            id: id.to_string(),
            post_id: "p1".to_string(),
            user_id: user.to_string(),
            user: sample_user(user),
            message: Some("count me in".to_string()),
            content: None,
            proof_url: None,
            is_winner: false,
            submitted_at: Utc::now(),
            replies: Vec::new(),
        }
    }

    fn contribution(id: &str, user: &str) -> HelpContribution {
        HelpContribution {
            id: id.to_string(),
            post_id: "p2".to_string(),
            user_id: user.to_string(),
            user: sample_user(user),
            amount: 5.0,
            currency: None,
            message: None,
            is_anonymous: false,
            contributed_at: Utc::now(),
            replies: Vec::new(),
        }
    }

    fn reply(id: &str, parent_id: &str, parent_type: ParentType) -> Reply {
        Reply {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            parent_type,
            user_id: "u1".to_string(),
            user: sample_user("u1"),
            content: "nice".to_string(),
            burn_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reduce_does_not_touch_input() {
        let state = state_with_posts();
        let before = state.clone();
        let next = reduce(&state, Action::BurnPost("p1".to_string()));
        assert_eq!(state, before);
        assert_eq!(next.post("p1").unwrap().burn_count, 1);
    }

    #[test]
    fn like_toggle_round_trip() {
        let state = state_with_posts();
        let liked = reduce(&state, Action::ToggleLike("p1".to_string()));
        assert_eq!(liked.post("p1").unwrap().likes_count, 4);
        assert!(liked.is_liked("p1"));

        let unliked = reduce(&liked, Action::ToggleLike("p1".to_string()));
        assert_eq!(unliked.post("p1").unwrap().likes_count, 3);
        assert!(!unliked.is_liked("p1"));
        assert_eq!(unliked, state);
    }

    #[test]
    fn toggles_on_non_posts_only_track_membership() {
        let state = state_with_posts();
        let next = reduce(&state, Action::ToggleBurn("entry_1".to_string()));
        assert!(next.is_burned("entry_1"));
        assert_eq!(next.posts, state.posts);
    }

    #[test]
    fn burn_toggle_adjusts_burn_count() {
        let state = state_with_posts();
        let next = reduce(&state, Action::ToggleBurn("p2".to_string()));
        assert_eq!(next.post("p2").unwrap().burn_count, 1);
        let next = reduce(&next, Action::ToggleBurn("p2".to_string()));
        assert_eq!(next.post("p2").unwrap().burn_count, 0);
        assert!(!next.is_burned("p2"));
    }

    #[test]
    fn unlike_never_underflows() {
        let mut state = state_with_posts();
        state.likes.insert("p2".to_string());
        let next = reduce(&state, Action::ToggleLike("p2".to_string()));
        assert_eq!(next.post("p2").unwrap().likes_count, 0);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let state = state_with_posts();
        for action in [
            Action::BurnPost("nope".to_string()),
            Action::DeletePost("nope".to_string()),
            Action::IncrementShare("nope".to_string()),
            Action::BurnReply("nope".to_string()),
            Action::UpdatePost {
                id: "nope".to_string(),
                update: PostUpdate {
                    title: Some("x".to_string()),
                    ..Default::default()
                },
            },
        ] {
            assert_eq!(reduce(&state, action), state);
        }
    }

    #[test]
    fn post_lifecycle() {
        let state = state_with_posts();
        let next = reduce(&state, Action::AddPost(sample_post("p3", 0)));
        assert_eq!(next.posts.front().map(|p| p.id.as_str()), Some("p3"));
        assert_eq!(next.posts.len(), 3);

        let next = reduce(
            &next,
            Action::UpdatePost {
                id: "p3".to_string(),
                update: PostUpdate {
                    status: Some(PostStatus::Cancelled),
                    ..Default::default()
                },
            },
        );
        assert_eq!(next.post("p3").unwrap().status, PostStatus::Cancelled);
        assert_eq!(next.post("p1").unwrap().status, PostStatus::Open);

        let next = reduce(&next, Action::DeletePost("p3".to_string()));
        assert!(next.post("p3").is_none());
        assert_eq!(next.posts, state.posts);
    }

    #[test]
    fn shares_are_not_deduplicated() {
        let mut state = state_with_posts();
        for _ in 0..3 {
            state = reduce(&state, Action::IncrementShare("p1".to_string()));
        }
        assert_eq!(state.post("p1").unwrap().share_count, 3);
    }

    #[test]
    fn replies_route_by_parent_type() {
        let mut state = state_with_posts();
        state.entries.push_back(entry("shared", "u1"));
        state.contributions.push_back(contribution("shared", "u2"));

        let next = reduce(
            &state,
            Action::AddReply {
                parent_id: "shared".to_string(),
                parent_type: ParentType::Entry,
                reply: reply("reply_1", "shared", ParentType::Entry),
            },
        );
        assert_eq!(next.entry("shared").unwrap().replies.len(), 1);
        assert!(next.contribution("shared").unwrap().replies.is_empty());

        let next = reduce(
            &next,
            Action::AddReply {
                parent_id: "missing".to_string(),
                parent_type: ParentType::Contribution,
                reply: reply("reply_2", "missing", ParentType::Contribution),
            },
        );
        assert!(next.contribution("shared").unwrap().replies.is_empty());
    }

    #[test]
    fn burning_a_reply_stays_in_its_parent() {
        let mut state = state_with_posts();
        let mut e = entry("entry_1", "u1");
        e.replies.push(reply("reply_entry_1", "entry_1", ParentType::Entry));
        let mut c = contribution("contribution_1", "u2");
        c.replies.push(reply("reply_contribution_1", "contribution_1", ParentType::Contribution));
        state.entries.push_back(e);
        state.contributions.push_back(c);

        let next = reduce(&state, Action::BurnReply("reply_entry_1".to_string()));
        assert_eq!(next.reply("reply_entry_1").unwrap().burn_count, 1);
        assert_eq!(next.reply("reply_contribution_1").unwrap().burn_count, 0);
        assert_eq!(next.contributions, state.contributions);

        let next = reduce(&next, Action::BurnReply("reply_contribution_1".to_string()));
        assert_eq!(next.reply("reply_entry_1").unwrap().burn_count, 1);
        assert_eq!(next.reply("reply_contribution_1").unwrap().burn_count, 1);
    }

    #[test]
    fn badges_go_to_current_user_and_directory() {
        let mut state = state_with_posts();
        state.user = Some(sample_user("u1"));
        state.users = vec![sample_user("u1"), sample_user("u2")].into();
        let badge = Badge {
            id: "badge_1".to_string(),
            name: "First Step".to_string(),
            description: String::new(),
            icon: String::new(),
            color: None,
            tier: None,
            earned_at: None,
        };
        let next = reduce(
            &state,
            Action::AwardBadge {
                user_id: "u1".to_string(),
                badge,
            },
        );
        assert!(next.user.as_ref().unwrap().has_badge("First Step"));
        assert!(next.user_by_id("u1").unwrap().has_badge("First Step"));
        assert!(next.user_by_id("u2").unwrap().badges.is_empty());
    }

    #[test]
    fn ui_flags() {
        let state = State::default();
        let next = reduce(&state, Action::SetModal(Modal::Giveaway, true));
        assert!(next.show_giveaway_modal());
        assert!(!next.show_create_modal());
        assert!(!next.show_request_modal());
        let next = reduce(&next, Action::SetModal(Modal::Giveaway, false));
        assert!(!next.show_giveaway_modal());

        let next = reduce(&next, Action::ToggleTheme);
        assert_eq!(next.theme, Theme::Dark);
        let next = reduce(&next, Action::ToggleTheme);
        assert_eq!(next.theme, Theme::Light);

        let next = reduce(&next, Action::SetError(Some("boom".to_string())));
        assert_eq!(next.error.as_deref(), Some("boom"));
        let next = reduce(&next, Action::SetLoading(true));
        assert!(next.is_loading);
    }
}
