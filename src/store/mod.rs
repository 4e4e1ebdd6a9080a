mod action;
pub mod badges;
pub mod persistence;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::reduce;
pub use state::State;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::Utc;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::environment::analytics::{AnalyticsEvent, EventType};
use crate::environment::auth::Session;
use crate::environment::types::*;
use crate::environment::Environment;
use crate::error::StoreError;
use crate::helper::mint_id;

/// The application store. Clones share the same state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    environment: Environment,
    state: Mutex<State>,
    hydration_started: AtomicBool,
    hydrated: AtomicBool,
    pending_write: Mutex<Option<JoinHandle<()>>>,
    error_generation: AtomicU64,
    /// Last page reported through `track_page_view`
    current_page: Mutex<Option<String>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.lock_state())
            .field("hydrated", &self.is_hydrated())
            .finish()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        // a write that is still waiting for its quiet period happens now
        if let Some(handle) = lock(&self.pending_write).take() {
            handle.abort();
            self.write_snapshot();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    fn write_snapshot(&self) {
        let raw = match persistence::serialize(&self.lock_state()) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("Could not serialize state: {e:?}");
                return;
            }
        };
        match self.environment.repository.set_snapshot(&raw) {
            Ok(_) => log::debug!("persisted state ({} bytes)", raw.len()),
            Err(e) => log::error!("Failed to save state to storage: {e}"),
        }
    }
}

impl Store {
    pub fn new(environment: Environment) -> Self {
        Self {
            inner: Arc::new(Inner {
                environment,
                state: Mutex::new(State::default()),
                hydration_started: AtomicBool::new(false),
                hydrated: AtomicBool::new(false),
                pending_write: Mutex::new(None),
                error_generation: AtomicU64::new(0),
                current_page: Mutex::new(None),
            }),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.inner.environment
    }

    /// A copy of the current state
    pub fn state(&self) -> State {
        self.inner.lock_state().clone()
    }

    pub fn with<T>(&self, action: impl FnOnce(&State) -> T) -> T {
        action(&self.inner.lock_state())
    }

    /// `false` until `hydrate` finished. Until then the state is not
    /// trustworthy, e.g. a missing user doesn't mean logged out.
    pub fn is_hydrated(&self) -> bool {
        self.inner.hydrated.load(Ordering::SeqCst)
    }

    /// Load the persisted snapshot, the seed data, the session and the theme
    /// preference. Only the first call does anything; returns whether this
    /// call hydrated.
    pub fn hydrate(&self) -> bool {
        if self.inner.hydration_started.swap(true, Ordering::SeqCst) {
            return false;
        }
        let environment = &self.inner.environment;

        match environment.repository.snapshot() {
            Some(raw) => match persistence::deserialize(&raw) {
                Some(snapshot) => self.dispatch(Action::Hydrate(snapshot)),
                None => log::warn!("Ignoring unreadable state snapshot"),
            },
            None => log::debug!("no persisted state"),
        }

        self.dispatch(Action::SetUsers(environment.seed.users().into()));
        self.dispatch(Action::SetPosts(environment.seed.posts().into()));

        if let Some(user) = environment.auth.current_user() {
            log::debug!("restored session for {}", user.id);
            self.dispatch(Action::SetUser(Some(user)));
        }

        if let Some(saved) = environment.repository.theme() {
            if saved != self.with(|s| s.theme) {
                self.dispatch(Action::ToggleTheme);
            }
        }
        let theme = self.with(|s| s.theme);
        environment.repository.set_theme(theme);
        environment.platform.apply_theme(theme);

        self.inner.hydrated.store(true, Ordering::SeqCst);
        true
    }

    /// Run `action` through the reducer and perform the follow up effects:
    /// theme sync and the debounced write.
    pub fn dispatch(&self, action: Action) {
        let (changed, theme_changed, theme) = {
            let mut state = self.inner.lock_state();
            let next = reduce(&state, action);
            let changed = next != *state;
            let theme_changed = next.theme != state.theme;
            let theme = next.theme;
            *state = next;
            (changed, theme_changed, theme)
        };

        if !self.is_hydrated() {
            return;
        }
        if theme_changed {
            self.inner.environment.repository.set_theme(theme);
            self.inner.environment.platform.apply_theme(theme);
        }
        if changed {
            self.schedule_write();
        }
    }

    /// (Re)arm the debounced snapshot write
    fn schedule_write(&self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.inner.write_snapshot();
            return;
        };
        let delay = self.inner.environment.config.persist_debounce();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let mut pending = lock(&self.inner.pending_write);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                lock(&inner.pending_write).take();
                inner.write_snapshot();
            }
        }));
    }

    /// Cancel a pending write and persist right away
    pub fn flush(&self) {
        if let Some(handle) = lock(&self.inner.pending_write).take() {
            handle.abort();
        }
        self.inner.write_snapshot();
    }

    pub fn has_pending_write(&self) -> bool {
        lock(&self.inner.pending_write).is_some()
    }

    // Session

    /// Make the `user` slot match an auth session signal. A session for
    /// an id the directory doesn't know leaves the current user alone.
    pub fn sync_session(&self, session: Option<&str>) {
        let Some(id) = session else {
            self.dispatch(Action::SetUser(None));
            return;
        };
        match self.inner.environment.auth.lookup_user_by_id(id) {
            Some(user) => self.dispatch(Action::SetUser(Some(user))),
            None => log::warn!("session for unknown user {id}"),
        }
    }

    /// Follow session signals until the sender side goes away or the store
    /// is dropped
    pub async fn watch_sessions(&self, sessions: flume::Receiver<Session>) {
        let weak = Arc::downgrade(&self.inner);
        follow_sessions(weak, sessions).await
    }

    /// Subscribe to the auth provider and follow it on a background task
    pub fn spawn_session_sync(&self) -> JoinHandle<()> {
        let sessions = self.inner.environment.auth.subscribe();
        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(follow_sessions(weak, sessions))
    }

    pub fn login(&self, user_id: &str) -> Result<User, StoreError> {
        let user = self
            .inner
            .environment
            .auth
            .login(user_id)
            .ok_or_else(|| StoreError::UnknownUser(user_id.to_string()))?;
        self.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    pub fn login_by_username(&self, username: &str) -> Result<User, StoreError> {
        let user = self
            .inner
            .environment
            .auth
            .login_by_username(username)
            .ok_or_else(|| StoreError::UnknownUser(username.to_string()))?;
        self.dispatch(Action::SetUser(Some(user.clone())));
        Ok(user)
    }

    pub fn logout(&self) {
        self.inner.environment.auth.logout();
        self.dispatch(Action::SetUser(None));
    }

    pub fn set_current_user(&self, user: Option<User>) {
        self.dispatch(Action::SetUser(user));
    }

    fn current_user(&self) -> Result<User, StoreError> {
        self.with(|s| s.user.clone()).ok_or(StoreError::NotLoggedIn)
    }

    // Posts

    pub fn create_post(&self, new_post: NewPost) -> Result<Post, StoreError> {
        let author = self.current_user()?;
        if let Err(e) = crate::validation::validate_post(&new_post) {
            self.set_error(e.to_string());
            return Err(e.into());
        }
        let now = Utc::now();
        let post = Post {
            id: mint_id("post"),
            kind: new_post.kind,
            category: new_post.category,
            author_id: author.id.clone(),
            author,
            title: new_post.title,
            description: new_post.description,
            media: new_post.media,
            status: PostStatus::Open,
            created_at: now,
            updated_at: now,
            ends_at: new_post
                .duration
                .map(|days| now + chrono::Duration::days(days.into())),
            burn_count: 0,
            share_count: 0,
            comment_count: 0,
            likes_count: 0,
            entries_count: 0,
            prize_amount: new_post.prize_amount,
            currency: new_post.currency,
            max_winners: new_post.max_winners,
            selection_method: new_post.selection_method,
            winners: Vec::new(),
            target_amount: new_post.target_amount,
            current_amount: new_post.target_amount.map(|_| 0.0),
            entries: Vec::new(),
            contributions: Vec::new(),
        };
        self.dispatch(Action::AddPost(post.clone()));
        self.track(
            EventType::PostCreated,
            json!({
                "postId": post.id,
                "category": post.category,
                "type": post.kind.to_string(),
            }),
        );
        Ok(post)
    }

    pub fn add_post(&self, post: Post) {
        self.dispatch(Action::AddPost(post));
    }

    pub fn update_post(&self, id: &str, update: PostUpdate) {
        self.dispatch(Action::UpdatePost {
            id: id.to_string(),
            update,
        });
    }

    pub fn delete_post(&self, id: &str) {
        self.dispatch(Action::DeletePost(id.to_string()));
    }

    pub fn burn_post(&self, id: &str) {
        self.dispatch(Action::BurnPost(id.to_string()));
    }

    // Entries, contributions, replies

    pub fn submit_entry(&self, new_entry: NewEntry) -> Result<Entry, StoreError> {
        let user = self.current_user()?;
        let entry = Entry {
            id: mint_id("entry"),
            post_id: new_entry.post_id,
            user_id: user.id.clone(),
            user,
            message: new_entry.message,
            content: new_entry.content,
            proof_url: new_entry.proof_url,
            is_winner: false,
            submitted_at: Utc::now(),
            replies: Vec::new(),
        };
        self.dispatch(Action::AddEntry(entry.clone()));
        self.track(
            EventType::EntrySubmitted,
            json!({"postId": entry.post_id, "entryId": entry.id}),
        );
        self.award_badges(&entry.user_id);
        Ok(entry)
    }

    pub fn add_entry(&self, entry: Entry) {
        self.dispatch(Action::AddEntry(entry));
    }

    pub fn update_entry(&self, id: &str, update: EntryUpdate) {
        self.dispatch(Action::UpdateEntry {
            id: id.to_string(),
            update,
        });
    }

    pub fn make_contribution(
        &self,
        new_contribution: NewContribution,
    ) -> Result<HelpContribution, StoreError> {
        let user = self.current_user()?;
        let contribution = HelpContribution {
            id: mint_id("contribution"),
            post_id: new_contribution.post_id,
            user_id: user.id.clone(),
            user,
            amount: new_contribution.amount,
            currency: new_contribution.currency,
            message: new_contribution.message,
            is_anonymous: new_contribution.is_anonymous,
            contributed_at: Utc::now(),
            replies: Vec::new(),
        };
        self.dispatch(Action::AddContribution(contribution.clone()));
        self.track(
            EventType::ContributionMade,
            json!({"postId": contribution.post_id, "amount": contribution.amount}),
        );
        self.award_badges(&contribution.user_id);
        Ok(contribution)
    }

    pub fn add_reply(
        &self,
        parent_id: &str,
        parent_type: ParentType,
        content: impl Into<String>,
    ) -> Result<Reply, StoreError> {
        let user = self.current_user()?;
        let reply = Reply {
            id: mint_id("reply"),
            parent_id: parent_id.to_string(),
            parent_type,
            user_id: user.id.clone(),
            user,
            content: content.into(),
            burn_count: 0,
            created_at: Utc::now(),
        };
        self.dispatch(Action::AddReply {
            parent_id: parent_id.to_string(),
            parent_type,
            reply: reply.clone(),
        });
        Ok(reply)
    }

    pub fn burn_reply(&self, id: &str) {
        self.dispatch(Action::BurnReply(id.to_string()));
    }

    /// Award every badge `user_id` newly qualifies for
    fn award_badges(&self, user_id: &str) {
        let awarded = self.with(|s| {
            let holder = s
                .user_by_id(user_id)
                .or_else(|| s.user.as_ref().filter(|u| u.id == user_id))?;
            Some(badges::evaluate(
                user_id,
                &s.entries,
                &s.contributions,
                &holder.badges,
            ))
        });
        for badge in awarded.unwrap_or_default() {
            log::info!("{user_id} earned {:?}", badge.name);
            self.dispatch(Action::AwardBadge {
                user_id: user_id.to_string(),
                badge,
            });
        }
    }

    // Interactions

    pub fn toggle_like(&self, id: &str) {
        self.dispatch(Action::ToggleLike(id.to_string()));
        if self.with(|s| s.is_liked(id)) {
            self.track(EventType::LikeAdded, json!({ "targetId": id }));
        }
    }

    pub fn toggle_burn(&self, id: &str) {
        self.dispatch(Action::ToggleBurn(id.to_string()));
    }

    pub fn increment_share(&self, post_id: &str) {
        self.dispatch(Action::IncrementShare(post_id.to_string()));
        self.track(EventType::ShareClicked, json!({ "postId": post_id }));
    }

    // Ui

    pub fn toggle_theme(&self) {
        self.dispatch(Action::ToggleTheme);
    }

    pub fn set_show_create_modal(&self, show: bool) {
        self.dispatch(Action::SetModal(Modal::Create, show));
    }

    pub fn set_show_giveaway_modal(&self, show: bool) {
        self.dispatch(Action::SetModal(Modal::Giveaway, show));
    }

    pub fn set_show_request_modal(&self, show: bool) {
        self.dispatch(Action::SetModal(Modal::Request, show));
    }

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(Action::SetLoading(loading));
    }

    /// Show an error. It is cleared after the configured display time
    /// unless a newer error replaced it.
    pub fn set_error(&self, message: impl Into<String>) {
        self.set_error_from(message, DEFAULT_ERROR_SOURCE)
    }

    /// Like `set_error`, `source` names the part of the app that failed
    pub fn set_error_from(&self, message: impl Into<String>, source: &str) {
        let message = message.into();
        let generation = self.inner.error_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatch(Action::SetError(Some(message.clone())));
        self.track(
            EventType::ErrorOccurred,
            json!({ "message": truncate_message(&message), "source": source }),
        );

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let delay = self.inner.environment.config.error_display();
        let weak = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else { return };
            if inner.error_generation.load(Ordering::SeqCst) == generation {
                Store { inner }.dispatch(Action::SetError(None));
            }
        });
    }

    pub fn clear_error(&self) {
        self.inner.error_generation.fetch_add(1, Ordering::SeqCst);
        self.dispatch(Action::SetError(None));
    }

    /// Report a page view. Later events carry `path` as their page url.
    pub fn track_page_view(&self, path: &str) {
        *lock(&self.inner.current_page) = Some(path.to_string());
        self.track(EventType::PageView, json!({ "path": path }));
    }

    fn track(&self, event_type: EventType, data: Value) {
        let user_id = self.with(|s| s.user.as_ref().map(|u| u.id.clone()));
        let page_url = lock(&self.inner.current_page).clone();
        self.inner
            .environment
            .analytics
            .track(AnalyticsEvent::new(event_type, data, user_id).with_page_url(page_url));
    }
}

/// Error messages longer than this are cut before they are reported
const MAX_REPORTED_ERROR_CHARS: usize = 200;

const DEFAULT_ERROR_SOURCE: &str = "app-context";

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_REPORTED_ERROR_CHARS) {
        Some((end, _)) => format!("{}…", &message[..end]),
        None => message.to_string(),
    }
}

async fn follow_sessions(weak: Weak<Inner>, sessions: flume::Receiver<Session>) {
    while let Ok(session) = sessions.recv_async().await {
        let Some(inner) = weak.upgrade() else { break };
        Store { inner }.sync_session(session.as_deref());
    }
}
