//! Mock wallet authentication. A login is an id lookup in the mock user
//! table; the session is remembered in local storage and broadcast to
//! every subscriber.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use flume::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use super::storage::KeyValueStore;
use super::types::{User, UserId};

/// Session signal: the logged in user id, or `None` after a logout
pub type Session = Option<UserId>;

pub trait UserDirectory: Send + Sync {
    fn lookup_user_by_id(&self, id: &str) -> Option<User>;
}

pub trait AuthProvider: UserDirectory {
    fn login(&self, user_id: &str) -> Option<User>;
    fn login_by_username(&self, username: &str) -> Option<User>;
    fn logout(&self);
    /// The user of the persisted session, if any
    fn current_user(&self) -> Option<User>;
    fn subscribe(&self) -> Receiver<Session>;
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user_id: UserId,
    pub username: String,
    /// Milliseconds since the epoch
    pub login_time: i64,
}

#[derive(Clone)]
pub struct MockAuth {
    users: Arc<Vec<User>>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
    subscribers: Arc<Mutex<Vec<Sender<Session>>>>,
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth")
            .field("users", &self.users.len())
            .field("key", &self.key)
            .finish()
    }
}

impl MockAuth {
    pub fn new(users: Vec<User>, storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            users: Arc::new(users),
            storage,
            key: key.into(),
            subscribers: Default::default(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn auth_data(&self) -> Option<AuthData> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::error!("[Mock Auth] Failed to read auth data: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                log::error!("[Mock Auth] Failed to parse auth data: {e}");
                None
            }
        }
    }

    fn broadcast(&self, session: Session) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            log::error!("[Mock Auth] Subscriber list poisoned");
            return;
        };
        subscribers.retain(|sender| sender.send(session.clone()).is_ok());
    }

    fn clear(&self) {
        if let Err(e) = self.storage.remove_item(&self.key) {
            log::error!("[Mock Auth] Failed to remove auth data: {e}");
        }
    }
}

impl UserDirectory for MockAuth {
    fn lookup_user_by_id(&self, id: &str) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }
}

impl AuthProvider for MockAuth {
    fn login(&self, user_id: &str) -> Option<User> {
        let Some(user) = self.lookup_user_by_id(user_id) else {
            log::warn!("[Mock Auth] User with ID {user_id:?} not found");
            return None;
        };
        let data = AuthData {
            user_id: user.id.clone(),
            username: user.username.clone(),
            login_time: Utc::now().timestamp_millis(),
        };
        match serde_json::to_string(&data) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(&self.key, &raw) {
                    log::error!("[Mock Auth] Failed to save auth data: {e}");
                }
            }
            Err(e) => log::error!("[Mock Auth] Failed to encode auth data: {e}"),
        }
        self.broadcast(Some(user.id.clone()));
        Some(user)
    }

    fn login_by_username(&self, username: &str) -> Option<User> {
        let Some(user) = self
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
        else {
            log::warn!("[Mock Auth] User with username {username:?} not found");
            return None;
        };
        let id = user.id.clone();
        self.login(&id)
    }

    fn logout(&self) {
        self.clear();
        self.broadcast(None);
    }

    fn current_user(&self) -> Option<User> {
        let data = self.auth_data()?;
        let user = self.lookup_user_by_id(&data.user_id);
        if user.is_none() {
            log::warn!("[Mock Auth] Stored user ID not found in mock users, clearing auth");
            self.clear();
        }
        user
    }

    fn subscribe(&self) -> Receiver<Session> {
        let (sender, receiver) = flume::unbounded();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::seed::MOCK_USERS;
    use crate::environment::storage::MemoryStore;

    fn auth() -> (MockAuth, MemoryStore) {
        let storage = MemoryStore::new();
        let auth = MockAuth::new(MOCK_USERS.clone(), Arc::new(storage.clone()), "geev_auth");
        (auth, storage)
    }

    #[test]
    fn login_persists_and_broadcasts() {
        let (auth, storage) = auth();
        let sessions = auth.subscribe();
        let user = auth.login("user-2").unwrap();
        assert_eq!(user.username, "sarahj");
        assert_eq!(sessions.try_recv().unwrap(), Some("user-2".to_string()));

        let raw = storage.get_item("geev_auth").unwrap().unwrap();
        let data: AuthData = serde_json::from_str(&raw).unwrap();
        assert_eq!(data.user_id, "user-2");
        assert_eq!(auth.current_user().map(|u| u.id), Some("user-2".to_string()));

        auth.logout();
        assert_eq!(sessions.try_recv().unwrap(), None);
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn login_by_username_ignores_case() {
        let (auth, _) = auth();
        assert_eq!(auth.login_by_username("DavidK").map(|u| u.id), Some("user-5".to_string()));
        assert!(auth.login_by_username("nobody").is_none());
    }

    #[test]
    fn unknown_login_changes_nothing() {
        let (auth, storage) = auth();
        let sessions = auth.subscribe();
        assert!(auth.login("user-404").is_none());
        assert!(sessions.try_recv().is_err());
        assert!(storage.get_item("geev_auth").unwrap().is_none());
    }

    #[test]
    fn stale_session_is_cleared() {
        let storage = MemoryStore::with_items([(
            "geev_auth",
            r#"{"userId":"user-404","username":"ghost","loginTime":0}"#,
        )]);
        let auth = MockAuth::new(MOCK_USERS.clone(), Arc::new(storage.clone()), "geev_auth");
        assert!(auth.current_user().is_none());
        assert!(storage.get_item("geev_auth").unwrap().is_none());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let (auth, _) = auth();
        drop(auth.subscribe());
        auth.login("user-1");
        assert_eq!(auth.subscribers.lock().unwrap().len(), 0);
    }
}
