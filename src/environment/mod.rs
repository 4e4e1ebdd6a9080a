pub mod analytics;
pub mod auth;
pub mod config;
pub mod drafts;
pub mod platform;
pub mod repository;
pub mod seed;
pub mod storage;
pub mod types;

use std::sync::Arc;

use analytics::{AnalyticsSink, HttpAnalytics, NoopAnalytics};
use auth::{AuthProvider, MockAuth};
use config::Config;
use drafts::Drafts;
use platform::{HeadlessPlatform, Platform};
use repository::Repository;
use seed::{MockSeed, SeedData};
use storage::KeyValueStore;

/// Everything the store talks to. Cloning is cheap, all collaborators are
/// shared.
#[derive(Clone)]
pub struct Environment {
    pub config: Config,
    pub repository: Repository,
    pub seed: Arc<dyn SeedData>,
    pub auth: Arc<dyn AuthProvider>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub platform: Arc<dyn Platform>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("config", &self.config)
            .field("repository", &self.repository)
            .finish()
    }
}

impl Environment {
    /// The mock community on top of `storage`. Analytics are only sent if
    /// the config names an endpoint.
    pub fn new(config: Config, storage: Arc<dyn KeyValueStore>) -> Self {
        let seed = MockSeed;
        let auth = MockAuth::new(seed.users(), storage.clone(), config.auth_key.clone());
        let analytics: Arc<dyn AnalyticsSink> = match config.analytics_endpoint {
            Some(ref url) => Arc::new(HttpAnalytics::new(url.clone())),
            None => Arc::new(NoopAnalytics),
        };
        Self {
            repository: Repository::new(
                storage,
                config.state_key.clone(),
                config.theme_key.clone(),
            ),
            seed: Arc::new(seed),
            auth: Arc::new(auth),
            analytics,
            platform: Arc::new(HeadlessPlatform),
            config,
        }
    }

    pub fn with_seed(mut self, seed: impl SeedData + 'static) -> Self {
        self.seed = Arc::new(seed);
        self
    }

    pub fn with_auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    pub fn with_analytics(mut self, analytics: impl AnalyticsSink + 'static) -> Self {
        self.analytics = Arc::new(analytics);
        self
    }

    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Arc::new(platform);
        self
    }

    pub fn drafts(&self) -> Drafts {
        Drafts::new(self.repository.storage(), self.config.drafts_key.clone())
    }
}
