use std::sync::Arc;

use crate::environment::config::Config;
use crate::environment::storage::{FileStore, KeyValueStore};
use crate::environment::Environment;
use crate::error::StoreError;
use crate::store::Store;

pub fn init_logging() {
    use env_logger::Env;
    use std::io::Write;
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} {} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Stdout)
        .try_init();
}

/// Open the file backed storage, hydrate a store on top of it and keep it
/// in sync with the auth session. Needs a tokio runtime.
///
/// The configuration is read from the default data directory; a
/// `dataDirectory` in there moves the state somewhere else.
pub fn launch() -> Result<Store, StoreError> {
    let defaults = FileStore::in_data_directory()?;
    let config = Config::load(&defaults);
    let storage: Arc<dyn KeyValueStore> = match config.data_directory {
        Some(ref directory) => Arc::new(FileStore::new(directory)?),
        None => Arc::new(defaults),
    };
    log::info!("Launching with {config:?}");

    let store = Store::new(Environment::new(config, storage));
    store.hydrate();
    store.spawn_session_sync();
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_can_be_initialized_twice() {
        init_logging();
        init_logging();
        log::debug!("still alive");
    }
}
