mod app;
pub mod environment;
mod error;
mod helper;
pub mod store;
pub mod validation;

pub use app::{init_logging, launch};
pub use environment::config::Config;
pub use environment::Environment;
pub use error::{StorageError, StoreError};
pub use helper::mint_id;
pub use store::{Action, State, Store};
pub use validation::ValidationError;
