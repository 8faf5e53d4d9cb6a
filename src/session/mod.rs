//! Session management: credentials, persistence and authentication state.

mod credentials;
#[allow(clippy::module_inception)]
mod session;
mod store;

pub use credentials::Credentials;
pub use session::{Session, SessionState, CREDENTIALS_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
