//! Session management and authentication.
//!
//! This module handles login, the optimistic restore of persisted
//! credentials, and logout (explicit or forced by an authorization failure).

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::credentials::Credentials;
use super::store::KeyValueStore;
use crate::api::RemoteApi;
use crate::error::{FmError, Result};

/// Storage key the credentials are persisted under.
pub const CREDENTIALS_KEY: &str = "fm_creds";

/// Authentication state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credentials held.
    LoggedOut,
    /// Credentials restored from storage, not yet confirmed by the server.
    Unverified,
    /// Credentials confirmed by a server round-trip.
    Verified,
}

#[derive(Debug)]
struct SessionInner {
    credentials: Option<Credentials>,
    state: SessionState,
    // Bumped on every login/logout so late responses of an older session
    // can be recognised and ignored.
    epoch: u64,
}

/// Authenticated session shared by every controller component.
///
/// The authorization value is derived from the held credentials on every
/// call to [`Session::authorization`], so a credential change takes effect
/// with the very next request.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    inner: Mutex<SessionInner>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a logged-out session persisting to `store`.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            inner: Mutex::new(SessionInner {
                credentials: None,
                state: SessionState::LoggedOut,
                epoch: 0,
            }),
        }
    }

    /// Create a session from whatever credentials `store` holds.
    ///
    /// Restored credentials are trusted optimistically: the session reports
    /// itself authenticated but [`SessionState::Unverified`] until the first
    /// API call succeeds. Unreadable stored data leaves the session logged out.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let session = Self::new(store);
        match session.load_stored() {
            Ok(Some(credentials)) => {
                info!("restored session for {}", credentials.username);
                let mut inner = session.inner.lock();
                inner.credentials = Some(credentials);
                inner.state = SessionState::Unverified;
            }
            Ok(None) => debug!("no stored session"),
            Err(e) => warn!("ignoring unreadable stored session: {}", e),
        }
        session
    }

    fn load_stored(&self) -> Result<Option<Credentials>> {
        let Some(json) = self.store.get(CREDENTIALS_KEY)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Current authentication state.
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// True while credentials are held, verified or not.
    pub fn is_authenticated(&self) -> bool {
        self.state() != SessionState::LoggedOut
    }

    /// True once the server has accepted the held credentials.
    pub fn is_verified(&self) -> bool {
        self.state() == SessionState::Verified
    }

    /// Username of the held credentials.
    pub fn username(&self) -> Option<String> {
        self.inner
            .lock()
            .credentials
            .as_ref()
            .map(|c| c.username.clone())
    }

    /// Login/logout generation counter.
    pub fn epoch(&self) -> u64 {
        self.inner.lock().epoch
    }

    /// Authorization value for the next request.
    ///
    /// Fails with [`FmError::Unauthorized`] when no credentials are held.
    pub fn authorization(&self) -> Result<String> {
        self.inner
            .lock()
            .credentials
            .as_ref()
            .map(Credentials::authorization)
            .ok_or(FmError::Unauthorized)
    }

    /// Authorization value together with the epoch it belongs to, read
    /// atomically so the outcome of the request can be attributed to the
    /// right session.
    pub fn authorize(&self) -> Result<(String, u64)> {
        let inner = self.inner.lock();
        let credentials = inner.credentials.as_ref().ok_or(FmError::Unauthorized)?;
        Ok((credentials.authorization(), inner.epoch))
    }

    /// Record that a request issued during `epoch` succeeded, which confirms
    /// restored credentials.
    pub fn confirm(&self, epoch: u64) {
        let mut inner = self.inner.lock();
        if inner.epoch == epoch && inner.state == SessionState::Unverified {
            debug!("restored session verified");
            inner.state = SessionState::Verified;
        }
    }

    /// Check credentials against the server and adopt them on success.
    ///
    /// Rejections surface as [`FmError::InvalidCredentials`]; transport
    /// failures as [`FmError::Network`]. Nothing is retried. On success the
    /// credentials are persisted; a storage failure is logged but does not
    /// fail the login.
    pub async fn login(&self, api: &dyn RemoteApi, username: &str, password: &str) -> Result<()> {
        let candidate = Credentials::new(username, password);
        info!("logging in as {}", username);

        match api.login(&candidate.authorization()).await {
            Ok(()) => {}
            Err(FmError::Unauthorized) => return Err(FmError::InvalidCredentials),
            Err(FmError::OperationFailed { status, .. }) => {
                debug!("login rejected with status {}", status);
                return Err(FmError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        }

        match serde_json::to_string(&candidate) {
            Ok(json) => {
                if let Err(e) = self.store.set(CREDENTIALS_KEY, &json) {
                    warn!("could not persist credentials: {}", e);
                }
            }
            Err(e) => warn!("could not serialize credentials: {}", e),
        }

        let mut inner = self.inner.lock();
        inner.credentials = Some(candidate);
        inner.state = SessionState::Verified;
        inner.epoch += 1;
        info!("logged in as {}", username);
        Ok(())
    }

    /// Drop the credentials from memory and storage.
    pub fn logout(&self) {
        info!("logging out");
        self.clear();
    }

    /// Forced logout after the server answered 401.
    ///
    /// Unlike [`Session::expire`] this clears whatever session is current,
    /// without checking which epoch the rejected request belonged to.
    pub fn on_unauthorized(&self) {
        warn!("server rejected credentials, session cleared");
        self.clear();
    }

    /// Forced logout caused by a request issued during `epoch`.
    ///
    /// A 401 answering a request of an earlier session (one already replaced
    /// by a logout or a fresh login) is ignored. Returns whether the session
    /// was cleared.
    pub fn expire(&self, epoch: u64) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.epoch != epoch {
                debug!("ignoring 401 from a previous session");
                return false;
            }
            Self::reset(&mut inner);
        }
        warn!("server rejected credentials, session cleared");
        self.forget();
        true
    }

    fn clear(&self) {
        Self::reset(&mut self.inner.lock());
        self.forget();
    }

    fn reset(inner: &mut SessionInner) {
        inner.credentials = None;
        inner.state = SessionState::LoggedOut;
        inner.epoch += 1;
    }

    fn forget(&self) {
        if let Err(e) = self.store.remove(CREDENTIALS_KEY) {
            warn!("could not remove stored credentials: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    fn stored(store: &MemoryStore) -> Option<String> {
        store.get(CREDENTIALS_KEY).unwrap()
    }

    #[test]
    fn test_new_session_is_logged_out() {
        let session = Session::new(Arc::new(MemoryStore::new()));
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert!(!session.is_authenticated());
        assert!(matches!(session.authorization(), Err(FmError::Unauthorized)));
    }

    #[test]
    fn test_restore_is_unverified() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(CREDENTIALS_KEY, r#"{"username":"admin","password":"secret"}"#)
            .unwrap();

        let session = Session::restore(store);
        assert_eq!(session.state(), SessionState::Unverified);
        assert!(session.is_authenticated());
        assert!(!session.is_verified());
        assert_eq!(session.authorization().unwrap(), "Basic YWRtaW46c2VjcmV0");

        session.confirm(session.epoch());
        assert!(session.is_verified());
    }

    #[test]
    fn test_confirm_ignores_old_epoch() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(CREDENTIALS_KEY, r#"{"username":"a","password":"b"}"#)
            .unwrap();
        let session = Session::restore(store);
        let stale = session.epoch().wrapping_sub(1);
        session.confirm(stale);
        assert_eq!(session.state(), SessionState::Unverified);
    }

    #[test]
    fn test_restore_ignores_garbage() {
        let store = Arc::new(MemoryStore::new());
        store.set(CREDENTIALS_KEY, "{not json").unwrap();
        let session = Session::restore(store);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_unauthorized_clears_storage() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(CREDENTIALS_KEY, r#"{"username":"a","password":"b"}"#)
            .unwrap();
        let session = Session::restore(store.clone());
        let before = session.epoch();

        session.on_unauthorized();
        assert_eq!(session.state(), SessionState::LoggedOut);
        assert_eq!(stored(&store), None);
        assert!(session.epoch() > before);
        assert!(session.username().is_none());
    }

    #[test]
    fn test_expire_only_current_epoch() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(CREDENTIALS_KEY, r#"{"username":"a","password":"b"}"#)
            .unwrap();
        let session = Session::restore(store.clone());
        let (auth, epoch) = session.authorize().unwrap();
        assert_eq!(auth, "Basic YTpi");

        assert!(!session.expire(epoch + 1));
        assert!(session.is_authenticated());

        assert!(session.expire(epoch));
        assert!(!session.is_authenticated());
        assert_eq!(stored(&store), None);
        assert!(!session.expire(epoch));
    }
}
