use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{info, warn};

use crate::api::error;
use crate::configs::LocalStorage;
use crate::modules::user::schema::UserEntity;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserEntity,
}

/// Single source of truth for the signed-in identity.
///
/// The bearer header is derived from this store when a request is sent, so
/// clearing it detaches the token from every later request.
#[derive(Debug)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
    storage: LocalStorage,
}

impl SessionStore {
    /// Starts logged out. Nothing is read from storage.
    pub fn empty(storage: LocalStorage) -> Self {
        Self { current: RwLock::new(None), storage }
    }

    /// Loads a previously persisted session without asking the server whether
    /// it is still valid. The first 401 evicts it.
    pub fn restore(storage: LocalStorage) -> Self {
        let token = storage.get::<String>(TOKEN_KEY);
        let user = storage.get::<UserEntity>(USER_KEY);

        let session = match (token, user) {
            (Ok(Some(token)), Ok(Some(user))) if !token.is_empty() => {
                info!("restored session for {}", user.username);
                Some(Session { token, user })
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("ignoring unreadable session in {}: {e}", storage.path().display());
                None
            }
            _ => None,
        };

        Self { current: RwLock::new(session), storage }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persists both keys together, then makes the session current.
    pub fn establish(&self, token: String, user: UserEntity) -> Result<(), error::SystemError> {
        if token.is_empty() {
            return Err(error::SystemError::MissingField("token"));
        }
        self.storage.set_many(&[
            (TOKEN_KEY, serde_json::Value::String(token.clone())),
            (USER_KEY, serde_json::to_value(&user)?),
        ])?;

        info!("signed in as {} ({})", user.username, user.role);
        *self.write() = Some(Session { token, user });
        Ok(())
    }

    /// Clears memory before touching storage.
    pub fn logout(&self) -> Result<(), error::SystemError> {
        self.write().take();
        self.storage.delete_many(&[TOKEN_KEY, USER_KEY])
    }

    /// Forced logout after the server rejected the token.
    pub fn evict(&self) {
        if self.write().take().is_some() {
            warn!("session rejected by server, signing out");
        }
        if let Err(e) = self.storage.delete_many(&[TOKEN_KEY, USER_KEY]) {
            warn!("failed to clear stored session: {e}");
        }
    }

    /// Replaces the stored user record, keeping the token.
    pub fn refresh_user(&self, user: UserEntity) -> Result<(), error::SystemError> {
        let mut guard = self.write();
        let Some(session) = guard.as_mut() else {
            return Err(error::SystemError::unauthorized("Not signed in"));
        };
        self.storage.set(USER_KEY, &user)?;
        session.user = user;
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserEntity> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn snapshot(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|s| s.user.is_admin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::schema::UserRole;

    fn admin() -> UserEntity {
        UserEntity {
            id: 1,
            username: "root".into(),
            email: "root@example.com".into(),
            role: UserRole::Admin,
            inviter_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_establish_persists_and_restores() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("session.json"));
        let store = SessionStore::empty(storage.clone());

        store.establish("abc123".into(), admin()).unwrap();
        assert_eq!(store.token().as_deref(), Some("abc123"));
        assert!(store.is_admin());

        let restored = SessionStore::restore(storage);
        let session = restored.snapshot().unwrap();
        assert_eq!(session.token, "abc123");
        assert_eq!(session.user.id, 1);
        assert_eq!(session.user.role, UserRole::Admin);
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::empty(LocalStorage::new(dir.path().join("s.json")));
        assert!(store.establish(String::new(), admin()).is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_clears_memory_and_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("s.json"));
        let store = SessionStore::empty(storage.clone());
        store.establish("abc123".into(), admin()).unwrap();

        store.logout().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!SessionStore::restore(storage).is_authenticated());
    }

    #[test]
    fn test_restore_requires_both_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("s.json"));
        storage.set(TOKEN_KEY, &"orphan").unwrap();
        assert!(!SessionStore::restore(storage).is_authenticated());
    }

    #[test]
    fn test_refresh_user_keeps_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("s.json"));
        let store = SessionStore::empty(storage.clone());
        store.establish("abc123".into(), admin()).unwrap();

        let mut renamed = admin();
        renamed.username = "superuser".into();
        store.refresh_user(renamed).unwrap();

        let restored = SessionStore::restore(storage).snapshot().unwrap();
        assert_eq!(restored.token, "abc123");
        assert_eq!(restored.user.username, "superuser");
    }
}
