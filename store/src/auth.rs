//! Simulated accounts.
//!
//! Users live as a JSON array in local storage. A successful login stores the
//! password as the TMDB key for the session, so the "password" a user
//! registers with is their TMDB v3 key.

use serde::{Deserialize, Serialize};

use reel_types::{Email, Password};

use crate::error::{AuthError, StoreError};
use crate::keys;
use crate::local::{KeyValueStore, Storage};

/// A registered account as stored under `users`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Credentials saved by "remember me" to prefill the sign-in form.
pub type RememberedUser = StoredUser;

/// Where a login keeps the TMDB key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginPersistence {
    /// Local storage; survives restarts.
    #[default]
    Remember,
    /// Session storage; gone when the process exits.
    SessionOnly,
}

pub struct AuthService<'a> {
    storage: &'a mut Storage,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    pub fn try_register(&mut self, email: &Email, password: &Password) -> Result<(), AuthError> {
        let mut users = load_users(&self.storage.local)?;
        if users.iter().any(|user| user.email == email.as_str()) {
            tracing::info!(email = %email, "Registration rejected: user exists");
            return Err(AuthError::UserExists);
        }

        users.push(StoredUser {
            email: email.as_str().to_string(),
            password: password.expose().to_string(),
        });
        self.storage.local.set_json(keys::USERS, &users)?;
        tracing::info!(email = %email, "Registered user");
        Ok(())
    }

    pub fn try_login(
        &mut self,
        email: &Email,
        password: &Password,
        persistence: LoginPersistence,
    ) -> Result<StoredUser, AuthError> {
        let users = load_users(&self.storage.local)?;
        let Some(user) = users
            .into_iter()
            .find(|user| user.email == email.as_str() && user.password == password.expose())
        else {
            tracing::warn!(email = %email, "Authentication failed");
            return Err(AuthError::InvalidCredentials);
        };

        match persistence {
            LoginPersistence::Remember => {
                self.storage.local.set(keys::API_KEY, password.expose())?;
            }
            LoginPersistence::SessionOnly => {
                self.storage.session.set(keys::API_KEY, password.expose())?;
            }
        }
        self.storage.local.set(keys::IS_AUTHENTICATED, "true")?;
        self.storage.local.set(keys::CURRENT_USER, email.as_str())?;

        tracing::info!(email = %email, ?persistence, "User authenticated");
        Ok(user)
    }

    pub fn set_remember_user(
        &mut self,
        email: &Email,
        password: &Password,
        remember: bool,
    ) -> Result<(), StoreError> {
        if remember {
            self.storage.local.set_json(
                keys::REMEMBER_USER,
                &RememberedUser {
                    email: email.as_str().to_string(),
                    password: password.expose().to_string(),
                },
            )
        } else {
            self.storage.local.remove(keys::REMEMBER_USER).map(|_| ())
        }
    }

    #[must_use]
    pub fn remembered_user(&self) -> Option<RememberedUser> {
        let raw = self.storage.local.get(keys::REMEMBER_USER)?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable rememberUser entry: {e}");
                None
            }
        }
    }

    /// Clear the signed-in state. Registered users and "remember me" stay.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.storage.local.remove_all(&[
            keys::API_KEY,
            keys::IS_AUTHENTICATED,
            keys::CURRENT_USER,
        ])?;
        tracing::info!("Logged out");
        Ok(())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.storage.is_authenticated()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.storage.api_key()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.storage.current_user()
    }
}

fn load_users(local: &KeyValueStore) -> Result<Vec<StoredUser>, StoreError> {
    let Some(raw) = local.get(keys::USERS) else {
        return Ok(Vec::new());
    };
    serde_json::from_str(raw).map_err(|source| StoreError::Decode {
        key: keys::USERS.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> (Email, Password) {
        (Email::new(email).unwrap(), Password::new(password).unwrap())
    }

    #[test]
    fn register_then_login_sets_session_keys() {
        let mut storage = Storage::in_memory();
        let (email, password) = creds("a@b.c", "tmdb-key");

        storage.auth().try_register(&email, &password).unwrap();
        let user = storage
            .auth()
            .try_login(&email, &password, LoginPersistence::Remember)
            .unwrap();

        assert_eq!(user.email, "a@b.c");
        assert!(storage.is_authenticated());
        assert_eq!(storage.local.get(keys::API_KEY), Some("tmdb-key"));
        assert_eq!(storage.current_user(), Some("a@b.c"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut storage = Storage::in_memory();
        let (email, password) = creds("a@b.c", "one");
        storage.auth().try_register(&email, &password).unwrap();

        let (_, other) = creds("a@b.c", "two");
        let err = storage.auth().try_register(&email, &other).unwrap_err();
        assert!(matches!(err, AuthError::UserExists));
    }

    #[test]
    fn wrong_password_fails_without_touching_state() {
        let mut storage = Storage::in_memory();
        let (email, password) = creds("a@b.c", "right");
        storage.auth().try_register(&email, &password).unwrap();

        let (_, wrong) = creds("a@b.c", "wrong");
        let err = storage
            .auth()
            .try_login(&email, &wrong, LoginPersistence::Remember)
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!storage.is_authenticated());
        assert!(storage.api_key().is_none());
    }

    #[test]
    fn session_only_login_keeps_key_out_of_local_storage() {
        let mut storage = Storage::in_memory();
        let (email, password) = creds("a@b.c", "k");
        storage.auth().try_register(&email, &password).unwrap();
        storage
            .auth()
            .try_login(&email, &password, LoginPersistence::SessionOnly)
            .unwrap();

        assert_eq!(storage.local.get(keys::API_KEY), None);
        assert_eq!(storage.session.get(keys::API_KEY), Some("k"));
        assert_eq!(storage.api_key(), Some("k"));
    }

    #[test]
    fn logout_clears_session_but_keeps_users() {
        let mut storage = Storage::in_memory();
        let (email, password) = creds("a@b.c", "k");
        let mut auth = storage.auth();
        auth.try_register(&email, &password).unwrap();
        auth.try_login(&email, &password, LoginPersistence::Remember)
            .unwrap();
        auth.set_remember_user(&email, &password, true).unwrap();
        auth.logout().unwrap();

        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
        assert!(auth.api_key().is_none());
        assert!(auth.remembered_user().is_some());
        assert!(storage.local.contains(keys::USERS));
    }

    #[test]
    fn remember_user_round_trip_and_clear() {
        let mut storage = Storage::in_memory();
        let (email, password) = creds("a@b.c", "k");
        let mut auth = storage.auth();

        auth.set_remember_user(&email, &password, true).unwrap();
        let remembered = auth.remembered_user().unwrap();
        assert_eq!(remembered.email, "a@b.c");
        assert_eq!(remembered.password, "k");

        auth.set_remember_user(&email, &password, false).unwrap();
        assert!(auth.remembered_user().is_none());
    }

    #[test]
    fn stored_user_debug_hides_password() {
        let user = StoredUser {
            email: "a@b.c".into(),
            password: "secret".into(),
        };
        assert!(!format!("{user:?}").contains("secret"));
    }

    #[test]
    fn corrupt_user_list_is_an_error() {
        let mut storage = Storage::in_memory();
        storage.local.set(keys::USERS, "{oops").unwrap();
        let (email, password) = creds("a@b.c", "k");
        let err = storage.auth().try_register(&email, &password).unwrap_err();
        assert!(matches!(err, AuthError::Store(StoreError::Decode { .. })));
    }
}
