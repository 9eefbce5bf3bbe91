//! The caller-owned side of authentication: keeping the bearer token between runs.
//!
//! The resolver in [`crate::jwt`] holds no state. Whoever logs a user in decides where the
//! token lives by handing a [`SessionStore`] to [`establish`], [`resume`], [`current`] and
//! [`end`]. Stores keep only the token; role and username are always re-read from it. A
//! token that stops resolving to a dashboard role is treated as a logged-out user: the store
//! is cleared and the user is sent to the login route.

use crate::error::{session_error, Error, SessionErrorKind};
use crate::jwt;
use crate::role::Role;
use crate::route::Route;
use log::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A logged-in user. The token is kept out of `Debug` output.
#[derive(Debug)]
pub struct Session {
    token: SecretString,
    role: Role,
    username: Option<String>,
}

impl Session {
    /// Builds a session from a bearer token. The token must resolve to a role;
    /// the username is optional.
    pub fn from_token(token: &str) -> Result<Session, Error> {
        let claims = jwt::try_decode_claims(token)?;
        let role = jwt::role_from_claims(&claims)?;
        let username = jwt::username_from_claims(&claims).ok();

        Ok(Session {
            token: SecretString::new(token.to_string()),
            role,
            username,
        })
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn route(&self) -> Route {
        Route::for_role(Some(&self.role))
    }
}

/// Storage for at most one bearer token.
pub trait SessionStore: Send + Sync {
    /// The stored token, or `None` when nobody is logged in.
    fn load(&self) -> Result<Option<SecretString>, Error>;

    /// Replaces any stored token with the session's.
    fn save(&self, session: &Session) -> Result<(), Error>;

    /// Removes the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), Error>;
}

/// Resolves `token` and records the outcome in `store`.
///
/// A token with a dashboard role is saved and its dashboard returned. Anything else
/// (unreadable token, no role, a role without a dashboard) clears the store and
/// returns [`Route::Login`].
pub fn establish(store: &dyn SessionStore, token: &str) -> Result<Route, Error> {
    let session = match Session::from_token(token) {
        Ok(session) => session,
        Err(err) => {
            warn!("Rejecting login, no role could be resolved: {err}");
            store.clear()?;
            return Ok(Route::Login);
        }
    };

    let route = session.route();
    if route.is_login() {
        warn!("Rejecting login, role {} has no dashboard", session.role());
        store.clear()?;
        return Ok(Route::Login);
    }

    store.save(&session)?;
    info!(
        "Session established for {} as {}",
        session.username().unwrap_or("<unnamed>"),
        session.role()
    );
    Ok(route)
}

/// The session for the token in `store`, rebuilt from the token's own claims.
///
/// Returns `None`, clearing the store, when the stored token no longer resolves
/// or resolves to a role without a dashboard.
pub fn resume(store: &dyn SessionStore) -> Result<Option<Session>, Error> {
    let Some(token) = store.load()? else {
        debug!("No stored session");
        return Ok(None);
    };

    match Session::from_token(token.expose_secret()) {
        Ok(session) if !session.route().is_login() => Ok(Some(session)),
        Ok(session) => {
            warn!(
                "Stored session has role {} without a dashboard, clearing it",
                session.role()
            );
            store.clear()?;
            Ok(None)
        }
        Err(err) => {
            warn!("Stored session no longer resolves, clearing it: {err}");
            store.clear()?;
            Ok(None)
        }
    }
}

/// The route for whoever is stored in `store`.
pub fn current(store: &dyn SessionStore) -> Result<Route, Error> {
    Ok(resume(store)?.map_or(Route::Login, |session| session.route()))
}

/// Logs the user out.
pub fn end(store: &dyn SessionStore) -> Result<(), Error> {
    store.clear()?;
    info!("Session cleared");
    Ok(())
}

// What actually gets written to storage. Extra fields in an existing document are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    token: String,
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        SessionRecord {
            token: session.token.expose_secret().clone(),
        }
    }
}

impl SessionRecord {
    fn into_token(self) -> Result<SecretString, Error> {
        if self.token.is_empty() {
            return Err(session_error(
                SessionErrorKind::Corrupt,
                "stored session has an empty token",
            ));
        }
        Ok(SecretString::new(self.token))
    }
}

/// Keeps the token in process memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    record: Mutex<Option<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        let record = self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        record.map(SessionRecord::into_token).transpose()
    }

    fn save(&self, session: &Session) -> Result<(), Error> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(SessionRecord::from(session));
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Keeps the token as a JSON document on disk. A missing file means no session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SecretString>, Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let record: SessionRecord = serde_json::from_slice(&bytes)?;
        record.into_token().map(Some)
    }

    fn save(&self, session: &Session) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(&SessionRecord::from(session))?;
        fs::write(&self.path, json)?;
        trace!("Wrote session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::{json, Value};

    fn token_for(claims: Value) -> String {
        format!(
            "eyJhbGciOiJub25lIn0.{}.",
            URL_SAFE_NO_PAD.encode(claims.to_string())
        )
    }

    fn temp_session_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("rental-portal-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[test]
    fn test_session_from_token() {
        let session =
            Session::from_token(&token_for(json!({"sub": "alice", "roles": ["ROLE_SEEKER"]})))
                .unwrap();
        assert_eq!(session.role().as_str(), "SEEKER");
        assert_eq!(session.username(), Some("alice"));
    }

    #[test]
    fn test_session_without_username_is_allowed() {
        let session = Session::from_token(&token_for(json!({"role": "admin"}))).unwrap();
        assert_eq!(session.username(), None);
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let token = token_for(json!({"sub": "alice", "role": "seeker"}));
        let session = Session::from_token(&token).unwrap();
        assert!(!format!("{session:?}").contains(&token));
    }

    #[test]
    fn test_establish_saves_session_and_routes_to_dashboard() {
        let store = MemorySessionStore::new();
        let route = establish(
            &store,
            &token_for(json!({"sub": "lara", "roles": ["ROLE_LANDLORD"]})),
        )
        .unwrap();

        assert_eq!(route, Route::LandlordDashboard);
        let stored = resume(&store).unwrap().unwrap();
        assert_eq!(stored.username(), Some("lara"));
        assert!(stored.role().is_landlord());
    }

    #[test]
    fn test_establish_with_bad_token_clears_previous_session() {
        let store = MemorySessionStore::new();
        establish(&store, &token_for(json!({"sub": "a", "role": "admin"}))).unwrap();

        let route = establish(&store, "not.a-token").unwrap();

        assert_eq!(route, Route::Login);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_establish_with_unroutable_role_goes_to_login() {
        let store = MemorySessionStore::new();
        let route = establish(&store, &token_for(json!({"sub": "t", "role": "tenant"}))).unwrap();

        assert_eq!(route, Route::Login);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_current_without_session_is_login() {
        assert_eq!(current(&MemorySessionStore::new()).unwrap(), Route::Login);
    }

    #[test]
    fn test_current_reresolves_stored_token() {
        let store = MemorySessionStore::new();
        establish(&store, &token_for(json!({"sub": "sam", "role": "seeker"}))).unwrap();
        assert_eq!(current(&store).unwrap(), Route::SeekerDashboard);
    }

    #[test]
    fn test_current_clears_unresolvable_stored_token() {
        let store = MemorySessionStore::new();
        *store.record.lock().unwrap() = Some(SessionRecord {
            token: "garbage".to_string(),
        });

        assert_eq!(current(&store).unwrap(), Route::Login);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_current_clears_stored_token_without_dashboard_role() {
        let store = MemorySessionStore::new();
        *store.record.lock().unwrap() = Some(SessionRecord {
            token: token_for(json!({"sub": "t", "role": "tenant"})),
        });

        assert_eq!(current(&store).unwrap(), Route::Login);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_resume_reads_role_and_username_from_token_not_document() {
        let path = temp_session_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let token = token_for(json!({"sub": "sam", "role": "seeker"}));
        fs::write(
            &path,
            json!({"token": token, "role": "ADMIN", "username": "mallory"}).to_string(),
        )
        .unwrap();

        let store = FileSessionStore::new(&path);
        let session = resume(&store).unwrap().unwrap();
        assert_eq!(session.role().as_str(), "SEEKER");
        assert_eq!(session.username(), Some("sam"));
        assert_eq!(session.route(), Route::SeekerDashboard);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_saved_document_holds_only_the_token() {
        let path = temp_session_file();
        let token = token_for(json!({"sub": "lara", "role": "landlord"}));
        establish(&FileSessionStore::new(&path), &token).unwrap();

        let document: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(document, json!({ "token": token }));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_end_clears_session() {
        let store = MemorySessionStore::new();
        establish(&store, &token_for(json!({"role": "admin"}))).unwrap();
        end(&store).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_session_file();
        let token = token_for(json!({"sub": "alice", "roles": ["ROLE_ADMIN"]}));

        let route = establish(&FileSessionStore::new(&path), &token).unwrap();
        assert_eq!(route, Route::AdminDashboard);

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().unwrap().unwrap().expose_secret(), &token);
        let stored = resume(&reopened).unwrap().unwrap();
        assert_eq!(stored.username(), Some("alice"));
        assert_eq!(current(&reopened).unwrap(), Route::AdminDashboard);

        end(&reopened).unwrap();
        assert!(!path.exists());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileSessionStore::new(temp_session_file());
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_rejects_unreadable_document() {
        let path = temp_session_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{ not json").unwrap();

        let err = FileSessionStore::new(&path).load().unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Session(SessionErrorKind::Serialization)
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_rejects_empty_token() {
        let path = temp_session_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            json!({"token": "", "role": "ADMIN", "username": null}).to_string(),
        )
        .unwrap();

        let err = FileSessionStore::new(&path).load().unwrap_err();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Session(SessionErrorKind::Corrupt)
        );
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
