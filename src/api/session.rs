//! Authenticated sessions.
//!
//! A [`Session`] is created by a successful login and identified by an
//! opaque bearer token. Each session owns at most one running analysis:
//! starting a new one cancels the previous one, and logging out cancels
//! whatever is still running.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::audit::CancellationToken;
use crate::config::AuthConfig;
use crate::error::{AuditError, AuditResult};

/// One logged-in user.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// The bearer token identifying this session.
    pub id: Uuid,
    /// Who logged in.
    pub username: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    active_run: Option<RunHandle>,
}

impl Session {
    /// Returns true if an analysis is currently running for this session.
    pub fn has_active_run(&self) -> bool {
        self.active_run.is_some()
    }
}

/// A running analysis owned by a session.
#[derive(Debug, Clone)]
pub struct RunHandle {
    /// Identifies the run within its session.
    pub run_id: Uuid,
    /// Cancels the run.
    pub cancel: CancellationToken,
}

/// All live sessions, keyed by token.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

fn unauthorized(reason: &str) -> AuditError {
    AuditError::Unauthorized {
        reason: reason.to_string(),
    }
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Unauthorized`] if the username or password does
    /// not match.
    pub fn login(&self, auth: &AuthConfig, username: &str, password: &str) -> AuditResult<Session> {
        if username != auth.username || password != auth.password {
            return Err(unauthorized("invalid username or password"));
        }

        let session = Session {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
            active_run: None,
        };
        self.lock().insert(session.id, session.clone());

        info!(session_id = %session.id, username = %session.username, "Session opened");
        Ok(session)
    }

    /// Looks up a live session.
    pub fn authenticate(&self, token: Uuid) -> AuditResult<Session> {
        self.lock()
            .get(&token)
            .cloned()
            .ok_or_else(|| unauthorized("unknown or expired session"))
    }

    /// Closes a session, cancelling its running analysis if any.
    pub fn logout(&self, token: Uuid) -> AuditResult<()> {
        let session = self
            .lock()
            .remove(&token)
            .ok_or_else(|| unauthorized("unknown or expired session"))?;

        if let Some(run) = session.active_run {
            run.cancel.cancel();
            debug!(session_id = %token, run_id = %run.run_id, "Cancelled run on logout");
        }
        info!(session_id = %token, username = %session.username, "Session closed");
        Ok(())
    }

    /// Registers a new analysis for a session, cancelling the previous one.
    pub fn begin_run(&self, token: Uuid) -> AuditResult<RunHandle> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&token)
            .ok_or_else(|| unauthorized("unknown or expired session"))?;

        let run = RunHandle {
            run_id: Uuid::new_v4(),
            cancel: CancellationToken::new(),
        };
        if let Some(previous) = session.active_run.replace(run.clone()) {
            previous.cancel.cancel();
            debug!(session_id = %token, run_id = %previous.run_id, "Superseded run cancelled");
        }
        Ok(run)
    }

    /// Clears the session's active run if it is still `run_id`.
    pub fn finish_run(&self, token: Uuid, run_id: Uuid) {
        if let Some(session) = self.lock().get_mut(&token) {
            if session.active_run.as_ref().is_some_and(|r| r.run_id == run_id) {
                session.active_run = None;
            }
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nobody is logged in.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig::default()
    }

    #[test]
    fn test_login_with_valid_credentials() {
        let store = SessionStore::new();
        let session = store.login(&auth(), "useraudit", "user123").unwrap();

        assert_eq!(session.username, "useraudit");
        assert_eq!(store.len(), 1);
        assert_eq!(store.authenticate(session.id).unwrap().id, session.id);
    }

    #[test]
    fn test_login_with_wrong_password_is_unauthorized() {
        let store = SessionStore::new();
        let result = store.login(&auth(), "useraudit", "wrong");

        assert!(matches!(result, Err(AuditError::Unauthorized { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_token_is_unauthorized() {
        let store = SessionStore::new();
        assert!(matches!(
            store.authenticate(Uuid::new_v4()),
            Err(AuditError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let a = store.login(&auth(), "useraudit", "user123").unwrap();
        let b = store.login(&auth(), "useraudit", "user123").unwrap();

        store.logout(a.id).unwrap();

        assert!(store.authenticate(a.id).is_err());
        assert!(store.authenticate(b.id).is_ok());
    }

    #[test]
    fn test_new_run_cancels_previous_run() {
        let store = SessionStore::new();
        let session = store.login(&auth(), "useraudit", "user123").unwrap();

        let first = store.begin_run(session.id).unwrap();
        let second = store.begin_run(session.id).unwrap();

        assert!(first.cancel.is_cancelled());
        assert!(!second.cancel.is_cancelled());
    }

    #[test]
    fn test_finish_run_only_clears_current_run() {
        let store = SessionStore::new();
        let session = store.login(&auth(), "useraudit", "user123").unwrap();

        let first = store.begin_run(session.id).unwrap();
        let second = store.begin_run(session.id).unwrap();

        store.finish_run(session.id, first.run_id);
        assert!(store.authenticate(session.id).unwrap().has_active_run());

        store.finish_run(session.id, second.run_id);
        assert!(!store.authenticate(session.id).unwrap().has_active_run());
    }

    #[test]
    fn test_logout_cancels_active_run() {
        let store = SessionStore::new();
        let session = store.login(&auth(), "useraudit", "user123").unwrap();
        let run = store.begin_run(session.id).unwrap();

        store.logout(session.id).unwrap();

        assert!(run.cancel.is_cancelled());
        assert!(matches!(
            store.begin_run(session.id),
            Err(AuditError::Unauthorized { .. })
        ));
    }
}
