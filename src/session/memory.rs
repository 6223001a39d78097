//! Process-local session backend.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use http::HeaderMap;
use uuid::Uuid;

use super::cookies::{expired_session_cookie, extract_cookie_value, session_cookie};
use super::{ResponseCookies, SESSION_COOKIE, Session, SessionError, SessionStore, SessionValues};
use crate::github::credential::Credential;

#[derive(Debug)]
struct StoredSession {
    values: SessionValues,
    /// Unix timestamp after which the record no longer loads.
    expires_at: i64,
}

impl StoredSession {
    const fn is_live_at(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

/// Sessions kept in memory, addressed by a random id stored in the session
/// cookie. Records are lost on restart.
///
/// Each record lives for `max_age_seconds` from its last save. Lapsed records
/// load as empty sessions and are pruned whenever the store is written.
#[derive(Debug)]
pub struct MemorySessionStore {
    records: RwLock<HashMap<String, StoredSession>>,
    max_age_seconds: u64,
}

impl MemorySessionStore {
    /// Creates an empty store issuing sessions valid for `max_age_seconds`.
    #[must_use]
    pub fn new(max_age_seconds: u64) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            max_age_seconds,
        }
    }

    /// Starts a session for `credential` and returns its id.
    ///
    /// The OAuth collaborator calls this after exchanging the authorization
    /// code; the id goes into the session cookie.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Save` if the record map is poisoned.
    pub fn create(&self, credential: Credential) -> Result<String, SessionError> {
        let id = Uuid::new_v4().simple().to_string();
        let values = SessionValues {
            credential: Some(credential),
            login: None,
        };
        let now = Utc::now().timestamp();
        let mut records = self.records.write().map_err(|_| poisoned_save())?;
        records.retain(|_, record| record.is_live_at(now));
        records.insert(id.clone(), self.stored(values, now));
        Ok(id)
    }

    /// Number of records held, including lapsed ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().map_or(0, |records| records.len())
    }

    /// Returns true when no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stored(&self, values: SessionValues, now: i64) -> StoredSession {
        let max_age = i64::try_from(self.max_age_seconds).unwrap_or(i64::MAX);
        StoredSession {
            values,
            expires_at: now.saturating_add(max_age),
        }
    }
}

fn poisoned_save() -> SessionError {
    SessionError::Save {
        message: "session map lock poisoned".to_owned(),
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let Some(id) = extract_cookie_value(headers, SESSION_COOKIE) else {
            return Ok(Session::default());
        };

        let now = Utc::now().timestamp();
        let mut records = self.records.write().map_err(|_| SessionError::Load {
            message: "session map lock poisoned".to_owned(),
        })?;

        let Some(record) = records.remove(&id) else {
            return Ok(Session::default());
        };
        if !record.is_live_at(now) {
            tracing::debug!("discarding lapsed session");
            return Ok(Session::default());
        }

        let session = Session::new(Some(id.clone()), record.values.clone());
        records.insert(id, record);
        Ok(session)
    }

    fn save(&self, session: &Session, cookies: &mut ResponseCookies) -> Result<(), SessionError> {
        let Some(id) = session.id() else {
            if session.is_expired() {
                cookies.push(expired_session_cookie());
            }
            return Ok(());
        };

        let now = Utc::now().timestamp();
        let mut records = self.records.write().map_err(|_| poisoned_save())?;
        records.retain(|_, record| record.is_live_at(now));
        if session.is_expired() {
            records.remove(id);
            cookies.push(expired_session_cookie());
        } else {
            records.insert(id.to_owned(), self.stored(session.values().clone(), now));
            cookies.push(session_cookie(id, self.max_age_seconds));
        }
        Ok(())
    }
}
