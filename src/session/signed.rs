//! Stateless session backend that keeps the record in a signed cookie.
//!
//! Cookie value layout: `<payload>.<signature>`, both base64url without
//! padding. The payload is the JSON record plus an absolute expiry; the
//! signature is HMAC-SHA256 over the encoded payload.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::cookies::{expired_session_cookie, extract_cookie_value, session_cookie};
use super::{ResponseCookies, SESSION_COOKIE, Session, SessionError, SessionStore, SessionValues};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize, Deserialize)]
struct SignedPayload {
    values: SessionValues,
    expires_at: i64,
}

/// Session backend storing the whole record in an HMAC-signed cookie.
pub struct SignedCookieSessionStore {
    secret: Vec<u8>,
    max_age_seconds: u64,
}

impl std::fmt::Debug for SignedCookieSessionStore {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SignedCookieSessionStore")
            .field("secret", &"<redacted>")
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

impl SignedCookieSessionStore {
    /// Creates a store signing cookies with `secret`.
    #[must_use]
    pub fn new(secret: impl AsRef<[u8]>, max_age_seconds: u64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            max_age_seconds,
        }
    }

    /// Encodes `values` as a signed cookie value.
    ///
    /// The OAuth collaborator uses this to issue the initial session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Save` when the record cannot be serialised or
    /// signed.
    pub fn encode(&self, values: &SessionValues) -> Result<String, SessionError> {
        let max_age = i64::try_from(self.max_age_seconds).unwrap_or(i64::MAX);
        let payload = SignedPayload {
            values: values.clone(),
            expires_at: Utc::now().timestamp().saturating_add(max_age),
        };
        let json = serde_json::to_vec(&payload).map_err(|error| SessionError::Save {
            message: error.to_string(),
        })?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(encoded.as_bytes())?);
        Ok(format!("{encoded}.{signature}"))
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|error| SessionError::Save {
            message: format!("invalid session secret: {error}"),
        })
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SessionError> {
        let mut mac = self.mac()?;
        mac.update(data);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn decode(&self, cookie_value: &str) -> Result<SignedPayload, SessionError> {
        let (encoded, signature) = cookie_value
            .split_once('.')
            .ok_or(SessionError::Signature)?;
        let signature_bytes = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::Signature)?;

        let mut mac = self.mac().map_err(|_| SessionError::Signature)?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature_bytes)
            .map_err(|_| SessionError::Signature)?;

        let json = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|error| SessionError::Load {
                message: error.to_string(),
            })?;
        serde_json::from_slice(&json).map_err(|error| SessionError::Load {
            message: error.to_string(),
        })
    }
}

impl SessionStore for SignedCookieSessionStore {
    fn load(&self, headers: &HeaderMap) -> Result<Session, SessionError> {
        let Some(raw) = extract_cookie_value(headers, SESSION_COOKIE) else {
            return Ok(Session::default());
        };

        let payload = self.decode(&raw)?;
        if payload.expires_at <= Utc::now().timestamp() {
            return Ok(Session::default());
        }
        Ok(Session::new(None, payload.values))
    }

    fn save(&self, session: &Session, cookies: &mut ResponseCookies) -> Result<(), SessionError> {
        if session.is_expired() {
            cookies.push(expired_session_cookie());
            return Ok(());
        }

        let value = self.encode(session.values())?;
        cookies.push(session_cookie(&value, self.max_age_seconds));
        Ok(())
    }
}
