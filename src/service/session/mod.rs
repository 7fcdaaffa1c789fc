mod error;
mod model;
pub use error::SessionError;

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::{platform::MediaKind, storage::MemoryCache};

pub use model::*;

pub const SESSION_COOKIE: &str = "gramsnap_session";

type HmacSha256 = Hmac<Sha256>;

/// Server-side session store. The browser only ever holds a signed random id.
#[derive(Clone)]
pub struct SessionService {
    cache: MemoryCache<SessionEntry>,
    secret_key: String,
}

impl SessionService {
    pub fn new(secret_key: &str, ttl: Duration, cache_capacity: usize) -> Result<Self, SessionError> {
        info!("Initializing session service");

        let cache = MemoryCache::new(cache_capacity, ttl).map_err(|e| SessionError::CacheError(e.to_string()))?;

        info!("Session service initialized");
        Ok(Self {
            cache,
            secret_key: secret_key.to_string(),
        })
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(self.secret_key.as_bytes()).map_err(|e| SessionError::Signing(e.to_string()))
    }

    fn sign(&self, id: &str) -> Result<String, SessionError> {
        let mut mac = self.mac()?;
        mac.update(id.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    fn verify(&self, cookie_value: &str) -> Option<SessionToken> {
        let (id, signature) = cookie_value.split_once('.')?;
        Uuid::parse_str(id).ok()?;

        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(SessionToken(id.to_string()))
    }

    /// Returns the session named by the request's cookie. A missing or forged
    /// cookie gets a fresh session, whose cookie is added to the returned jar.
    pub fn resolve(&self, jar: CookieJar) -> Result<(CookieJar, SessionToken), SessionError> {
        if let Some(token) = jar.get(SESSION_COOKIE).and_then(|cookie| self.verify(cookie.value())) {
            return Ok((jar, token));
        }

        let id = Uuid::new_v4().to_string();
        let value = format!("{}.{}", id, self.sign(&id)?);
        let cookie = Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/");

        debug!("Issued session {}", id);
        Ok((jar.add(cookie), SessionToken(id)))
    }

    /// Stores `record` under its key, replacing any earlier fetch of the same target.
    pub fn put_record(&self, token: &SessionToken, record: SessionRecord) {
        self.cache.update(token.as_str(), SessionEntry::default, |entry| {
            entry.records.insert(record.key(), record);
        });
    }

    pub fn get_record(&self, token: &SessionToken, kind: MediaKind, identifier: &str) -> Option<SessionRecord> {
        let key = SessionRecord::key_for(kind, identifier);
        self.cache.get(token.as_str())?.records.remove(&key)
    }

    pub fn push_flash(&self, token: &SessionToken, flash: Flash) {
        self.cache.update(token.as_str(), SessionEntry::default, |entry| {
            entry.flashes.push(flash);
        });
    }

    /// Drains queued flash messages, oldest first.
    pub fn take_flashes(&self, token: &SessionToken) -> Vec<Flash> {
        match self.cache.get(token.as_str()) {
            Some(entry) if !entry.flashes.is_empty() => self
                .cache
                .update(token.as_str(), SessionEntry::default, |entry| std::mem::take(&mut entry.flashes)),
            _ => Vec::new(),
        }
    }
}
