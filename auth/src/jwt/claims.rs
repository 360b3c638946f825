use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// Only the RFC 7519 claims this service relies on: the subject and the
/// validity window. Tokens are never persisted; they end by expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Lifetime applied when none is configured.
    pub const DEFAULT_LIFETIME_HOURS: i64 = 24;

    /// Create claims with explicit timestamps.
    pub fn new(sub: impl ToString, iat: i64, exp: i64) -> Self {
        Self {
            sub: sub.to_string(),
            iat,
            exp,
        }
    }

    /// Create claims for a subject, issued now and expiring after `lifetime`.
    ///
    /// # Arguments
    /// * `sub` - Account identifier the token asserts
    /// * `lifetime` - Time until the token expires
    ///
    /// # Returns
    /// Claims with `iat = now` and `exp = now + lifetime`
    pub fn for_subject(sub: impl ToString, lifetime: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + lifetime;

        Self::new(sub, now.timestamp(), expiration.timestamp())
    }

    /// Issued-at as a UTC datetime (None if out of range).
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Expiration as a UTC datetime (None if out of range).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// A token is usable only while the current time is strictly before `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
