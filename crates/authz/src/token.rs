//! Token authority: opaque bearer tokens with a fixed lifetime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::{Duration, OffsetDateTime};

use crate::clock::{Clock, SystemClock};

/// Identifier of a registered member.
pub type MemberId = u64;

/// Lifetime of every issued token.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// 128 bits of entropy per token.
const TOKEN_BYTES: usize = 16;

#[derive(Debug, Clone)]
struct Session {
    member_id: MemberId,
    expires_at: OffsetDateTime,
}

/// Issues tokens and resolves them back to members.
///
/// Expiry is checked lazily in [`TokenAuthority::authenticate`]; expired
/// entries stay in the table until [`TokenAuthority::purge_expired`] runs.
pub struct TokenAuthority {
    clock: Arc<dyn Clock>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl TokenAuthority {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // Every critical section leaves the map consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a new token for `member_id`, valid for [`TOKEN_TTL`].
    pub fn issue(&self, member_id: MemberId) -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        let token = hex::encode(bytes);
        let expires_at = self.clock.now() + TOKEN_TTL;

        self.sessions().insert(
            token.clone(),
            Session {
                member_id,
                expires_at,
            },
        );

        tracing::debug!(member_id, %expires_at, "token issued");
        token
    }

    /// Resolve `token` to its member, or `None` if unknown or expired.
    ///
    /// A token is still valid at the exact instant it expires.
    pub fn authenticate(&self, token: &str) -> Option<MemberId> {
        let now = self.clock.now();
        let sessions = self.sessions();
        let session = sessions.get(token)?;

        if session.expires_at < now {
            return None;
        }
        Some(session.member_id)
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions();
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at >= now);
        before - sessions.len()
    }

    /// Number of entries in the table, expired or not.
    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokenAuthority {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn authority_at_epoch() -> (Arc<ManualClock>, TokenAuthority) {
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        let authority = TokenAuthority::with_clock(clock.clone());
        (clock, authority)
    }

    #[test]
    fn issued_token_is_128_bit_hex() {
        let authority = TokenAuthority::new();
        let token = authority.issue(7);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(authority.authenticate(&token), Some(7));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let authority = TokenAuthority::new();
        authority.issue(1);
        assert_eq!(authority.authenticate("not-a-token"), None);
        assert_eq!(authority.authenticate(""), None);
    }

    #[test]
    fn token_expires_after_twenty_four_hours() {
        let (clock, authority) = authority_at_epoch();
        let token = authority.issue(3);

        clock.advance(Duration::hours(23) + Duration::minutes(59));
        assert_eq!(authority.authenticate(&token), Some(3));

        clock.advance(Duration::minutes(1));
        assert_eq!(authority.authenticate(&token), Some(3));

        clock.advance(Duration::seconds(1));
        assert_eq!(authority.authenticate(&token), None);
    }

    #[test]
    fn expired_tokens_stay_until_purged() {
        let (clock, authority) = authority_at_epoch();
        let old = authority.issue(1);
        clock.advance(Duration::hours(12));
        let fresh = authority.issue(2);
        clock.advance(Duration::hours(13));

        assert_eq!(authority.authenticate(&old), None);
        assert_eq!(authority.len(), 2);

        assert_eq!(authority.purge_expired(), 1);
        assert_eq!(authority.len(), 1);
        assert_eq!(authority.authenticate(&old), None);
        assert_eq!(authority.authenticate(&fresh), Some(2));
    }

    #[test]
    fn member_may_hold_several_tokens() {
        let authority = TokenAuthority::new();
        let first = authority.issue(5);
        let second = authority.issue(5);
        assert_ne!(first, second);
        assert_eq!(authority.authenticate(&first), Some(5));
        assert_eq!(authority.authenticate(&second), Some(5));
    }
}
