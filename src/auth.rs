//! Staff authentication: passphrase credential, bearer sessions, and
//! brute-force lockout.
//!
//! The passphrase is never stored; a PBKDF2-SHA256 digest is derived at
//! startup and login attempts are compared in constant time. Successful
//! logins mint random bearer tokens held (hashed) in memory, so every
//! session dies with the process.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 32;

/// Sessions expire half a day after login.
pub const SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Wrong passphrases allowed per address before lockout.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// How long a locked address stays locked.
pub const LOCKOUT_SECS: u64 = 15 * 60;

// ═══════════════════════════════════════════════════════════
// Credential
// ═══════════════════════════════════════════════════════════

/// Derived staff credential. Holds only salt and digest.
pub struct AdminCredential {
    salt: [u8; SALT_LENGTH],
    hash: [u8; 32],
}

impl AdminCredential {
    /// Derive a credential with a fresh random salt.
    pub fn derive(passphrase: &str) -> Self {
        Self::derive_with_salt(passphrase, generate_salt())
    }

    fn derive_with_salt(passphrase: &str, salt: [u8; SALT_LENGTH]) -> Self {
        let mut hash = [0u8; 32];
        pbkdf2_hmac::<Sha256>(
            passphrase.as_bytes(),
            &salt,
            PBKDF2_ITERATIONS,
            &mut hash,
        );
        Self { salt, hash }
    }

    /// Constant-time passphrase check.
    pub fn verify(&self, passphrase: &str) -> bool {
        let mut candidate = [0u8; 32];
        pbkdf2_hmac::<Sha256>(
            passphrase.as_bytes(),
            &self.salt,
            PBKDF2_ITERATIONS,
            &mut candidate,
        );
        candidate.ct_eq(&self.hash).into()
    }
}

/// Generate a cryptographically random salt.
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

// ═══════════════════════════════════════════════════════════
// Bearer tokens
// ═══════════════════════════════════════════════════════════

/// Hash a bearer token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Debug)]
struct SessionEntry {
    expires_at: Instant,
}

/// In-memory store of active staff sessions, keyed by token hash.
pub struct SessionStore {
    sessions: HashMap<[u8; 32], SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::from_secs(SESSION_TTL_SECS),
        }
    }

    /// Mint a new session and return the bearer token.
    pub fn issue(&mut self) -> String {
        self.cleanup();
        let token = generate_token();
        self.sessions.insert(
            hash_token(&token),
            SessionEntry {
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Whether this token belongs to a live session.
    pub fn validate(&self, token: &str) -> bool {
        self.sessions
            .get(&hash_token(token))
            .is_some_and(|entry| Instant::now() < entry.expires_at)
    }

    /// Drop a session. Returns `false` if the token was not active.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(&hash_token(token)).is_some()
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, entry| now < entry.expires_at);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Brute-force lockout
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
struct FailedLogins {
    count: u32,
    last_attempt: Instant,
}

/// Per-address login failure tracking. An address that keeps guessing
/// wrong is refused for a cooldown period; a correct login clears it.
pub struct LoginGuard {
    attempts: HashMap<IpAddr, FailedLogins>,
    lockout: Duration,
}

impl LoginGuard {
    pub fn new() -> Self {
        Self {
            attempts: HashMap::new(),
            lockout: Duration::from_secs(LOCKOUT_SECS),
        }
    }

    pub fn is_locked(&self, addr: IpAddr) -> bool {
        self.attempts.get(&addr).is_some_and(|failed| {
            failed.count >= MAX_LOGIN_ATTEMPTS
                && failed.last_attempt.elapsed() < self.lockout
        })
    }

    pub fn record_failure(&mut self, addr: IpAddr) {
        if self.attempts.len() > 1000 {
            self.cleanup();
        }
        let entry = self.attempts.entry(addr).or_insert(FailedLogins {
            count: 0,
            last_attempt: Instant::now(),
        });
        // A stale streak starts over instead of accumulating forever
        if entry.last_attempt.elapsed() >= self.lockout {
            entry.count = 0;
        }
        entry.count += 1;
        entry.last_attempt = Instant::now();
    }

    pub fn clear(&mut self, addr: IpAddr) {
        self.attempts.remove(&addr);
    }

    fn cleanup(&mut self) {
        let lockout = self.lockout;
        self.attempts
            .retain(|_, failed| failed.last_attempt.elapsed() < lockout);
    }
}

impl Default for LoginGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_accepts_correct_passphrase() {
        let credential = AdminCredential::derive("tunsadmin2569");
        assert!(credential.verify("tunsadmin2569"));
        assert!(!credential.verify("tunsadmin2568"));
        assert!(!credential.verify(""));
    }

    #[test]
    fn same_passphrase_different_salts_differ() {
        let a = AdminCredential::derive_with_salt("secret", [1u8; SALT_LENGTH]);
        let b = AdminCredential::derive_with_salt("secret", [2u8; SALT_LENGTH]);
        assert_ne!(a.hash, b.hash);
        assert!(a.verify("secret"));
        assert!(b.verify("secret"));
    }

    #[test]
    fn generate_token_is_unique() {
        let t1 = generate_token();
        let t2 = generate_token();
        assert_ne!(t1, t2);
        assert!(!t1.is_empty());
    }

    #[test]
    fn hash_token_is_deterministic() {
        assert_eq!(hash_token("test"), hash_token("test"));
        assert_ne!(hash_token("test"), hash_token("Test"));
    }

    #[test]
    fn issued_session_validates_until_revoked() {
        let mut store = SessionStore::new();
        let token = store.issue();

        assert!(store.validate(&token));
        assert!(!store.validate("not-a-token"));

        assert!(store.revoke(&token));
        assert!(!store.validate(&token));
        assert!(!store.revoke(&token));
    }

    #[test]
    fn expired_session_is_rejected() {
        let mut store = SessionStore::new();
        store.ttl = Duration::from_millis(10);
        let token = store.issue();
        std::thread::sleep(Duration::from_millis(30));

        assert!(!store.validate(&token));
    }

    #[test]
    fn guard_locks_after_max_failures() {
        let mut guard = LoginGuard::new();
        let addr: IpAddr = "203.0.113.9".parse().unwrap();

        for _ in 0..MAX_LOGIN_ATTEMPTS - 1 {
            guard.record_failure(addr);
            assert!(!guard.is_locked(addr));
        }
        guard.record_failure(addr);
        assert!(guard.is_locked(addr));

        // A different address is unaffected
        let other: IpAddr = "203.0.113.10".parse().unwrap();
        assert!(!guard.is_locked(other));
    }

    #[test]
    fn successful_login_clears_the_streak() {
        let mut guard = LoginGuard::new();
        let addr: IpAddr = "203.0.113.9".parse().unwrap();
        for _ in 0..MAX_LOGIN_ATTEMPTS {
            guard.record_failure(addr);
        }
        assert!(guard.is_locked(addr));

        guard.clear(addr);
        assert!(!guard.is_locked(addr));
    }

    #[test]
    fn lockout_expires_after_cooldown() {
        let mut guard = LoginGuard::new();
        guard.lockout = Duration::from_millis(10);
        let addr: IpAddr = "203.0.113.9".parse().unwrap();
        for _ in 0..MAX_LOGIN_ATTEMPTS {
            guard.record_failure(addr);
        }
        assert!(guard.is_locked(addr));

        std::thread::sleep(Duration::from_millis(30));
        assert!(!guard.is_locked(addr));
    }
}
