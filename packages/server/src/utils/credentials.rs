use sha2::{Digest, Sha256};

use crate::config::AuthConfig;

/// Decides whether a basic-auth username/password pair is accepted.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured username/password pair.
///
/// Only SHA-256 digests are kept, and candidates are compared digest to
/// digest in constant time, so comparison time is independent of where the
/// first mismatching byte is and of the expected values' lengths.
pub struct StaticCredentials {
    username: [u8; 32],
    password: [u8; 32],
}

impl StaticCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: digest(username),
            password: digest(password),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.username, &config.password)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Both comparisons always run.
        let username_ok = constant_time_eq(&digest(username), &self.username);
        let password_ok = constant_time_eq(&digest(password), &self.password);
        username_ok & password_ok
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
