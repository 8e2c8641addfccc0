use std::{fmt, ops::Deref, sync::Arc};

use sha2::{Digest, Sha256};

/// Fingerprint of a caller's credential, used to partition rate accounting.
///
/// The fingerprint is the lowercase hex SHA-256 digest of the secret. The raw
/// secret is never stored or logged.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallerIdentity(Arc<str>);

impl CallerIdentity {
    /// Length of a fingerprint in hex characters.
    pub const LEN: usize = 64;

    /// Derive the identity for `secret`.
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        Self(Arc::from(hex::encode(digest)))
    }

    /// Rebuild an identity from a fingerprint read back from storage.
    ///
    /// Returns `None` unless `fingerprint` is 64 lowercase hex characters.
    pub fn from_fingerprint(fingerprint: &str) -> Option<Self> {
        let valid = fingerprint.len() == Self::LEN
            && fingerprint
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        valid.then(|| Self(Arc::from(fingerprint)))
    }

    /// First 16 characters, for banners and log lines.
    pub fn short(&self) -> &str {
        &self.0[..16]
    }
}

impl Deref for CallerIdentity {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallerIdentity({}...)", self.short())
    }
}
