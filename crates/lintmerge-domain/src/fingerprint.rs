//! Stable fingerprint computation for issues.
//!
//! Fingerprints identify an issue across pipeline runs so CI consumers can
//! track which issues are new, fixed or unchanged.

use sha2::{Digest, Sha256};

/// Digest bytes kept from SHA-256 (160 bits).
const FINGERPRINT_BYTES: usize = 20;

/// Computes a stable fingerprint for an issue.
///
/// The fingerprint is a SHA-256 hash of `path:position:description`,
/// truncated to 40 hex characters (20 bytes).
pub fn compute_fingerprint(path: &str, position: &str, description: &str) -> String {
    let input = format!("{path}:{position}:{description}");
    let hash = Sha256::digest(input.as_bytes());
    hex::encode(&hash[..FINGERPRINT_BYTES])
}
