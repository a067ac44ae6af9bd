//! Short public identifiers for gatherings and ratings.

use rand::Rng;

/// Length of every generated identifier.
pub const SHORT_ID_LENGTH: usize = 8;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random 8-character lowercase alphanumeric identifier.
///
/// Identifiers are shared in links, so they stay short; callers that need
/// uniqueness must check for collisions against storage.
pub fn generate_short_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SHORT_ID_LENGTH)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `value` has the shape of a generated identifier.
pub fn is_short_id(value: &str) -> bool {
    value.len() == SHORT_ID_LENGTH && value.bytes().all(|b| ALPHABET.contains(&b))
}
