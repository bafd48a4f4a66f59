//! Random identifiers for secret names and key ids

use rand::Rng;

/// Length of generated names
pub const NAME_LENGTH: usize = 10;

/// Uppercase letters and digits
pub const NAME_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random name of [`NAME_LENGTH`] characters from [`NAME_ALPHABET`]
///
/// Collisions are possible (36^10 space), not guaranteed unique.
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    (0..NAME_LENGTH)
        .map(|_| NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())] as char)
        .collect()
}
