// Crypto module for the claimlink server
//
// Opaque token generation backed by the operating system RNG. Every
// identifier the server hands out (policy ids, claim URL segments, location
// aliases) comes from here.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::Engine;
use rand::{rngs::OsRng, Rng};

/// Number of random bytes behind every issued token (256 bits)
const TOKEN_BYTES: usize = 32;

/// Generate a fresh opaque token.
///
/// Draws 32 bytes from the OS RNG and renders them base64url without padding,
/// so the token can sit directly inside a path segment. Collisions are treated
/// as practically impossible and not defended against.
pub fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
