//! RNG seed derivation for sessions.
//!
//! Production sessions seed from OS entropy. When a base seed is configured
//! (tests, the simulator), each session derives its own seed from the base
//! and its id so concurrently created sessions never share a stream.

/// Derive a per-session seed from a base seed and the session id.
///
/// Same base + same id = same seed. The id is folded with FNV-1a and mixed
/// through a SplitMix64 finalizer.
pub fn derive_session_seed(base_seed: u64, session_id: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in session_id.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }

    let mut z = base_seed ^ hash;
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
