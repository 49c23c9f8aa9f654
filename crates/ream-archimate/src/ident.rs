//! Identifier generation for exported exchange documents.
//!
//! Exported identifiers are 32 characters long. The first character is a
//! letter so the value stays a valid XML NCName; the remaining 31 are drawn
//! from letters, digits, and `-._`. A generator remembers every identifier it
//! has issued and redraws on collision, so identifiers are unique within one
//! generator regardless of seed.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const KEY_LEN: usize = 32;
const FIRST_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REST_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-._";

/// Source of fresh document identifiers.
///
/// Seeded construction gives reproducible identifier streams; [`IdGenerator::new`]
/// seeds from the wall clock so separate exports of the same model disagree
/// on every identifier.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: ChaCha8Rng,
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        let seed = {
            use std::time::SystemTime;
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        };
        Self::seeded(seed)
    }

    pub fn seeded(seed: u64) -> Self {
        IdGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    /// Draws the next unissued identifier.
    pub fn next_key(&mut self) -> String {
        loop {
            let mut key = String::with_capacity(KEY_LEN);
            key.push(FIRST_CHARS[self.rng.gen_range(0..FIRST_CHARS.len())] as char);
            for _ in 1..KEY_LEN {
                key.push(REST_CHARS[self.rng.gen_range(0..REST_CHARS.len())] as char);
            }
            if self.issued.insert(key.clone()) {
                return key;
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
