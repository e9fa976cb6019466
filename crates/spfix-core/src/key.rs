//! Forkable counter-based random keys
//!
//! A [`PrngKey`] is an explicit random-stream handle. It is never advanced in
//! place: [`PrngKey::split`] derives independent child keys and
//! [`PrngKey::into_rng`] turns a key into a seeded generator. Both consume the
//! key, so a derived key feeds exactly one consumer and randomness forms a
//! tree rather than a shared stream.
//!
//! Derivation runs ThreeFry4x64-20 (Salmon et al. "Parallel Random Numbers:
//! As Easy as 1, 2, 3", 2011) in counter mode with the key as cipher key.
//! For a fixed key the cipher is a bijection on counters, so children `0..n`
//! are pairwise distinct blocks.
//!
//! # Examples
//!
//! ```
//! use spfix_core::PrngKey;
//!
//! let key = PrngKey::new(42);
//! let children = key.clone().split(3);
//! assert_eq!(children.len(), 3);
//! assert_ne!(children[0], children[1]);
//!
//! // Splitting is a pure function of the parent key
//! assert_eq!(children, key.split(3));
//! ```

use scirs2_core::random::{SeedableRng, StdRng};

const THREEFRY_ROTATION: [[u32; 2]; 8] = [
    [14, 16],
    [52, 57],
    [23, 40],
    [5, 37],
    [25, 33],
    [46, 12],
    [58, 22],
    [32, 32],
];

const THREEFRY_PARITY64: u64 = 0x1BD1_1BDA_A9FC_1A22;

/// Counter block reserved for seeding a generator; children use the
/// low counter word, so this never collides with a split.
const RNG_DOMAIN: u64 = u64::MAX;

#[inline(always)]
fn threefry_round(x: &mut [u64; 4], ks: &[u64; 5], r: usize) {
    if r % 4 == 0 {
        let d = r / 4;
        x[0] = x[0].wrapping_add(ks[d % 5]);
        x[1] = x[1].wrapping_add(ks[(d + 1) % 5]);
        x[2] = x[2].wrapping_add(ks[(d + 2) % 5]);
        x[3] = x[3].wrapping_add(ks[(d + 3) % 5]).wrapping_add(d as u64);
    }

    let rot = &THREEFRY_ROTATION[r % 8];

    x[0] = x[0].wrapping_add(x[1]);
    x[1] = x[1].rotate_left(rot[0]) ^ x[0];

    x[2] = x[2].wrapping_add(x[3]);
    x[3] = x[3].rotate_left(rot[1]) ^ x[2];

    x.swap(1, 3);
}

/// ThreeFry4x64-20 block function
fn threefry4x64_20(ctr: [u64; 4], key: [u64; 2]) -> [u64; 4] {
    let ks = [key[0], key[1], 0, 0, key[0] ^ key[1] ^ THREEFRY_PARITY64];

    let mut x = ctr;
    for r in 0..20 {
        threefry_round(&mut x, &ks, r);
    }

    x[0] = x[0].wrapping_add(ks[0]);
    x[1] = x[1].wrapping_add(ks[1]);
    x[2] = x[2].wrapping_add(ks[2]);
    x[3] = x[3].wrapping_add(ks[3]).wrapping_add(5);

    x
}

/// Deterministic, splittable random key
///
/// `Clone` but not `Copy`: using a key for two purposes has to
/// be spelled out with an explicit `clone()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrngKey {
    words: [u64; 2],
}

impl PrngKey {
    /// Create a key from an integer seed
    pub fn new(seed: u64) -> Self {
        Self { words: [0, seed] }
    }

    /// Create a key from its raw words
    pub fn from_words(words: [u64; 2]) -> Self {
        Self { words }
    }

    /// Raw key words
    pub fn words(&self) -> [u64; 2] {
        self.words
    }

    /// Split into `num` independent child keys
    ///
    /// Child `i` is always the same block for the same parent, so assigning
    /// child `i` to consumer `i` is reproducible.
    pub fn split(self, num: usize) -> Vec<PrngKey> {
        (0..num as u64)
            .map(|i| {
                let block = threefry4x64_20([i, 0, 0, 0], self.words);
                PrngKey {
                    words: [block[0], block[1]],
                }
            })
            .collect()
    }

    /// Derive a child key tagged with `data`
    ///
    /// Uses a counter lane disjoint from [`PrngKey::split`].
    pub fn fold_in(self, data: u64) -> PrngKey {
        let block = threefry4x64_20([data, 1, 0, 0], self.words);
        PrngKey {
            words: [block[0], block[1]],
        }
    }

    /// Consume the key into a seeded generator
    pub fn into_rng(self) -> StdRng {
        let block = threefry4x64_20([RNG_DOMAIN, RNG_DOMAIN, 0, 0], self.words);
        let mut seed = [0u8; 32];
        for (chunk, word) in seed.chunks_exact_mut(8).zip(block.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        StdRng::from_seed(seed)
    }
}

impl From<u64> for PrngKey {
    fn from(seed: u64) -> Self {
        Self::new(seed)
    }
}
