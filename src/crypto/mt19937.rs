//! Mersenne Twister (MT19937) matching CPython's `random` module.
//!
//! Seeding follows `random.seed(int)`: the absolute value of the seed is split
//! into 32-bit little-endian words which are fed to the reference
//! `init_by_array`. Byte extraction follows `random.randbytes(n)`, which is
//! `getrandbits(8 * n).to_bytes(n, "little")`.

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// Fixed seed used by `init_by_array` before mixing in the key words.
const ARRAY_SEED: u32 = 19_650_218;

#[derive(Clone)]
pub struct Mt19937 {
    state: [u32; N],
    index: usize,
}

impl Mt19937 {
    /// Seeds the generator the way `random.seed(seed)` does for an integer.
    ///
    /// Negative seeds use their absolute value, so `-5` and `5` produce the
    /// same stream. Seeds above `u32::MAX` contribute two key words.
    pub fn from_seed(seed: i64) -> Self {
        let magnitude = seed.unsigned_abs();
        let low = magnitude as u32;
        let high = (magnitude >> 32) as u32;

        if high == 0 {
            Self::from_key(&[low])
        } else {
            Self::from_key(&[low, high])
        }
    }

    /// Reference `init_genrand`: linear recurrence over the state words.
    fn from_u32(seed: u32) -> Self {
        let mut state = [0u32; N];
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1];
            state[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }

        Self { state, index: N }
    }

    /// Reference `init_by_array`.
    ///
    /// `key` must hold at least one word.
    fn from_key(key: &[u32]) -> Self {
        debug_assert!(!key.is_empty());

        let mut mt = Self::from_u32(ARRAY_SEED);
        let s = &mut mt.state;
        let mut i = 1;
        let mut j = 0;

        for _ in 0..N.max(key.len()) {
            let prev = s[i - 1];
            s[i] = (s[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                s[0] = s[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }

        for _ in 0..N - 1 {
            let prev = s[i - 1];
            s[i] = (s[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                s[0] = s[N - 1];
                i = 1;
            }
        }

        // MSB is 1, assuring a non-zero initial array
        s[0] = UPPER_MASK;
        mt
    }

    /// Regenerates all 624 state words at once.
    fn twist(&mut self) {
        for i in 0..N {
            let y = (self.state[i] & UPPER_MASK) | (self.state[(i + 1) % N] & LOWER_MASK);
            let mut next = self.state[(i + M) % N] ^ (y >> 1);
            if y & 1 != 0 {
                next ^= MATRIX_A;
            }
            self.state[i] = next;
        }
        self.index = 0;
    }

    /// Next tempered 32-bit output (`genrand_uint32`).
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }

        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// Fills `buf` exactly like `randbytes(buf.len())`.
    ///
    /// Every 4-byte chunk consumes one output written little-endian. A short
    /// final chunk keeps only the top bits of its output, matching
    /// `getrandbits` truncation.
    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        for chunk in buf.chunks_mut(4) {
            let bits = chunk.len() * 8;
            let mut word = self.next_u32();
            if bits < 32 {
                word >>= 32 - bits;
            }
            chunk.copy_from_slice(&word.to_le_bytes()[..chunk.len()]);
        }
    }
}
