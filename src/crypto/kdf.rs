use zeroize::Zeroizing;

use super::{KEY_LEN, Mt19937};

/// Rebuilds the key a timestamp-seeded `random.randbytes(16)` call produced.
///
/// Pure function of `timestamp`.
pub fn derive_key(timestamp: i64) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    Mt19937::from_seed(timestamp).fill_bytes(&mut key[..]);
    key
}
