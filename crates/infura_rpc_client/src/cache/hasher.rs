use sha3::{digest::FixedOutput, Digest, Sha3_256};

/// Builder for request fingerprints used as cache keys.
///
/// The methods take `self` by value so a key is only produced once every
/// input has been fed in.
// Variable-length inputs are length-prefixed before hashing so that
// concatenations cannot collide (e.g. `("ab", "c")` vs `("a", "bc")`).
#[derive(Debug, Clone)]
pub struct CacheKeyHasher {
    hasher: Sha3_256,
}

impl CacheKeyHasher {
    /// Creates an empty hasher.
    pub fn new() -> Self {
        Self {
            hasher: Sha3_256::new(),
        }
    }

    /// Hashes raw bytes, without a length prefix.
    pub fn hash_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.hasher.update(bytes);

        self
    }

    /// Hashes a `u64` in little-endian byte order.
    pub fn hash_u64(self, value: u64) -> Self {
        self.hash_bytes(value.to_le_bytes())
    }

    /// Hashes a string, prefixed with its length.
    pub fn hash_str(self, value: &str) -> Self {
        self.hash_u64(value.len() as u64).hash_bytes(value.as_bytes())
    }

    /// Finalizes the hash and returns it as a hex-encoded string.
    pub fn finalize(self) -> String {
        hex::encode(self.hasher.finalize_fixed())
    }
}

impl Default for CacheKeyHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_the_same_key() {
        let first = CacheKeyHasher::new()
            .hash_str("https://mainnet.infura.io/v3/abc")
            .hash_str(r#"{"id":1,"jsonrpc":"2.0","method":"eth_gasPrice","params":[]}"#)
            .finalize();
        let second = CacheKeyHasher::new()
            .hash_str("https://mainnet.infura.io/v3/abc")
            .hash_str(r#"{"id":1,"jsonrpc":"2.0","method":"eth_gasPrice","params":[]}"#)
            .finalize();

        assert_eq!(first, second);
    }

    #[test]
    fn different_inputs_produce_different_keys() {
        let gas_price = CacheKeyHasher::new().hash_str("eth_gasPrice").finalize();
        let block_number = CacheKeyHasher::new().hash_str("eth_blockNumber").finalize();

        assert_ne!(gas_price, block_number);
    }

    #[test]
    fn string_boundaries_are_part_of_the_key() {
        let split_one_way = CacheKeyHasher::new().hash_str("ab").hash_str("c").finalize();
        let split_another = CacheKeyHasher::new().hash_str("a").hash_str("bc").finalize();

        assert_ne!(split_one_way, split_another);
    }
}
