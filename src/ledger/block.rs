// src/ledger/block.rs
//! A single ledger entry and its proof-of-work search

use crate::runtime::value::Value;
use crate::MiningError;
use sha2::{Digest, Sha256};

/// Payload of the first block of every ledger
pub const GENESIS_DATA: &str = "Genesis Block";

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    data: Value,
    previous_hash: Option<String>,
    index: Option<usize>,
    nonce: u64,
    hash: String,
}

impl Block {
    /// Unlinked block with nonce 0 and its hash computed
    pub fn new(data: Value) -> Self {
        let mut block = Self {
            data,
            previous_hash: None,
            index: None,
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.calculate_hash();
        block
    }

    pub fn genesis() -> Self {
        Self::new(Value::from(GENESIS_DATA))
    }

    /// SHA-256 over the canonical data string followed by the decimal nonce
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.data.to_string().as_bytes());
        hasher.update(self.nonce.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Search nonces until the hash has `difficulty` leading zeros.
    ///
    /// Returns the number of nonces tried; zero when the block already meets
    /// the target. With a budget, gives up after that many attempts and
    /// keeps the nonce reached so a later call continues from there.
    pub fn mine(&mut self, difficulty: usize, budget: Option<u64>) -> Result<u64, MiningError> {
        if meets_target(&self.hash, difficulty) {
            return Ok(0);
        }

        // The data never changes while mining; hash it once and extend per nonce
        let mut prefix = Sha256::new();
        prefix.update(self.data.to_string().as_bytes());

        let mut attempts: u64 = 0;
        loop {
            if budget.is_some_and(|limit| attempts >= limit) {
                return Err(MiningError::AttemptsExhausted { attempts });
            }

            self.nonce += 1;
            attempts += 1;

            let mut hasher = prefix.clone();
            hasher.update(self.nonce.to_string().as_bytes());
            self.hash = hex::encode(hasher.finalize());

            if meets_target(&self.hash, difficulty) {
                return Ok(attempts);
            }
        }
    }

    pub fn is_mined(&self, difficulty: usize) -> bool {
        meets_target(&self.hash, difficulty)
    }

    /// Stored hash still matches data and nonce
    pub fn hash_is_consistent(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub(crate) fn link(&mut self, index: usize, previous_hash: String) {
        self.index = Some(index);
        self.previous_hash = Some(previous_hash);
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn previous_hash(&self) -> Option<&str> {
        self.previous_hash.as_deref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// `Key : value` lines, as written by `print`
    pub fn summary_lines(&self) -> [String; 5] {
        let or_none = |v: Option<String>| v.unwrap_or_else(|| "None".to_string());
        [
            format!("Index : {}", or_none(self.index.map(|i| i.to_string()))),
            format!("Hash : {}", self.hash),
            format!("Previous Hash : {}", or_none(self.previous_hash.clone())),
            format!("Nonce : {}", self.nonce),
            format!("Data : {}", self.data),
        ]
    }
}

fn meets_target(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::FieldMap;

    fn alice() -> Block {
        Block::new(Value::Dict(
            FieldMap::new().with_field("name", "Alice").with_field("age", 30),
        ))
    }

    #[test]
    fn test_new_block_hash() {
        let block = alice();

        let mut hasher = Sha256::new();
        hasher.update(b"{'name': 'Alice', 'age': 30}0");
        assert_eq!(block.hash(), hex::encode(hasher.finalize()));
        assert_eq!(block.nonce(), 0);
        assert_eq!(block.index(), None);
        assert_eq!(block.previous_hash(), None);
    }

    #[test]
    fn test_mine_reaches_target() {
        let mut block = alice();
        block.mine(3, None).unwrap();

        assert!(block.hash().starts_with("000"));
        assert!(block.hash_is_consistent());
    }

    #[test]
    fn test_mine_is_idempotent() {
        let mut block = alice();
        block.mine(2, None).unwrap();
        let (nonce, hash) = (block.nonce(), block.hash().to_string());

        assert_eq!(block.mine(2, None), Ok(0));
        assert_eq!(block.nonce(), nonce);
        assert_eq!(block.hash(), hash);
    }

    #[test]
    fn test_mine_budget() {
        let mut block = alice();
        let result = block.mine(64, Some(10));

        assert_eq!(result, Err(MiningError::AttemptsExhausted { attempts: 10 }));
        assert_eq!(block.nonce(), 10);
        assert!(block.hash_is_consistent());
    }

    #[test]
    fn test_summary_lines_of_unlinked_block() {
        let lines = alice().summary_lines();

        assert_eq!(lines[0], "Index : None");
        assert_eq!(lines[2], "Previous Hash : None");
        assert_eq!(lines[4], "Data : {'name': 'Alice', 'age': 30}");
    }
}
