// src/ledger/chain.rs
//! The append-only chain of blocks

use super::block::Block;
use super::export::BlockRecord;
use crate::config::LedgerConfig;
use crate::{MiningError, RuntimeError};
use thiserror::Error;
use tracing::{debug, info};

/// What a mining pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningReport {
    pub blocks: usize,
    pub attempts: u64,
}

/// Integrity problems found by [`Ledger::verify`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainFault {
    #[error("block {index} does not link to the hash of block {}", .index - 1)]
    BrokenLink { index: usize },

    #[error("block {index} has not been mined")]
    Unmined { index: usize },

    #[error("block {index} hash does not match its contents")]
    HashMismatch { index: usize },
}

#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    difficulty: usize,
    max_attempts: Option<u64>,
}

impl Ledger {
    /// New ledger holding a mined genesis block.
    ///
    /// The genesis search obeys the configured attempt budget, so a high
    /// difficulty with a small budget fails here instead of hanging.
    pub fn new(config: &LedgerConfig) -> Result<Self, MiningError> {
        let mut genesis = Self::unmined_genesis();
        let attempts = genesis.mine(config.difficulty, config.max_mining_attempts)?;
        debug!(difficulty = config.difficulty, attempts, "genesis block mined");

        Ok(Self::from_genesis(genesis, config))
    }

    fn unmined_genesis() -> Block {
        let mut genesis = Block::genesis();
        genesis.link(0, "0".repeat(64));
        genesis
    }

    fn from_genesis(genesis: Block, config: &LedgerConfig) -> Self {
        Self {
            chain: vec![genesis],
            difficulty: config.difficulty,
            max_attempts: config.max_mining_attempts,
        }
    }

    /// Link `block` to the current tip and append it; returns its index.
    ///
    /// The previous hash is taken as it is now. If the tip gets mined later,
    /// this link goes stale (see [`Ledger::verify`]).
    pub fn append(&mut self, mut block: Block) -> usize {
        let index = self.chain.len();
        let previous_hash = self
            .last()
            .map(|tip| tip.hash().to_string())
            .unwrap_or_else(|| "0".repeat(64));

        block.link(index, previous_hash);
        self.chain.push(block);

        info!(index, "block appended");
        index
    }

    /// Mine every block in chain order; already mined blocks cost nothing
    pub fn mine_all(&mut self) -> Result<MiningReport, RuntimeError> {
        let mut report = MiningReport::default();

        for (index, block) in self.chain.iter_mut().enumerate() {
            let attempts = block
                .mine(self.difficulty, self.max_attempts)
                .map_err(|source| RuntimeError::Mining { index, source })?;

            report.blocks += 1;
            report.attempts += attempts;
        }

        info!(blocks = report.blocks, attempts = report.attempts, "ledger mined");
        Ok(report)
    }

    /// Per-block field maps in chain order
    pub fn serialize_all(&self) -> Vec<BlockRecord> {
        self.chain.iter().map(BlockRecord::from).collect()
    }

    /// Check linkage, hashes and proof-of-work for the whole chain
    pub fn verify(&self) -> Vec<ChainFault> {
        let mut faults = Vec::new();

        for (index, block) in self.chain.iter().enumerate() {
            if !block.hash_is_consistent() {
                faults.push(ChainFault::HashMismatch { index });
            }
            if !block.is_mined(self.difficulty) {
                faults.push(ChainFault::Unmined { index });
            }
            if index > 0 && block.previous_hash() != Some(self.chain[index - 1].hash()) {
                faults.push(ChainFault::BrokenLink { index });
            }
        }

        faults
    }

    pub fn is_valid(&self) -> bool {
        self.verify().is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.chain.get(index)
    }

    pub fn last(&self) -> Option<&Block> {
        self.chain.last()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }
}

impl Default for Ledger {
    fn default() -> Self {
        let config = LedgerConfig::default();
        let mut genesis = Self::unmined_genesis();
        // An unbounded search always succeeds
        let _ = genesis.mine(config.difficulty, None);
        Self::from_genesis(genesis, &config)
    }
}
