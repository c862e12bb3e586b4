// src/ledger/mod.rs
//! Hash-linked, proof-of-work-sealed ledger

pub mod block;
pub mod chain;
pub mod export;

pub use block::Block;
pub use chain::{ChainFault, Ledger, MiningReport};
pub use export::BlockRecord;
