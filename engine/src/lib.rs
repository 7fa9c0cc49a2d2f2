//! The chainbow rainbow table engine: table generation and digest inversion.
//!
//! A table is generated from a validated [`TableConfig`], either blocking or
//! on a background thread with progress events and cancellation. Cracking is
//! read-only against the finished table. See [`RainbowTable::crack`] for the
//! inversion algorithm.

mod chain;
mod config;
mod cracker;
mod error;
mod event;
mod table;

pub use {
    chain::{trace_chain, ChainStep, RainbowChain},
    config::{TableConfig, TableConfigBuilder},
    cracker::{crack_hash, CrackResult, CrackedPassword},
    error::{EngineError, EngineResult},
    event::{Event, TableHandle},
    table::{ChainEntry, RainbowTable, TableSummary},
};
