use std::{
    collections::HashMap,
    hash::BuildHasherDefault,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use chainbow_commons::{CompressedPassword, Password};
use crossbeam_channel::{unbounded, Sender};
use nohash_hasher::IntMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    chain::RainbowChain,
    config::TableConfig,
    error::{EngineError, EngineResult},
    event::{Event, TableHandle},
};

/// How many chains are built between two cancellation checks.
const CHAIN_BATCH_SIZE: usize = 4096;

/// What an endpoint maps back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainEntry {
    pub startpoint: CompressedPassword,
    /// The index of the chain whose endpoint this is. When several chains
    /// merge into the same endpoint the last written one wins.
    pub chain_index: usize,
}

/// A rainbow table: an endpoint index over chains sharing one configuration.
///
/// Immutable once built; lookups take `&self` so concurrent cracks need no
/// synchronization. Nothing persists between requests.
pub struct RainbowTable {
    chains: IntMap<CompressedPassword, ChainEntry>,
    config: TableConfig,
    generation_time: Duration,
}

/// The build report of a generated table.
#[derive(Clone, Debug)]
pub struct TableSummary {
    /// The number of stored chains, after endpoint collisions.
    pub table_size: usize,
    pub generation_time: Duration,
    /// An uncorrected upper bound in percent, clamped to `[0, 100]`. Chain
    /// merges are not simulated.
    pub estimated_coverage: f64,
    pub total_keyspace: usize,
    pub sample_chains: Vec<(Password, Password)>,
}

impl RainbowTable {
    /// Generates a rainbow table, blocking the current thread.
    pub fn new_blocking(config: TableConfig) -> EngineResult<Self> {
        Self::new(config, None, None)
    }

    /// Generates a rainbow table on a background thread.
    /// Returns a handle to receive progress events, cancel the build and get
    /// the generated table.
    pub fn new_nonblocking(config: TableConfig) -> TableHandle {
        let (sender, receiver) = unbounded();
        let cancel = Arc::new(AtomicBool::new(false));

        let thread_cancel = Arc::clone(&cancel);
        let thread_handle =
            thread::spawn(move || Self::new(config, Some(sender), Some(thread_cancel)));

        TableHandle {
            thread_handle,
            receiver,
            cancel,
        }
    }

    /// Draws the start passwords, reproducibly from the configured seed.
    fn startpoints(config: &TableConfig) -> Vec<CompressedPassword> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        (0..config.chain_count)
            .map(|_| rng.gen_range(0..config.keyspace.size()).into())
            .collect()
    }

    fn new(
        config: TableConfig,
        sender: Option<Sender<Event>>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> EngineResult<Self> {
        debug!(
            chain_count = config.chain_count,
            chain_length = config.chain_length,
            keyspace = config.keyspace.size(),
            "generating rainbow table"
        );
        let start = Instant::now();

        let startpoints = Self::startpoints(&config);
        let mut chains: IntMap<CompressedPassword, ChainEntry> =
            HashMap::with_capacity_and_hasher(config.chain_count, BuildHasherDefault::default());

        let batch_count = (startpoints.len() + CHAIN_BATCH_SIZE - 1) / CHAIN_BATCH_SIZE;
        let mut built = Vec::new();

        for (batch_number, batch) in startpoints.chunks(CHAIN_BATCH_SIZE).enumerate() {
            if let Some(cancel) = &cancel {
                if cancel.load(Ordering::Relaxed) {
                    debug!("table generation cancelled, discarding partial chains");
                    return Err(EngineError::Cancelled);
                }
            }

            if let Some(sender) = &sender {
                let _ = sender.send(Event::Batch {
                    batch_number: batch_number + 1,
                    batch_count,
                });
            }

            batch
                .par_iter()
                .map(|&startpoint| RainbowChain::compute(startpoint, &config))
                .collect_into_vec(&mut built);

            // sequential inserts in chain order keep endpoint collisions
            // last-write-wins and the build deterministic
            let base_index = batch_number * CHAIN_BATCH_SIZE;
            for (offset, chain) in built.drain(..).enumerate() {
                chains.insert(
                    chain.endpoint,
                    ChainEntry {
                        startpoint: chain.startpoint,
                        chain_index: base_index + offset,
                    },
                );
            }

            if let Some(sender) = &sender {
                let progress = (batch_number + 1) as f64 / batch_count as f64 * 100.;
                let _ = sender.send(Event::Progress(progress));
            }
        }

        chains.shrink_to_fit();
        let generation_time = start.elapsed();
        debug!(
            unique_chains = chains.len(),
            ?generation_time,
            "rainbow table generated"
        );

        Ok(Self {
            chains,
            config,
            generation_time,
        })
    }

    /// Returns the number of chains stored in the table.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn generation_time(&self) -> Duration {
        self.generation_time
    }

    /// Returns an iterator over the chains of the table.
    pub fn iter(&self) -> impl Iterator<Item = (RainbowChain, usize)> + '_ {
        self.chains.iter().map(|(&endpoint, entry)| {
            (
                RainbowChain {
                    startpoint: entry.startpoint,
                    endpoint,
                },
                entry.chain_index,
            )
        })
    }

    /// Searches the endpoints for a password.
    pub fn search_endpoints(&self, endpoint: CompressedPassword) -> Option<ChainEntry> {
        self.chains.get(&endpoint).copied()
    }

    /// The estimated fraction of digests the table can invert, in percent.
    ///
    /// This is the classic `chain_count * chain_length / keyspace` upper
    /// bound; it does not correct for chain merges.
    pub fn estimated_coverage(&self) -> f64 {
        let reachable = (self.config.chain_count * self.config.chain_length) as f64;

        (reachable / self.config.keyspace.size() as f64 * 100.).min(100.)
    }

    /// Returns up to `count` chains decoded to their plaintext form.
    pub fn sample_chains(&self, count: usize) -> Vec<(Password, Password)> {
        self.chains
            .iter()
            .take(count)
            .map(|(endpoint, entry)| {
                (
                    entry.startpoint.into_password(&self.config.keyspace),
                    endpoint.into_password(&self.config.keyspace),
                )
            })
            .collect()
    }

    /// The build report of this table.
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            table_size: self.len(),
            generation_time: self.generation_time,
            estimated_coverage: self.estimated_coverage(),
            total_keyspace: self.config.keyspace.size(),
            sample_chains: self.sample_chains(5),
        }
    }
}

impl std::fmt::Debug for RainbowTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (start, end) in self.sample_chains(10) {
            writeln!(f, "{start} -> {end}")?;
        }
        writeln!(f, "...")
    }
}
