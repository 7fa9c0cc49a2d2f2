use chainbow_commons::{
    HashType, Keyspace, DEFAULT_CHAIN_COUNT, DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET,
    DEFAULT_MAX_PASSWORD_LENGTH, MAX_CHAIN_COUNT_ALLOWED, MAX_CHAIN_LENGTH_ALLOWED,
};

use crate::error::{EngineError, EngineResult};

/// The validated parameters shared by every chain of a table.
#[derive(Clone, Copy, Debug)]
pub struct TableConfig {
    /// The type of the hash function used.
    pub hash_type: HashType,
    /// The keyspace the chains walk through.
    pub keyspace: Keyspace,
    /// The length of a chain.
    pub chain_length: usize,
    /// The number of chains to generate.
    pub chain_count: usize,
    /// The seed of the start password draw.
    pub seed: u64,
}

/// A builder for a table configuration.
///
/// All validation happens in [`TableConfigBuilder::build`], before any chain
/// work starts, so a bad request never produces a partial table.
#[derive(Clone, Debug)]
pub struct TableConfigBuilder {
    hash_type: HashType,
    charset: Vec<u8>,
    max_length: usize,
    chain_length: usize,
    chain_count: usize,
    seed: u64,
}

impl Default for TableConfigBuilder {
    fn default() -> Self {
        Self {
            hash_type: HashType::Md5,
            charset: DEFAULT_CHARSET.to_vec(),
            max_length: DEFAULT_MAX_PASSWORD_LENGTH as usize,
            chain_length: DEFAULT_CHAIN_LENGTH,
            chain_count: DEFAULT_CHAIN_COUNT,
            seed: 0,
        }
    }
}

impl TableConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash function of the table.
    pub fn hash_type(mut self, hash_type: HashType) -> Self {
        self.hash_type = hash_type;

        self
    }

    /// Sets the charset of the keyspace.
    pub fn charset(mut self, charset: &[u8]) -> Self {
        self.charset = charset.to_vec();

        self
    }

    /// Sets the maximum password length of the keyspace.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;

        self
    }

    /// Sets the chain length.
    /// Longer chains cover more of the keyspace per stored endpoint but make
    /// lookups quadratically slower.
    pub fn chain_length(mut self, chain_length: usize) -> Self {
        self.chain_length = chain_length;

        self
    }

    /// Sets the number of chains to generate.
    pub fn chain_count(mut self, chain_count: usize) -> Self {
        self.chain_count = chain_count;

        self
    }

    /// Sets the seed of the start password draw, making builds reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;

        self
    }

    /// Validates the parameters and builds a [`TableConfig`].
    pub fn build(self) -> EngineResult<TableConfig> {
        let keyspace = Keyspace::new(&self.charset, self.max_length)?;

        if self.chain_length == 0 {
            return Err(EngineError::NonPositive("the chain length"));
        }
        if self.chain_length > MAX_CHAIN_LENGTH_ALLOWED {
            return Err(EngineError::ChainTooLong {
                requested: self.chain_length,
                max: MAX_CHAIN_LENGTH_ALLOWED,
            });
        }
        if self.chain_count == 0 {
            return Err(EngineError::NonPositive("the chain count"));
        }
        if self.chain_count > MAX_CHAIN_COUNT_ALLOWED {
            return Err(EngineError::TooManyChains {
                requested: self.chain_count,
                max: MAX_CHAIN_COUNT_ALLOWED,
            });
        }

        Ok(TableConfig {
            hash_type: self.hash_type,
            keyspace,
            chain_length: self.chain_length,
            chain_count: self.chain_count,
            seed: self.seed,
        })
    }
}
