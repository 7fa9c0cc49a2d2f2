use std::time::{Duration, Instant};

use chainbow_commons::{CompressedPassword, Digest, Password};
use tracing::debug;

use crate::{
    config::TableConfig,
    error::{EngineError, EngineResult},
    table::RainbowTable,
};

/// A confirmed crack: a plaintext whose digest is the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrackedPassword {
    pub password: Password,
    /// The chain whose regeneration confirmed the match.
    pub chain_index: usize,
    /// The position in that chain at which the password was hashed.
    pub step_in_chain: usize,
}

/// The outcome of a crack. "Not found" is a successful result, not an error.
#[derive(Clone, Debug)]
pub struct CrackResult {
    pub cracked: Option<CrackedPassword>,
    /// The number of endpoint index probes performed, at most the chain
    /// length.
    pub chains_searched: usize,
    pub lookup_time: Duration,
    /// At least `lookup_time`; also includes the generation time when the
    /// table was built for this request.
    pub total_time: Duration,
    pub total_chains: usize,
}

impl CrackResult {
    pub fn found(&self) -> bool {
        self.cracked.is_some()
    }
}

impl RainbowTable {
    /// Tries to invert a digest against this table.
    ///
    /// Every chain position is probed, from the end of the chain toward the
    /// start: the target is reduced as if it sat at that position, the
    /// hypothesized endpoint is looked up, and on a hit the full chain is
    /// regenerated from its startpoint to confirm. An endpoint hit whose
    /// regeneration never reaches the target digest is a false alarm from a
    /// merged chain and the scan continues.
    ///
    /// O(chain_length^2) hash/reduce work in the worst case, read-only, with
    /// an explicit rejection of malformed digests before any work.
    pub fn crack(&self, target: &[u8]) -> EngineResult<CrackResult> {
        let expected = self.config().hash_type.digest_size();
        if target.len() != expected {
            return Err(EngineError::WrongDigestLength {
                expected,
                actual: target.len(),
            });
        }
        let target: Digest = target.try_into().unwrap();

        let lookup_start = Instant::now();
        let result = self.scan(&target);
        let lookup_time = lookup_start.elapsed();

        match &result.0 {
            Some(cracked) => debug!(
                password = %cracked.password,
                chain_index = cracked.chain_index,
                step_in_chain = cracked.step_in_chain,
                "digest cracked"
            ),
            None => debug!(chains_searched = result.1, "digest not found in the table"),
        }

        Ok(CrackResult {
            cracked: result.0,
            chains_searched: result.1,
            lookup_time,
            total_time: lookup_time,
            total_chains: self.len(),
        })
    }

    fn scan(&self, target: &Digest) -> (Option<CrackedPassword>, usize) {
        let config = self.config();
        let keyspace = &config.keyspace;
        let chain_length = config.chain_length;
        let mut chains_searched = 0;

        for position in (0..chain_length).rev() {
            // hypothesize that the target digest sits at this position and
            // roll the chain forward to its endpoint
            let mut candidate = keyspace.reduce(position, target);
            for step in position + 1..chain_length {
                let digest = config.hash_type.hash(candidate);
                candidate = keyspace.reduce(step, &digest);
            }

            chains_searched += 1;
            let endpoint = CompressedPassword::from_password(candidate, keyspace);
            let Some(entry) = self.search_endpoints(endpoint) else {
                continue;
            };

            // regenerate the matching chain and confirm the digest
            let mut current = entry.startpoint.into_password(keyspace);
            for step in 0..chain_length {
                let digest = config.hash_type.hash(current);
                if digest == *target {
                    return (
                        Some(CrackedPassword {
                            password: current,
                            chain_index: entry.chain_index,
                            step_in_chain: step,
                        }),
                        chains_searched,
                    );
                }
                current = keyspace.reduce(step, &digest);
            }
            // false alarm, an unrelated chain merged into this endpoint
        }

        (None, chains_searched)
    }
}

/// Builds a table for the given configuration and cracks a digest against it,
/// reporting the combined generation and lookup time.
pub fn crack_hash(config: TableConfig, target: &[u8]) -> EngineResult<CrackResult> {
    let expected = config.hash_type.digest_size();
    if target.len() != expected {
        return Err(EngineError::WrongDigestLength {
            expected,
            actual: target.len(),
        });
    }

    let total_start = Instant::now();
    let table = RainbowTable::new_blocking(config)?;

    let mut result = table.crack(target)?;
    result.total_time = total_start.elapsed();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use chainbow_commons::HashType;

    use super::*;
    use crate::{
        chain::{trace_chain, ChainStep},
        config::TableConfigBuilder,
    };

    fn small_config() -> TableConfig {
        TableConfigBuilder::new()
            .hash_type(HashType::Md5)
            .charset(b"abc")
            .max_length(2)
            .chain_length(4)
            .chain_count(8)
            .seed(7)
            .build()
            .unwrap()
    }

    #[test]
    fn cracks_a_stored_chain_startpoint() {
        let config = small_config();
        let table = RainbowTable::new_blocking(config).unwrap();

        let (chain, _) = table.iter().next().unwrap();
        let start_password = chain.startpoint.into_password(&config.keyspace);
        let target = config.hash_type.hash(start_password);

        let result = table.crack(&target).unwrap();
        let cracked = result.cracked.expect("a stored startpoint must crack");

        assert_eq!(start_password, cracked.password);
        assert!(cracked.step_in_chain < config.chain_length);
        assert!(result.chains_searched >= 1);
        assert!(result.chains_searched <= config.chain_length);
    }

    #[test]
    fn cracks_a_mid_chain_plaintext() {
        let config = small_config();
        let table = RainbowTable::new_blocking(config).unwrap();

        // take the plaintext hashed at step 2 of a stored chain
        let (chain, _) = table.iter().next().unwrap();
        let start_password = chain.startpoint.into_password(&config.keyspace);
        let steps = trace_chain(start_password, &config).unwrap();
        let ChainStep::Reduce { password, .. } = steps[4] else {
            panic!("step 4 of a trace is a reduce");
        };
        let target = config.hash_type.hash(password);

        let result = table.crack(&target).unwrap();
        let cracked = result.cracked.expect("a chain member must crack");

        assert_eq!(password, cracked.password);
        assert_eq!(config.hash_type.hash(cracked.password), target);
    }

    #[test]
    fn an_absent_digest_is_not_an_error() {
        let config = small_config();
        let table = RainbowTable::new_blocking(config).unwrap();

        // "zz" is outside the abc keyspace, so its digest cannot occur in
        // any chain
        let target = config.hash_type.hash(Password::new(b"zz"));

        let result = table.crack(&target).unwrap();
        assert!(!result.found());
        assert!(result.chains_searched <= config.chain_length);
        assert_eq!(table.len(), result.total_chains);
    }

    #[test]
    fn crack_outcomes_are_reproducible() {
        let target = HashType::Md5.hash(Password::new(b"a"));

        let first = crack_hash(small_config(), &target).unwrap();
        let second = crack_hash(small_config(), &target).unwrap();

        assert_eq!(first.found(), second.found());
        assert_eq!(
            first.cracked.map(|c| c.password),
            second.cracked.map(|c| c.password)
        );
        assert_eq!(first.chains_searched, second.chains_searched);
    }

    #[test]
    fn malformed_digests_are_rejected_before_any_work() {
        let config = small_config();
        let table = RainbowTable::new_blocking(config).unwrap();

        let result = table.crack(&[0u8; 5]);
        assert!(matches!(
            result,
            Err(EngineError::WrongDigestLength {
                expected: 16,
                actual: 5
            })
        ));

        let result = crack_hash(small_config(), &[0u8; 20]);
        assert!(matches!(
            result,
            Err(EngineError::WrongDigestLength {
                expected: 16,
                actual: 20
            })
        ));
    }

    #[test]
    fn total_time_includes_the_lookup() {
        let target = HashType::Md5.hash(Password::new(b"a"));

        let result = crack_hash(small_config(), &target).unwrap();
        assert!(result.total_time >= result.lookup_time);
    }
}
