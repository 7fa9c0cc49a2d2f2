use chainbow_commons::{CompressedPassword, Digest, Password};

use crate::{
    config::TableConfig,
    error::{EngineError, EngineResult},
};

/// A chain of the rainbow table, made of a startpoint and an endpoint.
///
/// The intermediate steps are never stored; that is the storage saving the
/// whole design exists to exploit.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct RainbowChain {
    pub startpoint: CompressedPassword,
    pub endpoint: CompressedPassword,
}

impl RainbowChain {
    /// Walks a full chain from a start password: `chain_length` alternating
    /// hash/reduce steps, keeping only the endpoint.
    ///
    /// Deterministic for a given configuration, with no failure path: the
    /// reduction family is total over the keyspace.
    pub fn compute(startpoint: CompressedPassword, config: &TableConfig) -> Self {
        let mut current = startpoint.into_password(&config.keyspace);

        for i in 0..config.chain_length {
            let digest = config.hash_type.hash(current);
            current = config.keyspace.reduce(i, &digest);
        }

        RainbowChain {
            startpoint,
            endpoint: CompressedPassword::from_password(current, &config.keyspace),
        }
    }
}

/// One record of a chain trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainStep {
    Start {
        password: Password,
    },
    Hash {
        digest: Digest,
    },
    Reduce {
        password: Password,
        reduction_index: usize,
    },
}

/// Records the walk of [`RainbowChain::compute`] step by step, for display.
///
/// Returns exactly `2 * chain_length + 1` steps: the start password followed
/// by one hash and one reduce record per chain position. Not on the crack
/// path; cracking never materializes whole chains.
pub fn trace_chain(start: Password, config: &TableConfig) -> EngineResult<Vec<ChainStep>> {
    if !config.keyspace.contains(&start) {
        return Err(EngineError::PasswordOutsideKeyspace);
    }

    let mut steps = Vec::with_capacity(2 * config.chain_length + 1);
    steps.push(ChainStep::Start { password: start });

    let mut current = start;
    for i in 0..config.chain_length {
        let digest = config.hash_type.hash(current);
        steps.push(ChainStep::Hash { digest });

        current = config.keyspace.reduce(i, &digest);
        steps.push(ChainStep::Reduce {
            password: current,
            reduction_index: i,
        });
    }

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use chainbow_commons::HashType;

    use super::*;
    use crate::config::TableConfigBuilder;

    fn small_config() -> TableConfig {
        TableConfigBuilder::new()
            .hash_type(HashType::Md5)
            .charset(b"abc")
            .max_length(2)
            .chain_length(4)
            .chain_count(5)
            .build()
            .unwrap()
    }

    #[test]
    fn chains_are_deterministic() {
        let config = small_config();
        let start = CompressedPassword::from(3);

        let first = RainbowChain::compute(start, &config);
        let second = RainbowChain::compute(start, &config);

        assert_eq!(first, second);
        assert_eq!(start, first.startpoint);
    }

    #[test]
    fn trace_has_the_expected_shape() {
        let config = TableConfigBuilder::new().chain_length(3).build().unwrap();

        let steps = trace_chain(Password::new(b"cat"), &config).unwrap();
        assert_eq!(7, steps.len());

        assert!(matches!(
            steps[0],
            ChainStep::Start { password } if password == Password::new(b"cat")
        ));
        for (i, pair) in steps[1..].chunks(2).enumerate() {
            assert!(matches!(pair[0], ChainStep::Hash { .. }));
            assert!(matches!(
                pair[1],
                ChainStep::Reduce { reduction_index, .. } if reduction_index == i
            ));
        }
    }

    #[test]
    fn trace_ends_at_the_chain_endpoint() {
        let config = small_config();
        let start = Password::new(b"ba");

        let steps = trace_chain(start, &config).unwrap();
        let chain = RainbowChain::compute(
            CompressedPassword::from_password(start, &config.keyspace),
            &config,
        );

        let Some(ChainStep::Reduce { password, .. }) = steps.last() else {
            panic!("a trace ends on a reduce step");
        };
        assert_eq!(chain.endpoint.into_password(&config.keyspace), *password);
    }

    #[test]
    fn trace_rejects_foreign_start_passwords() {
        let config = small_config();

        let foreign = trace_chain(Password::new(b"zz"), &config);
        assert!(matches!(
            foreign,
            Err(EngineError::PasswordOutsideKeyspace)
        ));

        let too_long = trace_chain(Password::new(b"abc"), &config);
        assert!(matches!(
            too_long,
            Err(EngineError::PasswordOutsideKeyspace)
        ));
    }
}
