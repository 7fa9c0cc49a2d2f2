use chainbow_commons::{KeyspaceError, UnknownHashType};
use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Keyspace(#[from] KeyspaceError),

    #[error(transparent)]
    UnknownHashType(#[from] UnknownHashType),

    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),

    #[error("chain lengths are capped at {max} in this sandbox, got {requested}")]
    ChainTooLong { requested: usize, max: usize },

    #[error("at most {max} chains fit in a sandbox table, got {requested}")]
    TooManyChains { requested: usize, max: usize },

    #[error("expected a {expected}-byte digest for this hash type, got {actual} bytes")]
    WrongDigestLength { expected: usize, actual: usize },

    #[error("the start password does not belong to the keyspace")]
    PasswordOutsideKeyspace,

    #[error("the table generation was cancelled")]
    Cancelled,
}
