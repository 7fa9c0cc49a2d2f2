//! Shared value types of the chainbow rainbow table sandbox.
//!
//! Everything in this crate is a plain value: passwords, digests, the
//! keyspace enumeration and the position-indexed reduction family. The
//! engine crate owns table generation and cracking on top of these.

mod hash_type;
mod keyspace;
mod ntlm;

pub use hash_type::{HashType, UnknownHashType};
pub use keyspace::{Keyspace, KeyspaceError};
pub use tinyvec::ArrayVec;

use core::{
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
};

/// The default charset, the lowercase ASCII letters.
pub const DEFAULT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// The default maximum password length.
pub const DEFAULT_MAX_PASSWORD_LENGTH: u8 = 4;

/// The default chain length.
pub const DEFAULT_CHAIN_LENGTH: usize = 100;

/// The default number of chains per table.
pub const DEFAULT_CHAIN_COUNT: usize = 500;

/// The maximum password size allowed.
pub const MAX_PASSWORD_LENGTH_ALLOWED: usize = 10;

/// The maximum digest size allowed.
pub const MAX_DIGEST_LENGTH_ALLOWED: usize = 64;

/// The maximum charset length allowed.
pub const MAX_CHARSET_LENGTH_ALLOWED: usize = 126;

/// The largest keyspace the sandbox accepts, in bits.
pub const MAX_KEYSPACE_BITS: u8 = 48;

/// The maximum number of chains per table.
pub const MAX_CHAIN_COUNT_ALLOWED: usize = 1 << 24;

/// The maximum chain length.
pub const MAX_CHAIN_LENGTH_ALLOWED: usize = 1_000_000;

/// An ASCII password stored in a stack-allocated vector.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Password(ArrayVec<[u8; MAX_PASSWORD_LENGTH_ALLOWED]>);

impl Password {
    /// Creates a new password.
    ///
    /// # Panics
    ///
    /// Panics if the text is longer than [`MAX_PASSWORD_LENGTH_ALLOWED`].
    pub fn new(text: &[u8]) -> Self {
        Password(text.try_into().unwrap())
    }
}

impl AsRef<[u8]> for Password {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Password {
    type Target = ArrayVec<[u8; MAX_PASSWORD_LENGTH_ALLOWED]>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Password {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", core::str::from_utf8(&self.0).unwrap())
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        <Password as Display>::fmt(self, f)
    }
}

/// A digest stored in a stack-allocated vector.
pub type Digest = ArrayVec<[u8; MAX_DIGEST_LENGTH_ALLOWED]>;

/// A password in its canonical ordinal form, the rank of the password in the
/// length-then-lexicographic enumeration of its keyspace.
///
/// It doesn't make any assumption on the keyspace used, so two compressed
/// passwords from tables over different keyspaces are unrelated even if their
/// inner ordinal is equal.
#[repr(transparent)]
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompressedPassword(usize);

impl CompressedPassword {
    #[inline]
    pub fn into_password(self, keyspace: &Keyspace) -> Password {
        keyspace.index_to_plaintext(self.0)
    }

    #[inline]
    pub fn from_password(password: Password, keyspace: &Keyspace) -> Self {
        CompressedPassword(keyspace.plaintext_to_index(&password))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for CompressedPassword {
    fn from(ordinal: usize) -> Self {
        CompressedPassword(ordinal)
    }
}

impl nohash_hasher::IsEnabled for CompressedPassword {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_display_roundtrip() {
        let password = Password::new(b"cat");
        assert_eq!("cat", password.to_string());
        assert_eq!(b"cat", password.as_ref());
    }

    #[test]
    fn compressed_password_roundtrip() {
        let keyspace = Keyspace::new(b"abc", 2).unwrap();

        for ordinal in 0..keyspace.size() {
            let password = CompressedPassword::from(ordinal).into_password(&keyspace);
            let back = CompressedPassword::from_password(password, &keyspace);
            assert_eq!(ordinal, back.get());
        }
    }
}
