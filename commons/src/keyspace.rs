use thiserror::Error;

use crate::{
    ArrayVec, Digest, Password, MAX_CHARSET_LENGTH_ALLOWED, MAX_KEYSPACE_BITS,
    MAX_PASSWORD_LENGTH_ALLOWED,
};

#[derive(Error, Debug)]
pub enum KeyspaceError {
    #[error("the charset cannot be empty")]
    EmptyCharset,

    #[error("the charset can hold at most {MAX_CHARSET_LENGTH_ALLOWED} symbols, got {0}")]
    CharsetTooLong(usize),

    #[error("the charset can only contain ASCII characters")]
    NonAsciiCharset,

    #[error("the charset contains the symbol `{0}` twice")]
    DuplicateSymbol(char),

    #[error("the maximum password length must be greater than zero")]
    ZeroMaxLength,

    #[error("passwords can be at most {MAX_PASSWORD_LENGTH_ALLOWED} characters long, got {0}")]
    MaxLengthTooLong(usize),

    #[error("keyspaces up to 2^{MAX_KEYSPACE_BITS} are supported, but this one needs 2^{0}")]
    TooLarge(u8),
}

/// The enumerable set of all strings of length `1..=max_length` over an
/// ordered charset.
///
/// Members are ranked in length-then-lexicographic order: all length-1
/// strings first, then all length-2 strings, and so on, each block sorted by
/// the charset order of its symbols. The rank is the *ordinal* of a password
/// and doubles as its canonical encoding in endpoint indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keyspace {
    charset: ArrayVec<[u8; MAX_CHARSET_LENGTH_ALLOWED]>,
    max_length: usize,
    /// `offsets[k]` is the number of members of length <= k, so the ordinals
    /// of the length-k members are `offsets[k - 1]..offsets[k]`.
    offsets: ArrayVec<[usize; MAX_PASSWORD_LENGTH_ALLOWED + 1]>,
    size: usize,
}

impl Keyspace {
    /// Builds the keyspace of all strings of length `1..=max_length` over
    /// `charset`, rejecting charsets and sizes the sandbox cannot handle.
    pub fn new(charset: &[u8], max_length: usize) -> Result<Self, KeyspaceError> {
        if charset.is_empty() {
            return Err(KeyspaceError::EmptyCharset);
        }
        if charset.len() > MAX_CHARSET_LENGTH_ALLOWED {
            return Err(KeyspaceError::CharsetTooLong(charset.len()));
        }
        if !charset.is_ascii() {
            return Err(KeyspaceError::NonAsciiCharset);
        }
        if let Some(dup) = charset
            .iter()
            .enumerate()
            .find_map(|(i, c)| charset[..i].contains(c).then_some(*c))
        {
            return Err(KeyspaceError::DuplicateSymbol(dup as char));
        }
        if max_length == 0 {
            return Err(KeyspaceError::ZeroMaxLength);
        }
        if max_length > MAX_PASSWORD_LENGTH_ALLOWED {
            return Err(KeyspaceError::MaxLengthTooLong(max_length));
        }

        // n = sum of charset^k for k in 1..=max_length, overflow-checked
        let mut n: u128 = 0;
        let mut offsets = ArrayVec::new();
        offsets.push(0);
        for k in 1..=max_length {
            n += (charset.len() as u128).pow(k as u32);
            if n > 1 << MAX_KEYSPACE_BITS {
                return Err(KeyspaceError::TooLarge((n as f64).log2().ceil() as u8));
            }
            offsets.push(n as usize);
        }

        Ok(Self {
            charset: charset.try_into().unwrap(),
            max_length,
            offsets,
            size: n as usize,
        })
    }

    /// The total number of members.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn charset(&self) -> &[u8] {
        &self.charset
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// The rank of a symbol in the charset.
    pub fn symbol_index(&self, symbol: u8) -> Option<usize> {
        self.charset.iter().position(|&c| c == symbol)
    }

    /// Returns true if the password is a member of this keyspace.
    pub fn contains(&self, password: &Password) -> bool {
        (1..=self.max_length).contains(&password.len())
            && password.iter().all(|&c| self.symbol_index(c).is_some())
    }

    /// Decodes an ordinal into the member it ranks.
    ///
    /// # Panics
    ///
    /// Panics if `ordinal >= self.size()`.
    #[inline]
    pub fn index_to_plaintext(&self, ordinal: usize) -> Password {
        assert!(ordinal < self.size);

        // the first offset strictly above the ordinal marks its length block
        let len = self.offsets.iter().position(|&end| ordinal < end).unwrap();
        let mut index = ordinal - self.offsets[len - 1];

        let mut plaintext = Password::default();
        for _ in 0..len {
            plaintext.push(0);
        }

        // most significant symbol first, so in-block order is lexicographic
        let base = self.charset.len();
        for slot in plaintext.iter_mut().rev() {
            *slot = self.charset[index % base];
            index /= base;
        }

        plaintext
    }

    /// Encodes a member into its ordinal, the inverse of
    /// [`Self::index_to_plaintext`].
    ///
    /// # Panics
    ///
    /// Panics if the password is not a member of this keyspace.
    #[inline]
    pub fn plaintext_to_index(&self, plaintext: &Password) -> usize {
        let base = self.charset.len();
        let index = plaintext
            .iter()
            .fold(0, |acc, &c| acc * base + self.symbol_index(c).unwrap());

        self.offsets[plaintext.len() - 1] + index
    }

    /// The position-indexed reduction family: maps a digest back into the
    /// keyspace, differently for every chain position.
    ///
    /// The first 8 digest bytes are read as an unsigned big-endian integer,
    /// offset by the position and wrapped around the keyspace size. Reading a
    /// fixed-width prefix keeps the mapping free of length bias across the
    /// supported digest widths.
    #[inline]
    pub fn reduce(&self, position: usize, digest: &Digest) -> Password {
        let prefix = u64::from_be_bytes(digest[..8].try_into().unwrap());
        let ordinal = (prefix as usize).wrapping_add(position) % self.size;

        self.index_to_plaintext(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::HashType;

    #[test]
    fn size_matches_the_formula() {
        for (charset, max_length) in [
            (b"abc".as_slice(), 3),
            (b"ab".as_slice(), 4),
            (b"0123456789".as_slice(), 2),
        ] {
            let keyspace = Keyspace::new(charset, max_length).unwrap();
            let expected: usize = (1..=max_length as u32)
                .map(|k| charset.len().pow(k))
                .sum();

            assert_eq!(expected, keyspace.size());
        }
    }

    #[test]
    fn enumeration_is_exhaustive_and_unique() {
        let keyspace = Keyspace::new(b"ab", 4).unwrap();

        let members: HashSet<Vec<u8>> = (0..keyspace.size())
            .map(|i| keyspace.index_to_plaintext(i).to_vec())
            .collect();

        assert_eq!(keyspace.size(), members.len());
        assert_eq!(30, members.len());
    }

    #[test]
    fn enumeration_is_length_then_lexicographic() {
        let keyspace = Keyspace::new(b"abc", 3).unwrap();

        let expected = [
            "a", "b", "c", "aa", "ab", "ac", "ba", "bb", "bc", "ca", "cb", "cc", "aaa", "aab",
        ];

        for (ordinal, &text) in expected.iter().enumerate() {
            assert_eq!(
                Password::new(text.as_bytes()),
                keyspace.index_to_plaintext(ordinal)
            );
        }
    }

    #[test]
    fn plaintext_to_index_inverts_the_enumeration() {
        let keyspace = Keyspace::new(b"abc", 3).unwrap();

        for ordinal in 0..keyspace.size() {
            let plaintext = keyspace.index_to_plaintext(ordinal);
            assert_eq!(ordinal, keyspace.plaintext_to_index(&plaintext));
        }
    }

    #[test]
    fn reduce_is_deterministic_and_total() {
        let keyspace = Keyspace::new(b"abc", 2).unwrap();
        let digest = HashType::Md5.hash(Password::new(b"a"));

        for position in 0..8 {
            let first = keyspace.reduce(position, &digest);
            let second = keyspace.reduce(position, &digest);

            assert_eq!(first, second);
            assert!(keyspace.contains(&first));
        }
    }

    #[test]
    fn reduce_varies_by_position() {
        // with positions below the keyspace size, distinct positions shift
        // the same digest to distinct ordinals
        let keyspace = Keyspace::new(b"abc", 2).unwrap();
        let digest = HashType::Md5.hash(Password::new(b"a"));

        let reduced: HashSet<Vec<u8>> = (0..keyspace.size())
            .map(|position| keyspace.reduce(position, &digest).to_vec())
            .collect();

        assert_eq!(keyspace.size(), reduced.len());
    }

    #[test]
    fn invalid_keyspaces_are_rejected() {
        assert!(matches!(
            Keyspace::new(b"", 4),
            Err(KeyspaceError::EmptyCharset)
        ));
        assert!(matches!(
            Keyspace::new(b"abca", 4),
            Err(KeyspaceError::DuplicateSymbol('a'))
        ));
        assert!(matches!(
            Keyspace::new(&[0xff], 4),
            Err(KeyspaceError::NonAsciiCharset)
        ));
        assert!(matches!(
            Keyspace::new(b"abc", 0),
            Err(KeyspaceError::ZeroMaxLength)
        ));
        assert!(matches!(
            Keyspace::new(b"abc", 11),
            Err(KeyspaceError::MaxLengthTooLong(11))
        ));

        let alnum = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        assert!(matches!(
            Keyspace::new(alnum, 10),
            Err(KeyspaceError::TooLarge(_))
        ));
    }
}
