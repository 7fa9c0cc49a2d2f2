use core::{fmt::Display, str::FromStr};

use md4::{Digest as _, Md4};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};
use thiserror::Error;

use crate::{ntlm::ntlm, Digest, Password};

/// All the supported hash functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashType {
    Ntlm,
    Md4,
    Md5,
    Sha1,
    Sha2_224,
    Sha2_256,
    Sha2_384,
    Sha2_512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

impl HashType {
    /// Hashes a password using the right hash function.
    #[inline]
    pub fn hash(&self, password: Password) -> Digest {
        match self {
            HashType::Ntlm => ntlm(&password).as_slice().try_into().unwrap(),
            HashType::Md4 => Md4::digest(&password).as_slice().try_into().unwrap(),
            HashType::Md5 => Md5::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha1 => Sha1::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha2_224 => Sha224::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha2_256 => Sha256::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha2_384 => Sha384::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha2_512 => Sha512::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha3_224 => Sha3_224::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha3_256 => Sha3_256::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha3_384 => Sha3_384::digest(&password).as_slice().try_into().unwrap(),
            HashType::Sha3_512 => Sha3_512::digest(&password).as_slice().try_into().unwrap(),
        }
    }

    /// Gets the digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            HashType::Ntlm => Md4::output_size(),
            HashType::Md4 => Md4::output_size(),
            HashType::Md5 => Md5::output_size(),
            HashType::Sha1 => Sha1::output_size(),
            HashType::Sha2_224 => Sha224::output_size(),
            HashType::Sha2_256 => Sha256::output_size(),
            HashType::Sha2_384 => Sha384::output_size(),
            HashType::Sha2_512 => Sha512::output_size(),
            HashType::Sha3_224 => Sha3_224::output_size(),
            HashType::Sha3_256 => Sha3_256::output_size(),
            HashType::Sha3_384 => Sha3_384::output_size(),
            HashType::Sha3_512 => Sha3_512::output_size(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashType::Ntlm => "ntlm",
            HashType::Md4 => "md4",
            HashType::Md5 => "md5",
            HashType::Sha1 => "sha1",
            HashType::Sha2_224 => "sha224",
            HashType::Sha2_256 => "sha256",
            HashType::Sha2_384 => "sha384",
            HashType::Sha2_512 => "sha512",
            HashType::Sha3_224 => "sha3-224",
            HashType::Sha3_256 => "sha3-256",
            HashType::Sha3_384 => "sha3-384",
            HashType::Sha3_512 => "sha3-512",
        }
    }
}

impl Display for HashType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
#[error("unknown hash type `{0}`")]
pub struct UnknownHashType(pub String);

impl FromStr for HashType {
    type Err = UnknownHashType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hash_type = match s.to_ascii_lowercase().as_str() {
            "ntlm" => HashType::Ntlm,
            "md4" => HashType::Md4,
            "md5" => HashType::Md5,
            "sha1" => HashType::Sha1,
            "sha224" => HashType::Sha2_224,
            "sha256" => HashType::Sha2_256,
            "sha384" => HashType::Sha2_384,
            "sha512" => HashType::Sha2_512,
            "sha3-224" => HashType::Sha3_224,
            "sha3-256" => HashType::Sha3_256,
            "sha3-384" => HashType::Sha3_384,
            "sha3-512" => HashType::Sha3_512,
            _ => return Err(UnknownHashType(s.to_owned())),
        };

        Ok(hash_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(digest: &Digest) -> String {
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn md5_known_vector() {
        let digest = HashType::Md5.hash(Password::new(b"hello"));
        assert_eq!("5d41402abc4b2a76b9719d911017c592", hex(&digest));
    }

    #[test]
    fn ntlm_known_vector() {
        let digest = HashType::Ntlm.hash(Password::new(b"password"));
        assert_eq!("8846f7eaee8fb117ad06bdd830b7586c", hex(&digest));
    }

    #[test]
    fn digest_sizes() {
        assert_eq!(16, HashType::Ntlm.digest_size());
        assert_eq!(16, HashType::Md5.digest_size());
        assert_eq!(20, HashType::Sha1.digest_size());
        assert_eq!(32, HashType::Sha2_256.digest_size());
        assert_eq!(64, HashType::Sha3_512.digest_size());
    }

    #[test]
    fn parse_hash_type_names() {
        assert_eq!(HashType::Md5, "md5".parse().unwrap());
        assert_eq!(HashType::Sha2_256, "SHA256".parse().unwrap());
        assert_eq!(HashType::Sha3_384, "sha3-384".parse().unwrap());
        assert!("whirlpool".parse::<HashType>().is_err());
    }
}
