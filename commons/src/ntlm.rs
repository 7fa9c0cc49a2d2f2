use md4::{digest::generic_array::GenericArray, digest::OutputSizeUser, Digest as Md4Digest, Md4};
use tinyvec::ArrayVec;

use crate::MAX_PASSWORD_LENGTH_ALLOWED;

/// UTF-16LE encodes an ASCII password.
#[inline]
fn utf16_le(password: &[u8]) -> ArrayVec<[u8; MAX_PASSWORD_LENGTH_ALLOWED * 2]> {
    let mut buf = ArrayVec::new();

    for el in password {
        buf.push(*el);
        buf.push(0);
    }

    buf
}

/// Hashes a password using NTLM, an MD4 over the UTF-16LE encoding.
#[inline]
pub fn ntlm(password: &[u8]) -> GenericArray<u8, <Md4 as OutputSizeUser>::OutputSize> {
    Md4::digest(utf16_le(password))
}
