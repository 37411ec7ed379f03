use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::codec::decode;
use super::errors::HashError;
use super::params::HashParameters;
use super::params::RawHash;

/// Hash a password under freshly generated random salt.
///
/// # Arguments
/// * `params` - Cost parameters and salt/key lengths
/// * `password` - Plaintext password
///
/// # Returns
/// Salt and derived key
///
/// # Errors
/// * `EntropySourceFailure` - The OS random source failed
/// * `MalformedHash` - Parameters are outside what Argon2 accepts
/// * `Derivation` - Argon2 rejected the derivation
pub fn hash_password(params: &HashParameters, password: &[u8]) -> Result<RawHash, HashError> {
    params.validate()?;

    let mut salt = vec![0u8; params.salt_length as usize];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| HashError::EntropySourceFailure(e.to_string()))?;

    let hash = derive(params, password, &salt)?;

    Ok(RawHash { salt, hash })
}

/// Verify a password against a reference hash.
///
/// The key is re-derived with the reference salt and compared in constant
/// time.
///
/// # Returns
/// True if the password matches, false otherwise
///
/// # Errors
/// * `MalformedHash` - Parameters are outside what Argon2 accepts
/// * `Derivation` - Argon2 rejected the derivation
pub fn verify(
    params: &HashParameters,
    password: &[u8],
    reference: &RawHash,
) -> Result<bool, HashError> {
    params.validate()?;

    let computed = derive(params, password, &reference.salt)?;

    Ok(constant_time_eq(&computed, &reference.hash))
}

/// Decode an encoded hash and verify a password against it.
///
/// # Errors
/// * Codec errors from [`decode`] are returned unchanged
/// * `Derivation` - Argon2 rejected the derivation
pub fn verify_encoded(password: &[u8], encoded: &str) -> Result<bool, HashError> {
    let (reference, params) = decode(encoded)?;
    verify(&params, password, &reference)
}

fn derive(params: &HashParameters, password: &[u8], salt: &[u8]) -> Result<Vec<u8>, HashError> {
    let argon2_params = Params::new(
        params.memory_cost_kib,
        params.time_cost,
        u32::from(params.parallelism),
        Some(params.key_length as usize),
    )
    .map_err(|e| HashError::Derivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut output = vec![0u8; params.key_length as usize];
    argon2
        .hash_password_into(password, salt, &mut output)
        .map_err(|e| HashError::Derivation(e.to_string()))?;

    Ok(output)
}

/// Compare two byte slices without branching on their contents.
///
/// Slices of different length never match; the length is not secret. For
/// equal lengths every byte is visited, so the running time does not depend
/// on where the first difference sits.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let diff = a
        .iter()
        .zip(b.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    diff == 0
}
