use std::fmt;
use std::str::FromStr;

use base64ct::Base64Unpadded;
use base64ct::Encoding;

use super::errors::HashError;
use super::params::HashParameters;
use super::params::RawHash;

/// Algorithm identifier accepted in encoded hashes.
pub const ALGORITHM: &str = "argon2id";

/// Argon2 version accepted in encoded hashes (0x13).
pub const VERSION: u32 = 19;

/// Self-describing password hash string.
///
/// `$argon2id$v=19$m=<kib>,t=<passes>,p=<lanes>$<salt>$<hash>` with salt and
/// hash in unpadded standard base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash(String);

impl EncodedHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for EncodedHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Format parameters, salt and hash into the canonical string.
pub fn encode(params: &HashParameters, raw: &RawHash) -> EncodedHash {
    EncodedHash(format!(
        "${}$v={}$m={},t={},p={}${}${}",
        ALGORITHM,
        VERSION,
        params.memory_cost_kib,
        params.time_cost,
        params.parallelism,
        Base64Unpadded::encode_string(&raw.salt),
        Base64Unpadded::encode_string(&raw.hash),
    ))
}

/// Parse an encoded hash into its salt, hash and parameters.
///
/// Salt and key lengths are taken from the decoded bytes.
///
/// # Errors
/// * `MalformedHash` - Wrong number of fields, unparsable costs, invalid
///   base64, or costs and lengths Argon2 cannot derive with
/// * `UnsupportedAlgorithm` - Algorithm tag is not `argon2id`
/// * `UnsupportedVersion` - Version is not 19
pub fn decode(encoded: &str) -> Result<(RawHash, HashParameters), HashError> {
    let fields: Vec<&str> = encoded.split('$').collect();
    if fields.len() != 6 || !fields[0].is_empty() {
        return Err(HashError::malformed(format!(
            "expected 6 '$'-separated fields, got {}",
            fields.len()
        )));
    }

    if fields[1] != ALGORITHM {
        return Err(HashError::UnsupportedAlgorithm(fields[1].to_string()));
    }

    let version: u32 = fields[2]
        .strip_prefix("v=")
        .ok_or_else(|| HashError::malformed("missing version field"))
        .and_then(|v| parse_decimal("v", v))?;
    if version != VERSION {
        return Err(HashError::UnsupportedVersion(version));
    }

    let (memory_cost_kib, time_cost, parallelism) = parse_costs(fields[3])?;

    let salt = Base64Unpadded::decode_vec(fields[4])
        .map_err(|e| HashError::malformed(format!("salt is not valid base64: {e}")))?;
    let hash = Base64Unpadded::decode_vec(fields[5])
        .map_err(|e| HashError::malformed(format!("hash is not valid base64: {e}")))?;

    let params = HashParameters {
        memory_cost_kib,
        time_cost,
        parallelism,
        salt_length: length_of("salt", &salt)?,
        key_length: length_of("hash", &hash)?,
    };
    params.validate()?;

    Ok((RawHash { salt, hash }, params))
}

impl FromStr for EncodedHash {
    type Err = HashError;

    /// Accept only strings that decode cleanly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(|_| EncodedHash(s.to_string()))
    }
}

fn parse_costs(field: &str) -> Result<(u32, u32, u8), HashError> {
    let parts: Vec<&str> = field.split(',').collect();
    let [m, t, p] = parts.as_slice() else {
        return Err(HashError::malformed(format!("invalid cost field '{field}'")));
    };

    let value = |part: &str, key: &str| -> Result<String, HashError> {
        part.strip_prefix(key)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
            .ok_or_else(|| HashError::malformed(format!("expected '{key}=' in '{field}'")))
    };

    let memory = parse_decimal("m", &value(*m, "m")?)?;
    let time = parse_decimal("t", &value(*t, "t")?)?;
    let lanes = parse_decimal("p", &value(*p, "p")?)?;

    Ok((memory, time, lanes))
}

/// Plain decimal only: no sign, no leading zeros, so re-encoding reproduces
/// the input.
fn parse_decimal<T: FromStr>(name: &str, value: &str) -> Result<T, HashError> {
    let canonical = !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value == "0" || !value.starts_with('0'));

    if !canonical {
        return Err(HashError::malformed(format!("invalid {name} value '{value}'")));
    }

    value
        .parse()
        .map_err(|_| HashError::malformed(format!("{name} value '{value}' out of range")))
}

fn length_of(name: &str, bytes: &[u8]) -> Result<u32, HashError> {
    u32::try_from(bytes.len()).map_err(|_| HashError::malformed(format!("{name} too long")))
}
