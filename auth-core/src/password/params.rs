use super::errors::HashError;

/// Argon2id cost parameters.
///
/// `salt_length` and `key_length` describe the byte lengths of the salt and
/// derived key. When parameters come out of [`decode`](super::codec::decode)
/// they are taken from the decoded bytes, so a decoded hash always re-encodes
/// to the exact same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParameters {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u8,
    pub salt_length: u32,
    pub key_length: u32,
}

impl HashParameters {
    /// Shortest salt Argon2 accepts.
    pub const MIN_SALT_LENGTH: u32 = 8;
    /// Shortest derived key Argon2 produces.
    pub const MIN_KEY_LENGTH: u32 = 4;
    /// Argon2 needs at least 8 KiB of memory per lane.
    pub const MIN_MEMORY_KIB_PER_LANE: u32 = 8;

    /// Check that every cost is positive and within what Argon2 can derive.
    ///
    /// # Errors
    /// * `MalformedHash` - A field is zero or below the Argon2 minimum
    pub fn validate(&self) -> Result<(), HashError> {
        if self.time_cost == 0 {
            return Err(HashError::malformed("t must be positive"));
        }
        if self.parallelism == 0 {
            return Err(HashError::malformed("p must be positive"));
        }

        let min_memory = Self::MIN_MEMORY_KIB_PER_LANE * u32::from(self.parallelism);
        if self.memory_cost_kib < min_memory {
            return Err(HashError::malformed(format!(
                "m must be at least {min_memory} KiB for p={}, got {}",
                self.parallelism, self.memory_cost_kib
            )));
        }
        if self.salt_length < Self::MIN_SALT_LENGTH {
            return Err(HashError::malformed(format!(
                "salt must be at least {} bytes, got {}",
                Self::MIN_SALT_LENGTH,
                self.salt_length
            )));
        }
        if self.key_length < Self::MIN_KEY_LENGTH {
            return Err(HashError::malformed(format!(
                "hash must be at least {} bytes, got {}",
                Self::MIN_KEY_LENGTH,
                self.key_length
            )));
        }

        Ok(())
    }
}

impl Default for HashParameters {
    /// 19 MiB, two passes, one lane, 16-byte salt, 32-byte key.
    fn default() -> Self {
        Self {
            memory_cost_kib: 19_456,
            time_cost: 2,
            parallelism: 1,
            salt_length: 16,
            key_length: 32,
        }
    }
}

/// Salt and derived key of a password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHash {
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

/// Memory available to a single password derivation.
///
/// Argon2 allocates `m` KiB per derivation. On memory-constrained hosts the
/// caller checks the budget before deriving, because the derivation itself
/// will attempt the allocation regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBudget {
    pub available_kib: u64,
    pub safety_factor: u64,
}

impl MemoryBudget {
    pub fn new(available_kib: u64, safety_factor: u64) -> Self {
        Self {
            available_kib,
            safety_factor: safety_factor.max(1),
        }
    }

    /// Reject parameters whose memory cost, scaled by the safety factor,
    /// exceeds the available memory.
    ///
    /// # Errors
    /// * `MemoryBudgetExceeded` - Derivation would not fit in the budget
    pub fn check(&self, params: &HashParameters) -> Result<(), HashError> {
        let required_kib = u64::from(params.memory_cost_kib).saturating_mul(self.safety_factor);

        if required_kib > self.available_kib {
            return Err(HashError::MemoryBudgetExceeded {
                required_kib,
                available_kib: self.available_kib,
            });
        }

        Ok(())
    }
}
