pub mod argon2;
pub mod codec;
pub mod errors;
pub mod params;

pub use argon2::hash_password;
pub use argon2::verify;
pub use argon2::verify_encoded;
pub use codec::decode;
pub use codec::encode;
pub use codec::EncodedHash;
pub use errors::HashError;
pub use params::HashParameters;
pub use params::MemoryBudget;
pub use params::RawHash;
