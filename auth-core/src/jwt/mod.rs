pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;

pub use claims::Claims;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use issuer::Clock;
pub use issuer::SignedToken;
pub use issuer::SystemClock;
pub use issuer::TokenIssuer;
